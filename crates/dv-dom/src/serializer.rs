//! Serialization of nodes back to HTML.

use std::fmt::Write;

use crate::node::{Document, Element, Node};

impl Element {
    /// Markup of this element including its own tags.
    #[must_use]
    pub fn outer_html(&self) -> String {
        let mut out = String::with_capacity(64);
        write_element(self, &mut out);
        out
    }

    /// Markup of the children only.
    #[must_use]
    pub fn inner_html(&self) -> String {
        let mut out = String::with_capacity(64);
        write_nodes(&self.children, &mut out);
        out
    }
}

impl Node {
    /// Markup of this node.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_node(self, &mut out);
        out
    }
}

impl Document {
    /// Markup of the whole fragment.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(256);
        write_nodes(&self.children, &mut out);
        out
    }
}

/// Serialize a node sequence.
pub fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        write_node(node, out);
    }
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => escape_into(text, false, out),
        Node::Element(element) => write_element(element, out),
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for (key, value) in &element.attrs {
        write!(out, " {key}=\"").unwrap();
        escape_into(value, true, out);
        out.push('"');
    }

    if element.is_void() {
        out.push_str(" />");
        return;
    }

    out.push('>');
    write_nodes(&element.children, out);
    write!(out, "</{}>", element.tag).unwrap();
}

/// Escape text for element content (`escape_quotes = false`) or attribute values.
pub fn escape_into(text: &str, escape_quotes: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if escape_quotes => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// Escape text for element content.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(text, false, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_outer_html() {
        let p = Element::new("p")
            .with_text("a < b ")
            .with_child(Element::new("strong").with_text("bold"));
        assert_eq!(p.outer_html(), "<p>a &lt; b <strong>bold</strong></p>");
    }

    #[test]
    fn test_inner_html() {
        let td = Element::new("td")
            .with_child(Element::new("em").with_text("x"))
            .with_text(" & y");
        assert_eq!(td.inner_html(), "<em>x</em> &amp; y");
    }

    #[test]
    fn test_void_and_empty_elements() {
        let p = Element::new("p")
            .with_child(Element::new("br"))
            .with_child(Element::new("span"));
        assert_eq!(p.outer_html(), "<p><br /><span></span></p>");
    }

    #[test]
    fn test_attributes_escaped_and_sorted() {
        let a = Element::new("a")
            .with_attr("title", "say \"hi\"")
            .with_attr("href", "/x?a=1&b=2");
        assert_eq!(
            a.outer_html(),
            r#"<a href="/x?a=1&amp;b=2" title="say &quot;hi&quot;"></a>"#
        );
    }

    #[test]
    fn test_roundtrip_is_stable() {
        let html = r#"<table><tbody><tr><td align="left"><b>A</b> &amp; B</td></tr></tbody></table>"#;
        let once = parse(html).unwrap().to_html();
        let twice = parse(&once).unwrap().to_html();
        assert_eq!(once, html);
        assert_eq!(twice, once);
    }
}
