//! Node tree produced by the parser.

use std::collections::BTreeMap;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Returns true for tags that are always empty (`<br>`, `<img>`, ...).
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// A node in the parsed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Element with tag, attributes and children.
    Element(Element),
    /// Decoded character data.
    Text(String),
}

impl Node {
    /// Shorthand for a text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// The element, if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// Concatenated text of this node and all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// An HTML element.
///
/// Tag and attribute names are lowercased by the parser. Attributes are kept
/// sorted so serialization is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes by name.
    pub attrs: BTreeMap<String, String>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Append a text child.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Append an element child.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Attribute value by name, ignoring empty values.
    #[must_use]
    pub fn non_empty_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).filter(|v| !v.is_empty())
    }

    /// Whitespace-separated entries of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    /// Whether the `class` attribute contains `name`.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.classes().any(|c| c == name)
    }

    /// Whether this is a void element.
    #[must_use]
    pub fn is_void(&self) -> bool {
        is_void_element(&self.tag)
    }

    /// Direct element children, skipping text.
    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Direct element children with the given tag.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> {
        self.element_children().filter(move |e| e.tag == tag)
    }

    /// Concatenated text of all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// First descendant (depth-first, document order) with the given tag.
    #[must_use]
    pub fn find_first(&self, tag: &str) -> Option<&Element> {
        for child in self.element_children() {
            if child.tag == tag {
                return Some(child);
            }
            if let Some(found) = child.find_first(tag) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants with the given tag, in document order.
    #[must_use]
    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_named(tag, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, tag: &str, found: &mut Vec<&'a Element>) {
        for child in self.element_children() {
            if child.tag == tag {
                found.push(child);
            }
            child.collect_named(tag, found);
        }
    }
}

/// A parsed fragment: the top-level nodes of the input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    /// Top-level nodes in document order.
    pub children: Vec<Node>,
}

impl Document {
    /// Concatenated text of the whole fragment.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// First element with the given tag anywhere in the fragment.
    #[must_use]
    pub fn find_first(&self, tag: &str) -> Option<&Element> {
        self.children
            .iter()
            .filter_map(Node::as_element)
            .find_map(|e| if e.tag == tag { Some(e) } else { e.find_first(tag) })
    }

    /// Whether the fragment has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("div").with_attr("class", "a custom-alert").with_child(
            Element::new("p")
                .with_text("Hello ")
                .with_child(Element::new("strong").with_text("world")),
        )
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        assert_eq!(sample().text_content(), "Hello world");
    }

    #[test]
    fn test_has_class() {
        let div = sample();
        assert!(div.has_class("custom-alert"));
        assert!(div.has_class("a"));
        assert!(!div.has_class("custom"));
    }

    #[test]
    fn test_find_first_and_all() {
        let div = sample();
        assert_eq!(div.find_first("strong").map(Element::text_content).as_deref(), Some("world"));
        assert!(div.find_first("em").is_none());
        assert_eq!(div.find_all("p").len(), 1);
    }

    #[test]
    fn test_void_elements() {
        assert!(is_void_element("br"));
        assert!(is_void_element("img"));
        assert!(!is_void_element("td"));
    }

    #[test]
    fn test_non_empty_attr() {
        let img = Element::new("img").with_attr("alt", "");
        assert_eq!(img.attr("alt"), Some(""));
        assert_eq!(img.non_empty_attr("alt"), None);
    }
}
