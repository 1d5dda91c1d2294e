//! Search-match emphasis for displayed cell values.
//!
//! Works on a fresh copy of the value for each render. Matched substrings are
//! wrapped in `<mark class="search-highlight">`; text already inside a `<mark>`
//! is left alone so nested matches are not wrapped twice.

use dv_dom::{Element, Node};

use crate::fold;

/// Class put on generated `<mark>` elements.
pub const HIGHLIGHT_CLASS: &str = "search-highlight";

/// A run of text, either matching the query or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPart<'a> {
    pub text: &'a str,
    pub matched: bool,
}

/// Split `text` into matching and non-matching runs.
///
/// An empty query yields the whole text as one unmatched run.
#[must_use]
pub fn split_by_query<'a>(text: &'a str, query: &str) -> Vec<TextPart<'a>> {
    let mut parts = Vec::new();
    let mut cursor = 0;
    for (start, end) in fold::match_ranges(text, &fold::fold_query(query)) {
        if start > cursor {
            parts.push(TextPart {
                text: &text[cursor..start],
                matched: false,
            });
        }
        parts.push(TextPart {
            text: &text[start..end],
            matched: true,
        });
        cursor = end;
    }
    if cursor < text.len() {
        parts.push(TextPart {
            text: &text[cursor..],
            matched: false,
        });
    }
    parts
}

fn mark(text: &str) -> Element {
    Element::new("mark")
        .with_attr("class", HIGHLIGHT_CLASS)
        .with_text(text)
}

fn highlight_nodes(nodes: &[Node], query: &str) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Text(text) => {
                for part in split_by_query(text, query) {
                    if part.matched {
                        out.push(mark(part.text).into());
                    } else {
                        out.push(Node::text(part.text));
                    }
                }
            }
            Node::Element(element) if element.tag == "mark" => out.push(node.clone()),
            Node::Element(element) => {
                let mut copy = element.clone();
                copy.children = highlight_nodes(&element.children, query);
                out.push(copy.into());
            }
        }
    }
    out
}

/// Escaped plain text with matches wrapped in `<mark>`.
#[must_use]
pub fn highlight_plain(text: &str, query: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let nodes = highlight_nodes(&[Node::text(text)], query);
    dv_dom::write_nodes(&nodes, &mut out);
    out
}

/// Markup with matches inside text nodes wrapped in `<mark>`.
///
/// Tags and attribute values are never matched. An empty query returns the
/// markup unchanged.
#[must_use]
pub fn highlight_html(markup: &str, query: &str) -> String {
    if query.is_empty() {
        return markup.to_owned();
    }
    let document = dv_dom::parse_lenient(markup);
    let nodes = highlight_nodes(&document.children, query);
    let mut out = String::with_capacity(markup.len() + 32);
    dv_dom::write_nodes(&nodes, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_split_case_insensitive() {
        let parts = split_by_query("Engineering eng", "ENG");
        assert_eq!(
            parts,
            vec![
                TextPart { text: "Eng", matched: true },
                TextPart { text: "ineering ", matched: false },
                TextPart { text: "eng", matched: true },
            ]
        );
    }

    #[test]
    fn test_split_empty_query() {
        let parts = split_by_query("abc", "");
        assert_eq!(parts, vec![TextPart { text: "abc", matched: false }]);
        assert!(split_by_query("", "x").is_empty());
    }

    #[test]
    fn test_split_non_ascii() {
        let parts = split_by_query("Привет мир", "МИР");
        assert_eq!(parts[1], TextPart { text: "мир", matched: true });
    }

    #[test]
    fn test_split_final_sigma_like_search() {
        let parts = split_by_query("ΟΔΟΣ", "οδος");
        assert_eq!(parts, vec![TextPart { text: "ΟΔΟΣ", matched: true }]);
    }

    #[test]
    fn test_highlight_plain_escapes() {
        assert_eq!(
            highlight_plain("a<b & ab", "ab"),
            "a&lt;b &amp; <mark class=\"search-highlight\">ab</mark>"
        );
    }

    #[test]
    fn test_highlight_html_text_only() {
        let html = highlight_html(r#"<a href="/eng">Eng team</a>"#, "eng");
        assert_eq!(
            html,
            r#"<a href="/eng"><mark class="search-highlight">Eng</mark> team</a>"#
        );
    }

    #[test]
    fn test_highlight_html_skips_existing_marks() {
        let input = "<mark>eng</mark> eng";
        let html = highlight_html(input, "eng");
        assert_eq!(
            html,
            "<mark>eng</mark> <mark class=\"search-highlight\">eng</mark>"
        );
        assert_eq!(highlight_html(&html, "eng"), html);
    }

    #[test]
    fn test_highlight_html_empty_query() {
        assert_eq!(highlight_html("<b>x</b>", ""), "<b>x</b>");
    }
}
