//! Renderable output nodes.

use dv_table::ParsedTable;

use crate::alert::AlertKind;
use crate::diagram::DiagramLanguage;

/// Inline formatting applied to a run of markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InlineStyle {
    Strong,
    Emphasis,
    Underline,
    Strikethrough,
    Subscript,
    Superscript,
}

impl InlineStyle {
    /// Style for an inline formatting tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "strong" | "b" => Some(Self::Strong),
            "em" | "i" => Some(Self::Emphasis),
            "u" => Some(Self::Underline),
            "s" | "del" | "strike" => Some(Self::Strikethrough),
            "sub" => Some(Self::Subscript),
            "sup" => Some(Self::Superscript),
            _ => None,
        }
    }
}

/// One list item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ListItem {
    /// Item markup, without the task checkbox.
    pub html: String,
    /// Checkbox state for task items, `None` for ordinary items.
    pub checked: Option<bool>,
}

impl ListItem {
    #[must_use]
    pub fn is_task(&self) -> bool {
        self.checked.is_some()
    }
}

/// A node of the rendered document.
///
/// `key` is derived from the node's position (`"0"`, `"0-2"`, ...) so the same
/// input always yields the same keys.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum RenderNode {
    /// Non-blank text, kept as written.
    Text { key: String, text: String },
    Paragraph { key: String, html: String },
    Heading {
        key: String,
        level: u8,
        id: Option<String>,
        html: String,
    },
    List {
        key: String,
        ordered: bool,
        items: Vec<ListItem>,
    },
    Link {
        key: String,
        href: String,
        html: String,
        external: bool,
    },
    Image {
        key: String,
        src: String,
        alt: String,
        /// Figure caption from the `title` attribute.
        caption: Option<String>,
    },
    Blockquote { key: String, html: String },
    /// A table with its markup and plain-text model for the table controls.
    Table {
        key: String,
        markup: String,
        table: ParsedTable,
    },
    Rule { key: String },
    Inline {
        key: String,
        style: InlineStyle,
        html: String,
    },
    CodeBlock {
        key: String,
        language: String,
        code: String,
    },
    InlineCode { key: String, code: String },
    Alert {
        key: String,
        kind: AlertKind,
        children: Vec<RenderNode>,
    },
    Math {
        key: String,
        formula: String,
        /// Block formula (`div`) rather than inline (`span`).
        display: bool,
    },
    Diagram {
        key: String,
        language: DiagramLanguage,
        source: String,
    },
    /// Placeholder for a UI component resolved by the host.
    ComponentEmbed { key: String, id: String },
    Accordion {
        key: String,
        title: String,
        children: Vec<RenderNode>,
    },
}

impl RenderNode {
    /// Positional key of this node.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Text { key, .. }
            | Self::Paragraph { key, .. }
            | Self::Heading { key, .. }
            | Self::List { key, .. }
            | Self::Link { key, .. }
            | Self::Image { key, .. }
            | Self::Blockquote { key, .. }
            | Self::Table { key, .. }
            | Self::Rule { key }
            | Self::Inline { key, .. }
            | Self::CodeBlock { key, .. }
            | Self::InlineCode { key, .. }
            | Self::Alert { key, .. }
            | Self::Math { key, .. }
            | Self::Diagram { key, .. }
            | Self::ComponentEmbed { key, .. }
            | Self::Accordion { key, .. } => key,
        }
    }

    /// Nested nodes of container nodes; empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[RenderNode] {
        match self {
            Self::Alert { children, .. } | Self::Accordion { children, .. } => children,
            _ => &[],
        }
    }

    /// Short variant name, as used in serialized output.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Paragraph { .. } => "paragraph",
            Self::Heading { .. } => "heading",
            Self::List { .. } => "list",
            Self::Link { .. } => "link",
            Self::Image { .. } => "image",
            Self::Blockquote { .. } => "blockquote",
            Self::Table { .. } => "table",
            Self::Rule { .. } => "rule",
            Self::Inline { .. } => "inline",
            Self::CodeBlock { .. } => "code_block",
            Self::InlineCode { .. } => "inline_code",
            Self::Alert { .. } => "alert",
            Self::Math { .. } => "math",
            Self::Diagram { .. } => "diagram",
            Self::ComponentEmbed { .. } => "component_embed",
            Self::Accordion { .. } => "accordion",
        }
    }
}

/// Count nodes by kind, descending into containers.
#[must_use]
pub fn count_by_kind(nodes: &[RenderNode]) -> std::collections::BTreeMap<&'static str, usize> {
    let mut counts = std::collections::BTreeMap::new();
    let mut stack: Vec<&RenderNode> = nodes.iter().collect();
    while let Some(node) = stack.pop() {
        *counts.entry(node.kind()).or_insert(0) += 1;
        stack.extend(node.children());
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_style_from_tag() {
        assert_eq!(InlineStyle::from_tag("b"), Some(InlineStyle::Strong));
        assert_eq!(InlineStyle::from_tag("del"), Some(InlineStyle::Strikethrough));
        assert_eq!(InlineStyle::from_tag("span"), None);
    }

    #[test]
    fn test_key_and_children() {
        let node = RenderNode::Alert {
            key: "3".to_owned(),
            kind: AlertKind::Note,
            children: vec![RenderNode::Rule {
                key: "3-0".to_owned(),
            }],
        };
        assert_eq!(node.key(), "3");
        assert_eq!(node.children()[0].key(), "3-0");
        assert!(node.children()[0].children().is_empty());
    }

    #[test]
    fn test_count_by_kind() {
        let nodes = vec![
            RenderNode::Rule { key: "0".to_owned() },
            RenderNode::Accordion {
                key: "1".to_owned(),
                title: "More".to_owned(),
                children: vec![RenderNode::Rule { key: "2".to_owned() }],
            },
        ];
        let counts = count_by_kind(&nodes);
        assert_eq!(counts["rule"], 2);
        assert_eq!(counts["accordion"], 1);
    }
}
