//! Sanitized HTML to renderable nodes.
//!
//! The [`Walker`] descends the parsed fragment and emits an ordered list of
//! [`RenderNode`]s for the host UI. Besides plain document structure it
//! recognizes:
//!
//! - component embeds: a paragraph containing `[uic:<id>]`
//! - accordions: `:::accordion Title` paragraphs and the siblings after them
//! - marker blocks: `div.custom-alert`, `.custom-math`, `.custom-diagram`
//! - code blocks, with `mermaid` and `kroki-*` fences turned into diagrams
//! - tables, parsed for the table controls
//!
//! Unknown tags are walked through, so no text is lost. Keys are positional
//! and stable across runs.
//!
//! # Example
//!
//! ```
//! use dv_renderer::{RenderNode, render_html};
//!
//! let nodes = render_html("<h1>Guide</h1><p>[uic:color-picker]</p>");
//! assert_eq!(nodes.len(), 2);
//! assert!(matches!(&nodes[1], RenderNode::ComponentEmbed { id, .. } if id == "color-picker"));
//! ```

mod alert;
mod diagram;
mod directive;
mod node;
mod walker;

pub use alert::AlertKind;
pub use diagram::DiagramLanguage;
pub use directive::{ACCORDION_CLOSE, ComponentMatcher, accordion_title};
pub use node::{InlineStyle, ListItem, RenderNode, count_by_kind};
pub use walker::{Walker, WalkerOptions, render_html};
