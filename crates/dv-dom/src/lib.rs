//! Lenient HTML fragment parsing for docview.
//!
//! Turns already-sanitized HTML into a small owned tree ([`Document`],
//! [`Element`], [`Node`]) that the renderer walks and the table engine reads.
//! The tree is transient: it is rebuilt from markup on every render pass.
//!
//! # Example
//!
//! ```
//! let doc = dv_dom::parse_lenient("<p>Hello <b>world</b><br>!</p>");
//! let p = doc.find_first("p").unwrap();
//! assert_eq!(p.text_content(), "Hello world!");
//! assert_eq!(p.inner_html(), "Hello <b>world</b><br />!");
//! ```

mod entities;
mod error;
mod node;
mod parser;
mod serializer;

pub use entities::convert_html_entities;
pub use error::DomError;
pub use node::{Document, Element, Node, is_void_element};
pub use parser::{parse, parse_lenient, strip_tags};
pub use serializer::{escape_html, escape_into, write_nodes};
