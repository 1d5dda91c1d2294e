//! Error types for HTML parsing.

use std::str::Utf8Error;

/// Error raised by strict HTML parsing.
///
/// Lenient parsing ([`crate::parse_lenient`]) never surfaces these; it logs
/// them and keeps the partial tree instead.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DomError {
    /// Markup could not be tokenized.
    #[error("HTML parse error")]
    Parse(#[from] quick_xml::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error")]
    Utf8(#[from] Utf8Error),

    /// Malformed attribute list.
    #[error("attribute error")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Encoding error while decoding names or text.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),
}
