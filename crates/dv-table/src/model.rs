//! Parsed table data model.

use std::collections::BTreeMap;
use std::sync::OnceLock;

/// A body row: header text mapped to the cell value.
pub type Record = BTreeMap<String, String>;

/// Horizontal alignment declared on a header cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Alignment {
    Left,
    Center,
    Right,
    /// No explicit alignment; the host renders it left-aligned.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "none"))]
    Unspecified,
}

impl Alignment {
    /// Parse an `align` attribute or `text-align` value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Unspecified => "none",
        }
    }
}

/// A header cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Header {
    /// Trimmed plain text of the header cell.
    pub text: String,
    /// Zero-based position in the header row.
    pub index: usize,
    pub alignment: Alignment,
}

/// How cell values were captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ParseMode {
    /// Tags stripped; values are directly comparable.
    #[default]
    Plain,
    /// Inner markup preserved for display; plain text is derived on demand.
    Rich,
}

/// Structured table extracted from `<table>` markup.
///
/// Parsed rows are never reordered or mutated. Views produced by the engine
/// are lists of indices into [`ParsedTable::rows`].
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParsedTable {
    pub headers: Vec<Header>,
    pub rows: Vec<Record>,
    mode: ParseMode,
    #[cfg_attr(feature = "serde", serde(skip))]
    plain_rows: OnceLock<Vec<Record>>,
}

impl PartialEq for ParsedTable {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode && self.headers == other.headers && self.rows == other.rows
    }
}

impl Eq for ParsedTable {}

impl ParsedTable {
    /// Build a table from already extracted headers and rows.
    #[must_use]
    pub fn new(headers: Vec<Header>, rows: Vec<Record>, mode: ParseMode) -> Self {
        Self {
            headers,
            rows,
            mode,
            plain_rows: OnceLock::new(),
        }
    }

    /// The table with no headers and no rows.
    #[must_use]
    pub fn empty(mode: ParseMode) -> Self {
        Self::new(Vec::new(), Vec::new(), mode)
    }

    #[must_use]
    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// True when there is nothing to render.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    /// Header at a column position.
    #[must_use]
    pub fn header(&self, index: usize) -> Option<&Header> {
        self.headers.get(index)
    }

    /// First header with the given text.
    #[must_use]
    pub fn header_named(&self, text: &str) -> Option<&Header> {
        self.headers.iter().find(|h| h.text == text)
    }

    /// Stored cell value (markup in rich mode).
    #[must_use]
    pub fn value(&self, row: usize, header: &str) -> Option<&str> {
        self.rows.get(row)?.get(header).map(String::as_str)
    }

    /// Plain-text cell value used for filtering, searching and sorting.
    ///
    /// Missing rows or cells read as the empty string.
    #[must_use]
    pub fn plain_value(&self, row: usize, header: &str) -> &str {
        let rows = match self.mode {
            ParseMode::Plain => &self.rows,
            ParseMode::Rich => self.plain_rows(),
        };
        rows.get(row)
            .and_then(|record| record.get(header))
            .map_or("", String::as_str)
    }

    /// Row indices in parse order.
    #[must_use]
    pub fn row_indices(&self) -> Vec<usize> {
        (0..self.rows.len()).collect()
    }

    fn plain_rows(&self) -> &Vec<Record> {
        self.plain_rows.get_or_init(|| {
            self.rows
                .iter()
                .map(|record| {
                    record
                        .iter()
                        .map(|(header, value)| {
                            (header.clone(), dv_dom::strip_tags(value).trim().to_owned())
                        })
                        .collect()
                })
                .collect()
        })
    }
}
