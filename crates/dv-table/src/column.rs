//! Column identity.
//!
//! The inline table addresses columns by position, the fullscreen table by
//! header text. Both resolve to a [`Header`] of the same [`ParsedTable`], so
//! the engine runs unchanged for either presentation.

use std::fmt::Debug;
use std::hash::Hash;

use crate::model::{Header, ParsedTable};

/// A way of naming a column.
pub trait ColumnRef: Clone + Ord + Hash + Debug {
    /// The header this reference points at, if any.
    fn resolve<'t>(&self, table: &'t ParsedTable) -> Option<&'t Header>;

    /// The reference naming `header`.
    fn from_header(header: &Header) -> Self;

    /// Record key (header text) for this column.
    fn key<'t>(&self, table: &'t ParsedTable) -> Option<&'t str> {
        self.resolve(table).map(|h| h.text.as_str())
    }
}

/// Column by zero-based position.
impl ColumnRef for usize {
    fn resolve<'t>(&self, table: &'t ParsedTable) -> Option<&'t Header> {
        table.header(*self)
    }

    fn from_header(header: &Header) -> Self {
        header.index
    }
}

/// Column by header text.
impl ColumnRef for String {
    fn resolve<'t>(&self, table: &'t ParsedTable) -> Option<&'t Header> {
        table.header_named(self)
    }

    fn from_header(header: &Header) -> Self {
        header.text.clone()
    }
}
