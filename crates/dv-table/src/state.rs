//! Per-view session state: filters, sort and column visibility.
//!
//! Filter and visibility sets are immutable and shared behind an `Arc`. Every
//! update returns a new value, so a changed input is detected by pointer
//! identity ([`FilterState::same_as`], [`VisibleColumns::same_as`]).

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::column::ColumnRef;
use crate::model::ParsedTable;

/// Allowed values per column.
///
/// AND across columns, OR within a column. A column never maps to an empty
/// set: removing its last value removes the column.
#[derive(Debug, Clone)]
pub struct FilterState<K: ColumnRef> {
    entries: Arc<BTreeMap<K, BTreeSet<String>>>,
}

impl<K: ColumnRef> Default for FilterState<K> {
    fn default() -> Self {
        Self {
            entries: Arc::new(BTreeMap::new()),
        }
    }
}

impl<K: ColumnRef> PartialEq for FilterState<K> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: ColumnRef> Eq for FilterState<K> {}

impl<K: ColumnRef> FilterState<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no column is filtered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of filtered columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Allowed values for a column.
    #[must_use]
    pub fn get(&self, column: &K) -> Option<&BTreeSet<String>> {
        self.entries.get(column)
    }

    /// Whether `value` is selected for `column`.
    #[must_use]
    pub fn is_selected(&self, column: &K, value: &str) -> bool {
        self.get(column).is_some_and(|values| values.contains(value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &BTreeSet<String>)> {
        self.entries.iter()
    }

    /// Copy with `value` selected or deselected for `column`.
    #[must_use]
    pub fn with_value(&self, column: K, value: &str, selected: bool) -> Self {
        let mut entries = (*self.entries).clone();
        if selected {
            entries.entry(column).or_default().insert(value.to_owned());
        } else if let Some(values) = entries.get_mut(&column) {
            values.remove(value);
            if values.is_empty() {
                entries.remove(&column);
            }
        }
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Copy with the selection of `value` flipped.
    #[must_use]
    pub fn toggled(&self, column: K, value: &str) -> Self {
        let selected = !self.is_selected(&column, value);
        self.with_value(column, value, selected)
    }

    /// Copy without any filter on `column`.
    #[must_use]
    pub fn without(&self, column: &K) -> Self {
        let mut entries = (*self.entries).clone();
        entries.remove(column);
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Whether both values share the same underlying set.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

/// Sort direction of the active column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortDirection {
    Asc,
    Desc,
    /// Original parse order.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "none"))]
    Unsorted,
}

impl SortDirection {
    /// Next step of the header-click cycle: asc, desc, unsorted, asc, ...
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Unsorted,
            Self::Unsorted => Self::Asc,
        }
    }

    /// Parse `asc`, `desc` or `none`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            "none" => Some(Self::Unsorted),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
            Self::Unsorted => "none",
        }
    }
}

/// Active sort column and direction. At most one column is active.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortState<K: ColumnRef> {
    pub column: Option<K>,
    pub direction: SortDirection,
}

impl<K: ColumnRef> Default for SortState<K> {
    fn default() -> Self {
        Self {
            column: None,
            direction: SortDirection::Unsorted,
        }
    }
}

impl<K: ColumnRef> SortState<K> {
    /// Sort by `column` in `direction`.
    #[must_use]
    pub fn by(column: K, direction: SortDirection) -> Self {
        Self {
            column: Some(column),
            direction,
        }
    }

    /// State after a click on the header of `column`.
    ///
    /// The active column advances through the cycle; any other column
    /// becomes active in ascending order.
    #[must_use]
    pub fn clicked(&self, column: K) -> Self {
        if self.column.as_ref() == Some(&column) {
            Self {
                column: Some(column),
                direction: self.direction.next(),
            }
        } else {
            Self::by(column, SortDirection::Asc)
        }
    }

    /// Whether rows keep their incoming order.
    #[must_use]
    pub fn is_unsorted(&self) -> bool {
        self.column.is_none() || self.direction == SortDirection::Unsorted
    }

    /// Direction shown on the header of `column`.
    #[must_use]
    pub fn direction_for(&self, column: &K) -> SortDirection {
        if self.column.as_ref() == Some(column) {
            self.direction
        } else {
            SortDirection::Unsorted
        }
    }
}

/// Columns that render and take part in text search.
#[derive(Debug, Clone)]
pub struct VisibleColumns<K: ColumnRef> {
    columns: Arc<BTreeSet<K>>,
}

impl<K: ColumnRef> Default for VisibleColumns<K> {
    fn default() -> Self {
        Self {
            columns: Arc::new(BTreeSet::new()),
        }
    }
}

impl<K: ColumnRef> PartialEq for VisibleColumns<K> {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

impl<K: ColumnRef> Eq for VisibleColumns<K> {}

impl<K: ColumnRef> FromIterator<K> for VisibleColumns<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            columns: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl<K: ColumnRef> VisibleColumns<K> {
    /// Every column of `table`.
    #[must_use]
    pub fn all(table: &ParsedTable) -> Self {
        table.headers.iter().map(K::from_header).collect()
    }

    #[must_use]
    pub fn contains(&self, column: &K) -> bool {
        self.columns.contains(column)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.columns.iter()
    }

    /// Copy with `column` shown if hidden, hidden if shown.
    ///
    /// Hiding the last column is allowed here; controllers apply the policy.
    #[must_use]
    pub fn toggled(&self, column: K) -> Self {
        let mut columns = (*self.columns).clone();
        if !columns.remove(&column) {
            columns.insert(column);
        }
        Self {
            columns: Arc::new(columns),
        }
    }

    /// Whether both values share the same underlying set.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.columns, &other.columns)
    }
}
