//! Filter, search and sort over a [`ParsedTable`].
//!
//! Every stage takes a view (row indices into [`ParsedTable::rows`]) and
//! returns a new one; parsed rows are never touched. [`run_pipeline`] applies
//! the stages in their fixed order: filter, then search, then sort.
//!
//! All comparisons use plain-text values, so plain and rich tables holding the
//! same content produce the same views.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use feruca::Collator;

use crate::column::ColumnRef;
use crate::fold;
use crate::model::ParsedTable;
use crate::state::{FilterState, SortDirection, SortState, VisibleColumns};

/// Plain text of `column` in `row`; unknown columns read as empty.
fn plain<'t, K: ColumnRef>(table: &'t ParsedTable, row: usize, column: &K) -> &'t str {
    column
        .key(table)
        .map_or("", |key| table.plain_value(row, key))
}

/// Keep rows whose value is allowed in every filtered column.
#[must_use]
pub fn apply_filters<K: ColumnRef>(
    table: &ParsedTable,
    rows: &[usize],
    filters: &FilterState<K>,
) -> Vec<usize> {
    if filters.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .copied()
        .filter(|&row| {
            filters
                .iter()
                .all(|(column, allowed)| allowed.contains(plain(table, row, column)))
        })
        .collect()
}

/// Keep rows where any visible column contains `query`, ignoring case.
///
/// An empty query keeps every row.
#[must_use]
pub fn apply_search<K: ColumnRef>(
    table: &ParsedTable,
    rows: &[usize],
    query: &str,
    visible: &VisibleColumns<K>,
) -> Vec<usize> {
    if query.is_empty() {
        return rows.to_vec();
    }
    let needle = fold::fold_query(query);
    rows.iter()
        .copied()
        .filter(|&row| {
            visible
                .iter()
                .any(|column| fold::contains(plain(table, row, column), &needle))
        })
        .collect()
}

/// Order rows by the plain text of `column`.
///
/// The sort is stable; [`SortDirection::Unsorted`] keeps the incoming order.
#[must_use]
pub fn apply_sort<K: ColumnRef>(
    table: &ParsedTable,
    rows: &[usize],
    column: Option<&K>,
    direction: SortDirection,
) -> Vec<usize> {
    let mut sorted = rows.to_vec();
    let Some(column) = column else {
        return sorted;
    };
    match direction {
        SortDirection::Unsorted => {}
        SortDirection::Asc => {
            sorted.sort_by(|&a, &b| collate(plain(table, a, column), plain(table, b, column)));
        }
        SortDirection::Desc => {
            sorted.sort_by(|&a, &b| collate(plain(table, b, column), plain(table, a, column)));
        }
    }
    sorted
}

/// Filter, search, then sort the full table.
#[must_use]
pub fn run_pipeline<K: ColumnRef>(
    table: &ParsedTable,
    filters: &FilterState<K>,
    query: &str,
    sort: &SortState<K>,
    visible: &VisibleColumns<K>,
) -> Vec<usize> {
    let rows = table.row_indices();
    let rows = apply_filters(table, &rows, filters);
    let rows = apply_search(table, &rows, query, visible);
    apply_sort(table, &rows, sort.column.as_ref(), sort.direction)
}

/// Distinct non-empty plain values of `column` over every parsed row, sorted.
#[must_use]
pub fn unique_values<K: ColumnRef>(table: &ParsedTable, column: &K) -> Vec<String> {
    let Some(key) = column.key(table) else {
        return Vec::new();
    };
    let distinct: BTreeSet<&str> = (0..table.rows.len())
        .map(|row| table.plain_value(row, key).trim())
        .filter(|value| !value.is_empty())
        .collect();
    let mut values: Vec<String> = distinct.into_iter().map(str::to_owned).collect();
    values.sort_by(|a, b| collate(a, b));
    values
}

/// Unique values for every column.
#[must_use]
pub fn unique_value_index<K: ColumnRef>(table: &ParsedTable) -> BTreeMap<K, Vec<String>> {
    table
        .headers
        .iter()
        .map(|header| {
            let column = K::from_header(header);
            let values = unique_values(table, &column);
            (column, values)
        })
        .collect()
}

thread_local! {
    static COLLATOR: RefCell<Collator> = RefCell::new(Collator::default());
}

/// Unicode collation order (UCA with CLDR root tailoring).
///
/// Letters compare alphabetically across scripts and accents
/// (`"Еда" < "Ёж" < "Жук"`, `"Éclair" < "fig"`); on ties lowercase sorts first:
/// `"apple" < "banana" < "Banana"`.
#[must_use]
pub fn collate(a: &str, b: &str) -> Ordering {
    COLLATOR.with_borrow_mut(|collator| collator.collate(a, b))
}
