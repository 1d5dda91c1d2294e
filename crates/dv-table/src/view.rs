//! Stateful table controller.
//!
//! A [`TableView`] owns one parsed table plus the session state layered on top
//! of it (search, filters, sort, visible columns) and memoizes the derived
//! views. The inline table uses [`TableControls`] (columns by position, plain
//! values); the fullscreen table uses `TableView<String>` over rich values.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::column::ColumnRef;
use crate::debounce::{DEFAULT_SEARCH_DEBOUNCE, SearchDebouncer};
use crate::engine;
use crate::highlight;
use crate::memo::{Memo, ViewKey};
use crate::model::{Header, ParseMode, ParsedTable};
use crate::parser::parse_table;
use crate::state::{FilterState, SortDirection, SortState, VisibleColumns};

/// Controller settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    /// Quiet window before typed search text is applied.
    pub search_debounce: Duration,
    /// Whether the last visible column may be hidden.
    pub allow_hiding_all_columns: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            allow_hiding_all_columns: false,
        }
    }
}

/// Inline table controller: columns by position.
pub type TableControls = TableView<usize>;

/// One table with its interactive state.
#[derive(Debug)]
pub struct TableView<K: ColumnRef> {
    markup: String,
    table: Arc<ParsedTable>,
    generation: u64,
    options: ViewOptions,
    query: String,
    debouncer: SearchDebouncer,
    filters: FilterState<K>,
    sort: SortState<K>,
    visible: VisibleColumns<K>,
    rows_memo: Memo<ViewKey<K>, Arc<[usize]>>,
    unique_memo: Memo<u64, Arc<BTreeMap<K, Vec<String>>>>,
}

impl<K: ColumnRef> TableView<K> {
    /// Parse `markup` and start with every column visible.
    #[must_use]
    pub fn new(markup: &str, mode: ParseMode, options: ViewOptions) -> Self {
        let table = Arc::new(parse_table(markup, mode));
        let visible = VisibleColumns::all(&table);
        Self {
            markup: markup.to_owned(),
            table,
            generation: 0,
            options,
            query: String::new(),
            debouncer: SearchDebouncer::new(options.search_debounce),
            filters: FilterState::new(),
            sort: SortState::default(),
            visible,
            rows_memo: Memo::new(),
            unique_memo: Memo::new(),
        }
    }

    /// Replace the table markup.
    ///
    /// Identical markup is a no-op. Otherwise the table is re-parsed in the
    /// same mode and all session state is reset.
    pub fn set_markup(&mut self, markup: &str) {
        if markup == self.markup {
            return;
        }
        let mode = self.table.mode();
        self.markup = markup.to_owned();
        self.table = Arc::new(parse_table(markup, mode));
        self.generation += 1;
        self.query.clear();
        self.debouncer.cancel();
        self.filters = FilterState::new();
        self.sort = SortState::default();
        self.visible = VisibleColumns::all(&self.table);
        self.rows_memo.clear();
        self.unique_memo.clear();
        tracing::debug!(
            generation = self.generation,
            columns = self.table.headers.len(),
            rows = self.table.rows.len(),
            "Table markup changed, state reset"
        );
    }

    #[must_use]
    pub fn table(&self) -> &ParsedTable {
        &self.table
    }

    /// Markup the table was parsed from.
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    #[must_use]
    pub fn options(&self) -> ViewOptions {
        self.options
    }

    /// Applied search query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Search text typed but not yet applied.
    #[must_use]
    pub fn pending_query(&self) -> Option<&str> {
        self.debouncer.pending()
    }

    #[must_use]
    pub fn filters(&self) -> &FilterState<K> {
        &self.filters
    }

    #[must_use]
    pub fn sort(&self) -> &SortState<K> {
        &self.sort
    }

    #[must_use]
    pub fn visible(&self) -> &VisibleColumns<K> {
        &self.visible
    }

    // Search

    /// Record typed search text at `now`.
    pub fn input_search(&mut self, text: impl Into<String>, now: Instant) {
        self.debouncer.input(text, now);
    }

    /// Apply the typed text once its quiet window elapsed. Returns whether
    /// the applied query changed.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(text) => self.apply_query(text),
            None => false,
        }
    }

    /// Apply pending search text immediately.
    pub fn flush_search(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(text) => self.apply_query(text),
            None => false,
        }
    }

    /// Set the query directly, dropping any pending text.
    pub fn set_search(&mut self, text: impl Into<String>) -> bool {
        self.debouncer.cancel();
        self.apply_query(text.into())
    }

    fn apply_query(&mut self, text: String) -> bool {
        if text == self.query {
            return false;
        }
        tracing::debug!(query = %text, "Applying search query");
        self.query = text;
        true
    }

    // Filters

    /// Flip the selection of `value` in `column`. Unknown columns are ignored.
    pub fn toggle_filter(&mut self, column: K, value: &str) -> bool {
        if column.resolve(&self.table).is_none() {
            tracing::debug!(?column, "Ignoring filter on unknown column");
            return false;
        }
        self.filters = self.filters.toggled(column, value);
        true
    }

    /// Select or deselect `value` in `column`.
    pub fn set_filter(&mut self, column: K, value: &str, selected: bool) -> bool {
        if column.resolve(&self.table).is_none() {
            tracing::debug!(?column, "Ignoring filter on unknown column");
            return false;
        }
        if self.filters.is_selected(&column, value) == selected {
            return false;
        }
        self.filters = self.filters.with_value(column, value, selected);
        true
    }

    /// Drop every filter on `column`.
    pub fn clear_filter(&mut self, column: &K) {
        if self.filters.get(column).is_some() {
            self.filters = self.filters.without(column);
        }
    }

    /// Number of columns with an active filter.
    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        self.filters.len()
    }

    // Sort

    /// Header click on `column`: asc, desc, unsorted, then asc again.
    pub fn cycle_sort(&mut self, column: K) -> bool {
        if column.resolve(&self.table).is_none() {
            tracing::debug!(?column, "Ignoring sort on unknown column");
            return false;
        }
        self.sort = self.sort.clicked(column);
        true
    }

    /// Sort by `column` in `direction` directly.
    pub fn set_sort(&mut self, column: K, direction: SortDirection) -> bool {
        if column.resolve(&self.table).is_none() {
            tracing::debug!(?column, "Ignoring sort on unknown column");
            return false;
        }
        self.sort = SortState::by(column, direction);
        true
    }

    /// Direction shown on the header of `column`.
    #[must_use]
    pub fn sort_direction(&self, column: &K) -> SortDirection {
        self.sort.direction_for(column)
    }

    // Columns

    /// Show or hide `column`.
    ///
    /// Returns `false` and leaves the state unchanged for unknown columns and,
    /// unless [`ViewOptions::allow_hiding_all_columns`] is set, when `column`
    /// is the last visible one.
    pub fn toggle_column(&mut self, column: K) -> bool {
        if column.resolve(&self.table).is_none() {
            tracing::debug!(?column, "Ignoring visibility toggle on unknown column");
            return false;
        }
        let hiding_last = self.visible.len() == 1 && self.visible.contains(&column);
        if hiding_last && !self.options.allow_hiding_all_columns {
            tracing::debug!(?column, "Refusing to hide the last visible column");
            return false;
        }
        self.visible = self.visible.toggled(column);
        true
    }

    /// Headers of the visible columns in table order.
    #[must_use]
    pub fn visible_headers(&self) -> Vec<&Header> {
        self.table
            .headers
            .iter()
            .filter(|header| self.visible.contains(&K::from_header(header)))
            .collect()
    }

    /// Clear search, sort and filters. Column visibility is kept.
    pub fn reset(&mut self) {
        self.debouncer.cancel();
        self.query.clear();
        self.sort = SortState::default();
        self.filters = FilterState::new();
    }

    // Derived views

    /// Displayed rows as indices into [`ParsedTable::rows`].
    pub fn rows(&mut self) -> Arc<[usize]> {
        let key = ViewKey {
            generation: self.generation,
            filters: self.filters.clone(),
            query: self.query.clone(),
            sort: self.sort.clone(),
            visible: self.visible.clone(),
        };
        let table = &self.table;
        let (filters, query, sort, visible) =
            (&self.filters, &self.query, &self.sort, &self.visible);
        self.rows_memo.get_or_compute(key, || {
            Arc::from(engine::run_pipeline(table, filters, query, sort, visible))
        })
    }

    /// Selectable filter values per column, from the full row set.
    pub fn unique_values(&mut self) -> Arc<BTreeMap<K, Vec<String>>> {
        let table = &self.table;
        self.unique_memo
            .get_or_compute(self.generation, || Arc::new(engine::unique_value_index(table)))
    }

    /// A displayed value with the applied query highlighted.
    #[must_use]
    pub fn highlight(&self, value: &str) -> String {
        match self.table.mode() {
            ParseMode::Plain => highlight::highlight_plain(value, &self.query),
            ParseMode::Rich => highlight::highlight_html(value, &self.query),
        }
    }
}
