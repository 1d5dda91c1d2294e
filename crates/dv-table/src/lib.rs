//! Interactive tables for docview.
//!
//! Parses `<table>` markup into a [`ParsedTable`] and derives filtered,
//! searched and sorted views over it. Views are index lists; the parsed rows
//! are never mutated.
//!
//! Two controllers share the same engine:
//! - [`TableControls`]: the inline table, columns addressed by position,
//!   plain-text values.
//! - [`TableModal`]: the fullscreen table, columns addressed by header text,
//!   markup-preserving values, with its own state and scoped host listeners.
//!
//! # Example
//!
//! ```
//! use dv_table::{ParseMode, TableControls, ViewOptions};
//!
//! let html = "<table><thead><tr><th>Name</th><th>Role</th></tr></thead>\
//!             <tbody><tr><td>Ann</td><td>Eng</td></tr><tr><td>Bo</td><td>PM</td></tr></tbody></table>";
//! let mut view = TableControls::new(html, ParseMode::Plain, ViewOptions::default());
//! view.toggle_filter(1, "PM");
//! assert_eq!(&*view.rows(), &[1]);
//! ```

mod column;
mod debounce;
mod engine;
mod fold;
mod highlight;
mod memo;
mod modal;
mod model;
mod parser;
mod state;
mod view;

pub use column::ColumnRef;
pub use debounce::{DEFAULT_SEARCH_DEBOUNCE, SearchDebouncer};
pub use engine::{
    apply_filters, apply_search, apply_sort, collate, run_pipeline, unique_value_index,
    unique_values,
};
pub use highlight::{HIGHLIGHT_CLASS, TextPart, highlight_html, highlight_plain, split_by_query};
pub use memo::{Memo, MemoKey, ViewKey};
pub use modal::{EventHost, HostEvent, ListenerGuard, ListenerId, TableModal};
pub use model::{Alignment, Header, ParseMode, ParsedTable, Record};
pub use parser::{extract_tables, parse_table, parse_table_element, parse_tables};
pub use state::{FilterState, SortDirection, SortState, VisibleColumns};
pub use view::{TableControls, TableView, ViewOptions};
