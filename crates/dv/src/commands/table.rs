//! `dv table` command implementation.
//!
//! Picks one table from an HTML file, applies filters, search, sort and hidden
//! columns through a table controller, and prints the resulting view.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Args;
use dv_config::{CliSettings, Config};
use dv_table::{
    ColumnRef, EventHost, Header, HostEvent, ListenerId, ParseMode, SortDirection, TableControls,
    TableModal, TableView, extract_tables,
};
use serde::Serialize;

use super::view_options;
use crate::error::CliError;
use crate::output::{Output, write_json};

/// Arguments for the table command.
#[derive(Args)]
pub(crate) struct TableArgs {
    /// HTML file containing the table.
    file: PathBuf,

    /// Zero-based position of the table in the document.
    #[arg(long, default_value_t = 0)]
    index: usize,

    /// Keep cell markup and address columns like the fullscreen view.
    #[arg(long)]
    rich: bool,

    /// Select a filter value, as COLUMN=VALUE (repeatable).
    #[arg(long = "filter", value_name = "COLUMN=VALUE")]
    filters: Vec<String>,

    /// Case-insensitive search across visible columns.
    #[arg(long)]
    search: Option<String>,

    /// Sort column, as COLUMN or COLUMN:asc|desc.
    #[arg(long, value_name = "COLUMN[:DIRECTION]")]
    sort: Option<String>,

    /// Hide a column (repeatable).
    #[arg(long = "hide", value_name = "COLUMN")]
    hidden: Vec<String>,

    /// Wrap search matches in cell values with highlight marks.
    #[arg(long)]
    highlight: bool,

    /// Path to configuration file (default: auto-discover docview.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Allow hiding every column (overrides config).
    #[arg(long)]
    allow_hiding_all_columns: bool,
}

/// Resulting view, as printed.
#[derive(Debug, Serialize)]
struct TableOutput<'a> {
    headers: Vec<&'a Header>,
    rows: Vec<BTreeMap<&'a str, String>>,
    unique_values: BTreeMap<&'a str, Vec<String>>,
}

/// Host for the fullscreen controller outside any UI; listeners are only
/// counted.
#[derive(Debug, Default)]
struct DetachedHost {
    next: std::cell::Cell<u64>,
}

impl EventHost for DetachedHost {
    fn attach(&self, event: HostEvent) -> ListenerId {
        let id = self.next.get();
        self.next.set(id + 1);
        tracing::trace!(?event, id, "Listener attached");
        ListenerId(id)
    }

    fn detach(&self, id: ListenerId) {
        tracing::trace!(id = id.0, "Listener detached");
    }
}

impl TableArgs {
    /// Execute the table command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the file cannot be read, the
    /// table index is out of range or an argument names an unknown column.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let cli_settings = CliSettings {
            allow_hiding_all_columns: self.allow_hiding_all_columns.then_some(true),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let options = view_options(&config.table);

        let html = std::fs::read_to_string(&self.file)?;
        let tables = extract_tables(&html);
        let markup = tables.get(self.index).ok_or_else(|| {
            CliError::Validation(format!(
                "Table index {} out of range: found {} table(s)",
                self.index,
                tables.len()
            ))
        })?;

        if self.rich {
            let mut modal = TableModal::new(Rc::new(DetachedHost::default()), options);
            modal.open(markup);
            let Some(view) = modal.view_mut() else {
                return Err(CliError::Validation("Fullscreen view failed to open".into()));
            };
            self.print_view(view, &output)
        } else {
            let mut view = TableControls::new(markup, ParseMode::Plain, options);
            self.print_view(&mut view, &output)
        }
    }

    fn print_view<K: ColumnRef>(
        &self,
        view: &mut TableView<K>,
        output: &Output,
    ) -> Result<(), CliError> {
        if view.table().is_empty() {
            output.warning(&format!(
                "Table {} has no header row or body rows",
                self.index
            ));
        }

        for filter in &self.filters {
            let (column, value) = filter.split_once('=').ok_or_else(|| {
                CliError::Validation(format!("Filter must be COLUMN=VALUE, got: {filter}"))
            })?;
            let column = resolve_column::<K>(view, column)?;
            view.set_filter(column, value.trim(), true);
        }

        if let Some(query) = &self.search {
            view.set_search(query.as_str());
        }

        if let Some(sort) = &self.sort {
            let (column, direction) = parse_sort(sort);
            let column = resolve_column::<K>(view, column)?;
            view.set_sort(column, direction);
        }

        for name in &self.hidden {
            let column = resolve_column::<K>(view, name)?;
            if !view.visible().contains(&column) {
                continue;
            }
            if !view.toggle_column(column) {
                return Err(CliError::Validation(format!(
                    "Cannot hide column {name}: at least one column must stay visible"
                )));
            }
        }

        let rows = view.rows();
        let unique = view.unique_values();
        let table = view.table();
        let headers = view.visible_headers();

        let rows = rows
            .iter()
            .map(|&row| {
                headers
                    .iter()
                    .map(|header| {
                        let value = table.value(row, &header.text).unwrap_or_default();
                        let value = if self.highlight {
                            view.highlight(value)
                        } else {
                            value.to_owned()
                        };
                        (header.text.as_str(), value)
                    })
                    .collect()
            })
            .collect();
        let unique_values = unique
            .iter()
            .filter_map(|(column, values)| {
                column
                    .resolve(table)
                    .map(|header| (header.text.as_str(), values.clone()))
            })
            .collect();

        write_json(&TableOutput {
            headers,
            rows,
            unique_values,
        })
    }
}

/// Column key for a header text.
fn resolve_column<K: ColumnRef>(view: &TableView<K>, name: &str) -> Result<K, CliError> {
    view.table()
        .header_named(name.trim())
        .map(K::from_header)
        .ok_or_else(|| CliError::Validation(format!("Unknown column: {}", name.trim())))
}

/// Split `COLUMN[:asc|desc]`. A suffix that is not a direction is part of the
/// column name.
fn parse_sort(arg: &str) -> (&str, SortDirection) {
    if let Some((column, direction)) = arg.rsplit_once(':')
        && let Some(direction) = SortDirection::parse(&direction.trim().to_ascii_lowercase())
    {
        return (column, direction);
    }
    (arg, SortDirection::Asc)
}
