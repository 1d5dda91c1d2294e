//! CLI command implementations.

pub(crate) mod render;
pub(crate) mod table;

pub(crate) use render::RenderArgs;
pub(crate) use table::TableArgs;

use dv_config::{RenderConfig, TableConfig};
use dv_renderer::WalkerOptions;
use dv_table::ViewOptions;

/// Walker settings from the `[render]` section.
pub(crate) fn walker_options(render: &RenderConfig) -> WalkerOptions {
    WalkerOptions {
        default_code_language: render.default_code_language.clone(),
        component_prefix: render.component_prefix.clone(),
        accordion_marker: render.accordion_marker.clone(),
    }
}

/// Controller settings from the `[table]` section.
pub(crate) fn view_options(table: &TableConfig) -> ViewOptions {
    ViewOptions {
        search_debounce: table.search_debounce(),
        allow_hiding_all_columns: table.allow_hiding_all_columns,
    }
}
