//! `dv render` command implementation.

use std::path::PathBuf;

use clap::Args;
use dv_config::{CliSettings, Config};
use dv_renderer::Walker;

use super::walker_options;
use crate::error::CliError;
use crate::output::write_json;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// HTML file to render.
    file: PathBuf,

    /// Path to configuration file (default: auto-discover docview.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Language for code blocks without a hint (overrides config).
    #[arg(long, env = "DV_DEFAULT_CODE_LANGUAGE")]
    default_code_language: Option<String>,

    /// Component embed prefix (overrides config).
    #[arg(long)]
    component_prefix: Option<String>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the file cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            default_code_language: self.default_code_language,
            component_prefix: self.component_prefix,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let html = std::fs::read_to_string(&self.file)?;
        let walker = Walker::new(walker_options(&config.render));
        let nodes = walker.render(&html);
        tracing::info!(
            file = %self.file.display(),
            nodes = nodes.len(),
            "Rendered document"
        );

        write_json(&nodes)
    }
}
