//! Configuration management for docview.
//!
//! Parses `docview.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the fallback language for code blocks.
    pub default_code_language: Option<String>,
    /// Override the component-embed prefix.
    pub component_prefix: Option<String>,
    /// Override the search debounce delay.
    pub search_debounce_ms: Option<u64>,
    /// Override the hide-all-columns policy.
    pub allow_hiding_all_columns: Option<bool>,
}

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "docview.toml";

/// Upper bound for `table.search_debounce_ms`.
const MAX_SEARCH_DEBOUNCE_MS: u64 = 10_000;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering configuration.
    pub render: RenderConfig,
    /// Table controls configuration.
    pub table: TableConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Language for code blocks without a language hint.
    pub default_code_language: String,
    /// Component embeds are written `[<prefix>:<identifier>]`.
    pub component_prefix: String,
    /// Paragraph text opening an accordion section.
    pub accordion_marker: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_code_language: "bash".to_owned(),
            component_prefix: "uic".to_owned(),
            accordion_marker: ":::accordion".to_owned(),
        }
    }
}

/// Table controls configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Trailing-edge debounce for search input, in milliseconds.
    pub search_debounce_ms: u64,
    /// Whether the controllers may hide the last visible column.
    pub allow_hiding_all_columns: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 300,
            allow_hiding_all_columns: false,
        }
    }
}

impl TableConfig {
    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Validate that a string field is not empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docview.toml` in current directory and parents.
    /// If no config file is found, returns default configuration.
    ///
    /// CLI settings are applied after loading, then the result is validated.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            tracing::debug!("No configuration file found, using defaults");
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(language) = &settings.default_code_language {
            self.render.default_code_language.clone_from(language);
        }
        if let Some(prefix) = &settings.component_prefix {
            self.render.component_prefix.clone_from(prefix);
        }
        if let Some(ms) = settings.search_debounce_ms {
            self.table.search_debounce_ms = ms;
        }
        if let Some(allow) = settings.allow_hiding_all_columns {
            self.table.allow_hiding_all_columns = allow;
        }
    }

    /// Search for a config file in `start` and its parents.
    pub fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI settings
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_render()?;
        self.validate_table()?;
        Ok(())
    }

    fn validate_render(&self) -> Result<(), ConfigError> {
        let render = &self.render;
        require_non_empty(&render.default_code_language, "render.default_code_language")?;
        require_non_empty(&render.component_prefix, "render.component_prefix")?;
        require_non_empty(&render.accordion_marker, "render.accordion_marker")?;

        if let Some(bad) = render
            .component_prefix
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(ConfigError::Validation(format!(
                "render.component_prefix may only contain a-z, 0-9 and '-', found {bad:?}"
            )));
        }
        Ok(())
    }

    fn validate_table(&self) -> Result<(), ConfigError> {
        if self.table.search_debounce_ms > MAX_SEARCH_DEBOUNCE_MS {
            return Err(ConfigError::Validation(format!(
                "table.search_debounce_ms must be at most {MAX_SEARCH_DEBOUNCE_MS}, got {}",
                self.table.search_debounce_ms
            )));
        }
        Ok(())
    }
}
