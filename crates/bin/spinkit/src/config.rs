//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `spinkit.toml` in the working directory (or the file named by
//! `SPINKIT_CONFIG`). Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::path::PathBuf;

use serde::Deserialize;
use spinkit_domain::options::SpinnerOptions;

/// Page rendered when no page file is configured.
const DEMO_PAGE: &str = r#"<main id="content" data-height="120" data-width="320"><h1 class="title">Quarterly report</h1><p>Generating charts…</p></main>"#;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page to load and container to attach to.
    pub page: PageConfig,
    /// Spinner options passed to every attach call.
    pub spinner: SpinnerOptions,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Page source configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// HTML file to load. Takes precedence over `html`.
    pub path: Option<PathBuf>,
    /// Inline HTML.
    pub html: String,
    /// Selector of the container element.
    pub container: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `spinkit.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("SPINKIT_CONFIG").unwrap_or_else(|_| "spinkit.toml".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SPINKIT_PAGE") {
            self.page.path = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("SPINKIT_CONTAINER") {
            self.page.container = val;
        }
        if let Ok(val) = std::env::var("SPINKIT_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page.container.trim().is_empty() {
            return Err(ConfigError::Validation(
                "container selector must not be empty".to_string(),
            ));
        }
        if self.page.path.is_none() && self.page.html.trim().is_empty() {
            return Err(ConfigError::Validation(
                "either page.path or page.html must be set".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the page HTML, reading `page.path` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the page file cannot be read.
    pub fn page_html(&self) -> Result<String, ConfigError> {
        match &self.page.path {
            Some(path) => std::fs::read_to_string(path).map_err(ConfigError::Io),
            None => Ok(self.page.html.clone()),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            path: None,
            html: DEMO_PAGE.to_string(),
            container: "#content".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "spinkit=info,spinkit_app=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
