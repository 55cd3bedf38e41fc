//! Configuration management for the CLI
//!
//! Sources, lowest precedence first:
//! - `~/.config/costplan/config.toml` (optional)
//! - `COSTPLAN_*` environment variables
//!
//! Command-line flags override both.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Batch workers used when nothing is configured
pub const DEFAULT_BATCH_CONCURRENCY: usize = 4;

/// CLI configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Rule catalog used instead of the built-in one
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Output format when `--format` is not given
    #[serde(default)]
    pub default_format: Option<String>,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,

    /// Maximum profiles diagnosed at once by `batch`
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,
}

fn default_batch_concurrency() -> usize {
    DEFAULT_BATCH_CONCURRENCY
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            default_format: None,
            log_json: false,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }
}

impl Config {
    /// Load configuration from the user config file and environment
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path().as_deref())
    }

    /// Load with an explicit config file location (`None` skips the file)
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("COSTPLAN").try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        let mut loaded: Self = settings
            .try_deserialize()
            .context("Failed to parse configuration")?;
        loaded.batch_concurrency = loaded.batch_concurrency.max(1);
        Ok(loaded)
    }

    /// Location of the user config file, if a home directory exists
    pub fn config_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".config").join("costplan").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.batch_concurrency, DEFAULT_BATCH_CONCURRENCY);
        assert!(!config.log_json);
    }

    #[test]
    fn test_file_values_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "default_format = \"json\"").unwrap();
        writeln!(file, "batch_concurrency = 0").unwrap();
        writeln!(file, "catalog_path = \"/etc/costplan/catalog.json\"").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.default_format.as_deref(), Some("json"));
        assert_eq!(
            config.catalog_path,
            Some(PathBuf::from("/etc/costplan/catalog.json"))
        );
        // Zero workers would stall the batch
        assert_eq!(config.batch_concurrency, 1);
    }
}
