//! CLI subcommands

pub mod batch;
pub mod catalog;
pub mod diagnose;

use anyhow::{Context, Result};
use diagnosis_lib::{EngineMetrics, OutputFormat, RuleCatalog, StructuredLogger};
use std::path::Path;
use std::sync::Arc;

/// State shared by every subcommand for one invocation
pub struct Session {
    pub catalog: Arc<RuleCatalog>,
    pub format: OutputFormat,
    pub batch_concurrency: usize,
    pub metrics: EngineMetrics,
    pub logger: StructuredLogger,
}

/// Load the operator catalog when one is configured, else the built-in one
pub fn load_catalog(path: Option<&Path>, logger: &StructuredLogger) -> Result<Arc<RuleCatalog>> {
    let (catalog, origin) = match path {
        Some(path) => {
            let catalog = RuleCatalog::load(path)
                .with_context(|| format!("Failed to load rule catalog from {}", path.display()))?;
            (catalog, path.display().to_string())
        }
        None => {
            let catalog = RuleCatalog::builtin().context("Built-in rule catalog is invalid")?;
            (catalog, "built-in".to_string())
        }
    };
    logger.log_catalog_loaded(catalog.version(), catalog.rules().len(), &origin);
    Ok(Arc::new(catalog))
}
