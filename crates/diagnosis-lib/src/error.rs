//! Error taxonomy for the diagnosis engine

use std::path::PathBuf;
use thiserror::Error;

/// Input profile rejected; always correctable by the caller
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid value for `{field}`: '{value}' (expected one of: {expected})")]
    UnknownValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("invalid value for `{field}`: {value} must be a finite, non-negative number")]
    Negative { field: String, value: f64 },

    #[error("invalid value for `{field}`: {value} must lie between {min} and {max}")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid value for `{field}`: {reason}")]
    Malformed { field: String, reason: String },
}

impl ValidationError {
    /// Name of the offending input field
    pub fn field(&self) -> &str {
        match self {
            Self::UnknownValue { field, .. }
            | Self::Negative { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::Malformed { field, .. } => field,
        }
    }
}

/// Rule catalog missing or malformed at startup
#[derive(Error, Debug)]
pub enum CatalogLoadError {
    #[error("failed to read rule catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed rule catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("rule catalog has no version")]
    MissingVersion,

    #[error("rule catalog declares trigger {0} more than once")]
    DuplicateTrigger(String),

    #[error("rule catalog has no rule for {0}")]
    MissingTierRule(String),

    #[error("rule for {trigger} has an empty {what} in template {index}")]
    EmptyTemplateField {
        trigger: String,
        what: &'static str,
        index: usize,
    },
}

/// Plan could not be rendered in the requested format
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("unsupported output format '{0}' (expected one of: text|json)")]
    UnsupportedFormat(String),

    #[error("failed to serialize plan: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to format plan text")]
    Text(#[from] std::fmt::Error),
}
