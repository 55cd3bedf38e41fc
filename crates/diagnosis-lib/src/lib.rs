//! Cost-optimization diagnosis engine
//!
//! This crate provides the core functionality for:
//! - Validating workload profiles
//! - Classifying budget and company-size tiers and resolving modifiers
//! - Assembling ranked, deduplicated recommendations from a rule catalog
//! - Planning a phased 90-day rollout
//! - Rendering plans as text or JSON
//! - Observability (metrics and structured events)

pub mod assembler;
pub mod catalog;
pub mod classify;
pub mod error;
pub mod models;
pub mod observability;
pub mod pipeline;
pub mod planner;
pub mod render;
pub mod summary;
pub mod validator;

pub use catalog::{RuleCatalog, RuleKey};
pub use error::{CatalogLoadError, RenderError, ValidationError};
pub use models::*;
pub use observability::{EngineMetrics, StructuredLogger};
pub use pipeline::{diagnose, diagnose_raw};
pub use render::{render, OutputFormat};
pub use validator::{ListInput, RawProfile};
