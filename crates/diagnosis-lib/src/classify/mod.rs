//! Profile classification
//!
//! This module provides the two independent classification stages:
//! - Tier classification (budget and company size, exactly one tier each)
//! - Modifier resolution (system types, restrictions, country class)

mod modifiers;
mod tiers;

pub use modifiers::{country_class, resolve_modifiers, STANDARD_COUNTRIES, STRICT_RESIDENCY_COUNTRIES};
pub use tiers::{
    budget_tier, classify_tiers, company_size_tier, ENTERPRISE_THRESHOLD_USD,
    GROWTH_THRESHOLD_USD, STARTUP_THRESHOLD_USD,
};
