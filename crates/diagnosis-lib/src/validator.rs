//! Profile validation
//!
//! Turns raw key/value input (command-line flags or a JSON document) into a
//! canonical [`WorkloadProfile`]. Nothing is silently coerced: unknown
//! vocabulary, negative numbers and out-of-range ratios are rejected with the
//! offending field named.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::ValidationError;
use crate::models::{
    Cloud, CompanySize, Restriction, SystemType, UsageMetrics, Vocabulary, WorkloadProfile,
};

/// Company size assumed when none is supplied
pub const DEFAULT_COMPANY_SIZE: CompanySize = CompanySize::Startup;
/// System type assumed when none is supplied
pub const DEFAULT_SYSTEM_TYPE: SystemType = SystemType::ApiSaas;
/// Cloud assumed when none is supplied
pub const DEFAULT_CLOUD: Cloud = Cloud::Aws;

/// A list given either as one delimited string or as separate items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListInput {
    Delimited(String),
    Items(Vec<String>),
}

impl ListInput {
    /// Split, trim and lower-case; empty entries are dropped
    fn entries(&self) -> Vec<String> {
        let split = |raw: &str| -> Vec<String> {
            raw.split(',')
                .map(|part| part.trim().to_ascii_lowercase())
                .filter(|part| !part.is_empty())
                .collect()
        };
        match self {
            Self::Delimited(raw) => split(raw),
            Self::Items(items) => items.iter().flat_map(|item| split(item)).collect(),
        }
    }
}

impl From<&str> for ListInput {
    fn from(raw: &str) -> Self {
        Self::Delimited(raw.to_string())
    }
}

/// Unvalidated profile as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawProfile {
    pub monthly_budget_usd: Option<f64>,
    pub company_size: Option<String>,
    pub system_types: Option<ListInput>,
    pub restrictions: Option<ListInput>,
    pub clouds: Option<ListInput>,
    pub country: Option<String>,
    pub monthly_requests: Option<f64>,
    pub monthly_compute_hours: Option<f64>,
    pub monthly_storage_gb: Option<f64>,
    pub monthly_egress_gb: Option<f64>,
    pub preload_ratio: Option<f64>,
    /// Paid seats per tool
    #[serde(default)]
    pub seats: BTreeMap<String, i64>,
}

impl RawProfile {
    /// Parse a single JSON profile document
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json).map_err(|e| ValidationError::Malformed {
            field: "profile".to_string(),
            reason: e.to_string(),
        })
    }

    /// Parse a JSON array of profile documents
    pub fn batch_from_json(json: &str) -> Result<Vec<Self>, ValidationError> {
        serde_json::from_str(json).map_err(|e| ValidationError::Malformed {
            field: "profiles".to_string(),
            reason: e.to_string(),
        })
    }

    /// Validate into a canonical profile
    pub fn validate(&self) -> Result<WorkloadProfile, ValidationError> {
        validate(self)
    }
}

/// Validate a raw profile into a canonical [`WorkloadProfile`]
pub fn validate(raw: &RawProfile) -> Result<WorkloadProfile, ValidationError> {
    let monthly_budget_usd = non_negative("monthly-budget-usd", raw.monthly_budget_usd)?;

    let company_size = match &raw.company_size {
        Some(value) => parse_term::<CompanySize>("company-size", value)?,
        None => DEFAULT_COMPANY_SIZE,
    };

    let mut system_types = parse_set::<SystemType>("system-types", raw.system_types.as_ref())?;
    if system_types.is_empty() {
        system_types.insert(DEFAULT_SYSTEM_TYPE);
    }

    let restrictions = parse_set::<Restriction>("restrictions", raw.restrictions.as_ref())?;

    let clouds = match &raw.clouds {
        Some(list) => parse_set::<Cloud>("clouds", Some(list))?,
        None => BTreeSet::from([DEFAULT_CLOUD]),
    };

    let country = parse_country(raw.country.as_deref());

    let preload_ratio = non_negative("preload-ratio", raw.preload_ratio)?;
    if preload_ratio > 1.0 {
        return Err(ValidationError::OutOfRange {
            field: "preload-ratio".to_string(),
            value: preload_ratio,
            min: 0.0,
            max: 1.0,
        });
    }

    let usage = UsageMetrics {
        monthly_requests: non_negative("monthly-requests", raw.monthly_requests)?,
        monthly_compute_hours: non_negative("monthly-compute-hours", raw.monthly_compute_hours)?,
        monthly_storage_gb: non_negative("monthly-storage-gb", raw.monthly_storage_gb)?,
        monthly_egress_gb: non_negative("monthly-egress-gb", raw.monthly_egress_gb)?,
        preload_ratio,
        seat_counts: parse_seats(&raw.seats)?,
    };

    Ok(WorkloadProfile {
        monthly_budget_usd,
        company_size,
        system_types,
        restrictions,
        clouds,
        country,
        usage,
    })
}

fn non_negative(field: &str, value: Option<f64>) -> Result<f64, ValidationError> {
    let value = value.unwrap_or(0.0);
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}

fn parse_term<V: Vocabulary>(field: &str, value: &str) -> Result<V, ValidationError> {
    V::lookup(value).ok_or_else(|| ValidationError::UnknownValue {
        field: field.to_string(),
        value: value.trim().to_string(),
        expected: V::expected(),
    })
}

fn parse_set<V: Vocabulary + Ord>(
    field: &str,
    list: Option<&ListInput>,
) -> Result<BTreeSet<V>, ValidationError> {
    list.map(ListInput::entries)
        .unwrap_or_default()
        .iter()
        .map(|entry| parse_term::<V>(field, entry))
        .collect()
}

/// Any non-blank value is kept; codes outside the country table simply
/// resolve to no country modifier.
fn parse_country(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_ascii_uppercase)
}

fn parse_seats(seats: &BTreeMap<String, i64>) -> Result<BTreeMap<String, u32>, ValidationError> {
    let mut counts = BTreeMap::new();
    for (tool, &count) in seats {
        let name = tool.trim().to_ascii_lowercase();
        if name.is_empty() {
            return Err(ValidationError::Malformed {
                field: "seats".to_string(),
                reason: "tool name must not be empty".to_string(),
            });
        }
        let field = format!("seats.{}", name);
        if count < 0 {
            return Err(ValidationError::Negative {
                field,
                value: count as f64,
            });
        }
        let count = u32::try_from(count).map_err(|_| ValidationError::OutOfRange {
            field,
            value: count as f64,
            min: 0.0,
            max: u32::MAX as f64,
        })?;
        let total = counts.entry(name).or_insert(0u32);
        *total = total.saturating_add(count);
    }
    Ok(counts)
}
