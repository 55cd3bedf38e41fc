//! Unit economics and risk signals for the diagnosis header

use crate::catalog::UsageCondition;
use crate::models::{CountryClass, DiagnosisSummary, ModifierKey, Restriction, WorkloadProfile};

/// Signal raised when residency law constrains placement
pub const RESIDENCY_SIGNAL: &str = "residency-sensitive";

pub fn summarize(profile: &WorkloadProfile, modifiers: &[ModifierKey]) -> DiagnosisSummary {
    let usage = &profile.usage;

    // An unknown budget (zero) has no meaningful unit cost
    let cost_per_1m_requests_usd = (usage.monthly_requests > 0.0
        && profile.monthly_budget_usd > 0.0)
        .then(|| profile.monthly_budget_usd / (usage.monthly_requests / 1_000_000.0));

    let mut signals: Vec<String> = UsageCondition::ALL
        .iter()
        .filter(|condition| condition.holds(usage))
        .map(|condition| condition.signal().to_string())
        .collect();

    let residency = modifiers.iter().any(|key| {
        matches!(
            key,
            ModifierKey::CountryClass(CountryClass::StrictResidency)
                | ModifierKey::Restriction(Restriction::DataResidency)
        )
    });
    if residency {
        signals.push(RESIDENCY_SIGNAL.to_string());
    }

    DiagnosisSummary {
        requests_per_compute_hour: usage.requests_per_compute_hour().map(|v| round_to(v, 2)),
        egress_mb_per_1k_requests: usage.egress_mb_per_1k_requests().map(|v| round_to(v, 4)),
        cost_per_1m_requests_usd: cost_per_1m_requests_usd.map(|v| round_to(v, 2)),
        signals,
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
