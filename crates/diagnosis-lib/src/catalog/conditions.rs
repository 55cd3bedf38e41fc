//! Usage conditions that gate or escalate recommendation templates
//!
//! Templates reference observed usage in two ways: a firing condition that
//! decides whether the template applies at all, and placeholders in the
//! rationale text that are bound to the measured values.

use serde::{Deserialize, Serialize};

use crate::models::UsageMetrics;

/// Fixed usage thresholds
pub mod thresholds {
    /// Egress per 1K requests (MB) above which traffic counts as egress-heavy
    pub const EGRESS_MB_PER_1K_REQUESTS: f64 = 50.0;
    /// Absolute monthly egress (GB) that counts as heavy when requests are unknown
    pub const HIGH_EGRESS_GB: f64 = 2000.0;
    /// Monthly requests at which request shaping pays off
    pub const HIGH_REQUEST_VOLUME: f64 = 10_000_000.0;
    /// Preload hit-rate below which eager preloading wastes capacity
    pub const PRELOAD_HIT_RATE_FLOOR: f64 = 0.6;
    /// Monthly requests needed before preload hit-rate is meaningful
    pub const PRELOAD_MIN_REQUESTS: f64 = 1_000_000.0;
    /// Requests per compute hour below which compute is under-utilized
    pub const LOW_REQUESTS_PER_COMPUTE_HOUR: f64 = 1500.0;
    /// Seats per tool above which seat governance is needed
    pub const SEAT_SPRAWL_SEATS: u32 = 10;
    /// Stored volume (GB) above which storage tiering dominates
    pub const STORAGE_HEAVY_GB: f64 = 10_000.0;
}

/// A predicate over observed usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UsageCondition {
    HighEgress,
    HighRequestVolume,
    LowPreloadHitRate,
    LowComputeUtilization,
    SeatSprawl,
    StorageHeavy,
}

impl UsageCondition {
    pub const ALL: [UsageCondition; 6] = [
        UsageCondition::LowPreloadHitRate,
        UsageCondition::HighEgress,
        UsageCondition::HighRequestVolume,
        UsageCondition::SeatSprawl,
        UsageCondition::LowComputeUtilization,
        UsageCondition::StorageHeavy,
    ];

    /// Evaluate the condition; absent metrics never satisfy it
    pub fn holds(&self, usage: &UsageMetrics) -> bool {
        match self {
            Self::HighEgress => match usage.egress_mb_per_1k_requests() {
                Some(mb_per_1k) => mb_per_1k >= thresholds::EGRESS_MB_PER_1K_REQUESTS,
                None => {
                    usage.monthly_requests <= 0.0
                        && usage.monthly_egress_gb >= thresholds::HIGH_EGRESS_GB
                }
            },
            Self::HighRequestVolume => usage.monthly_requests >= thresholds::HIGH_REQUEST_VOLUME,
            Self::LowPreloadHitRate => {
                usage.preload_ratio > 0.0
                    && usage.preload_ratio < thresholds::PRELOAD_HIT_RATE_FLOOR
                    && usage.monthly_requests >= thresholds::PRELOAD_MIN_REQUESTS
            }
            Self::LowComputeUtilization => usage
                .requests_per_compute_hour()
                .map_or(false, |rate| rate < thresholds::LOW_REQUESTS_PER_COMPUTE_HOUR),
            Self::SeatSprawl => usage
                .seat_counts
                .values()
                .any(|&seats| seats > thresholds::SEAT_SPRAWL_SEATS),
            Self::StorageHeavy => usage.monthly_storage_gb >= thresholds::STORAGE_HEAVY_GB,
        }
    }

    /// Risk-signal name reported in the diagnosis summary
    pub fn signal(&self) -> &'static str {
        match self {
            Self::HighEgress => "high-egress",
            Self::HighRequestVolume => "high-request-volume",
            Self::LowPreloadHitRate => "low-preload-hit-rate",
            Self::LowComputeUtilization => "low-compute-utilization",
            Self::SeatSprawl => "seat-sprawl",
            Self::StorageHeavy => "storage-heavy",
        }
    }
}

/// Substitute `{placeholder}` markers with observed usage values.
///
/// Unknown placeholders are left untouched so a catalog typo stays visible
/// in the output instead of silently disappearing.
pub fn bind_rationale(template: &str, usage: &UsageMetrics) -> String {
    if !template.contains('{') {
        return template.to_string();
    }

    let seat_pool = usage.largest_seat_pool();
    let bindings: [(&str, String); 8] = [
        ("{monthly_requests}", format!("{:.0}", usage.monthly_requests)),
        ("{monthly_egress_gb}", format!("{:.0}", usage.monthly_egress_gb)),
        ("{monthly_storage_gb}", format!("{:.0}", usage.monthly_storage_gb)),
        (
            "{egress_mb_per_1k}",
            format_optional(usage.egress_mb_per_1k_requests(), 2),
        ),
        (
            "{requests_per_compute_hour}",
            format_optional(usage.requests_per_compute_hour(), 0),
        ),
        (
            "{preload_hit_rate}",
            format!("{:.0}%", usage.preload_ratio * 100.0),
        ),
        (
            "{max_seat_tool}",
            seat_pool.map_or_else(|| "n/a".to_string(), |(tool, _)| tool.to_string()),
        ),
        (
            "{max_seat_count}",
            seat_pool.map_or_else(|| "0".to_string(), |(_, seats)| seats.to_string()),
        ),
    ];

    bindings
        .iter()
        .fold(template.to_string(), |text, (marker, value)| {
            text.replace(marker, value)
        })
}

fn format_optional(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "n/a".to_string(),
    }
}
