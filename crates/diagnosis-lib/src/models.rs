//! Core data models for the diagnosis engine

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A closed set of kebab-case names accepted on the invocation surface
pub trait Vocabulary: Sized + Copy + 'static {
    /// Every member, in declaration order
    const ALL: &'static [Self];

    /// Canonical name of the member
    fn name(&self) -> &'static str;

    /// Accepted alternative spellings
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Look up a member by canonical name or alias (case-insensitive)
    fn lookup(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.name() == needle || v.aliases().contains(&needle.as_str()))
    }

    /// Canonical names joined with `|`, for error messages
    fn expected() -> String {
        Self::ALL
            .iter()
            .map(|v| v.name())
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// Declared company size
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompanySize {
    Solo,
    Startup,
    Smb,
    #[serde(rename = "midmarket")]
    MidMarket,
    Enterprise,
}

impl Vocabulary for CompanySize {
    const ALL: &'static [Self] = &[
        Self::Solo,
        Self::Startup,
        Self::Smb,
        Self::MidMarket,
        Self::Enterprise,
    ];

    fn name(&self) -> &'static str {
        match self {
            Self::Solo => "solo",
            Self::Startup => "startup",
            Self::Smb => "smb",
            Self::MidMarket => "midmarket",
            Self::Enterprise => "enterprise",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::MidMarket => &["mid-market"],
            _ => &[],
        }
    }
}

/// Kind of system the workload runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemType {
    ApiSaas,
    Ecommerce,
    MobileBackend,
    DataPlatform,
    MlBatch,
    EdgeIot,
    InternalTools,
}

impl Vocabulary for SystemType {
    const ALL: &'static [Self] = &[
        Self::ApiSaas,
        Self::Ecommerce,
        Self::MobileBackend,
        Self::DataPlatform,
        Self::MlBatch,
        Self::EdgeIot,
        Self::InternalTools,
    ];

    fn name(&self) -> &'static str {
        match self {
            Self::ApiSaas => "api-saas",
            Self::Ecommerce => "ecommerce",
            Self::MobileBackend => "mobile-backend",
            Self::DataPlatform => "data-platform",
            Self::MlBatch => "ml-batch",
            Self::EdgeIot => "edge-iot",
            Self::InternalTools => "internal-tools",
        }
    }
}

/// Compliance or operational restriction declared by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Restriction {
    DataResidency,
    Pci,
    Hipaa,
    Soc2,
    Fedramp,
    LowLatency,
    MultiCloud,
}

impl Vocabulary for Restriction {
    const ALL: &'static [Self] = &[
        Self::DataResidency,
        Self::Pci,
        Self::Hipaa,
        Self::Soc2,
        Self::Fedramp,
        Self::LowLatency,
        Self::MultiCloud,
    ];

    fn name(&self) -> &'static str {
        match self {
            Self::DataResidency => "data-residency",
            Self::Pci => "pci",
            Self::Hipaa => "hipaa",
            Self::Soc2 => "soc2",
            Self::Fedramp => "fedramp",
            Self::LowLatency => "low-latency",
            Self::MultiCloud => "multi-cloud",
        }
    }
}

/// Cloud provider (informational only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cloud {
    Aws,
    Azure,
    Gcp,
    Multi,
    OnpremHybrid,
}

impl Vocabulary for Cloud {
    const ALL: &'static [Self] = &[
        Self::Aws,
        Self::Azure,
        Self::Gcp,
        Self::Multi,
        Self::OnpremHybrid,
    ];

    fn name(&self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Azure => "azure",
            Self::Gcp => "gcp",
            Self::Multi => "multi",
            Self::OnpremHybrid => "onprem-hybrid",
        }
    }
}

/// Observed monthly usage; every field defaults to zero/empty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetrics {
    pub monthly_requests: f64,
    pub monthly_compute_hours: f64,
    pub monthly_storage_gb: f64,
    pub monthly_egress_gb: f64,
    /// Fraction of preloaded data that is actually read, in [0, 1]
    pub preload_ratio: f64,
    pub seat_counts: BTreeMap<String, u32>,
}

impl UsageMetrics {
    /// Requests served per compute hour, when both inputs are known
    pub fn requests_per_compute_hour(&self) -> Option<f64> {
        (self.monthly_requests > 0.0 && self.monthly_compute_hours > 0.0)
            .then(|| self.monthly_requests / self.monthly_compute_hours)
    }

    /// Egress megabytes per thousand requests, when both inputs are known
    pub fn egress_mb_per_1k_requests(&self) -> Option<f64> {
        (self.monthly_requests > 0.0 && self.monthly_egress_gb > 0.0)
            .then(|| self.monthly_egress_gb * 1024.0 / self.monthly_requests * 1000.0)
    }

    /// Tool with the largest seat count (ties resolved by name order)
    pub fn largest_seat_pool(&self) -> Option<(&str, u32)> {
        let mut best: Option<(&str, u32)> = None;
        for (tool, &count) in &self.seat_counts {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((tool.as_str(), count));
            }
        }
        best
    }
}

/// Canonical, validated description of a workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadProfile {
    pub monthly_budget_usd: f64,
    pub company_size: CompanySize,
    pub system_types: BTreeSet<SystemType>,
    pub restrictions: BTreeSet<Restriction>,
    pub clouds: BTreeSet<Cloud>,
    pub country: Option<String>,
    pub usage: UsageMetrics,
}

/// Monthly budget band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetTier {
    Micro,
    Startup,
    Growth,
    Enterprise,
}

impl BudgetTier {
    pub const ALL: [BudgetTier; 4] = [
        BudgetTier::Micro,
        BudgetTier::Startup,
        BudgetTier::Growth,
        BudgetTier::Enterprise,
    ];
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Micro => "micro",
            Self::Startup => "startup",
            Self::Growth => "growth",
            Self::Enterprise => "enterprise",
        };
        f.write_str(label)
    }
}

/// Company-size playbook bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompanySizeTier {
    SoloSmallTeam,
    Smb,
    MidMarketEnterprise,
}

impl CompanySizeTier {
    pub const ALL: [CompanySizeTier; 3] = [
        CompanySizeTier::SoloSmallTeam,
        CompanySizeTier::Smb,
        CompanySizeTier::MidMarketEnterprise,
    ];
}

impl fmt::Display for CompanySizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SoloSmallTeam => "solo-small-team",
            Self::Smb => "smb",
            Self::MidMarketEnterprise => "mid-market-enterprise",
        };
        f.write_str(label)
    }
}

/// Residency posture implied by the country
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CountryClass {
    StrictResidency,
    Standard,
}

impl fmt::Display for CountryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StrictResidency => f.write_str("strict-residency"),
            Self::Standard => f.write_str("standard"),
        }
    }
}

/// A modifier that applies independently of the tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum ModifierKey {
    SystemType(SystemType),
    Restriction(Restriction),
    CountryClass(CountryClass),
}

impl fmt::Display for ModifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SystemType(system) => write!(f, "system-type:{}", system.name()),
            Self::Restriction(restriction) => write!(f, "restriction:{}", restriction.name()),
            Self::CountryClass(class) => write!(f, "country-class:{}", class),
        }
    }
}

/// Both tiers a profile classifies into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tiers {
    pub budget: BudgetTier,
    pub company_size: CompanySizeTier,
}

/// Expected effect of acting on a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SavingsDirection {
    ReduceCost,
    AvoidRisk,
    ImproveEfficiency,
}

impl fmt::Display for SavingsDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ReduceCost => "reduce-cost",
            Self::AvoidRisk => "avoid-risk",
            Self::ImproveEfficiency => "improve-efficiency",
        };
        f.write_str(label)
    }
}

/// Ranking band a recommendation inherits from the rule that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankClass {
    SystemType,
    CompanySize,
    Budget,
    Compliance,
}

impl RankClass {
    /// Base priority score of the band
    pub fn weight(&self) -> u32 {
        match self {
            Self::Compliance => 4000,
            Self::Budget => 3000,
            Self::CompanySize => 2000,
            Self::SystemType => 1000,
        }
    }
}

/// Time-boxed rollout bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Immediate,
    MediumTerm,
    FollowUp,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Immediate, Phase::MediumTerm, Phase::FollowUp];

    /// Day window covered by the phase within the 90-day plan
    pub fn window(&self) -> &'static str {
        match self {
            Self::Immediate => "0-14 days",
            Self::MediumTerm => "15-45 days",
            Self::FollowUp => "46-90 days",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Immediate => "immediate",
            Self::MediumTerm => "medium-term",
            Self::FollowUp => "follow-up",
        };
        f.write_str(label)
    }
}

/// One ranked, deduplicated action item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub domain: String,
    pub action: String,
    pub rationale: Vec<String>,
    pub direction: SavingsDirection,
    pub rank_class: RankClass,
    pub priority: u32,
    /// Assigned by the rollout planner; `None` straight out of the assembler
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phase: Option<Phase>,
}

impl Recommendation {
    /// Whether the recommendation must ship in the first phase
    pub fn is_compliance(&self) -> bool {
        self.rank_class == RankClass::Compliance
    }
}

/// Actions bucketed by rollout phase, in ranked order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloutPhases {
    pub immediate: Vec<String>,
    pub medium_term: Vec<String>,
    pub follow_up: Vec<String>,
}

impl RolloutPhases {
    pub fn actions(&self, phase: Phase) -> &[String] {
        match phase {
            Phase::Immediate => &self.immediate,
            Phase::MediumTerm => &self.medium_term,
            Phase::FollowUp => &self.follow_up,
        }
    }
}

/// Unit economics and risk signals derived from usage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisSummary {
    pub requests_per_compute_hour: Option<f64>,
    pub egress_mb_per_1k_requests: Option<f64>,
    pub cost_per_1m_requests_usd: Option<f64>,
    pub signals: Vec<String>,
}

/// A dated industry standard the catalog draws on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardReference {
    pub name: String,
    pub version: String,
    pub as_of: chrono::NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Final output of one diagnosis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisPlan {
    pub catalog_version: String,
    pub profile: WorkloadProfile,
    pub tiers: Tiers,
    pub modifiers: Vec<ModifierKey>,
    pub summary: DiagnosisSummary,
    pub recommendations: Vec<Recommendation>,
    pub phases: RolloutPhases,
    pub tracked_metrics: Vec<String>,
    /// Practices to adopt, catalog defaults first
    pub practices: Vec<String>,
    pub guardrails: Vec<String>,
    pub policy_boundaries: Vec<String>,
    pub standards: Vec<StandardReference>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_lookup_accepts_aliases() {
        assert_eq!(CompanySize::lookup("mid-market"), Some(CompanySize::MidMarket));
        assert_eq!(CompanySize::lookup(" MidMarket "), Some(CompanySize::MidMarket));
        assert_eq!(SystemType::lookup("edge-iot"), Some(SystemType::EdgeIot));
        assert_eq!(Restriction::lookup("gdpr"), None);
    }

    #[test]
    fn test_vocabulary_names_match_serde() {
        for size in CompanySize::ALL {
            let json = serde_json::to_string(size).unwrap();
            assert_eq!(json, format!("\"{}\"", size.name()));
        }
        for system in SystemType::ALL {
            let json = serde_json::to_string(system).unwrap();
            assert_eq!(json, format!("\"{}\"", system.name()));
        }
        for restriction in Restriction::ALL {
            let json = serde_json::to_string(restriction).unwrap();
            assert_eq!(json, format!("\"{}\"", restriction.name()));
        }
    }

    #[test]
    fn test_usage_ratios_absent_without_inputs() {
        let usage = UsageMetrics::default();
        assert!(usage.requests_per_compute_hour().is_none());
        assert!(usage.egress_mb_per_1k_requests().is_none());
        assert!(usage.largest_seat_pool().is_none());
    }

    #[test]
    fn test_largest_seat_pool() {
        let mut usage = UsageMetrics::default();
        usage.seat_counts.insert("figma".to_string(), 4);
        usage.seat_counts.insert("postman".to_string(), 14);
        usage.seat_counts.insert("zeplin".to_string(), 14);
        assert_eq!(usage.largest_seat_pool(), Some(("postman", 14)));
    }

    #[test]
    fn test_modifier_key_serialization() {
        let key = ModifierKey::Restriction(Restriction::DataResidency);
        let json = serde_json::to_value(key).unwrap();
        assert_eq!(json["kind"], "restriction");
        assert_eq!(json["value"], "data-residency");
    }

    #[test]
    fn test_rank_class_weights_ordered() {
        assert!(RankClass::Compliance.weight() > RankClass::Budget.weight());
        assert!(RankClass::Budget.weight() > RankClass::CompanySize.weight());
        assert!(RankClass::CompanySize.weight() > RankClass::SystemType.weight());
    }
}
