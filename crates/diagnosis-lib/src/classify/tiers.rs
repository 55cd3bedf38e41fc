//! Budget and company-size tier classification

use crate::models::{BudgetTier, CompanySize, CompanySizeTier, Tiers, WorkloadProfile};

/// Lower edge of the startup tier (USD per month)
pub const STARTUP_THRESHOLD_USD: f64 = 2_000.0;
/// Lower edge of the growth tier (USD per month)
pub const GROWTH_THRESHOLD_USD: f64 = 20_000.0;
/// Lower edge of the enterprise tier (USD per month)
pub const ENTERPRISE_THRESHOLD_USD: f64 = 150_000.0;

/// Map a monthly budget onto its tier; lower edges are inclusive
pub fn budget_tier(monthly_budget_usd: f64) -> BudgetTier {
    if monthly_budget_usd >= ENTERPRISE_THRESHOLD_USD {
        BudgetTier::Enterprise
    } else if monthly_budget_usd >= GROWTH_THRESHOLD_USD {
        BudgetTier::Growth
    } else if monthly_budget_usd >= STARTUP_THRESHOLD_USD {
        BudgetTier::Startup
    } else {
        BudgetTier::Micro
    }
}

/// Mid-market and enterprise share one playbook
pub fn company_size_tier(size: CompanySize) -> CompanySizeTier {
    match size {
        CompanySize::Solo | CompanySize::Startup => CompanySizeTier::SoloSmallTeam,
        CompanySize::Smb => CompanySizeTier::Smb,
        CompanySize::MidMarket | CompanySize::Enterprise => CompanySizeTier::MidMarketEnterprise,
    }
}

/// Classify a profile into both tiers
pub fn classify_tiers(profile: &WorkloadProfile) -> Tiers {
    Tiers {
        budget: budget_tier(profile.monthly_budget_usd),
        company_size: company_size_tier(profile.company_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Vocabulary;

    #[test]
    fn test_boundaries_belong_to_higher_tier() {
        assert_eq!(budget_tier(1_999.99), BudgetTier::Micro);
        assert_eq!(budget_tier(2_000.0), BudgetTier::Startup);
        assert_eq!(budget_tier(19_999.99), BudgetTier::Startup);
        assert_eq!(budget_tier(20_000.0), BudgetTier::Growth);
        assert_eq!(budget_tier(149_999.99), BudgetTier::Growth);
        assert_eq!(budget_tier(150_000.0), BudgetTier::Enterprise);
    }

    #[test]
    fn test_zero_budget_is_micro() {
        assert_eq!(budget_tier(0.0), BudgetTier::Micro);
    }

    #[test]
    fn test_budget_classification_is_monotonic() {
        let mut previous = budget_tier(0.0);
        let mut budget = 0.0;
        while budget < 400_000.0 {
            let tier = budget_tier(budget);
            assert!(tier >= previous, "tier decreased at {}", budget);
            previous = tier;
            budget += 250.0;
        }
        assert_eq!(previous, BudgetTier::Enterprise);
    }

    #[test]
    fn test_every_company_size_has_a_tier() {
        let tiers: Vec<_> = CompanySize::ALL.iter().map(|s| company_size_tier(*s)).collect();
        assert_eq!(
            tiers,
            vec![
                CompanySizeTier::SoloSmallTeam,
                CompanySizeTier::SoloSmallTeam,
                CompanySizeTier::Smb,
                CompanySizeTier::MidMarketEnterprise,
                CompanySizeTier::MidMarketEnterprise,
            ]
        );
    }
}
