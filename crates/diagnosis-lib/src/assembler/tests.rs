//! Assembler tests against a small purpose-built catalog

use super::*;
use crate::models::{
    BudgetTier, CompanySizeTier, CountryClass, Restriction, SavingsDirection, SystemType,
};

fn template(domain: &str, action: &str, rationale: &str) -> serde_json::Value {
    serde_json::json!({
        "domain": domain,
        "action": action,
        "rationale": rationale,
        "direction": "reduce-cost"
    })
}

fn rule(kind: &str, value: &str, templates: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "trigger": { "kind": kind, "value": value },
        "templates": templates
    })
}

fn test_catalog() -> RuleCatalog {
    let mut escalated = template("tiering", "Tier cold storage", "Cold data is cheap to move.");
    escalated["escalation"] = serde_json::json!({
        "when": "storage-heavy",
        "boost": 500,
        "rationale": "{monthly_storage_gb} GB stored."
    });
    let mut conditional = template("egress", "Cut egress", "Egress at {monthly_egress_gb} GB.");
    conditional["when"] = serde_json::json!("high-egress");

    let rules = vec![
        rule(
            "restriction",
            "pci",
            vec![template("boundary", "Separate compliant workloads", "PCI scope.")],
        ),
        rule(
            "restriction",
            "hipaa",
            vec![template("boundary", "Separate  compliant workloads.", "PHI scope.")],
        ),
        rule(
            "country-class",
            "strict-residency",
            vec![template("residency", "Pin regions", "Residency rules.")],
        ),
        rule(
            "budget-tier",
            "micro",
            vec![
                template("caching", "Cache hot reads", "Micro budgets need cheap reads."),
                conditional,
                template("alerts", "Enable alerts", "Catch surprises."),
                escalated,
            ],
        ),
        rule("budget-tier", "startup", vec![template("alerts", "Enable alerts", "x")]),
        rule("budget-tier", "growth", vec![template("alerts", "Enable alerts", "x")]),
        rule("budget-tier", "enterprise", vec![template("alerts", "Enable alerts", "x")]),
        rule(
            "company-size",
            "solo-small-team",
            vec![template("seats", "Audit seats", "Seats drift.")],
        ),
        rule("company-size", "smb", vec![template("review", "Review monthly", "x")]),
        rule("company-size", "mid-market-enterprise", vec![]),
        rule(
            "system-type",
            "api-saas",
            vec![
                template("caching", "cache HOT reads", "APIs are read heavy."),
                template("serverless", "Go serverless", "Bursty traffic."),
            ],
        ),
    ];

    let doc = serde_json::json!({
        "version": "assembler-test",
        "publishedOn": "2026-01-01",
        "defaultBoundary": "none",
        "rules": rules
    });
    RuleCatalog::from_json(&doc.to_string()).unwrap()
}

fn micro_solo() -> Tiers {
    Tiers {
        budget: BudgetTier::Micro,
        company_size: CompanySizeTier::SoloSmallTeam,
    }
}

fn actions(recommendations: &[Recommendation]) -> Vec<&str> {
    recommendations.iter().map(|r| r.action.as_str()).collect()
}

#[test]
fn test_matched_rules_always_include_both_tiers() {
    let catalog = test_catalog();
    let matched = matched_rules(&catalog, &micro_solo(), &BTreeSet::new());
    let triggers: Vec<_> = matched.iter().map(|(_, rule)| rule.trigger).collect();
    assert_eq!(
        triggers,
        vec![
            RuleKey::BudgetTier(BudgetTier::Micro),
            RuleKey::CompanySize(CompanySizeTier::SoloSmallTeam),
        ]
    );
}

#[test]
fn test_matched_rules_follow_catalog_order() {
    let catalog = test_catalog();
    let modifiers = BTreeSet::from([
        ModifierKey::SystemType(SystemType::ApiSaas),
        ModifierKey::Restriction(Restriction::Pci),
    ]);
    let matched = matched_rules(&catalog, &micro_solo(), &modifiers);
    let positions: Vec<_> = matched.iter().map(|(position, _)| *position).collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
    assert_eq!(matched.len(), 4);
}

#[test]
fn test_modifier_without_rule_is_skipped() {
    let catalog = test_catalog();
    let modifiers = BTreeSet::from([ModifierKey::SystemType(SystemType::EdgeIot)]);
    let matched = matched_rules(&catalog, &micro_solo(), &modifiers);
    assert_eq!(matched.len(), 2);
}

#[test]
fn test_rank_classes_ordered() {
    let catalog = test_catalog();
    let modifiers = BTreeSet::from([
        ModifierKey::SystemType(SystemType::ApiSaas),
        ModifierKey::Restriction(Restriction::Pci),
    ]);
    let recs = assemble(&catalog, &micro_solo(), &modifiers, &UsageMetrics::default());

    assert_eq!(
        actions(&recs),
        vec![
            "Separate compliant workloads",
            "Cache hot reads",
            "Enable alerts",
            "Tier cold storage",
            "Audit seats",
            "Go serverless",
        ]
    );
    let classes: Vec<_> = recs.iter().map(|r| r.rank_class).collect();
    let mut sorted = classes.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(classes, sorted);
}

#[test]
fn test_duplicate_action_from_two_modifiers_appears_once() {
    let catalog = test_catalog();
    let modifiers = BTreeSet::from([
        ModifierKey::Restriction(Restriction::Pci),
        ModifierKey::Restriction(Restriction::Hipaa),
    ]);
    let recs = assemble(&catalog, &micro_solo(), &modifiers, &UsageMetrics::default());

    let boundary: Vec<_> = recs.iter().filter(|r| r.domain == "boundary").collect();
    assert_eq!(boundary.len(), 1);
    assert_eq!(boundary[0].rationale, vec!["PCI scope.", "PHI scope."]);
}

#[test]
fn test_collision_keeps_highest_score() {
    let catalog = test_catalog();
    let modifiers = BTreeSet::from([ModifierKey::SystemType(SystemType::ApiSaas)]);
    let recs = assemble(&catalog, &micro_solo(), &modifiers, &UsageMetrics::default());

    let caching: Vec<_> = recs.iter().filter(|r| r.domain == "caching").collect();
    assert_eq!(caching.len(), 1);
    assert_eq!(caching[0].rank_class, RankClass::Budget);
    assert_eq!(caching[0].priority, RankClass::Budget.weight());
    assert_eq!(caching[0].action, "Cache hot reads");
    assert_eq!(
        caching[0].rationale,
        vec!["Micro budgets need cheap reads.", "APIs are read heavy."]
    );
}

#[test]
fn test_conditional_template_requires_usage() {
    let catalog = test_catalog();
    let quiet = assemble(&catalog, &micro_solo(), &BTreeSet::new(), &UsageMetrics::default());
    assert!(!actions(&quiet).contains(&"Cut egress"));

    let usage = UsageMetrics {
        monthly_egress_gb: 3000.0,
        ..Default::default()
    };
    let busy = assemble(&catalog, &micro_solo(), &BTreeSet::new(), &usage);
    let egress = busy.iter().find(|r| r.action == "Cut egress").unwrap();
    assert_eq!(egress.rationale, vec!["Egress at 3000 GB."]);
    assert_eq!(egress.direction, SavingsDirection::ReduceCost);
}

#[test]
fn test_escalation_lifts_within_class_only() {
    let catalog = test_catalog();
    let usage = UsageMetrics {
        monthly_storage_gb: 20_000.0,
        ..Default::default()
    };
    let modifiers = BTreeSet::from([ModifierKey::Restriction(Restriction::Pci)]);
    let recs = assemble(&catalog, &micro_solo(), &modifiers, &usage);

    assert_eq!(recs[0].action, "Separate compliant workloads");
    assert_eq!(recs[1].action, "Tier cold storage");
    assert_eq!(recs[1].priority, RankClass::Budget.weight() + 500);
    assert_eq!(
        recs[1].rationale,
        vec!["Cold data is cheap to move.", "20000 GB stored."]
    );
    assert!(recs[1].priority < RankClass::Compliance.weight());
}

#[test]
fn test_country_class_modifier_is_compliance() {
    let catalog = test_catalog();
    let modifiers = BTreeSet::from([ModifierKey::CountryClass(CountryClass::StrictResidency)]);
    let recs = assemble(&catalog, &micro_solo(), &modifiers, &UsageMetrics::default());
    assert_eq!(recs[0].action, "Pin regions");
    assert!(recs[0].is_compliance());
}

#[test]
fn test_assembly_is_deterministic() {
    let catalog = test_catalog();
    let modifiers = BTreeSet::from([
        ModifierKey::SystemType(SystemType::ApiSaas),
        ModifierKey::Restriction(Restriction::Pci),
        ModifierKey::Restriction(Restriction::Hipaa),
    ]);
    let usage = UsageMetrics {
        monthly_egress_gb: 3000.0,
        monthly_storage_gb: 20_000.0,
        ..Default::default()
    };
    let first = assemble(&catalog, &micro_solo(), &modifiers, &usage);
    let second = assemble(&catalog, &micro_solo(), &modifiers, &usage);
    assert_eq!(first, second);
}

#[test]
fn test_no_phase_assigned_by_assembler() {
    let catalog = test_catalog();
    let recs = assemble(&catalog, &micro_solo(), &BTreeSet::new(), &UsageMetrics::default());
    assert!(recs.iter().all(|r| r.phase.is_none()));
}

#[test]
fn test_normalize_action() {
    assert_eq!(
        normalize_action("  Separate   Compliant workloads. "),
        "separate compliant workloads"
    );
    assert_eq!(normalize_action("Cache hot reads"), "cache hot reads");
}
