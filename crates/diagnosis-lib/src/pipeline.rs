//! End-to-end diagnosis
//!
//! validate -> classify -> resolve modifiers -> assemble -> plan rollout -> summarize

use tracing::debug;

use crate::assembler::{assemble, matched_rules};
use crate::catalog::RuleCatalog;
use crate::classify::{classify_tiers, resolve_modifiers};
use crate::error::ValidationError;
use crate::models::{DiagnosisPlan, ModifierKey, WorkloadProfile};
use crate::planner::plan_rollout;
use crate::summary::summarize;
use crate::validator::RawProfile;

/// Produce the plan for an already validated profile
pub fn diagnose(profile: &WorkloadProfile, catalog: &RuleCatalog) -> DiagnosisPlan {
    let tiers = classify_tiers(profile);
    let modifier_set = resolve_modifiers(profile);

    let recommendations = assemble(catalog, &tiers, &modifier_set, &profile.usage);
    let (recommendations, phases) = plan_rollout(recommendations);

    let mut tracked_metrics = Vec::new();
    let mut practices = Vec::new();
    let mut guardrails = Vec::new();
    let mut policy_boundaries = Vec::new();
    extend_unique(&mut practices, catalog.default_practices());
    for conditional in catalog.conditional_practices() {
        if conditional.when.holds(&profile.usage) {
            extend_unique(&mut practices, [&conditional.practice]);
        }
    }
    for (_, rule) in matched_rules(catalog, &tiers, &modifier_set) {
        extend_unique(&mut tracked_metrics, &rule.tracked_metrics);
        extend_unique(&mut practices, &rule.practices);
        extend_unique(&mut guardrails, &rule.guardrails);
        extend_unique(&mut policy_boundaries, &rule.boundary);
    }
    if policy_boundaries.is_empty() {
        policy_boundaries.push(catalog.default_boundary().to_string());
    }

    let modifiers: Vec<ModifierKey> = modifier_set.into_iter().collect();
    let summary = summarize(profile, &modifiers);

    debug!(
        budget_tier = %tiers.budget,
        recommendations = recommendations.len(),
        signals = summary.signals.len(),
        "Built diagnosis plan"
    );

    DiagnosisPlan {
        catalog_version: catalog.version().to_string(),
        profile: profile.clone(),
        tiers,
        modifiers,
        summary,
        recommendations,
        phases,
        tracked_metrics,
        practices,
        guardrails,
        policy_boundaries,
        standards: catalog.standards().to_vec(),
    }
}

/// Validate raw input, then diagnose
pub fn diagnose_raw(
    raw: &RawProfile,
    catalog: &RuleCatalog,
) -> Result<DiagnosisPlan, ValidationError> {
    let profile = raw.validate()?;
    Ok(diagnose(&profile, catalog))
}

fn extend_unique<'a>(target: &mut Vec<String>, items: impl IntoIterator<Item = &'a String>) {
    for item in items {
        let item = item.trim();
        if !item.is_empty() && !target.iter().any(|existing| existing == item) {
            target.push(item.to_string());
        }
    }
}
