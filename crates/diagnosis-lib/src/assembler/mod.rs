//! Recommendation assembly
//!
//! Collects the rules matched by a classified profile, expands their
//! templates against observed usage, merges duplicates and orders the result.
//!
//! Ordering is by priority score (rank-class weight plus any escalation
//! boost), then by the position the template is declared at in the catalog.
//! Identical input therefore always yields an identical list.

use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::catalog::{bind_rationale, PlaybookRule, RecommendationTemplate, RuleCatalog, RuleKey};
use crate::models::{ModifierKey, RankClass, Recommendation, Tiers, UsageMetrics};

#[cfg(test)]
mod tests;

/// Escalation boosts are capped below the gap between rank classes
pub const MAX_ESCALATION_BOOST: u32 = 999;

/// Deduplication identity: domain plus normalized action text
type Identity = (String, String);

/// A recommendation together with the catalog position it came from
#[derive(Debug)]
struct Candidate {
    recommendation: Recommendation,
    ordinal: (usize, usize),
}

/// Rules that apply to the classification, in catalog declared order.
///
/// Always contains the budget-tier and company-size rules; catalog loading
/// guarantees both exist, so their absence is an invariant violation.
pub fn matched_rules<'a>(
    catalog: &'a RuleCatalog,
    tiers: &Tiers,
    modifiers: &BTreeSet<ModifierKey>,
) -> Vec<(usize, &'a PlaybookRule)> {
    let budget = catalog
        .rule(&RuleKey::BudgetTier(tiers.budget))
        .expect("validated catalog has a rule for every budget tier");
    let company = catalog
        .rule(&RuleKey::CompanySize(tiers.company_size))
        .expect("validated catalog has a rule for every company-size tier");

    let mut matched = vec![budget, company];
    for modifier in modifiers {
        match catalog.rule(&RuleKey::from(*modifier)) {
            Some(rule) => matched.push(rule),
            None => debug!(modifier = %modifier, "No playbook rule for modifier"),
        }
    }
    matched.sort_by_key(|(position, _)| *position);
    matched
}

/// Assemble the ordered, deduplicated recommendation list
pub fn assemble(
    catalog: &RuleCatalog,
    tiers: &Tiers,
    modifiers: &BTreeSet<ModifierKey>,
    usage: &UsageMetrics,
) -> Vec<Recommendation> {
    let mut merged: Vec<Candidate> = Vec::new();
    let mut seen: HashMap<Identity, usize> = HashMap::new();

    for (position, rule) in matched_rules(catalog, tiers, modifiers) {
        let rank_class = rule.trigger.rank_class();
        for (index, template) in rule.templates.iter().enumerate() {
            let Some(recommendation) = expand(template, rank_class, usage) else {
                continue;
            };
            let candidate = Candidate {
                recommendation,
                ordinal: (position, index),
            };

            let identity = identity(&template.domain, &template.action);
            match seen.get(&identity) {
                Some(&slot) => merge(&mut merged[slot], candidate),
                None => {
                    seen.insert(identity, merged.len());
                    merged.push(candidate);
                }
            }
        }
    }

    merged.sort_by(|a, b| {
        b.recommendation
            .priority
            .cmp(&a.recommendation.priority)
            .then_with(|| a.ordinal.cmp(&b.ordinal))
    });

    debug!(
        budget_tier = %tiers.budget,
        company_size_tier = %tiers.company_size,
        modifiers = modifiers.len(),
        recommendations = merged.len(),
        "Assembled recommendations"
    );

    merged.into_iter().map(|c| c.recommendation).collect()
}

/// Expand one template; `None` when its firing condition does not hold
fn expand(
    template: &RecommendationTemplate,
    rank_class: RankClass,
    usage: &UsageMetrics,
) -> Option<Recommendation> {
    if let Some(condition) = template.when {
        if !condition.holds(usage) {
            return None;
        }
    }

    let mut priority = rank_class.weight();
    let mut rationale = Vec::new();
    push_unique(&mut rationale, bind_rationale(&template.rationale, usage));

    if let Some(escalation) = &template.escalation {
        if escalation.when.holds(usage) {
            priority += escalation.boost.min(MAX_ESCALATION_BOOST);
            push_unique(&mut rationale, bind_rationale(&escalation.rationale, usage));
        }
    }

    Some(Recommendation {
        domain: template.domain.trim().to_string(),
        action: template.action.trim().to_string(),
        rationale,
        direction: template.direction,
        rank_class,
        priority,
        phase: None,
    })
}

/// Fold a colliding candidate into the one already kept
fn merge(existing: &mut Candidate, incoming: Candidate) {
    let Candidate {
        recommendation: incoming,
        ordinal,
    } = incoming;

    let rationale = if incoming.priority > existing.recommendation.priority {
        let previous = std::mem::replace(&mut existing.recommendation, incoming);
        existing.ordinal = ordinal;
        previous.rationale
    } else {
        incoming.rationale
    };

    for line in rationale {
        push_unique(&mut existing.recommendation.rationale, line);
    }
}

fn push_unique(lines: &mut Vec<String>, line: String) {
    let line = line.trim();
    if !line.is_empty() && !lines.iter().any(|existing| existing == line) {
        lines.push(line.to_string());
    }
}

fn identity(domain: &str, action: &str) -> Identity {
    (domain.trim().to_ascii_lowercase(), normalize_action(action))
}

/// Lower-case, collapse whitespace and drop trailing punctuation
pub fn normalize_action(action: &str) -> String {
    action
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(|c: char| c == '.' || c == '!' || c == ';')
        .to_lowercase()
}
