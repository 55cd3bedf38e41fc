//! Rollout planning
//!
//! Splits the ranked recommendation list into three time-boxed phases of a
//! 90-day plan. The list is cut into thirds by rank; compliance items are
//! pulled into the first phase regardless of where they fall.

use crate::models::{Phase, Recommendation, RolloutPhases};

/// Phase for the item at `index` in a ranked list of `total` items
pub fn phase_for(index: usize, total: usize, recommendation: &Recommendation) -> Phase {
    if recommendation.is_compliance() {
        return Phase::Immediate;
    }
    let third = total.div_ceil(3).max(1);
    if index < third {
        Phase::Immediate
    } else if index < 2 * third {
        Phase::MediumTerm
    } else {
        Phase::FollowUp
    }
}

/// Assign a phase to every recommendation and bucket the actions.
///
/// Ranking order is preserved both in the returned list and inside each bucket.
pub fn plan_rollout(
    mut recommendations: Vec<Recommendation>,
) -> (Vec<Recommendation>, RolloutPhases) {
    let total = recommendations.len();
    let mut phases = RolloutPhases::default();

    for (index, recommendation) in recommendations.iter_mut().enumerate() {
        let phase = phase_for(index, total, recommendation);
        recommendation.phase = Some(phase);
        let bucket = match phase {
            Phase::Immediate => &mut phases.immediate,
            Phase::MediumTerm => &mut phases.medium_term,
            Phase::FollowUp => &mut phases.follow_up,
        };
        bucket.push(recommendation.action.clone());
    }

    (recommendations, phases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RankClass, SavingsDirection};

    fn rec(action: &str, rank_class: RankClass) -> Recommendation {
        Recommendation {
            domain: "test".to_string(),
            action: action.to_string(),
            rationale: vec![],
            direction: SavingsDirection::ReduceCost,
            rank_class,
            priority: rank_class.weight(),
            phase: None,
        }
    }

    #[test]
    fn test_empty_plan() {
        let (recs, phases) = plan_rollout(Vec::new());
        assert!(recs.is_empty());
        assert_eq!(phases, RolloutPhases::default());
    }

    #[test]
    fn test_single_item_is_immediate() {
        let (recs, phases) = plan_rollout(vec![rec("a", RankClass::SystemType)]);
        assert_eq!(recs[0].phase, Some(Phase::Immediate));
        assert_eq!(phases.immediate, vec!["a"]);
    }

    #[test]
    fn test_thirds_round_up() {
        // 7 items: third = 3 -> 3 / 3 / 1
        let input: Vec<_> = ["a", "b", "c", "d", "e", "f", "g"]
            .into_iter()
            .map(|a| rec(a, RankClass::Budget))
            .collect();
        let (_, phases) = plan_rollout(input);
        assert_eq!(phases.immediate, vec!["a", "b", "c"]);
        assert_eq!(phases.medium_term, vec!["d", "e", "f"]);
        assert_eq!(phases.follow_up, vec!["g"]);
    }

    #[test]
    fn test_two_items_leave_follow_up_empty() {
        let input = vec![rec("a", RankClass::Budget), rec("b", RankClass::Budget)];
        let (_, phases) = plan_rollout(input);
        assert_eq!(phases.immediate, vec!["a"]);
        assert_eq!(phases.medium_term, vec!["b"]);
        assert!(phases.follow_up.is_empty());
    }

    #[test]
    fn test_compliance_always_immediate() {
        let mut input: Vec<_> = (0..6)
            .map(|i| rec(&format!("budget-{}", i), RankClass::Budget))
            .collect();
        input.push(rec("boundary", RankClass::Compliance));

        let (recs, phases) = plan_rollout(input);
        assert_eq!(recs[6].phase, Some(Phase::Immediate));
        assert_eq!(
            phases.immediate,
            vec!["budget-0", "budget-1", "budget-2", "boundary"]
        );
        assert_eq!(phases.follow_up, Vec::<String>::new());
    }
}
