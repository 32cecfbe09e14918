//! Property-based tests for HierarchyResolver.
//!
//! These tests validate the correctness properties of approver selection:
//! seniority preference, submitter exclusion, and determinism.

use proptest::prelude::*;
use uuid::Uuid;

use crate::workflow::resolver::{Candidate, HierarchyResolver};

/// Strategy for a random candidate with a bounded level range.
fn arb_candidate() -> impl Strategy<Value = Candidate> {
    (1u128..10_000, 1u128..4, 1i32..=10, any::<bool>()).prop_map(|(id, team, level, active)| {
        Candidate {
            id: Uuid::from_u128(id),
            team_id: Uuid::from_u128(team),
            hierarchy_level_id: Uuid::from_u128(u128::from(level.unsigned_abs())),
            level_number: level,
            level_name: format!("L{level}"),
            name: format!("user-{id}"),
            active,
        }
    })
}

fn arb_candidates() -> impl Strategy<Value = Vec<Candidate>> {
    prop::collection::vec(arb_candidate(), 0..30)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The submitter is never selected as their own approver.
    #[test]
    fn prop_never_selects_submitter(
        candidates in arb_candidates(),
        required_level in 1i32..=10,
    ) {
        for submitter in &candidates {
            let picked = HierarchyResolver::find_approver(
                &candidates,
                submitter.id,
                required_level,
                None,
            );
            if let Some(approver) = picked {
                prop_assert_ne!(approver.id, submitter.id);
            }
        }
    }

    /// The selected approver satisfies every eligibility filter.
    #[test]
    fn prop_selection_is_eligible(
        candidates in arb_candidates(),
        required_level in 1i32..=10,
        team in 1u128..4,
    ) {
        let exclude = Uuid::from_u128(0);
        let team_id = Uuid::from_u128(team);
        let picked = HierarchyResolver::find_approver(
            &candidates,
            exclude,
            required_level,
            Some(team_id),
        );
        if let Some(approver) = picked {
            prop_assert!(approver.active);
            prop_assert!(approver.level_number <= required_level);
            prop_assert_eq!(approver.team_id, team_id);
        }
    }

    /// Any two eligible candidates A, B with A more senior than B: A wins.
    #[test]
    fn prop_most_senior_wins(
        candidates in arb_candidates(),
        required_level in 1i32..=10,
    ) {
        let exclude = Uuid::from_u128(0);
        let picked = HierarchyResolver::find_approver(&candidates, exclude, required_level, None);
        if let Some(approver) = picked {
            for other in candidates
                .iter()
                .filter(|c| c.active && c.id != exclude && c.level_number <= required_level)
            {
                prop_assert!(approver.level_number <= other.level_number);
            }
        }
    }

    /// Selection is deterministic: shuffling the candidate order never
    /// changes the outcome.
    #[test]
    fn prop_selection_order_independent(
        candidates in arb_candidates(),
        required_level in 1i32..=10,
    ) {
        let exclude = Uuid::from_u128(0);
        let first = HierarchyResolver::find_approver(&candidates, exclude, required_level, None)
            .map(|c| c.id);

        let mut reversed = candidates.clone();
        reversed.reverse();
        let second = HierarchyResolver::find_approver(&reversed, exclude, required_level, None)
            .map(|c| c.id);

        prop_assert_eq!(first, second);
    }

    /// `None` comes back exactly when no candidate is eligible.
    #[test]
    fn prop_none_iff_no_eligible(
        candidates in arb_candidates(),
        required_level in 1i32..=10,
    ) {
        let exclude = Uuid::from_u128(0);
        let any_eligible = candidates
            .iter()
            .any(|c| c.active && c.id != exclude && c.level_number <= required_level);
        let picked = HierarchyResolver::find_approver(&candidates, exclude, required_level, None);

        prop_assert_eq!(picked.is_some(), any_eligible);
    }
}
