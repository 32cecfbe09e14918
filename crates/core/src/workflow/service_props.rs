//! Property-based tests for WorkflowService.
//!
//! These tests validate the approval planning and completion properties:
//! one approval per step, submitter exclusion, and the completion rule.

use proptest::prelude::*;
use uuid::Uuid;

use crate::workflow::policy::StepDef;
use crate::workflow::resolver::Candidate;
use crate::workflow::service::{ApprovalState, WorkflowService};
use crate::workflow::types::{ApprovalStatus, TeamScope};

fn arb_candidate() -> impl Strategy<Value = Candidate> {
    (1u128..10_000, 1u128..4, 1i32..=10).prop_map(|(id, team, level)| Candidate {
        id: Uuid::from_u128(id),
        team_id: Uuid::from_u128(team),
        hierarchy_level_id: Uuid::from_u128(u128::from(level.unsigned_abs())),
        level_number: level,
        level_name: format!("L{level}"),
        name: format!("user-{id}"),
        active: true,
    })
}

fn arb_steps() -> impl Strategy<Value = Vec<StepDef>> {
    prop::collection::vec((1i32..=10, any::<bool>(), any::<bool>()), 1..6).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (level, required, team_scoped))| StepDef {
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                step_order: (i + 1) as i32,
                required_level: level,
                team_scope: if team_scoped {
                    TeamScope::SubmitterTeam
                } else {
                    TeamScope::OrgWide
                },
                is_required: required,
            })
            .collect()
    })
}

fn arb_approval_states() -> impl Strategy<Value = Vec<ApprovalState>> {
    prop::collection::vec((any::<bool>(), any::<bool>()), 0..8).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (required, approved))| ApprovalState {
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                step_number: (i + 1) as i32,
                required,
                status: if approved {
                    ApprovalStatus::Approved
                } else {
                    ApprovalStatus::Pending
                },
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A successful plan assigns exactly one approver per step, with
    /// matching step numbers and no self-approval.
    #[test]
    fn prop_plan_covers_every_step(
        candidates in prop::collection::vec(arb_candidate(), 1..30),
        steps in arb_steps(),
        submitter_team in 1u128..4,
    ) {
        let submitter = Uuid::from_u128(0);
        let team_id = Uuid::from_u128(submitter_team);

        if let Ok(planned) =
            WorkflowService::plan_approvals(submitter, team_id, &steps, &candidates)
        {
            prop_assert_eq!(planned.len(), steps.len());
            for (step, plan) in steps.iter().zip(&planned) {
                prop_assert_eq!(plan.step_number, step.step_order);
                prop_assert_eq!(plan.required, step.is_required);
                prop_assert_ne!(plan.approver_id, submitter);
            }
        }
    }

    /// Completion holds exactly when no required approval is pending,
    /// regardless of optional approvals.
    #[test]
    fn prop_complete_iff_no_required_pending(states in arb_approval_states()) {
        let any_required_pending = states
            .iter()
            .any(|a| a.required && a.status == ApprovalStatus::Pending);

        prop_assert_eq!(WorkflowService::is_complete(&states), !any_required_pending);
        prop_assert_eq!(
            WorkflowService::pending_required_count(&states) == 0,
            !any_required_pending
        );
    }

    /// The step gate admits a step exactly when no required earlier step
    /// is pending.
    #[test]
    fn prop_gate_blocks_exactly_on_earlier_required(
        states in arb_approval_states(),
        step in 1i32..=8,
    ) {
        let blocked = states
            .iter()
            .any(|a| a.required && a.status == ApprovalStatus::Pending && a.step_number < step);

        let result = WorkflowService::check_step_gate(&states, step);
        prop_assert_eq!(result.is_err(), blocked);
    }
}
