//! Approval chain planning and progression decisions.
//!
//! This module holds the pure decisions of the workflow engine: which
//! approver serves each step of a new expense, whether a step may be
//! approved yet, and when an expense counts as fully approved. The
//! repository layer executes these decisions transactionally.

use uuid::Uuid;

use crate::workflow::error::WorkflowError;
use crate::workflow::policy::StepDef;
use crate::workflow::resolver::{Candidate, HierarchyResolver};
use crate::workflow::types::ApprovalStatus;

/// An approver assignment produced while planning a new expense.
///
/// This list is authoritative: it is persisted with the expense and
/// returned to the caller, never re-derived later.
#[derive(Debug, Clone)]
pub struct PlannedApproval {
    /// Step position in the chain.
    pub step_number: i32,
    /// The chosen approver.
    pub approver_id: Uuid,
    /// The approver's hierarchy level row at assignment time.
    pub approver_level_id: Uuid,
    /// The approver's display name.
    pub approver_name: String,
    /// The approver's level name at assignment time.
    pub approver_level_name: String,
    /// Copied from the step definition.
    pub required: bool,
}

/// The approval fields the progression decisions inspect.
#[derive(Debug, Clone, Copy)]
pub struct ApprovalState {
    /// Step position in the chain.
    pub step_number: i32,
    /// Whether the step gates completion.
    pub required: bool,
    /// Current status of the approval record.
    pub status: ApprovalStatus,
}

/// Stateless service for workflow decisions.
pub struct WorkflowService;

impl WorkflowService {
    /// Assign an approver to every step of a new expense.
    ///
    /// Steps must already be ordered ascending. Resolution is
    /// all-or-nothing: the first step with no eligible approver aborts
    /// the whole plan, so no partial chain is ever persisted.
    ///
    /// # Errors
    /// Returns `WorkflowError::NoApproverFound` naming the failing step.
    pub fn plan_approvals(
        submitter_id: Uuid,
        submitter_team_id: Uuid,
        steps: &[StepDef],
        candidates: &[Candidate],
    ) -> Result<Vec<PlannedApproval>, WorkflowError> {
        let mut planned = Vec::with_capacity(steps.len());

        for step in steps {
            let team = HierarchyResolver::team_restriction(step.team_scope, submitter_team_id);
            let approver = HierarchyResolver::find_approver(
                candidates,
                submitter_id,
                step.required_level,
                team,
            )
            .ok_or(WorkflowError::NoApproverFound {
                step: step.step_order,
                required_level: step.required_level,
            })?;

            planned.push(PlannedApproval {
                step_number: step.step_order,
                approver_id: approver.id,
                approver_level_id: approver.hierarchy_level_id,
                approver_name: approver.name.clone(),
                approver_level_name: approver.level_name.clone(),
                required: step.is_required,
            });
        }

        Ok(planned)
    }

    /// Check that no required earlier step is still pending.
    ///
    /// Steps approve strictly in order: submitting step N while a
    /// required step < N is pending is rejected. Optional earlier steps
    /// never gate.
    ///
    /// # Errors
    /// Returns `WorkflowError::EarlierStepPending` naming the earliest
    /// blocking step.
    pub fn check_step_gate(
        approvals: &[ApprovalState],
        step_number: i32,
    ) -> Result<(), WorkflowError> {
        let blocking = approvals
            .iter()
            .filter(|a| a.required && a.status == ApprovalStatus::Pending)
            .filter(|a| a.step_number < step_number)
            .map(|a| a.step_number)
            .min();

        match blocking {
            Some(blocking_step) => Err(WorkflowError::EarlierStepPending {
                step: step_number,
                blocking_step,
            }),
            None => Ok(()),
        }
    }

    /// An expense completes exactly when no required approval is pending.
    ///
    /// Optional approvals left pending never block completion.
    #[must_use]
    pub fn is_complete(approvals: &[ApprovalState]) -> bool {
        !approvals
            .iter()
            .any(|a| a.required && a.status == ApprovalStatus::Pending)
    }

    /// Count of required approvals still pending.
    #[must_use]
    pub fn pending_required_count(approvals: &[ApprovalState]) -> usize {
        approvals
            .iter()
            .filter(|a| a.required && a.status == ApprovalStatus::Pending)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::types::TeamScope;

    fn candidate(id: u128, team: u128, level: i32) -> Candidate {
        Candidate {
            id: Uuid::from_u128(id),
            team_id: Uuid::from_u128(team),
            hierarchy_level_id: Uuid::from_u128(1000 + u128::from(level.unsigned_abs())),
            level_number: level,
            level_name: format!("L{level}"),
            name: format!("user-{id}"),
            active: true,
        }
    }

    fn step(order: i32, level: i32, required: bool) -> StepDef {
        StepDef {
            step_order: order,
            required_level: level,
            team_scope: TeamScope::OrgWide,
            is_required: required,
        }
    }

    fn state(step_number: i32, required: bool, status: ApprovalStatus) -> ApprovalState {
        ApprovalState {
            step_number,
            required,
            status,
        }
    }

    #[test]
    fn test_plan_one_approval_per_step() {
        let submitter = Uuid::from_u128(99);
        let candidates = vec![
            candidate(1, 10, 6),
            candidate(2, 10, 5),
            candidate(3, 10, 4),
        ];
        let steps = vec![step(1, 6, true), step(2, 5, true), step(3, 4, true)];

        let planned =
            WorkflowService::plan_approvals(submitter, Uuid::from_u128(10), &steps, &candidates)
                .expect("plan");

        assert_eq!(planned.len(), 3);
        let step_numbers: Vec<i32> = planned.iter().map(|p| p.step_number).collect();
        assert_eq!(step_numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_plan_never_assigns_submitter() {
        let submitter = Uuid::from_u128(1);
        // Submitter is the most senior user but cannot approve themselves.
        let candidates = vec![candidate(1, 10, 1), candidate(2, 10, 5)];
        let steps = vec![step(1, 6, true)];

        let planned =
            WorkflowService::plan_approvals(submitter, Uuid::from_u128(10), &steps, &candidates)
                .expect("plan");
        assert_eq!(planned[0].approver_id, Uuid::from_u128(2));
    }

    #[test]
    fn test_plan_aborts_on_unstaffable_step() {
        let submitter = Uuid::from_u128(99);
        let candidates = vec![candidate(1, 10, 6)];
        // Step 2 needs level 3 seniority; nobody qualifies.
        let steps = vec![step(1, 6, true), step(2, 3, true)];

        let result =
            WorkflowService::plan_approvals(submitter, Uuid::from_u128(10), &steps, &candidates);
        match result {
            Err(WorkflowError::NoApproverFound {
                step,
                required_level,
            }) => {
                assert_eq!(step, 2);
                assert_eq!(required_level, 3);
            }
            _ => panic!("Expected NoApproverFound error"),
        }
    }

    #[test]
    fn test_plan_copies_required_flag() {
        let submitter = Uuid::from_u128(99);
        let candidates = vec![candidate(1, 10, 4)];
        let steps = vec![step(1, 6, true), step(2, 6, false)];

        let planned =
            WorkflowService::plan_approvals(submitter, Uuid::from_u128(10), &steps, &candidates)
                .expect("plan");
        assert!(planned[0].required);
        assert!(!planned[1].required);
    }

    #[test]
    fn test_step_gate_blocks_on_earlier_required_pending() {
        let approvals = vec![
            state(1, true, ApprovalStatus::Pending),
            state(2, true, ApprovalStatus::Pending),
        ];

        let result = WorkflowService::check_step_gate(&approvals, 2);
        match result {
            Err(WorkflowError::EarlierStepPending {
                step,
                blocking_step,
            }) => {
                assert_eq!(step, 2);
                assert_eq!(blocking_step, 1);
            }
            _ => panic!("Expected EarlierStepPending error"),
        }
    }

    #[test]
    fn test_step_gate_passes_when_earlier_approved() {
        let approvals = vec![
            state(1, true, ApprovalStatus::Approved),
            state(2, true, ApprovalStatus::Pending),
        ];

        assert!(WorkflowService::check_step_gate(&approvals, 2).is_ok());
    }

    #[test]
    fn test_step_gate_ignores_optional_earlier_steps() {
        let approvals = vec![
            state(1, false, ApprovalStatus::Pending),
            state(2, true, ApprovalStatus::Pending),
        ];

        assert!(WorkflowService::check_step_gate(&approvals, 2).is_ok());
    }

    #[test]
    fn test_step_gate_first_step_always_passes() {
        let approvals = vec![
            state(1, true, ApprovalStatus::Pending),
            state(2, true, ApprovalStatus::Pending),
        ];

        assert!(WorkflowService::check_step_gate(&approvals, 1).is_ok());
    }

    #[test]
    fn test_complete_when_all_required_approved() {
        let approvals = vec![
            state(1, true, ApprovalStatus::Approved),
            state(2, true, ApprovalStatus::Approved),
        ];

        assert!(WorkflowService::is_complete(&approvals));
        assert_eq!(WorkflowService::pending_required_count(&approvals), 0);
    }

    #[test]
    fn test_not_complete_with_required_pending() {
        let approvals = vec![
            state(1, true, ApprovalStatus::Approved),
            state(2, true, ApprovalStatus::Pending),
        ];

        assert!(!WorkflowService::is_complete(&approvals));
        assert_eq!(WorkflowService::pending_required_count(&approvals), 1);
    }

    #[test]
    fn test_optional_pending_never_blocks_completion() {
        let approvals = vec![
            state(1, true, ApprovalStatus::Approved),
            state(2, false, ApprovalStatus::Pending),
        ];

        assert!(WorkflowService::is_complete(&approvals));
    }
}
