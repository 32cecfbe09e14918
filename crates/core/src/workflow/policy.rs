//! Policy amount validation and step ordering.
//!
//! A policy carries an inclusive amount range and an ordered list of
//! approval step definitions. This module validates amounts against the
//! range and normalizes step lists before the workflow plans approvals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflow::error::WorkflowError;
use crate::workflow::types::TeamScope;

/// A policy's matching rule: category plus inclusive amount range.
#[derive(Debug, Clone)]
pub struct PolicySpec {
    /// Unique identifier for the policy.
    pub id: Uuid,
    /// Expense category this policy governs.
    pub category: String,
    /// Minimum amount for this policy to apply (inclusive).
    pub min_amount: Decimal,
    /// Maximum amount for this policy to apply (inclusive).
    pub max_amount: Decimal,
}

/// One approval step definition from a policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDef {
    /// Position in the chain, starting at 1.
    pub step_order: i32,
    /// Seniority floor: the approver's `level_number` must be <= this.
    pub required_level: i32,
    /// Where to look for the approver.
    pub team_scope: TeamScope,
    /// Whether this step gates expense completion.
    pub is_required: bool,
}

/// Stateless engine for policy validation.
pub struct PolicyEngine;

impl PolicyEngine {
    /// Check that an amount is within the policy's inclusive range.
    ///
    /// # Errors
    /// Returns `WorkflowError::AmountOutOfRange` when the amount falls
    /// outside `[min_amount, max_amount]`. The violation is surfaced to
    /// the caller, never corrected.
    pub fn validate_amount(policy: &PolicySpec, amount: Decimal) -> Result<(), WorkflowError> {
        if amount < policy.min_amount || amount > policy.max_amount {
            return Err(WorkflowError::AmountOutOfRange {
                amount,
                min_amount: policy.min_amount,
                max_amount: policy.max_amount,
            });
        }
        Ok(())
    }

    /// Sort step definitions ascending by `step_order`.
    ///
    /// # Errors
    /// Returns `WorkflowError::NoApprovalSteps` when the list is empty;
    /// a policy with zero steps cannot be submitted against.
    pub fn ordered_steps(
        policy_id: Uuid,
        mut steps: Vec<StepDef>,
    ) -> Result<Vec<StepDef>, WorkflowError> {
        if steps.is_empty() {
            return Err(WorkflowError::NoApprovalSteps(policy_id));
        }
        steps.sort_by_key(|s| s.step_order);
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn policy(min: Decimal, max: Decimal) -> PolicySpec {
        PolicySpec {
            id: Uuid::new_v4(),
            category: "travel".to_string(),
            min_amount: min,
            max_amount: max,
        }
    }

    fn step(order: i32) -> StepDef {
        StepDef {
            step_order: order,
            required_level: 5,
            team_scope: TeamScope::OrgWide,
            is_required: true,
        }
    }

    #[rstest]
    #[case::mid_range(dec!(5000))]
    #[case::at_minimum(dec!(2000))]
    #[case::at_maximum(dec!(999999999.99))]
    fn test_amount_within_inclusive_range(#[case] amount: Decimal) {
        let p = policy(dec!(2000), dec!(999999999.99));
        assert!(PolicyEngine::validate_amount(&p, amount).is_ok());
    }

    #[rstest]
    #[case::just_below_minimum(dec!(1999.99))]
    #[case::zero(dec!(0))]
    #[case::above_maximum(dec!(2500000000))]
    fn test_amount_outside_range_rejected(#[case] amount: Decimal) {
        let p = policy(dec!(2000), dec!(999999999.99));
        let result = PolicyEngine::validate_amount(&p, amount);
        assert!(matches!(
            result,
            Err(WorkflowError::AmountOutOfRange { .. })
        ));
    }

    #[test]
    fn test_ordered_steps_sorts_ascending() {
        let steps = vec![step(3), step(1), step(2)];
        let ordered = PolicyEngine::ordered_steps(Uuid::new_v4(), steps).expect("steps");
        let orders: Vec<i32> = ordered.iter().map(|s| s.step_order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_steps_rejected() {
        let policy_id = Uuid::new_v4();
        let result = PolicyEngine::ordered_steps(policy_id, vec![]);
        match result {
            Err(WorkflowError::NoApprovalSteps(id)) => assert_eq!(id, policy_id),
            _ => panic!("Expected NoApprovalSteps error"),
        }
    }
}
