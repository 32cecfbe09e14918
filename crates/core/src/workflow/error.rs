//! Workflow error types for expense lifecycle management.
//!
//! This module defines all error types that can occur while creating
//! expenses, resolving approvers, and submitting approvals.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Submitter or approver not found.
    #[error("User {0} not found")]
    UserNotFound(Uuid),

    /// Policy not found.
    #[error("Policy {0} not found")]
    PolicyNotFound(Uuid),

    /// Expense not found.
    #[error("Expense {0} not found")]
    ExpenseNotFound(Uuid),

    /// User and target entity belong to different organizations.
    #[error("User {user_id} does not belong to organization {organization_id}")]
    OrganizationMismatch {
        /// The user on the request.
        user_id: Uuid,
        /// The organization owning the expense or policy.
        organization_id: Uuid,
    },

    /// Expense amount falls outside the policy's range.
    #[error("Amount {amount} is outside policy range {min_amount} - {max_amount}")]
    AmountOutOfRange {
        /// The requested expense amount.
        amount: Decimal,
        /// Policy minimum (inclusive).
        min_amount: Decimal,
        /// Policy maximum (inclusive).
        max_amount: Decimal,
    },

    /// Policy has no approval steps configured.
    #[error("No approval steps configured for policy {0}")]
    NoApprovalSteps(Uuid),

    /// No eligible approver exists for a step.
    #[error("No suitable approver found for step {step} (requires level {required_level})")]
    NoApproverFound {
        /// The step that could not be staffed.
        step: i32,
        /// The seniority floor the step demands.
        required_level: i32,
    },

    /// The user has no pending approval on the expense, either because
    /// no step names them or the step was already acted on.
    #[error("No pending approval for user {approver_id} on expense {expense_id}")]
    NoPendingApproval {
        /// The expense being approved.
        expense_id: Uuid,
        /// The user attempting to approve.
        approver_id: Uuid,
    },

    /// A required earlier step is still pending, so this step cannot be
    /// approved yet.
    #[error("Step {step} cannot be approved while required step {blocking_step} is pending")]
    EarlierStepPending {
        /// The step being approved.
        step: i32,
        /// The earliest required step still pending.
        blocking_step: i32,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::AmountOutOfRange { .. } | Self::NoApprovalSteps(_) => 400,

            Self::OrganizationMismatch { .. } => 403,

            Self::UserNotFound(_) | Self::PolicyNotFound(_) | Self::ExpenseNotFound(_) => 404,

            Self::NoApproverFound { .. }
            | Self::NoPendingApproval { .. }
            | Self::EarlierStepPending { .. } => 409,

            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::PolicyNotFound(_) => "POLICY_NOT_FOUND",
            Self::ExpenseNotFound(_) => "EXPENSE_NOT_FOUND",
            Self::OrganizationMismatch { .. } => "ORGANIZATION_MISMATCH",
            Self::AmountOutOfRange { .. } => "AMOUNT_OUT_OF_RANGE",
            Self::NoApprovalSteps(_) => "NO_APPROVAL_STEPS",
            Self::NoApproverFound { .. } => "NO_APPROVER_FOUND",
            Self::NoPendingApproval { .. } => "NO_PENDING_APPROVAL",
            Self::EarlierStepPending { .. } => "EARLIER_STEP_PENDING",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns true if the caller may safely retry the whole operation.
    ///
    /// Only infrastructure failures are retryable; every deterministic
    /// validation or conflict failure will fail again unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}
