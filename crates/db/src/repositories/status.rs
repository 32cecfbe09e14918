//! Status projection for expenses.
//!
//! Read-only assembly of an expense's current state with its approval
//! chain. Never mutates anything.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use trellis_core::workflow::WorkflowError;

use crate::entities::{
    approvals, expenses, hierarchy_levels, policies, sea_orm_active_enums::ExpenseStatus, users,
};

/// One approval entry in the status view, in step order.
#[derive(Debug, Clone)]
pub struct ApprovalView {
    /// Step position in the chain.
    pub step_number: i32,
    /// Display name of the assigned approver.
    pub approver_name: String,
    /// Level name snapshotted at assignment time.
    pub approver_level_name: String,
    /// Current status of this approval.
    pub status: trellis_core::workflow::ApprovalStatus,
    /// When the approval was granted, if it was.
    pub approved_at: Option<DateTime<FixedOffset>>,
    /// Approver comments, if any.
    pub comments: Option<String>,
    /// Whether this step gates completion.
    pub required: bool,
}

/// Point-in-time view of an expense and its approvals.
#[derive(Debug, Clone)]
pub struct ExpenseStatusView {
    /// Expense id.
    pub id: Uuid,
    /// Expense amount.
    pub amount: Decimal,
    /// Free-text description.
    pub description: Option<String>,
    /// Current expense status.
    pub status: trellis_core::workflow::ExpenseStatus,
    /// When the expense was submitted.
    pub submitted_at: DateTime<FixedOffset>,
    /// When the last required approval landed, if completed.
    pub completed_at: Option<DateTime<FixedOffset>>,
    /// Display name of the submitter.
    pub submitter_name: String,
    /// Name of the policy the expense was filed against.
    pub policy_name: String,
    /// All approvals, ordered by step number.
    pub approvals: Vec<ApprovalView>,
}

/// Read-only repository assembling expense status views.
#[derive(Debug, Clone)]
pub struct StatusRepository {
    db: DatabaseConnection,
}

impl StatusRepository {
    /// Creates a new status repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Assembles the current status of an expense.
    ///
    /// # Errors
    ///
    /// Returns an error if the expense is not found or a database
    /// operation fails.
    pub async fn get_status(&self, expense_id: Uuid) -> Result<ExpenseStatusView, WorkflowError> {
        let expense = expenses::Entity::find_by_id(expense_id)
            .one(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?
            .ok_or(WorkflowError::ExpenseNotFound(expense_id))?;

        let submitter = users::Entity::find_by_id(expense.submitter_id)
            .one(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?
            .ok_or_else(|| {
                WorkflowError::Database(format!(
                    "Expense {expense_id} references missing submitter {}",
                    expense.submitter_id
                ))
            })?;

        let policy = policies::Entity::find_by_id(expense.policy_id)
            .one(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?
            .ok_or_else(|| {
                WorkflowError::Database(format!(
                    "Expense {expense_id} references missing policy {}",
                    expense.policy_id
                ))
            })?;

        let rows = approvals::Entity::find()
            .filter(approvals::Column::ExpenseId.eq(expense_id))
            .order_by_asc(approvals::Column::StepNumber)
            .all(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        let mut approval_views = Vec::with_capacity(rows.len());
        for approval in rows {
            let approver = users::Entity::find_by_id(approval.approver_id)
                .one(&self.db)
                .await
                .map_err(|e| WorkflowError::Database(e.to_string()))?
                .ok_or_else(|| {
                    WorkflowError::Database(format!(
                        "Approval {} references missing approver {}",
                        approval.id, approval.approver_id
                    ))
                })?;

            // The level name reported is the assignment-time snapshot,
            // not the approver's current level.
            let level = hierarchy_levels::Entity::find_by_id(approval.approver_level_id)
                .one(&self.db)
                .await
                .map_err(|e| WorkflowError::Database(e.to_string()))?
                .ok_or_else(|| {
                    WorkflowError::Database(format!(
                        "Approval {} references missing level {}",
                        approval.id, approval.approver_level_id
                    ))
                })?;

            approval_views.push(ApprovalView {
                step_number: approval.step_number,
                approver_name: approver.name,
                approver_level_name: level.level_name,
                status: match approval.status {
                    crate::entities::sea_orm_active_enums::ApprovalStatus::Pending => {
                        trellis_core::workflow::ApprovalStatus::Pending
                    }
                    crate::entities::sea_orm_active_enums::ApprovalStatus::Approved => {
                        trellis_core::workflow::ApprovalStatus::Approved
                    }
                },
                approved_at: approval.approved_at,
                comments: approval.comments,
                required: approval.required,
            });
        }

        Ok(ExpenseStatusView {
            id: expense.id,
            amount: expense.amount,
            description: expense.description,
            status: match expense.status {
                ExpenseStatus::Pending => trellis_core::workflow::ExpenseStatus::Pending,
                ExpenseStatus::Approved => trellis_core::workflow::ExpenseStatus::Approved,
            },
            submitted_at: expense.submitted_at,
            completed_at: expense.completed_at,
            submitter_name: submitter.name,
            policy_name: policy.name,
            approvals: approval_views,
        })
    }
}
