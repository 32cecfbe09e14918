//! Workflow repository for expense creation and approval progression.
//!
//! Executes the workflow decisions from `trellis_core` transactionally:
//! expense creation persists the expense and its full approval chain as
//! one atomic unit, and approval submission serializes racing approvers
//! through a conditional update on the pending row.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use trellis_core::workflow::{
    ApprovalState, Candidate, PlannedApproval, PolicyEngine, PolicySpec, StepDef, WorkflowError,
    WorkflowService,
};

use crate::entities::{
    approval_steps, approvals, expenses, hierarchy_levels, policies,
    sea_orm_active_enums::{ApprovalStatus, ExpenseStatus, TeamScope},
    users,
};

/// Input for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// The user submitting the expense.
    pub submitter_id: Uuid,
    /// The policy the expense is filed against.
    pub policy_id: Uuid,
    /// Expense amount; must fall inside the policy's range.
    pub amount: Decimal,
    /// Optional free-text description.
    pub description: Option<String>,
}

/// A created expense with its authoritative approval chain.
///
/// Callers must use this list of approvers rather than re-deriving it;
/// re-resolution after hierarchy changes could disagree.
#[derive(Debug, Clone)]
pub struct CreatedExpense {
    /// The persisted expense row.
    pub expense: expenses::Model,
    /// One planned approval per step, in step order.
    pub steps: Vec<PlannedApproval>,
}

/// Result of submitting one approval.
#[derive(Debug, Clone)]
pub struct ApprovalOutcome {
    /// The expense the approval belongs to.
    pub expense_id: Uuid,
    /// The step that was just approved.
    pub step_approved: i32,
    /// Expense status after this approval.
    pub expense_status: trellis_core::workflow::ExpenseStatus,
    /// Required approvals still pending after this one.
    pub pending_required_count: u64,
}

/// Workflow repository for expense creation and approval progression.
#[derive(Debug, Clone)]
pub struct WorkflowRepository {
    db: DatabaseConnection,
}

impl WorkflowRepository {
    /// Creates a new workflow repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an expense and its full approval chain.
    ///
    /// Approver resolution runs before anything is written, so a step
    /// with no eligible approver aborts the operation with no partial
    /// rows. The expense and its approvals are inserted in a single
    /// database transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Submitter or policy is not found
    /// - Submitter and policy belong to different organizations
    /// - Amount is outside the policy's range
    /// - The policy has no approval steps
    /// - Any step has no eligible approver
    /// - Database operation fails
    pub async fn create_expense(
        &self,
        input: CreateExpenseInput,
    ) -> Result<CreatedExpense, WorkflowError> {
        // Fetch submitter
        let submitter = users::Entity::find_by_id(input.submitter_id)
            .one(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?
            .ok_or(WorkflowError::UserNotFound(input.submitter_id))?;

        // Fetch policy (inactive policies cannot be filed against)
        let policy = policies::Entity::find_by_id(input.policy_id)
            .filter(policies::Column::Active.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?
            .ok_or(WorkflowError::PolicyNotFound(input.policy_id))?;

        // Submitter and policy must share an organization
        if submitter.organization_id != policy.organization_id {
            return Err(WorkflowError::OrganizationMismatch {
                user_id: submitter.id,
                organization_id: policy.organization_id,
            });
        }

        // Validate amount against the policy range
        let spec = PolicySpec {
            id: policy.id,
            category: policy.category.clone(),
            min_amount: policy.min_amount,
            max_amount: policy.max_amount,
        };
        PolicyEngine::validate_amount(&spec, input.amount)?;

        // Load and order the step definitions
        let steps = self.load_step_defs(policy.id).await?;

        // Load approver candidates and plan the whole chain up front
        let candidates = self.load_candidates(policy.organization_id).await?;
        let planned = WorkflowService::plan_approvals(
            submitter.id,
            submitter.team_id,
            &steps,
            &candidates,
        )?;

        // Persist expense + approvals atomically
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        let now = Utc::now().into();
        let expense_id = Uuid::new_v4();

        let expense = expenses::ActiveModel {
            id: Set(expense_id),
            organization_id: Set(policy.organization_id),
            submitter_id: Set(submitter.id),
            policy_id: Set(policy.id),
            amount: Set(input.amount),
            description: Set(input.description),
            status: Set(ExpenseStatus::Pending),
            submitted_at: Set(now),
            completed_at: Set(None),
        };

        let expense = expense
            .insert(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        for plan in &planned {
            let approval = approvals::ActiveModel {
                id: Set(Uuid::new_v4()),
                expense_id: Set(expense_id),
                step_number: Set(plan.step_number),
                approver_id: Set(plan.approver_id),
                approver_level_id: Set(plan.approver_level_id),
                required: Set(plan.required),
                status: Set(ApprovalStatus::Pending),
                approved_at: Set(None),
                comments: Set(None),
            };
            approval
                .insert(&txn)
                .await
                .map_err(|e| WorkflowError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        debug!(
            expense_id = %expense.id,
            policy_id = %policy.id,
            steps = planned.len(),
            "Expense persisted with approval chain"
        );

        Ok(CreatedExpense {
            expense,
            steps: planned,
        })
    }

    /// Submits one approval and advances the expense if it completes.
    ///
    /// The pending row is flipped with a conditional update filtered on
    /// `status = pending`; of two racing submissions for the same row,
    /// exactly one matches and the loser observes `NoPendingApproval`.
    /// The completion count runs in the same transaction as the flip, so
    /// it always reflects the just-applied update. The completion
    /// transition itself is a conditional update too, which makes a
    /// concurrent double-complete idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Expense or approver is not found
    /// - Approver belongs to a different organization than the expense
    /// - No pending approval names this approver on this expense
    /// - A required earlier step is still pending
    /// - Database operation fails
    pub async fn submit_approval(
        &self,
        expense_id: Uuid,
        approver_id: Uuid,
        comments: Option<String>,
    ) -> Result<ApprovalOutcome, WorkflowError> {
        // Fetch expense
        let expense = expenses::Entity::find_by_id(expense_id)
            .one(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?
            .ok_or(WorkflowError::ExpenseNotFound(expense_id))?;

        // Fetch approver
        let approver = users::Entity::find_by_id(approver_id)
            .one(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?
            .ok_or(WorkflowError::UserNotFound(approver_id))?;

        // Approver must belong to the expense's organization
        if approver.organization_id != expense.organization_id {
            return Err(WorkflowError::OrganizationMismatch {
                user_id: approver.id,
                organization_id: expense.organization_id,
            });
        }

        // A closed expense accepts no further submissions.
        if !db_expense_status_to_core(&expense.status).is_open() {
            return Err(WorkflowError::NoPendingApproval {
                expense_id,
                approver_id,
            });
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        // Authority is the snapshot taken at creation: a pending row
        // naming this approver, nothing re-resolved. An approver holding
        // several steps acts on the earliest pending one.
        let approval = approvals::Entity::find()
            .filter(approvals::Column::ExpenseId.eq(expense_id))
            .filter(approvals::Column::ApproverId.eq(approver_id))
            .filter(approvals::Column::Status.eq(ApprovalStatus::Pending))
            .order_by_asc(approvals::Column::StepNumber)
            .one(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?
            .ok_or(WorkflowError::NoPendingApproval {
                expense_id,
                approver_id,
            })?;

        // Steps approve strictly in order: a required earlier step still
        // pending blocks this one.
        let states = load_approval_states(&txn, expense_id).await?;
        WorkflowService::check_step_gate(&states, approval.step_number)?;

        let now = Utc::now().into();

        // Conditional flip; rows_affected = 0 means a racing submission won.
        let flipped = approvals::Entity::update_many()
            .set(approvals::ActiveModel {
                status: Set(ApprovalStatus::Approved),
                approved_at: Set(Some(now)),
                comments: Set(comments),
                ..Default::default()
            })
            .filter(approvals::Column::Id.eq(approval.id))
            .filter(approvals::Column::Status.eq(ApprovalStatus::Pending))
            .exec(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        if flipped.rows_affected == 0 {
            return Err(WorkflowError::NoPendingApproval {
                expense_id,
                approver_id,
            });
        }

        // Count remaining required approvals inside the same transaction
        // so the count reflects the flip we just applied.
        let pending_required = approvals::Entity::find()
            .filter(approvals::Column::ExpenseId.eq(expense_id))
            .filter(approvals::Column::Required.eq(true))
            .filter(approvals::Column::Status.eq(ApprovalStatus::Pending))
            .count(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        let expense_status = if pending_required == 0 {
            // Conditional transition keeps a concurrent double-complete
            // idempotent: only the first writer stamps completed_at.
            expenses::Entity::update_many()
                .set(expenses::ActiveModel {
                    status: Set(ExpenseStatus::Approved),
                    completed_at: Set(Some(now)),
                    ..Default::default()
                })
                .filter(expenses::Column::Id.eq(expense_id))
                .filter(expenses::Column::Status.eq(ExpenseStatus::Pending))
                .exec(&txn)
                .await
                .map_err(|e| WorkflowError::Database(e.to_string()))?;

            info!(expense_id = %expense_id, "Expense fully approved");
            trellis_core::workflow::ExpenseStatus::Approved
        } else {
            trellis_core::workflow::ExpenseStatus::Pending
        };

        txn.commit()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        Ok(ApprovalOutcome {
            expense_id,
            step_approved: approval.step_number,
            expense_status,
            pending_required_count: pending_required,
        })
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    /// Loads a policy's step definitions, ordered and validated non-empty.
    async fn load_step_defs(&self, policy_id: Uuid) -> Result<Vec<StepDef>, WorkflowError> {
        let rows = approval_steps::Entity::find()
            .filter(approval_steps::Column::PolicyId.eq(policy_id))
            .order_by_asc(approval_steps::Column::StepOrder)
            .all(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        let steps = rows
            .into_iter()
            .map(|s| StepDef {
                step_order: s.step_order,
                required_level: s.required_level,
                team_scope: db_team_scope_to_core(&s.team_scope),
                is_required: s.is_required,
            })
            .collect();

        PolicyEngine::ordered_steps(policy_id, steps)
    }

    /// Loads the active users of an organization with their levels.
    async fn load_candidates(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Candidate>, WorkflowError> {
        let rows = users::Entity::find()
            .filter(users::Column::OrganizationId.eq(organization_id))
            .filter(users::Column::Active.eq(true))
            .find_also_related(hierarchy_levels::Entity)
            .all(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        let candidates = rows
            .into_iter()
            .filter_map(|(user, level)| {
                level.map(|level| Candidate {
                    id: user.id,
                    team_id: user.team_id,
                    hierarchy_level_id: level.id,
                    level_number: level.level_number,
                    level_name: level.level_name,
                    name: user.name,
                    active: user.active,
                })
            })
            .collect();

        Ok(candidates)
    }
}

/// Loads the approval states of an expense for the progression decisions.
async fn load_approval_states(
    txn: &DatabaseTransaction,
    expense_id: Uuid,
) -> Result<Vec<ApprovalState>, WorkflowError> {
    let rows = approvals::Entity::find()
        .filter(approvals::Column::ExpenseId.eq(expense_id))
        .order_by_asc(approvals::Column::StepNumber)
        .all(txn)
        .await
        .map_err(|e| WorkflowError::Database(e.to_string()))?;

    Ok(rows
        .iter()
        .map(|a| ApprovalState {
            step_number: a.step_number,
            required: a.required,
            status: db_approval_status_to_core(&a.status),
        })
        .collect())
}

// ============================================================================
// Conversion helpers
// ============================================================================

/// Converts database TeamScope to core TeamScope.
fn db_team_scope_to_core(scope: &TeamScope) -> trellis_core::workflow::TeamScope {
    match scope {
        TeamScope::SubmitterTeam => trellis_core::workflow::TeamScope::SubmitterTeam,
        TeamScope::OrgWide => trellis_core::workflow::TeamScope::OrgWide,
    }
}

/// Converts database ApprovalStatus to core ApprovalStatus.
fn db_approval_status_to_core(status: &ApprovalStatus) -> trellis_core::workflow::ApprovalStatus {
    match status {
        ApprovalStatus::Pending => trellis_core::workflow::ApprovalStatus::Pending,
        ApprovalStatus::Approved => trellis_core::workflow::ApprovalStatus::Approved,
    }
}

/// Converts database ExpenseStatus to core ExpenseStatus.
fn db_expense_status_to_core(status: &ExpenseStatus) -> trellis_core::workflow::ExpenseStatus {
    match status {
        ExpenseStatus::Pending => trellis_core::workflow::ExpenseStatus::Pending,
        ExpenseStatus::Approved => trellis_core::workflow::ExpenseStatus::Approved,
    }
}
