//! Expense workflow routes.
//!
//! Create an expense against a policy, submit approvals, and read the
//! approval progress of an expense.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use trellis_core::workflow::WorkflowError;
use trellis_db::repositories::status::{ExpenseStatusView, StatusRepository};
use trellis_db::repositories::workflow::{CreateExpenseInput, WorkflowRepository};

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", post(create_expense))
        .route("/expenses/approve", post(approve_expense))
        .route("/expenses/{expense_id}/status", get(get_expense_status))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// The user submitting the expense.
    pub submitter_id: Uuid,
    /// The policy to file the expense against.
    pub policy_id: Uuid,
    /// Expense amount.
    pub amount: Decimal,
    /// Optional description.
    pub description: Option<String>,
}

/// Request body for approving an expense step.
#[derive(Debug, Deserialize)]
pub struct ApproveExpenseRequest {
    /// The expense being approved.
    pub expense_id: Uuid,
    /// The user submitting the approval.
    pub approver_id: Uuid,
    /// Optional comments from the approver.
    pub comments: Option<String>,
}

/// One planned approval step in the create response.
#[derive(Debug, Serialize)]
pub struct PlannedStepResponse {
    /// Step position in the chain.
    pub step: i32,
    /// Display name of the assigned approver.
    pub approver_name: String,
    /// Name of the approver's hierarchy level.
    pub approver_level_name: String,
}

/// Response for a created expense.
///
/// The `steps` list is the authoritative set of approvers; callers must
/// not re-derive it.
#[derive(Debug, Serialize)]
pub struct CreateExpenseResponse {
    /// The new expense id.
    pub expense_id: Uuid,
    /// Expense status (always pending at creation).
    pub status: String,
    /// Expense amount.
    pub amount: String,
    /// One entry per approval step, in step order.
    pub steps: Vec<PlannedStepResponse>,
}

/// Response for a submitted approval.
#[derive(Debug, Serialize)]
pub struct ApproveExpenseResponse {
    /// The expense the approval belongs to.
    pub expense_id: Uuid,
    /// The step that was approved.
    pub step_approved: i32,
    /// Expense status after this approval.
    pub expense_status: String,
    /// Required approvals still pending.
    pub pending_required_count: u64,
}

/// One approval entry in the status response.
#[derive(Debug, Serialize)]
pub struct ApprovalStatusResponse {
    /// Step position in the chain.
    pub step: i32,
    /// Display name of the assigned approver.
    pub approver_name: String,
    /// Level name snapshotted at assignment time.
    pub approver_level_name: String,
    /// Approval status.
    pub status: String,
    /// When the approval was granted, if it was.
    pub approved_at: Option<String>,
    /// Approver comments.
    pub comments: Option<String>,
    /// Whether this step gates completion.
    pub required: bool,
}

/// Response for an expense status query.
#[derive(Debug, Serialize)]
pub struct ExpenseStatusResponse {
    /// Expense id.
    pub id: Uuid,
    /// Expense amount.
    pub amount: String,
    /// Description.
    pub description: Option<String>,
    /// Current expense status.
    pub status: String,
    /// When the expense was submitted.
    pub submitted_at: String,
    /// When the last required approval landed, if completed.
    pub completed_at: Option<String>,
    /// Display name of the submitter.
    pub submitter_name: String,
    /// Name of the policy.
    pub policy_name: String,
    /// All approvals, ordered by step number.
    pub approvals: Vec<ApprovalStatusResponse>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/expenses` - Create an expense and its approval chain.
async fn create_expense(
    State(state): State<AppState>,
    Json(payload): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
    let repo = WorkflowRepository::new((*state.db).clone());

    let input = CreateExpenseInput {
        submitter_id: payload.submitter_id,
        policy_id: payload.policy_id,
        amount: payload.amount,
        description: payload.description,
    };

    match repo.create_expense(input).await {
        Ok(created) => {
            info!(
                expense_id = %created.expense.id,
                submitter_id = %payload.submitter_id,
                steps = created.steps.len(),
                "Expense created"
            );

            let steps = created
                .steps
                .into_iter()
                .map(|s| PlannedStepResponse {
                    step: s.step_number,
                    approver_name: s.approver_name,
                    approver_level_name: s.approver_level_name,
                })
                .collect();

            (
                StatusCode::CREATED,
                Json(CreateExpenseResponse {
                    expense_id: created.expense.id,
                    status: "pending".to_string(),
                    amount: created.expense.amount.to_string(),
                    steps,
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create expense");
            workflow_error_response(&e)
        }
    }
}

/// POST `/expenses/approve` - Submit an approval for an expense step.
async fn approve_expense(
    State(state): State<AppState>,
    Json(payload): Json<ApproveExpenseRequest>,
) -> impl IntoResponse {
    let repo = WorkflowRepository::new((*state.db).clone());

    match repo
        .submit_approval(payload.expense_id, payload.approver_id, payload.comments)
        .await
    {
        Ok(outcome) => {
            info!(
                expense_id = %outcome.expense_id,
                approver_id = %payload.approver_id,
                step = outcome.step_approved,
                expense_status = %outcome.expense_status,
                "Approval submitted"
            );

            (
                StatusCode::OK,
                Json(ApproveExpenseResponse {
                    expense_id: outcome.expense_id,
                    step_approved: outcome.step_approved,
                    expense_status: outcome.expense_status.to_string(),
                    pending_required_count: outcome.pending_required_count,
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to submit approval");
            workflow_error_response(&e)
        }
    }
}

/// GET `/expenses/{expense_id}/status` - Current approval progress.
async fn get_expense_status(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = StatusRepository::new((*state.db).clone());

    match repo.get_status(expense_id).await {
        Ok(view) => (StatusCode::OK, Json(status_to_response(view))).into_response(),
        Err(e) => {
            error!(error = %e, expense_id = %expense_id, "Failed to get expense status");
            workflow_error_response(&e)
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn status_to_response(view: ExpenseStatusView) -> ExpenseStatusResponse {
    let approvals = view
        .approvals
        .into_iter()
        .map(|a| ApprovalStatusResponse {
            step: a.step_number,
            approver_name: a.approver_name,
            approver_level_name: a.approver_level_name,
            status: a.status.to_string(),
            approved_at: a.approved_at.map(|t| t.to_rfc3339()),
            comments: a.comments,
            required: a.required,
        })
        .collect();

    ExpenseStatusResponse {
        id: view.id,
        amount: view.amount.to_string(),
        description: view.description,
        status: view.status.to_string(),
        submitted_at: view.submitted_at.to_rfc3339(),
        completed_at: view.completed_at.map(|t| t.to_rfc3339()),
        submitter_name: view.submitter_name,
        policy_name: view.policy_name,
        approvals,
    }
}

fn workflow_error_response(e: &WorkflowError) -> axum::response::Response {
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    // Database details stay out of response bodies.
    let message = if matches!(e, WorkflowError::Database(_)) {
        "An internal error occurred".to_string()
    } else {
        e.to_string()
    };

    (
        status,
        Json(json!({
            "error": e.error_code(),
            "message": message,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_workflow_error_maps_to_status() {
        let resp = workflow_error_response(&WorkflowError::ExpenseNotFound(Uuid::nil()));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = workflow_error_response(&WorkflowError::AmountOutOfRange {
            amount: dec!(1),
            min_amount: dec!(10),
            max_amount: dec!(20),
        });
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = workflow_error_response(&WorkflowError::NoPendingApproval {
            expense_id: Uuid::nil(),
            approver_id: Uuid::nil(),
        });
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = workflow_error_response(&WorkflowError::OrganizationMismatch {
            user_id: Uuid::nil(),
            organization_id: Uuid::nil(),
        });
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_database_details_not_leaked() {
        let resp = workflow_error_response(&WorkflowError::Database(
            "connection refused at 10.0.0.5".to_string(),
        ));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
