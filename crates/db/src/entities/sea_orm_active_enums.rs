//! Database enum mappings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense lifecycle status (`expense_status` enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "expense_status")]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    /// Awaiting required approvals.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// All required approvals granted (terminal).
    #[sea_orm(string_value = "approved")]
    Approved,
}

/// Per-step approval status (`approval_status` enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "approval_status")]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    /// The assigned approver has not acted yet.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// The assigned approver has approved this step.
    #[sea_orm(string_value = "approved")]
    Approved,
}

/// Approver search scope for a step (`team_scope` enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "team_scope")]
#[serde(rename_all = "snake_case")]
pub enum TeamScope {
    /// Approver must belong to the submitter's team.
    #[sea_orm(string_value = "submitter_team")]
    SubmitterTeam,
    /// Approver may be anyone in the organization.
    #[sea_orm(string_value = "org_wide")]
    OrgWide,
}
