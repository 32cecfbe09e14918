//! Workflow domain types for expense lifecycle management.
//!
//! This module defines the core types used for tracking expenses and
//! their per-step approval records through the workflow.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Expense status in the approval workflow.
///
/// The only transition is:
/// - Pending → Approved (all required approvals landed)
///
/// Approved is terminal. There is deliberately no rejection or
/// cancellation path in the current workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    /// Expense is awaiting one or more required approvals.
    Pending,
    /// Every required approval has been granted (terminal).
    Approved,
}

impl ExpenseStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            _ => None,
        }
    }

    /// Returns true if the expense can still accept approvals.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a single approval record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    /// The assigned approver has not acted yet.
    Pending,
    /// The assigned approver has approved this step.
    Approved,
}

impl ApprovalStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            _ => None,
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where an approval step looks for its approver.
///
/// Legacy step definitions carried department-specific scopes; anything
/// that is not the submitter's own team resolves organization-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamScope {
    /// Approver must belong to the submitter's team.
    SubmitterTeam,
    /// Approver may be anyone in the organization.
    OrgWide,
}

impl TeamScope {
    /// Returns the string representation of the scope.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SubmitterTeam => "submitter_team",
            Self::OrgWide => "org_wide",
        }
    }

    /// Parses a scope from a string, falling back to organization-wide
    /// for unrecognized values.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "submitter_team" | "submitter" => Self::SubmitterTeam,
            _ => Self::OrgWide,
        }
    }
}

impl fmt::Display for TeamScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
