//! Expense approval workflow for Trellis.
//!
//! This module implements the approval chain planning and progression
//! logic: which policy applies, who must approve each step, and when an
//! expense is fully approved.
//!
//! # Modules
//!
//! - `types` - Workflow domain types (ExpenseStatus, ApprovalStatus, TeamScope)
//! - `error` - Workflow-specific error types
//! - `resolver` - Hierarchy-based approver selection
//! - `policy` - Policy amount validation and step ordering
//! - `service` - Approval chain planning and completion decisions

pub mod error;
pub mod policy;
pub mod resolver;
pub mod service;
pub mod types;

#[cfg(test)]
mod resolver_props;
#[cfg(test)]
mod service_props;

pub use error::WorkflowError;
pub use policy::{PolicyEngine, PolicySpec, StepDef};
pub use resolver::{Candidate, HierarchyResolver};
pub use service::{ApprovalState, PlannedApproval, WorkflowService};
pub use types::{ApprovalStatus, ExpenseStatus, TeamScope};
