//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod status;
pub mod workflow;

pub use status::{ApprovalView, ExpenseStatusView, StatusRepository};
pub use workflow::{ApprovalOutcome, CreateExpenseInput, CreatedExpense, WorkflowRepository};
