//! Core business logic for Trellis.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and workflow decisions live here.
//!
//! # Modules
//!
//! - `workflow` - Expense approval workflow: hierarchy resolution, policy
//!   matching, and step-by-step approval decisions

pub mod workflow;
