//! `SeaORM` entity definitions.

pub mod approval_steps;
pub mod approvals;
pub mod expenses;
pub mod hierarchy_levels;
pub mod organizations;
pub mod policies;
pub mod sea_orm_active_enums;
pub mod teams;
pub mod users;
