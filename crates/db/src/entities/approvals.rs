//! `SeaORM` Entity for approvals table.
//!
//! One row per approval step, created atomically with its expense and
//! unique on `(expense_id, step_number, approver_id)`. The
//! `approver_level_id` column snapshots the approver's level at
//! assignment time; later hierarchy changes do not affect it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ApprovalStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "approvals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub expense_id: Uuid,
    pub step_number: i32,
    pub approver_id: Uuid,
    pub approver_level_id: Uuid,
    pub required: bool,
    pub status: ApprovalStatus,
    pub approved_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Text", nullable)]
    pub comments: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id"
    )]
    Expenses,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ApproverId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::hierarchy_levels::Entity",
        from = "Column::ApproverLevelId",
        to = "super::hierarchy_levels::Column::Id"
    )]
    HierarchyLevels,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::hierarchy_levels::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HierarchyLevels.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
