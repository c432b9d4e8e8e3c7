//! Daily todo record entity - Which TODOs were checked off on a given day.
//!
//! Rows are replaced wholesale every time their daily record is saved.
use super::levels::TodoType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Daily todo record database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_todo_records")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the daily record this row belongs to
    pub daily_record_id: i64,
    /// Whether `todo_id` points at a goal TODO or an other TODO
    pub todo_type: TodoType,
    /// ID of the referenced TODO
    pub todo_id: i64,
    /// Whether the TODO was completed that day
    pub is_achieved: bool,
}

/// Defines relationships between `DailyTodoRecord` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each todo record belongs to one daily record
    #[sea_orm(
        belongs_to = "super::daily_record::Entity",
        from = "Column::DailyRecordId",
        to = "super::daily_record::Column::Id"
    )]
    DailyRecord,
}

impl Related<super::daily_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
