//! Daily record entity - One journal entry per user per calendar day.
//!
//! Holds the derived achievement level, the optional journal text, the recovery
//! flag and a summary of what was done. The (`user_id`, `record_date`) pair is
//! unique; see `config::database::create_tables`.

use super::levels::AchievementLevel;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Daily record database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_records")]
pub struct Model {
    /// Unique identifier for the record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID of the owner
    pub user_id: String,
    /// Calendar day this record covers (in the journal's configured offset)
    pub record_date: Date,
    /// Achievement level derived from the day's goal TODOs
    pub achievement_level: AchievementLevel,
    /// Optional free-text journal entry
    pub journal: Option<String>,
    /// Summary of completed TODOs
    pub do_text: String,
    /// Whether the recovery action was achieved; null when recovery mode was off
    pub recovery_achieved: Option<bool>,
    /// When the record was first saved
    pub created_at: DateTime,
    /// When the record was last saved
    pub updated_at: DateTime,
}

/// Defines relationships between `DailyRecord` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One daily record has many todo records
    #[sea_orm(has_many = "super::daily_todo_record::Entity")]
    TodoRecords,
}

impl Related<super::daily_todo_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TodoRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
