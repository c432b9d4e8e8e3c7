//! Goal level history entity - One "slot" per contiguous period in which a
//! tier's goal content and level number were fixed.
//!
//! For a given (`user_id`, `goal_type`) exactly one row has `ended_at = NULL`
//! once the tier has any history. A partial unique index enforces this at the
//! storage level.

use super::levels::{ChangeReason, GoalLevel};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Goal level history database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "goal_level_history")]
pub struct Model {
    /// Unique identifier for the slot
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID of the owner
    pub user_id: String,
    /// Tier this slot belongs to
    pub goal_type: GoalLevel,
    /// Level number within the tier (starts at 1)
    pub level: i32,
    /// Goal text in effect during the slot
    pub goal_content: String,
    /// First day of the slot (inclusive)
    pub started_at: Date,
    /// Last day of the slot (inclusive); `None` while the slot is current
    pub ended_at: Option<Date>,
    /// Why the slot was opened
    pub change_reason: ChangeReason,
    /// When the row was inserted
    pub created_at: DateTime,
}

impl Model {
    /// Whether the slot is still open.
    #[must_use]
    pub const fn is_current(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Whether the slot covers the given day.
    #[must_use]
    pub fn covers(&self, date: Date) -> bool {
        self.started_at <= date && self.ended_at.is_none_or(|end| date <= end)
    }
}

/// `GoalLevelHistory` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
