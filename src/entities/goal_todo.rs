//! Goal TODO entity - The checklist items that make up a tier's goal.
//!
//! Each row belongs to exactly one (user, tier) pair. Rows are never deleted:
//! when a tier's goal changes, the old items are archived and new ones inserted.

use super::levels::GoalLevel;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Goal TODO database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "goal_todos")]
pub struct Model {
    /// Unique identifier for the TODO
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID of the owner
    pub user_id: String,
    /// Tier this TODO belongs to
    pub goal_type: GoalLevel,
    /// Free-text description (e.g., "Push one commit")
    pub content: String,
    /// Set once the TODO has been superseded by a goal change
    pub is_archived: bool,
    /// When the TODO was created
    pub created_at: DateTime,
    /// When the TODO was last modified
    pub updated_at: DateTime,
}

/// `GoalTodo` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
