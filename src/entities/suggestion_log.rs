//! Suggestion log entity - Records which suggestions were shown to a user.
//! Used by the bot to avoid repeating the same proposal on the same day.

use super::levels::{GoalLevel, SuggestionKind};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Suggestion log database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "suggestion_logs")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID the suggestion was shown to
    pub user_id: String,
    /// Level up or level down
    pub kind: SuggestionKind,
    /// Target tier for level-up suggestions
    pub target_level: Option<GoalLevel>,
    /// Day the suggestion was shown
    pub shown_on: Date,
}

/// `SuggestionLog` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
