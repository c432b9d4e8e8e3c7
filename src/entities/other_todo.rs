//! Other TODO entity - Free-form daily TODOs outside the tier goals.
//!
//! They are recorded alongside goal TODOs but never affect the achievement level.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Other TODO database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "other_todos")]
pub struct Model {
    /// Unique identifier for the TODO
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID of the owner
    pub user_id: String,
    /// Free-text description
    pub content: String,
    /// Archived TODOs no longer show up in the daily checklist
    pub is_archived: bool,
    /// When the TODO was created
    pub created_at: DateTime,
}

/// `OtherTodo` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
