//! Recovery mode entity - Per-user recovery state.
//!
//! At most one row per user. A missing row means recovery mode is inactive
//! with no goal set.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recovery mode database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recovery_modes")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID of the owner
    #[sea_orm(unique)]
    pub user_id: String,
    /// Whether recovery mode currently covers today's attempt
    pub is_active: bool,
    /// The substitute action the user commits to
    pub goal: Option<String>,
    /// Day on which recovery mode was last activated
    pub activated_on: Option<Date>,
    /// When the row was last modified
    pub updated_at: DateTime,
}

/// `RecoveryMode` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
