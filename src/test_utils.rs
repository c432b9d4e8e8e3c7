//! Shared test utilities for `HabitBuddy`.
//!
//! Helpers for setting up in-memory databases and users with goals already in place.

use crate::{
    core::{ledger, tiers::Tiers},
    entities::goal_level_history,
    errors::Result,
};
use chrono::{Days, NaiveDate};
use sea_orm::DatabaseConnection;

/// User id used by tests that only need one user.
pub const TEST_USER: &str = "test_user";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// The `n`th day after 2024-01-01.
#[must_use]
pub fn day(n: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|start| start.checked_add_days(Days::new(n)))
        .unwrap_or_default()
}

/// Gives `user_id` one TODO per tier ("bronze todo", "silver todo", "gold todo"),
/// with every slot starting on `start`.
pub async fn setup_single_todo_goals(
    db: &DatabaseConnection,
    user_id: &str,
    start: NaiveDate,
) -> Result<Vec<goal_level_history::Model>> {
    let contents = Tiers::from_fn(|level| vec![format!("{level} todo")]);
    ledger::initialize_goals(db, user_id, &contents, start).await
}
