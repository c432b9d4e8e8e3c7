//! Database configuration module for `HabitBuddy`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. The two storage invariants that entity
//! derives cannot express (one daily record per user per day, one open goal slot per tier)
//! are added afterwards as unique indexes.

use crate::entities::{
    DailyRecord, DailyTodoRecord, GoalLevelHistory, GoalTodo, OtherTodo, RecoveryMode,
    SuggestionLog,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://habit_buddy.sqlite?mode=rwc";

/// At most one daily record per user per calendar day.
const UNIQUE_DAILY_RECORD_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS idx_unique_daily_record_user_date
    ON daily_records(user_id, record_date)";

/// At most one open slot per (user, tier). Sealed slots are unconstrained.
const SINGLE_CURRENT_SLOT_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS idx_single_current_goal_slot
    ON goal_level_history(user_id, goal_type)
    WHERE ended_at IS NULL";

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates all necessary database tables and indexes. Safe to call on every start.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, GoalTodo).await?;
    create_table(db, &schema, OtherTodo).await?;
    create_table(db, &schema, DailyRecord).await?;
    create_table(db, &schema, DailyTodoRecord).await?;
    create_table(db, &schema, GoalLevelHistory).await?;
    create_table(db, &schema, RecoveryMode).await?;
    create_table(db, &schema, SuggestionLog).await?;

    db.execute_unprepared(UNIQUE_DAILY_RECORD_INDEX).await?;
    db.execute_unprepared(SINGLE_CURRENT_SLOT_INDEX).await?;

    info!("Database tables and indexes ensured.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        AchievementLevel, ChangeReason, GoalLevel, daily_record, goal_level_history,
    };
    use chrono::NaiveDate;
    use sea_orm::{ActiveModelTrait, QuerySelect, Set};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap_or_default()
    }

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _ = GoalTodo::find().limit(1).all(&db).await?;
        let _ = OtherTodo::find().limit(1).all(&db).await?;
        let _ = DailyRecord::find().limit(1).all(&db).await?;
        let _ = DailyTodoRecord::find().limit(1).all(&db).await?;
        let _ = GoalLevelHistory::find().limit(1).all(&db).await?;
        let _ = RecoveryMode::find().limit(1).all(&db).await?;
        let _ = SuggestionLog::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_daily_record_unique_per_user_and_date() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let now = chrono::Utc::now().naive_utc();
        let record = || daily_record::ActiveModel {
            user_id: Set("user1".to_string()),
            record_date: Set(date(1)),
            achievement_level: Set(AchievementLevel::None),
            journal: Set(None),
            do_text: Set(String::new()),
            recovery_achieved: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        record().insert(&db).await?;
        let duplicate = record().insert(&db).await;
        assert!(matches!(
            duplicate,
            Err(ref e) if crate::errors::is_unique_violation(e)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_only_one_open_slot_per_tier() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let now = chrono::Utc::now().naive_utc();
        let slot = |ended_at: Option<NaiveDate>| goal_level_history::ActiveModel {
            user_id: Set("user1".to_string()),
            goal_type: Set(GoalLevel::Silver),
            level: Set(1),
            goal_content: Set("Read docs".to_string()),
            started_at: Set(date(1)),
            ended_at: Set(ended_at),
            change_reason: Set(ChangeReason::Initial),
            created_at: Set(now),
            ..Default::default()
        };

        // Sealed slots never collide
        slot(Some(date(2))).insert(&db).await?;
        slot(Some(date(3))).insert(&db).await?;
        slot(None).insert(&db).await?;
        assert!(slot(None).insert(&db).await.is_err());

        Ok(())
    }
}
