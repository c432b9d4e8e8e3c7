//! Recovery mode controller.
//!
//! Recovery mode lets a user swap today's tier goals for a smaller substitute
//! action after a bad stretch. The state machine is:
//!
//! ```text
//! inactive --activate (goal set, today unrecorded)--> active
//! active   --save today's record-------------------> inactive
//! active   --deactivate----------------------------> inactive
//! ```
//!
//! Recovery is decorative: it never changes achievement levels or streaks.

use crate::{
    entities::{DailyRecord, RecoveryMode, daily_record, recovery_mode},
    errors::{Error, Guard, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ConnectionTrait, PaginatorTrait, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{info, instrument};

/// Longest accepted recovery goal, in characters.
pub const MAX_RECOVERY_GOAL_LENGTH: usize = 200;

/// A user's recovery state as seen by callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecoveryStatus {
    /// Whether recovery mode covers today's attempt
    pub is_active: bool,
    /// The substitute action, once set
    pub goal: Option<String>,
    /// Day of the most recent activation
    pub activated_on: Option<NaiveDate>,
}

impl From<recovery_mode::Model> for RecoveryStatus {
    fn from(model: recovery_mode::Model) -> Self {
        Self {
            is_active: model.is_active,
            goal: model.goal,
            activated_on: model.activated_on,
        }
    }
}

async fn find_row<C>(db: &C, user_id: &str) -> Result<Option<recovery_mode::Model>>
where
    C: ConnectionTrait,
{
    RecoveryMode::find()
        .filter(recovery_mode::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Current recovery state; inactive with no goal if the user never touched it.
pub async fn get_recovery_status<C>(db: &C, user_id: &str) -> Result<RecoveryStatus>
where
    C: ConnectionTrait,
{
    Ok(find_row(db, user_id)
        .await?
        .map(RecoveryStatus::from)
        .unwrap_or_default())
}

/// Sets the substitute action used while recovery mode is active.
///
/// # Errors
/// - validation error for an empty or overlong goal
/// - [`Guard::RecoveryActive`] while recovery mode is on
#[instrument(skip(db, goal))]
pub async fn set_recovery_goal<C>(db: &C, user_id: &str, goal: &str) -> Result<RecoveryStatus>
where
    C: ConnectionTrait + TransactionTrait,
{
    let goal = goal.trim();
    if goal.is_empty() {
        return Err(Error::validation("recovery_goal", "must not be empty"));
    }
    if goal.chars().count() > MAX_RECOVERY_GOAL_LENGTH {
        return Err(Error::validation(
            "recovery_goal",
            format!("must be at most {MAX_RECOVERY_GOAL_LENGTH} characters"),
        ));
    }

    let txn = db.begin().await?;
    let now = Utc::now().naive_utc();
    let saved = match find_row(&txn, user_id).await? {
        Some(row) if row.is_active => return Err(Guard::RecoveryActive.into()),
        Some(row) => {
            let mut row: recovery_mode::ActiveModel = row.into();
            row.goal = Set(Some(goal.to_string()));
            row.updated_at = Set(now);
            row.update(&txn).await?
        }
        None => {
            recovery_mode::ActiveModel {
                user_id: Set(user_id.to_string()),
                is_active: Set(false),
                goal: Set(Some(goal.to_string())),
                activated_on: Set(None),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?
        }
    };
    txn.commit().await?;

    info!("Recovery goal set for user {}", user_id);
    Ok(saved.into())
}

/// Turns recovery mode on for today's attempt.
///
/// All guards are checked inside the same transaction as the flip, so a record
/// saved concurrently for today is seen before activation commits.
///
/// # Arguments
/// * `db` - Database connection
/// * `user_id` - Discord user ID
/// * `today` - The day being rescued; it must not have a record yet
///
/// # Errors
/// [`Guard::RecoveryActive`], [`Guard::RecoveryGoalNotSet`] or [`Guard::TodayLocked`].
#[instrument(skip(db))]
pub async fn activate_recovery_mode<C>(
    db: &C,
    user_id: &str,
    today: NaiveDate,
) -> Result<RecoveryStatus>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let row = find_row(&txn, user_id).await?;
    let Some(row) = row else {
        return Err(Guard::RecoveryGoalNotSet.into());
    };
    if row.is_active {
        return Err(Guard::RecoveryActive.into());
    }
    if row.goal.as_deref().is_none_or(str::is_empty) {
        return Err(Guard::RecoveryGoalNotSet.into());
    }

    let recorded_today = DailyRecord::find()
        .filter(daily_record::Column::UserId.eq(user_id))
        .filter(daily_record::Column::RecordDate.eq(today))
        .count(&txn)
        .await?;
    if recorded_today > 0 {
        return Err(Guard::TodayLocked.into());
    }

    let mut row: recovery_mode::ActiveModel = row.into();
    row.is_active = Set(true);
    row.activated_on = Set(Some(today));
    row.updated_at = Set(Utc::now().naive_utc());
    let saved = row.update(&txn).await?;
    txn.commit().await?;

    info!("Recovery mode activated for user {} on {}", user_id, today);
    Ok(saved.into())
}

/// Abandons recovery mode without recording anything.
///
/// # Errors
/// [`Guard::RecoveryInactive`] if recovery mode is not on.
#[instrument(skip(db))]
pub async fn deactivate_recovery_mode<C>(db: &C, user_id: &str) -> Result<RecoveryStatus>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let Some(row) = deactivate_in(&txn, user_id).await? else {
        return Err(Guard::RecoveryInactive.into());
    };
    txn.commit().await?;

    info!("Recovery mode abandoned by user {}", user_id);
    Ok(row.into())
}

/// Flips an active recovery row back to inactive.
///
/// Returns `None` when recovery mode was not active. Used by the daily save,
/// which must run this inside its own transaction.
pub(crate) async fn deactivate_in<C>(
    db: &C,
    user_id: &str,
) -> Result<Option<recovery_mode::Model>>
where
    C: ConnectionTrait,
{
    let Some(row) = find_row(db, user_id).await?.filter(|row| row.is_active) else {
        return Ok(None);
    };
    let mut row: recovery_mode::ActiveModel = row.into();
    row.is_active = Set(false);
    row.updated_at = Set(Utc::now().naive_utc());
    Ok(Some(row.update(db).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::daily, test_utils::*};

    #[tokio::test]
    async fn test_default_status_is_inactive() -> Result<()> {
        let db = setup_test_db().await?;
        let status = get_recovery_status(&db, TEST_USER).await?;
        assert_eq!(status, RecoveryStatus::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_activation_requires_goal() -> Result<()> {
        let db = setup_test_db().await?;
        let result = activate_recovery_mode(&db, TEST_USER, day(0)).await;
        assert!(matches!(
            result,
            Err(Error::Precondition(Guard::RecoveryGoalNotSet))
        ));

        let empty = set_recovery_goal(&db, TEST_USER, "   ").await;
        assert!(matches!(
            empty,
            Err(Error::Validation { field: "recovery_goal", .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_activate_and_deactivate_cycle() -> Result<()> {
        let db = setup_test_db().await?;
        set_recovery_goal(&db, TEST_USER, "Walk for 10 minutes").await?;

        let status = activate_recovery_mode(&db, TEST_USER, day(3)).await?;
        assert!(status.is_active);
        assert_eq!(status.activated_on, Some(day(3)));

        let again = activate_recovery_mode(&db, TEST_USER, day(3)).await;
        assert!(matches!(again, Err(Error::Precondition(Guard::RecoveryActive))));

        let goal_change = set_recovery_goal(&db, TEST_USER, "Stretch").await;
        assert!(matches!(
            goal_change,
            Err(Error::Precondition(Guard::RecoveryActive))
        ));

        let status = deactivate_recovery_mode(&db, TEST_USER).await?;
        assert!(!status.is_active);
        assert_eq!(status.goal.as_deref(), Some("Walk for 10 minutes"));

        let twice = deactivate_recovery_mode(&db, TEST_USER).await;
        assert!(matches!(
            twice,
            Err(Error::Precondition(Guard::RecoveryInactive))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_recorded_day_is_locked() -> Result<()> {
        let db = setup_test_db().await?;
        setup_single_todo_goals(&db, TEST_USER, day(0)).await?;
        set_recovery_goal(&db, TEST_USER, "Read one page").await?;

        daily::save_daily_record(&db, TEST_USER, day(1), daily::DailyEntry::default(), day(1))
            .await?;
        let result = activate_recovery_mode(&db, TEST_USER, day(1)).await;
        assert!(matches!(result, Err(Error::Precondition(Guard::TodayLocked))));

        // The next day is open again
        assert!(activate_recovery_mode(&db, TEST_USER, day(2)).await?.is_active);
        Ok(())
    }

    #[tokio::test]
    async fn test_deactivate_in_is_noop_when_inactive() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(deactivate_in(&db, TEST_USER).await?, None);
        set_recovery_goal(&db, TEST_USER, "Stretch").await?;
        assert_eq!(deactivate_in(&db, TEST_USER).await?, None);
        Ok(())
    }
}
