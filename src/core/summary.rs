//! Progress summary business logic.
//!
//! Gathers everything the bot shows on the home screen into one structure:
//! current slots, streaks, today's level, a pending suggestion and the recovery
//! state. Also provides the text helpers used to render it.

use super::{
    daily, goals,
    history::AchievementHistory,
    ledger,
    recovery::{self, RecoveryStatus},
    streak::{self, LEVEL_UP_THRESHOLD},
    suggestion::{self, Suggestion},
    tiers::Tiers,
};
use crate::{
    entities::{AchievementLevel, goal_level_history, goal_todo},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::ConnectionTrait;

/// Days shown in the history strip.
pub const HISTORY_STRIP_DAYS: usize = 7;

/// A user's progress as of one day.
#[derive(Debug, Clone)]
pub struct ProgressSummary {
    /// The day the summary was computed for
    pub today: NaiveDate,
    /// Open ledger slot per tier
    pub slots: Tiers<Option<goal_level_history::Model>>,
    /// Active TODOs per tier
    pub todos: Tiers<Vec<goal_todo::Model>>,
    /// Current streak per tier
    pub tier_streaks: Tiers<u32>,
    /// Consecutive achieved days ending today or yesterday
    pub overall_streak: u32,
    /// Today's level, if today is recorded
    pub today_level: Option<AchievementLevel>,
    /// The most recent days, oldest first
    pub recent_days: Vec<(NaiveDate, Option<AchievementLevel>)>,
    /// Pending transition, if any rule fires
    pub suggestion: Option<Suggestion>,
    /// Recovery mode state
    pub recovery: RecoveryStatus,
}

impl ProgressSummary {
    /// Whether the user has set up goals yet.
    #[must_use]
    pub fn has_goals(&self) -> bool {
        self.slots.iter().any(|(_, slot)| slot.is_some())
    }
}

/// Builds the progress summary for `today`.
///
/// # Arguments
/// * `db` - Database connection
/// * `user_id` - Discord user ID
/// * `today` - The journal's current day
pub async fn generate_progress_summary<C>(
    db: &C,
    user_id: &str,
    today: NaiveDate,
) -> Result<ProgressSummary>
where
    C: ConnectionTrait,
{
    let slots = ledger::current_slots(db, user_id).await?;
    let todos = goals::get_goal_todos_by_level(db, user_id).await?;
    let records = daily::list_daily_records_through(db, user_id, today).await?;
    let history = AchievementHistory::from_records(&records);

    let tier_streaks = streak::tier_streaks(&history, &slots, today);
    let overall_streak = streak::overall_streak_days(&history, today);
    let suggestion = suggestion::suggestion_for_user(db, user_id, today).await?;
    let recovery = recovery::get_recovery_status(db, user_id).await?;

    Ok(ProgressSummary {
        today,
        today_level: history.level_on(today),
        recent_days: recent_days(&history, today, HISTORY_STRIP_DAYS),
        slots,
        todos,
        tier_streaks,
        overall_streak,
        suggestion,
        recovery,
    })
}

/// The last `count` calendar days ending today, oldest first.
#[must_use]
pub fn recent_days(
    history: &AchievementHistory,
    today: NaiveDate,
    count: usize,
) -> Vec<(NaiveDate, Option<AchievementLevel>)> {
    let mut days: Vec<_> = std::iter::successors(Some(today), |date| date.pred_opt())
        .take(count)
        .map(|date| (date, history.level_on(date)))
        .collect();
    days.reverse();
    days
}

/// Progress of a tier streak toward the level-up threshold, in percent.
#[must_use]
pub fn streak_progress_percent(streak: u32) -> f64 {
    (f64::from(streak.min(LEVEL_UP_THRESHOLD)) / f64::from(LEVEL_UP_THRESHOLD)) * 100.0
}

/// Generates a progress bar string like `[████████░░] 80.0%`.
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = progress_percent.clamp(0.0, 100.0);
    // clamped_progress is in [0, 100] and length is small
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!(
        "[{}{}] {progress_percent:.1}%",
        "█".repeat(filled),
        "░".repeat(empty)
    )
}

/// One emoji per day; unrecorded days show as a blank square.
#[must_use]
pub fn format_history_strip(days: &[(NaiveDate, Option<AchievementLevel>)]) -> String {
    days.iter()
        .map(|(_, level)| level.map_or("⬜", AchievementLevel::emoji))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp, clippy::unwrap_used)]
    use super::*;
    use crate::{core::daily::DailyEntry, test_utils::*};

    #[test]
    fn test_streak_progress_percent() {
        assert_eq!(streak_progress_percent(0), 0.0);
        assert_eq!(streak_progress_percent(7), 50.0);
        assert_eq!(streak_progress_percent(14), 100.0);
        assert_eq!(streak_progress_percent(30), 100.0);
    }

    #[test]
    fn test_format_progress_bar() {
        assert_eq!(format_progress_bar(100.0, Some(10)), "[██████████] 100.0%");
        assert_eq!(format_progress_bar(50.0, Some(10)), "[█████░░░░░] 50.0%");
        assert_eq!(format_progress_bar(0.0, None), "[░░░░░░░░░░] 0.0%");
    }

    #[test]
    fn test_history_strip() {
        let history: AchievementHistory = [
            (day(0), AchievementLevel::Gold),
            (day(2), AchievementLevel::None),
        ]
        .into_iter()
        .collect();
        let days = recent_days(&history, day(2), 3);
        assert_eq!(days.first().map(|(d, _)| *d), Some(day(0)));
        assert_eq!(format_history_strip(&days), "🥇⬜❌");
    }

    #[tokio::test]
    async fn test_summary_without_goals() -> Result<()> {
        let db = setup_test_db().await?;
        let summary = generate_progress_summary(&db, TEST_USER, day(0)).await?;
        assert!(!summary.has_goals());
        assert_eq!(summary.overall_streak, 0);
        assert_eq!(summary.suggestion, None);
        assert_eq!(summary.recent_days.len(), HISTORY_STRIP_DAYS);
        Ok(())
    }

    #[tokio::test]
    async fn test_summary_tracks_streaks() -> Result<()> {
        let db = setup_test_db().await?;
        setup_single_todo_goals(&db, TEST_USER, day(0)).await?;
        let todos = goals::get_goal_todos_by_level(&db, TEST_USER).await?;
        let bronze_and_silver = vec![todos.bronze[0].id, todos.silver[0].id];

        for n in 0..3 {
            let entry = DailyEntry {
                achieved_goal_todo_ids: bronze_and_silver.clone(),
                ..Default::default()
            };
            daily::save_daily_record(&db, TEST_USER, day(n), entry, day(n)).await?;
        }

        // Day 3 is not recorded yet
        let summary = generate_progress_summary(&db, TEST_USER, day(3)).await?;
        assert!(summary.has_goals());
        assert_eq!(summary.today_level, None);
        assert_eq!(summary.overall_streak, 3);
        assert_eq!(summary.tier_streaks.bronze, 3);
        assert_eq!(summary.tier_streaks.silver, 3);
        assert_eq!(summary.tier_streaks.gold, 0);
        assert_eq!(summary.slots.gold.unwrap().level, 1);
        assert!(!summary.recovery.is_active);
        Ok(())
    }
}
