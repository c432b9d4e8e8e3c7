//! Suggestion engine - proposes at most one goal-level transition from recent history.
//!
//! Rules, first match wins:
//! 1. the last 14 records are all gold: level up targeting gold, every tier editable
//! 2. all silver: level up targeting silver, bronze and silver editable
//! 3. all bronze: level up targeting bronze, bronze editable
//! 4. at least 4 of the last 7 days missing or `none`: level down, every tier editable
//!
//! Evaluation itself is pure. The async helpers fetch the windows and record which
//! suggestions were shown so the bot does not repeat itself within a day.

use super::{daily, history::AchievementHistory, ledger};
use crate::{
    entities::{AchievementLevel, GoalLevel, SuggestionKind, SuggestionLog, suggestion_log},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, PaginatorTrait, Set, prelude::*};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Number of consecutive same-level records that trigger a level-up.
pub const LEVEL_UP_WINDOW: usize = 14;
/// Calendar days inspected for the level-down rule.
pub const LEVEL_DOWN_WINDOW: usize = 7;
/// Failed days within [`LEVEL_DOWN_WINDOW`] that trigger a level-down.
pub const LEVEL_DOWN_MISSES: usize = 4;

/// A proposed goal-level transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Level up or level down
    pub kind: SuggestionKind,
    /// The tier that was sustained, for level-up suggestions
    pub target_level: Option<GoalLevel>,
    /// Tiers the user may edit when accepting
    pub editable: BTreeSet<GoalLevel>,
}

impl Suggestion {
    fn new(kind: SuggestionKind, target_level: Option<GoalLevel>) -> Self {
        Self {
            kind,
            target_level,
            editable: editable_tiers(kind, target_level),
        }
    }

    /// Whether accepting unlocks every tier.
    #[must_use]
    pub fn can_edit_all_goals(&self) -> bool {
        self.editable.len() == GoalLevel::ALL.len()
    }
}

/// Tiers that become editable for a transition.
///
/// A level-up unlocks the target tier and everything below it; a level-down
/// unlocks all tiers.
#[must_use]
pub fn editable_tiers(kind: SuggestionKind, target_level: Option<GoalLevel>) -> BTreeSet<GoalLevel> {
    match (kind, target_level) {
        (SuggestionKind::LevelUp, Some(target)) => GoalLevel::ALL
            .into_iter()
            .filter(|level| *level <= target)
            .collect(),
        (SuggestionKind::LevelUp, None) => BTreeSet::new(),
        (SuggestionKind::LevelDown, _) => GoalLevel::ALL.into_iter().collect(),
    }
}

/// Evaluates the suggestion rules.
///
/// `last14` holds the most recent record levels and `last7` the most recent
/// calendar days (`None` for a day without a record), both oldest first. Only
/// the tail of each slice is inspected; a slice shorter than its window never
/// fires its rule.
#[must_use]
pub fn evaluate_suggestion(
    last14: &[AchievementLevel],
    last7: &[Option<AchievementLevel>],
) -> Option<Suggestion> {
    if last14.len() >= LEVEL_UP_WINDOW {
        let window = &last14[last14.len() - LEVEL_UP_WINDOW..];
        for target in GoalLevel::ALL.into_iter().rev() {
            let sustained = AchievementLevel::from(target);
            if window.iter().all(|level| *level == sustained) {
                return Some(Suggestion::new(SuggestionKind::LevelUp, Some(target)));
            }
        }
    }

    if last7.len() >= LEVEL_DOWN_WINDOW {
        let window = &last7[last7.len() - LEVEL_DOWN_WINDOW..];
        let misses = window
            .iter()
            .filter(|day| !day.is_some_and(|level| level.is_achieved()))
            .count();
        if misses >= LEVEL_DOWN_MISSES {
            return Some(Suggestion::new(SuggestionKind::LevelDown, None));
        }
    }

    None
}

/// Fetches a user's recent history and evaluates the rules as of `today`.
///
/// Only days since the most recent goal change are considered, so a freshly
/// opened slot has to earn its own 14-day window. The windows start at the
/// latest slot start across all tiers: changing any one tier restarts them for
/// every tier. From that day on, a day without a record counts as a miss.
///
/// # Arguments
/// * `db` - Database connection or transaction
/// * `user_id` - Discord user ID
/// * `today` - The journal's current day
#[instrument(skip(db))]
pub async fn suggestion_for_user<C>(
    db: &C,
    user_id: &str,
    today: NaiveDate,
) -> Result<Option<Suggestion>>
where
    C: ConnectionTrait,
{
    let slots = ledger::current_slots(db, user_id).await?;
    let Some(since) = slots
        .iter()
        .filter_map(|(_, slot)| slot.as_ref().map(|s| s.started_at))
        .max()
    else {
        debug!("No goal history yet, nothing to suggest");
        return Ok(None);
    };

    let records = daily::list_daily_records(db, user_id, since, today).await?;
    let history = AchievementHistory::from_records(&records);
    let windows = history.suggestion_windows(today, since);
    Ok(evaluate_suggestion(&windows.last14, &windows.last7))
}

/// Records that a suggestion was shown to the user on `shown_on`.
pub async fn record_suggestion_shown<C>(
    db: &C,
    user_id: &str,
    suggestion: &Suggestion,
    shown_on: NaiveDate,
) -> Result<suggestion_log::Model>
where
    C: ConnectionTrait,
{
    let log = suggestion_log::ActiveModel {
        user_id: Set(user_id.to_string()),
        kind: Set(suggestion.kind),
        target_level: Set(suggestion.target_level),
        shown_on: Set(shown_on),
        ..Default::default()
    };
    log.insert(db).await.map_err(Into::into)
}

/// Whether an equivalent suggestion was already shown to the user on `date`.
pub async fn suggestion_shown_on<C>(
    db: &C,
    user_id: &str,
    suggestion: &Suggestion,
    date: NaiveDate,
) -> Result<bool>
where
    C: ConnectionTrait,
{
    let target = match suggestion.target_level {
        Some(level) => suggestion_log::Column::TargetLevel.eq(level),
        None => suggestion_log::Column::TargetLevel.is_null(),
    };
    let count = SuggestionLog::find()
        .filter(suggestion_log::Column::UserId.eq(user_id))
        .filter(suggestion_log::Column::Kind.eq(suggestion.kind))
        .filter(target)
        .filter(suggestion_log::Column::ShownOn.eq(date))
        .count(db)
        .await?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{daily::DailyEntry, goals, ledger, tiers::Tiers},
        entities::ChangeReason,
        test_utils::*,
    };

    async fn all_goal_ids(db: &DatabaseConnection) -> Result<Vec<i64>> {
        let todos = goals::get_goal_todos_by_level(db, TEST_USER).await?;
        Ok(todos
            .iter()
            .flat_map(|(_, list)| list.iter().map(|t| t.id))
            .collect())
    }

    async fn save_day(db: &DatabaseConnection, n: u64, ids: Vec<i64>) -> Result<()> {
        let entry = DailyEntry {
            achieved_goal_todo_ids: ids,
            ..Default::default()
        };
        daily::save_daily_record(db, TEST_USER, day(n), entry, day(n)).await?;
        Ok(())
    }

    fn levels(level: AchievementLevel, n: usize) -> Vec<AchievementLevel> {
        vec![level; n]
    }

    fn set(levels: &[GoalLevel]) -> BTreeSet<GoalLevel> {
        levels.iter().copied().collect()
    }

    fn days(pattern: &[Option<AchievementLevel>]) -> Vec<Option<AchievementLevel>> {
        pattern.to_vec()
    }

    #[test]
    fn test_editable_tiers_table() {
        assert_eq!(
            editable_tiers(SuggestionKind::LevelUp, Some(GoalLevel::Gold)),
            set(&GoalLevel::ALL)
        );
        assert_eq!(
            editable_tiers(SuggestionKind::LevelUp, Some(GoalLevel::Silver)),
            set(&[GoalLevel::Bronze, GoalLevel::Silver])
        );
        assert_eq!(
            editable_tiers(SuggestionKind::LevelUp, Some(GoalLevel::Bronze)),
            set(&[GoalLevel::Bronze])
        );
        assert_eq!(
            editable_tiers(SuggestionKind::LevelDown, None),
            set(&GoalLevel::ALL)
        );
    }

    #[test]
    fn test_fourteen_gold_levels_up_with_all_tiers() {
        let suggestion = evaluate_suggestion(&levels(AchievementLevel::Gold, 14), &[]).unwrap();
        assert_eq!(suggestion.kind, SuggestionKind::LevelUp);
        assert_eq!(suggestion.target_level, Some(GoalLevel::Gold));
        assert!(suggestion.can_edit_all_goals());
    }

    #[test]
    fn test_thirteen_days_is_one_short() {
        assert_eq!(
            evaluate_suggestion(&levels(AchievementLevel::Gold, 13), &[]),
            None
        );
    }

    #[test]
    fn test_silver_and_bronze_level_up() {
        let silver = evaluate_suggestion(&levels(AchievementLevel::Silver, 14), &[]);
        assert_eq!(
            silver,
            Some(Suggestion::new(SuggestionKind::LevelUp, Some(GoalLevel::Silver)))
        );
        assert!(!silver.is_some_and(|s| s.can_edit_all_goals()));

        let bronze = evaluate_suggestion(&levels(AchievementLevel::Bronze, 14), &[]);
        assert_eq!(
            bronze.map(|s| s.editable),
            Some(set(&[GoalLevel::Bronze]))
        );
    }

    #[test]
    fn test_mixed_levels_do_not_level_up() {
        let mut window = levels(AchievementLevel::Gold, 13);
        window.push(AchievementLevel::Silver);
        assert_eq!(evaluate_suggestion(&window, &[]), None);
    }

    #[test]
    fn test_only_tail_of_long_window_counts() {
        let mut window = levels(AchievementLevel::None, 5);
        window.extend(levels(AchievementLevel::Silver, 14));
        assert_eq!(
            evaluate_suggestion(&window, &[]).and_then(|s| s.target_level),
            Some(GoalLevel::Silver)
        );
    }

    #[test]
    fn test_level_down_threshold() {
        let b = Some(AchievementLevel::Bronze);
        let n = Some(AchievementLevel::None);

        let three_misses = days(&[b, n, b, n, b, n, b]);
        assert_eq!(evaluate_suggestion(&[], &three_misses), None);

        let four_misses = days(&[b, n, b, n, b, n, n]);
        let suggestion = evaluate_suggestion(&[], &four_misses);
        assert_eq!(suggestion.as_ref().map(|s| s.kind), Some(SuggestionKind::LevelDown));
        assert!(suggestion.is_some_and(|s| s.can_edit_all_goals()));
    }

    #[test]
    fn test_missing_days_count_as_misses() {
        let b = Some(AchievementLevel::Bronze);
        let window = days(&[b, None, None, b, None, b, None]);
        assert_eq!(
            evaluate_suggestion(&[], &window).map(|s| s.kind),
            Some(SuggestionKind::LevelDown)
        );
    }

    #[test]
    fn test_short_windows_never_fire() {
        let window = days(&[None, None, None, None, None, None]);
        assert_eq!(evaluate_suggestion(&[], &window), None);
    }

    #[test]
    fn test_at_most_one_rule_fires() {
        let g = Some(AchievementLevel::Gold);
        let last7 = days(&[g; 7]);
        let suggestion = evaluate_suggestion(&levels(AchievementLevel::Gold, 14), &last7);
        assert_eq!(
            suggestion,
            Some(Suggestion::new(SuggestionKind::LevelUp, Some(GoalLevel::Gold)))
        );
    }

    #[tokio::test]
    async fn test_fourteen_perfect_days_end_to_end() -> Result<()> {
        let db = setup_test_db().await?;
        setup_single_todo_goals(&db, TEST_USER, day(0)).await?;
        let all_ids = all_goal_ids(&db).await?;

        for n in 0..14 {
            save_day(&db, n, all_ids.clone()).await?;
            if n < 13 {
                assert_eq!(suggestion_for_user(&db, TEST_USER, day(n)).await?, None);
            }
        }

        let suggestion = suggestion_for_user(&db, TEST_USER, day(13)).await?;
        assert_eq!(
            suggestion.as_ref().map(|s| (s.kind, s.target_level)),
            Some((SuggestionKind::LevelUp, Some(GoalLevel::Gold)))
        );
        assert!(suggestion.is_some_and(|s| s.can_edit_all_goals()));

        Ok(())
    }

    #[tokio::test]
    async fn test_no_history_no_suggestion() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(suggestion_for_user(&db, TEST_USER, day(3)).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_suggestion_log_deduplication() -> Result<()> {
        let db = setup_test_db().await?;
        let up = Suggestion::new(SuggestionKind::LevelUp, Some(GoalLevel::Silver));
        let down = Suggestion::new(SuggestionKind::LevelDown, None);

        assert!(!suggestion_shown_on(&db, TEST_USER, &up, day(1)).await?);
        record_suggestion_shown(&db, TEST_USER, &up, day(1)).await?;
        assert!(suggestion_shown_on(&db, TEST_USER, &up, day(1)).await?);
        assert!(!suggestion_shown_on(&db, TEST_USER, &up, day(2)).await?);
        assert!(!suggestion_shown_on(&db, TEST_USER, &down, day(1)).await?);
        assert!(!suggestion_shown_on(&db, "someone_else", &up, day(1)).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_unrecorded_days_since_goal_start_count_as_misses() -> Result<()> {
        let db = setup_test_db().await?;
        setup_single_todo_goals(&db, TEST_USER, day(0)).await?;

        // Days 0..=3 never recorded, days 4..=6 recorded with nothing done
        for n in 4..7 {
            save_day(&db, n, Vec::new()).await?;
        }

        for today in [day(6), day(7)] {
            let suggestion = suggestion_for_user(&db, TEST_USER, today).await?;
            assert_eq!(suggestion.map(|s| s.kind), Some(SuggestionKind::LevelDown));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_no_records_at_all_levels_down_after_a_week() -> Result<()> {
        let db = setup_test_db().await?;
        setup_single_todo_goals(&db, TEST_USER, day(0)).await?;

        // Day 6 is still open, so only six days have passed
        assert_eq!(suggestion_for_user(&db, TEST_USER, day(6)).await?, None);
        let suggestion = suggestion_for_user(&db, TEST_USER, day(7)).await?;
        assert_eq!(suggestion.map(|s| s.kind), Some(SuggestionKind::LevelDown));
        Ok(())
    }

    #[tokio::test]
    async fn test_changing_one_tier_restarts_every_window() -> Result<()> {
        let db = setup_test_db().await?;
        setup_single_todo_goals(&db, TEST_USER, day(0)).await?;
        let ids = all_goal_ids(&db).await?;
        for n in 0..13 {
            save_day(&db, n, ids.clone()).await?;
        }

        let contents = Tiers {
            bronze: vec!["harder bronze".to_string()],
            silver: Vec::new(),
            gold: Vec::new(),
        };
        ledger::apply_transition(
            &db,
            TEST_USER,
            &contents,
            &[GoalLevel::Bronze].into_iter().collect(),
            ChangeReason::LevelUp,
            day(13),
        )
        .await?;

        // A 14th gold day in a row, but silver and gold restarted with bronze
        save_day(&db, 13, all_goal_ids(&db).await?).await?;
        assert_eq!(suggestion_for_user(&db, TEST_USER, day(13)).await?, None);
        Ok(())
    }
}
