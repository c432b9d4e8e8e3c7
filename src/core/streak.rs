//! Streak evaluation over an [`AchievementHistory`].
//!
//! Two kinds of streak exist:
//! - per tier: counted from the start of the tier's current slot, cycling 1..=14
//!   so that day 15 starts a fresh period after a level-up threshold
//! - overall: consecutive achieved days ending today (or yesterday if today is
//!   not achieved yet), shown in the summary

use super::{history::AchievementHistory, tiers::Tiers};
use crate::entities::{GoalLevel, goal_level_history};
use chrono::NaiveDate;

/// Consecutive same-tier days that make a level-up eligible.
pub const LEVEL_UP_THRESHOLD: u32 = 14;

/// Current streak for a tier, walking from the slot start to today.
///
/// Missing or insufficient days reset the count. Today's missing record is
/// skipped so an unfinished day does not break yesterday's streak.
#[must_use]
pub fn current_streak(
    level: GoalLevel,
    history: &AchievementHistory,
    slot_start: NaiveDate,
    today: NaiveDate,
) -> u32 {
    let mut count = 0;
    for date in slot_start.iter_days().take_while(|date| *date <= today) {
        match history.level_on(date) {
            Some(achieved) if achieved.satisfies(level) => {
                count = if count >= LEVEL_UP_THRESHOLD {
                    1
                } else {
                    count + 1
                };
            }
            None if date == today => {}
            _ => count = 0,
        }
    }
    count
}

/// Overall display streak: consecutive achieved days ending today or yesterday.
#[must_use]
pub fn overall_streak_days(history: &AchievementHistory, today: NaiveDate) -> u32 {
    let achieved = |date: NaiveDate| {
        history
            .level_on(date)
            .is_some_and(|level| level.is_achieved())
    };

    let mut cursor = if achieved(today) {
        Some(today)
    } else {
        today.pred_opt()
    };

    let mut count = 0;
    while let Some(date) = cursor {
        if !achieved(date) {
            break;
        }
        count += 1;
        cursor = date.pred_opt();
    }
    count
}

/// Per-tier streaks for the tiers that have a current slot; tiers without one report 0.
#[must_use]
pub fn tier_streaks(
    history: &AchievementHistory,
    slots: &Tiers<Option<goal_level_history::Model>>,
    today: NaiveDate,
) -> Tiers<u32> {
    Tiers::from_fn(|level| {
        slots.get(level).as_ref().map_or(0, |slot| {
            current_streak(level, history, slot.started_at, today)
        })
    })
}
