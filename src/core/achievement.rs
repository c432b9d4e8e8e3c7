//! Achievement calculation - derives a day's [`AchievementLevel`] from its checked TODOs.
//!
//! A tier counts as achieved only if it has at least one TODO and every one of
//! them was checked off; an empty tier never succeeds vacuously. The day's level
//! is the highest tier reached without skipping a lower one, so finishing the
//! gold list while missing a bronze item still yields [`AchievementLevel::None`].

use super::tiers::Tiers;
use crate::entities::{AchievementLevel, GoalLevel, goal_todo};
use std::collections::HashSet;

/// Whether every TODO in a non-empty tier is in the achieved set.
#[must_use]
pub fn is_tier_achieved(todos: &[goal_todo::Model], achieved_ids: &HashSet<i64>) -> bool {
    !todos.is_empty() && todos.iter().all(|todo| achieved_ids.contains(&todo.id))
}

/// Computes the achievement level for one day.
#[must_use]
pub fn compute_achievement_level(
    todos: &Tiers<Vec<goal_todo::Model>>,
    achieved_ids: &HashSet<i64>,
) -> AchievementLevel {
    let mut level = AchievementLevel::None;
    for tier in GoalLevel::ALL {
        if !is_tier_achieved(todos.get(tier), achieved_ids) {
            break;
        }
        level = AchievementLevel::from(tier);
    }
    level
}
