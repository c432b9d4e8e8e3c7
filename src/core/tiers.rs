//! A value for each goal tier.
//!
//! `Tiers<T>` replaces loose `{bronze, silver, gold}` maps: todos per tier,
//! goal contents per tier, current slots per tier and streaks per tier all use it.

use crate::entities::GoalLevel;
use serde::Serialize;

/// One `T` per goal tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tiers<T> {
    /// Bronze tier value
    pub bronze: T,
    /// Silver tier value
    pub silver: T,
    /// Gold tier value
    pub gold: T,
}

impl<T> Tiers<T> {
    /// Builds a value for each tier from a function of the tier.
    pub fn from_fn(mut f: impl FnMut(GoalLevel) -> T) -> Self {
        Self {
            bronze: f(GoalLevel::Bronze),
            silver: f(GoalLevel::Silver),
            gold: f(GoalLevel::Gold),
        }
    }

    /// The value for a tier.
    #[must_use]
    pub const fn get(&self, level: GoalLevel) -> &T {
        match level {
            GoalLevel::Bronze => &self.bronze,
            GoalLevel::Silver => &self.silver,
            GoalLevel::Gold => &self.gold,
        }
    }

    /// Mutable access to the value for a tier.
    pub const fn get_mut(&mut self, level: GoalLevel) -> &mut T {
        match level {
            GoalLevel::Bronze => &mut self.bronze,
            GoalLevel::Silver => &mut self.silver,
            GoalLevel::Gold => &mut self.gold,
        }
    }

    /// Iterates tiers from bronze to gold.
    pub fn iter(&self) -> impl Iterator<Item = (GoalLevel, &T)> {
        GoalLevel::ALL.into_iter().map(move |level| (level, self.get(level)))
    }

    /// Transforms every tier's value.
    pub fn map<U>(self, mut f: impl FnMut(GoalLevel, T) -> U) -> Tiers<U> {
        Tiers {
            bronze: f(GoalLevel::Bronze, self.bronze),
            silver: f(GoalLevel::Silver, self.silver),
            gold: f(GoalLevel::Gold, self.gold),
        }
    }
}
