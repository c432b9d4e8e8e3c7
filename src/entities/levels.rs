//! Text-backed enumerations shared by several tables.
//!
//! Every enum is stored as its lowercase snake-case name so rows stay readable
//! in a plain `SQLite` shell.

use crate::errors::Error;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A goal tier. Ordered by difficulty: bronze < silver < gold.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum GoalLevel {
    /// Entry tier
    #[sea_orm(string_value = "bronze")]
    Bronze,
    /// Middle tier
    #[sea_orm(string_value = "silver")]
    Silver,
    /// Hardest tier
    #[sea_orm(string_value = "gold")]
    Gold,
}

impl GoalLevel {
    /// All tiers, lowest first.
    pub const ALL: [Self; 3] = [Self::Bronze, Self::Silver, Self::Gold];

    /// Position of the tier in the ordering, starting at 1 for bronze.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Bronze => 1,
            Self::Silver => 2,
            Self::Gold => 3,
        }
    }

    /// Lowercase name, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
        }
    }

    /// Medal emoji used by the bot.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Bronze => "🥉",
            Self::Silver => "🥈",
            Self::Gold => "🥇",
        }
    }
}

impl fmt::Display for GoalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bronze" => Ok(Self::Bronze),
            "silver" => Ok(Self::Silver),
            "gold" => Ok(Self::Gold),
            other => Err(Error::validation(
                "level",
                format!("unknown goal level '{other}' (expected bronze, silver or gold)"),
            )),
        }
    }
}

/// The outcome of a day: the highest tier whose requirements were fully met.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum AchievementLevel {
    /// No tier was completed
    #[sea_orm(string_value = "none")]
    None,
    /// Bronze completed
    #[sea_orm(string_value = "bronze")]
    Bronze,
    /// Bronze and silver completed
    #[sea_orm(string_value = "silver")]
    Silver,
    /// Every tier completed
    #[sea_orm(string_value = "gold")]
    Gold,
}

impl AchievementLevel {
    /// Position in the ordering none < bronze < silver < gold, starting at 0.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Bronze => 1,
            Self::Silver => 2,
            Self::Gold => 3,
        }
    }

    /// Whether this outcome is at or above the given tier.
    #[must_use]
    pub const fn satisfies(self, tier: GoalLevel) -> bool {
        self.index() >= tier.index()
    }

    /// Whether any tier was achieved.
    #[must_use]
    pub const fn is_achieved(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Emoji used in history strips.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::None => "❌",
            Self::Bronze => "🥉",
            Self::Silver => "🥈",
            Self::Gold => "🥇",
        }
    }
}

impl From<GoalLevel> for AchievementLevel {
    fn from(level: GoalLevel) -> Self {
        match level {
            GoalLevel::Bronze => Self::Bronze,
            GoalLevel::Silver => Self::Silver,
            GoalLevel::Gold => Self::Gold,
        }
    }
}

impl fmt::Display for AchievementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
        };
        f.write_str(name)
    }
}

/// Why a goal-level slot was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ChangeReason {
    /// First slot of a tier
    #[sea_orm(string_value = "initial")]
    Initial,
    /// Opened after a level-up suggestion was accepted
    #[sea_orm(string_value = "level_up")]
    LevelUp,
    /// Opened after a level-down suggestion was accepted
    #[sea_orm(string_value = "level_down")]
    LevelDown,
}

/// Kind of TODO a daily todo record points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum TodoType {
    /// A tier goal TODO (`goal_todos`)
    #[sea_orm(string_value = "goal")]
    Goal,
    /// A free-form TODO (`other_todos`)
    #[sea_orm(string_value = "other")]
    Other,
}

/// Direction of a proposed goal-level transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// Raise the bar
    #[sea_orm(string_value = "level_up")]
    LevelUp,
    /// Lower the bar
    #[sea_orm(string_value = "level_down")]
    LevelDown,
}

impl From<SuggestionKind> for ChangeReason {
    fn from(kind: SuggestionKind) -> Self {
        match kind {
            SuggestionKind::LevelUp => Self::LevelUp,
            SuggestionKind::LevelDown => Self::LevelDown,
        }
    }
}
