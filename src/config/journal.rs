//! Journal configuration loading from config.toml
//!
//! This module loads the starter goals that seed a user's goal history on first use,
//! and the UTC offset that decides which calendar day "today" is.

use crate::{
    core::tiers::Tiers,
    entities::GoalLevel,
    errors::{Error, Result},
};
use chrono::FixedOffset;
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Calendar settings
    #[serde(default)]
    pub journal: JournalConfig,
    /// Starter goals, at most one entry per tier
    #[serde(default)]
    pub goals: Vec<GoalConfig>,
}

/// Calendar settings for the journal
#[derive(Debug, Default, Deserialize, Clone)]
pub struct JournalConfig {
    /// Offset from UTC, in minutes, used to decide the current day
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

/// Starter goal for a single tier
#[derive(Debug, Deserialize, Clone)]
pub struct GoalConfig {
    /// Tier the TODOs belong to
    pub level: GoalLevel,
    /// TODO texts for the tier
    pub todos: Vec<String>,
}

impl Config {
    /// Collects the starter goals into one list of TODO texts per tier.
    ///
    /// # Errors
    /// Returns a configuration error if a tier is listed twice.
    pub fn starter_goals(&self) -> Result<Tiers<Vec<String>>> {
        let mut tiers: Tiers<Vec<String>> = Tiers::default();
        for goal in &self.goals {
            let slot = tiers.get_mut(goal.level);
            if !slot.is_empty() {
                return Err(Error::Config {
                    message: format!("Starter goals for '{}' are listed twice", goal.level),
                });
            }
            slot.extend(
                goal.todos
                    .iter()
                    .map(|todo| todo.trim().to_string())
                    .filter(|todo| !todo.is_empty()),
            );
        }
        Ok(tiers)
    }
}

/// Resolved runtime settings shared by the bot.
#[derive(Debug, Clone)]
pub struct JournalSettings {
    /// Offset used to compute the current calendar day
    pub utc_offset: FixedOffset,
    /// Goals seeded for users without any goal history
    pub starter_goals: Tiers<Vec<String>>,
}

impl JournalSettings {
    /// Builds settings from the file configuration, applying environment overrides.
    ///
    /// # Errors
    /// Returns a configuration error for an out-of-range offset or duplicated tiers.
    pub fn from_config(config: &Config) -> Result<Self> {
        let minutes = super::clock::utc_offset_from_env()?
            .unwrap_or(config.journal.utc_offset_minutes);
        Ok(Self {
            utc_offset: super::clock::fixed_offset(minutes)?,
            starter_goals: config.starter_goals()?,
        })
    }

    /// The current calendar day in the configured offset.
    #[must_use]
    pub fn today(&self) -> chrono::NaiveDate {
        super::clock::today(self.utc_offset)
    }
}

/// Loads journal configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A goal level is not one of bronze, silver or gold
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads journal configuration from the default location (./config.toml).
///
/// A missing file is not an error: the journal then starts without starter goals.
pub fn load_default_config() -> Result<Config> {
    let path = Path::new("config.toml");
    if path.exists() {
        load_config(path)
    } else {
        tracing::warn!("config.toml not found, starting without starter goals");
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_journal_config() {
        let toml_str = r#"
            [journal]
            utc_offset_minutes = 540

            [[goals]]
            level = "bronze"
            todos = ["Open the editor", "  "]

            [[goals]]
            level = "gold"
            todos = ["Ship a feature"]
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.journal.utc_offset_minutes, 540);
        assert_eq!(config.goals.len(), 2);

        let starter = config.starter_goals().unwrap();
        assert_eq!(starter.bronze, vec!["Open the editor".to_string()]);
        assert!(starter.silver.is_empty());
        assert_eq!(starter.gold, vec!["Ship a feature".to_string()]);
    }

    #[test]
    fn test_duplicate_tier_rejected() {
        let toml_str = r#"
            [[goals]]
            level = "silver"
            todos = ["a"]

            [[goals]]
            level = "silver"
            todos = ["b"]
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.starter_goals(),
            Err(Error::Config { message: _ })
        ));
    }

    #[test]
    fn test_unknown_level_is_parse_error() {
        let toml_str = r#"
            [[goals]]
            level = "platinum"
            todos = ["a"]
        "#;
        assert!(toml::from_str::<Config>(toml_str).is_err());
    }

    #[test]
    fn test_empty_config_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.journal.utc_offset_minutes, 0);
        assert!(config.goals.is_empty());
    }
}
