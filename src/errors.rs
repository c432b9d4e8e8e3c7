//! Unified error types for `HabitBuddy`.
//!
//! Engine failures follow four categories: malformed input ([`Error::Validation`]),
//! failed state-machine guards ([`Error::Precondition`]), races detected at the
//! persistence boundary ([`Error::Conflict`]) and broken ledger invariants
//! ([`Error::Integrity`]). The remaining variants wrap infrastructure errors.

use chrono::NaiveDate;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// A state-machine guard that refused an operation.
///
/// These are user-actionable outcomes, not bugs; the bot layer renders the
/// display text directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Guard {
    /// Recovery mode cannot be activated without a recovery goal
    #[error("recovery goal is not set")]
    RecoveryGoalNotSet,
    /// Today's record already exists, so recovery mode can no longer be activated
    #[error("today is locked: a record for today already exists")]
    TodayLocked,
    /// The operation requires recovery mode to be inactive
    #[error("recovery mode is already active")]
    RecoveryActive,
    /// The operation requires recovery mode to be active
    #[error("recovery mode is not active")]
    RecoveryInactive,
    /// Daily records can only be edited on their own calendar day
    #[error("the record for {0} can no longer be edited")]
    RecordSealed(NaiveDate),
    /// A tier's goal was already changed today
    #[error("goals for this tier were already changed today")]
    GoalsChangedToday,
    /// An `initial` transition was requested for a tier that already has history
    #[error("goal history already exists for this tier")]
    HistoryExists,
}

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input, rejected before any persistence call
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// A state-machine guard failed
    #[error("{0}")]
    Precondition(#[from] Guard),

    /// A uniqueness or atomicity race detected at the persistence boundary
    #[error("Conflicting concurrent update: {message}")]
    Conflict {
        /// Description of the conflicting write
        message: String,
    },

    /// The goal history ledger is in an impossible state
    #[error("Goal history integrity violated: {message}")]
    Integrity {
        /// Description of the violated invariant
        message: String,
    },

    /// Referenced TODO does not exist for this user
    #[error("TODO not found: {id}")]
    TodoNotFound {
        /// The requested TODO id
        id: i64,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Details
        message: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Writing a response string failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Discord framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Whether the error is an expected, user-actionable outcome rather than a fault.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::Precondition(_) | Self::TodoNotFound { .. }
        )
    }
}

/// Returns true when a database error is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_classification() {
        assert!(Error::validation("goal", "must not be empty").is_user_facing());
        assert!(Error::from(Guard::TodayLocked).is_user_facing());
        assert!(
            !Error::Integrity {
                message: "two open slots".to_string()
            }
            .is_user_facing()
        );
        assert!(
            !Error::Conflict {
                message: "duplicate".to_string()
            }
            .is_user_facing()
        );
    }

    #[test]
    fn test_guard_messages_render() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or_default();
        assert_eq!(
            Error::from(Guard::RecordSealed(date)).to_string(),
            "the record for 2024-03-01 can no longer be edited"
        );
        assert_eq!(
            Error::validation("journal", "too long").to_string(),
            "Invalid journal: too long"
        );
    }

    #[test]
    fn test_plain_db_error_is_not_unique_violation() {
        assert!(!is_unique_violation(&DbErr::Custom("boom".to_string())));
    }
}
