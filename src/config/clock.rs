//! Journal clock configuration.
//!
//! The journal is keyed by calendar day, so "today" depends on the user's UTC
//! offset. The offset comes from config.toml and can be overridden with the
//! `JOURNAL_UTC_OFFSET_MINUTES` environment variable.

use crate::errors::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

const OFFSET_ENV_VAR: &str = "JOURNAL_UTC_OFFSET_MINUTES";
const SECONDS_PER_MINUTE: i32 = 60;

/// Reads the UTC offset override from the environment.
///
/// # Returns
///
/// `Ok(None)` if the variable is not set, `Ok(Some(minutes))` if it parses.
///
/// # Errors
/// Returns a configuration error if the variable is set but not an integer.
pub fn utc_offset_from_env() -> Result<Option<i32>> {
    match std::env::var(OFFSET_ENV_VAR) {
        Ok(raw) => raw
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|e| Error::Config {
                message: format!("{OFFSET_ENV_VAR} must be a whole number of minutes: {e}"),
            }),
        Err(_) => Ok(None),
    }
}

/// Converts an offset in minutes into a [`FixedOffset`].
///
/// # Errors
/// Returns a configuration error if the offset is not strictly within ±24 hours.
pub fn fixed_offset(minutes: i32) -> Result<FixedOffset> {
    minutes
        .checked_mul(SECONDS_PER_MINUTE)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| Error::Config {
            message: format!("UTC offset of {minutes} minutes is out of range"),
        })
}

/// The calendar day of `now` in the given offset.
#[must_use]
pub fn local_date(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// The current calendar day in the given offset.
#[must_use]
pub fn today(offset: FixedOffset) -> NaiveDate {
    local_date(Utc::now(), offset)
}
