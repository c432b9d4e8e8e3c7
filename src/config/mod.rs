/// Database configuration and connection management
pub mod database;

/// Journal configuration loading from config.toml
pub mod journal;

/// Calendar-day computation from the configured UTC offset
pub mod clock;
