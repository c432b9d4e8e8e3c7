//! Core business logic - framework-agnostic goal-level progression.
//!
//! Pure evaluation (achievement, streaks, suggestion rules) lives beside the
//! persistence-backed operations (ledger, daily records, recovery mode). Nothing
//! here knows about Discord.

/// Achievement level calculation from checked-off goal TODOs
pub mod achievement;
/// Daily record reads and the transactional daily save
pub mod daily;
/// Goal TODO lists behind each tier
pub mod goals;
/// Per-day achievement history and suggestion windows
pub mod history;
/// Goal history ledger and goal transitions
pub mod ledger;
/// Free-form TODOs outside the tier goals
pub mod other_todos;
/// Recovery mode state machine
pub mod recovery;
/// Streak evaluation
pub mod streak;
/// Level-up and level-down suggestions
pub mod suggestion;
/// Progress summary and text helpers
pub mod summary;
/// Per-tier value container
pub mod tiers;
