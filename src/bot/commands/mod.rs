//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General utility commands
pub mod general;

/// Goal setup, suggestions and the goal timeline
pub mod goals;

/// Daily journal commands
pub mod journal;

/// Free-form TODO management
pub mod other_todo;

/// Recovery mode commands
pub mod recovery;

/// Streak overview
pub mod streak;

// Export commands
pub use general::*;
pub use goals::*;
pub use journal::*;
pub use other_todo::*;
pub use recovery::*;
pub use streak::*;
