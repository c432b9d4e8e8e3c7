//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod daily_record;
pub mod daily_todo_record;
pub mod goal_level_history;
pub mod goal_todo;
pub mod levels;
pub mod other_todo;
pub mod recovery_mode;
pub mod suggestion_log;

// Re-export specific types to avoid conflicts
pub use daily_record::{
    Column as DailyRecordColumn, Entity as DailyRecord, Model as DailyRecordModel,
};
pub use daily_todo_record::{
    Column as DailyTodoRecordColumn, Entity as DailyTodoRecord, Model as DailyTodoRecordModel,
};
pub use goal_level_history::{
    Column as GoalLevelHistoryColumn, Entity as GoalLevelHistory, Model as GoalLevelHistoryModel,
};
pub use goal_todo::{Column as GoalTodoColumn, Entity as GoalTodo, Model as GoalTodoModel};
pub use levels::{AchievementLevel, ChangeReason, GoalLevel, SuggestionKind, TodoType};
pub use other_todo::{Column as OtherTodoColumn, Entity as OtherTodo, Model as OtherTodoModel};
pub use recovery_mode::{
    Column as RecoveryModeColumn, Entity as RecoveryMode, Model as RecoveryModeModel,
};
pub use suggestion_log::{
    Column as SuggestionLogColumn, Entity as SuggestionLog, Model as SuggestionLogModel,
};
