//! Goal TODO business logic - Reads and replaces the TODO lists behind each tier.
//!
//! TODO lists only change through the goal history ledger: a goal edit archives
//! the tier's current TODOs and inserts the new ones in the same transaction that
//! opens the new slot. Archived TODOs stay in the table so old daily todo records
//! still resolve.

use super::tiers::Tiers;
use crate::{
    entities::{GoalLevel, GoalTodo, goal_todo},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{ConnectionTrait, QueryOrder, Set, prelude::*, sea_query::Expr};

/// Longest accepted TODO text, in characters.
pub const MAX_TODO_LENGTH: usize = 200;

/// Retrieves the active TODOs of one tier, oldest first.
pub async fn get_goal_todos<C>(
    db: &C,
    user_id: &str,
    level: GoalLevel,
) -> Result<Vec<goal_todo::Model>>
where
    C: ConnectionTrait,
{
    GoalTodo::find()
        .filter(goal_todo::Column::UserId.eq(user_id))
        .filter(goal_todo::Column::GoalType.eq(level))
        .filter(goal_todo::Column::IsArchived.eq(false))
        .order_by_asc(goal_todo::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the active TODOs of every tier.
pub async fn get_goal_todos_by_level<C>(
    db: &C,
    user_id: &str,
) -> Result<Tiers<Vec<goal_todo::Model>>>
where
    C: ConnectionTrait,
{
    let todos = GoalTodo::find()
        .filter(goal_todo::Column::UserId.eq(user_id))
        .filter(goal_todo::Column::IsArchived.eq(false))
        .order_by_asc(goal_todo::Column::Id)
        .all(db)
        .await?;

    let mut by_level: Tiers<Vec<goal_todo::Model>> = Tiers::default();
    for todo in todos {
        by_level.get_mut(todo.goal_type).push(todo);
    }
    Ok(by_level)
}

/// Archives a tier's active TODOs and inserts `contents` in their place.
///
/// Callers must run this inside the transaction that opens the matching ledger slot.
pub(crate) async fn replace_goal_todos<C>(
    db: &C,
    user_id: &str,
    level: GoalLevel,
    contents: &[String],
) -> Result<Vec<goal_todo::Model>>
where
    C: ConnectionTrait,
{
    let now = Utc::now().naive_utc();

    GoalTodo::update_many()
        .col_expr(goal_todo::Column::IsArchived, Expr::value(true))
        .col_expr(goal_todo::Column::UpdatedAt, Expr::value(now))
        .filter(goal_todo::Column::UserId.eq(user_id))
        .filter(goal_todo::Column::GoalType.eq(level))
        .filter(goal_todo::Column::IsArchived.eq(false))
        .exec(db)
        .await?;

    let mut inserted = Vec::with_capacity(contents.len());
    for content in contents {
        let todo = goal_todo::ActiveModel {
            user_id: Set(user_id.to_string()),
            goal_type: Set(level),
            content: Set(content.clone()),
            is_archived: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        inserted.push(todo.insert(db).await?);
    }
    Ok(inserted)
}

/// Trims TODO texts and checks that the list is usable as a tier goal.
///
/// # Errors
/// Returns a validation error naming `field` if the list is empty after trimming
/// blank entries, or an entry is longer than [`MAX_TODO_LENGTH`].
pub fn normalize_todos(field: &'static str, raw: &[String]) -> Result<Vec<String>> {
    let todos: Vec<String> = raw
        .iter()
        .map(|todo| todo.trim().to_string())
        .filter(|todo| !todo.is_empty())
        .collect();

    if todos.is_empty() {
        return Err(Error::validation(field, "at least one TODO is required"));
    }
    if let Some(long) = todos.iter().find(|t| t.chars().count() > MAX_TODO_LENGTH) {
        return Err(Error::validation(
            field,
            format!("'{long}' is longer than {MAX_TODO_LENGTH} characters"),
        ));
    }
    Ok(todos)
}

/// Splits user input such as `"Read docs; Write tests"` into TODO texts.
///
/// Entries are separated by semicolons or newlines; blanks are dropped.
#[must_use]
pub fn parse_todo_input(input: &str) -> Vec<String> {
    input
        .split([';', '\n'])
        .map(str::trim)
        .filter(|todo| !todo.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// The goal content stored in the ledger for a TODO list.
#[must_use]
pub fn goal_content(todos: &[String]) -> String {
    todos.join("\n")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_parse_todo_input() {
        assert_eq!(
            parse_todo_input(" Read docs ;Write tests\n\n; "),
            vec!["Read docs".to_string(), "Write tests".to_string()]
        );
        assert!(parse_todo_input(" ; ").is_empty());
    }

    #[test]
    fn test_normalize_todos_validation() {
        let result = normalize_todos("bronze", &["  ".to_string()]);
        assert!(matches!(
            result,
            Err(Error::Validation { field: "bronze", .. })
        ));

        let too_long = "x".repeat(MAX_TODO_LENGTH + 1);
        assert!(normalize_todos("gold", &[too_long]).is_err());

        let ok = normalize_todos("silver", &[" a ".to_string(), String::new()]).unwrap();
        assert_eq!(ok, vec!["a".to_string()]);
    }

    #[test]
    fn test_goal_content_joins_lines() {
        assert_eq!(
            goal_content(&["a".to_string(), "b".to_string()]),
            "a\nb".to_string()
        );
    }

    #[tokio::test]
    async fn test_replace_goal_todos_archives_previous() -> Result<()> {
        let db = setup_test_db().await?;

        let first = replace_goal_todos(&db, TEST_USER, GoalLevel::Bronze, &["a".to_string()]).await?;
        let second = replace_goal_todos(
            &db,
            TEST_USER,
            GoalLevel::Bronze,
            &["b".to_string(), "c".to_string()],
        )
        .await?;

        let active = get_goal_todos(&db, TEST_USER, GoalLevel::Bronze).await?;
        assert_eq!(active, second);

        let archived = GoalTodo::find_by_id(first[0].id).one(&db).await?.unwrap();
        assert!(archived.is_archived);
        assert_eq!(archived.content, "a");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_goal_todos_by_level_buckets_and_isolates_users() -> Result<()> {
        let db = setup_test_db().await?;

        replace_goal_todos(&db, TEST_USER, GoalLevel::Bronze, &["b1".to_string()]).await?;
        replace_goal_todos(&db, TEST_USER, GoalLevel::Gold, &["g1".to_string()]).await?;
        replace_goal_todos(&db, "other_user", GoalLevel::Silver, &["s1".to_string()]).await?;

        let todos = get_goal_todos_by_level(&db, TEST_USER).await?;
        assert_eq!(todos.bronze.len(), 1);
        assert!(todos.silver.is_empty());
        assert_eq!(todos.gold[0].content, "g1");

        Ok(())
    }
}
