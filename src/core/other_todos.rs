//! Other TODO business logic - free-form daily TODOs that sit beside the tier goals.

use super::goals::MAX_TODO_LENGTH;
use crate::{
    entities::{OtherTodo, other_todo},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{ConnectionTrait, QueryOrder, Set, prelude::*};
use tracing::info;

/// Creates a new other TODO.
///
/// # Errors
/// Returns a validation error for empty or overlong content.
pub async fn create_other_todo<C>(db: &C, user_id: &str, content: &str) -> Result<other_todo::Model>
where
    C: ConnectionTrait,
{
    let content = content.trim();
    if content.is_empty() {
        return Err(Error::validation("content", "must not be empty"));
    }
    if content.chars().count() > MAX_TODO_LENGTH {
        return Err(Error::validation(
            "content",
            format!("must be at most {MAX_TODO_LENGTH} characters"),
        ));
    }

    let todo = other_todo::ActiveModel {
        user_id: Set(user_id.to_string()),
        content: Set(content.to_string()),
        is_archived: Set(false),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    let todo = todo.insert(db).await?;
    info!("Created other TODO {} for user {}", todo.id, user_id);
    Ok(todo)
}

/// Lists a user's active other TODOs, oldest first.
pub async fn list_other_todos<C>(db: &C, user_id: &str) -> Result<Vec<other_todo::Model>>
where
    C: ConnectionTrait,
{
    OtherTodo::find()
        .filter(other_todo::Column::UserId.eq(user_id))
        .filter(other_todo::Column::IsArchived.eq(false))
        .order_by_asc(other_todo::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Archives one of the user's other TODOs. Past daily records keep referencing it.
///
/// # Errors
/// Returns [`Error::TodoNotFound`] if the TODO does not exist, belongs to someone
/// else or is already archived.
pub async fn archive_other_todo<C>(db: &C, user_id: &str, todo_id: i64) -> Result<other_todo::Model>
where
    C: ConnectionTrait,
{
    let todo = OtherTodo::find_by_id(todo_id)
        .filter(other_todo::Column::UserId.eq(user_id))
        .filter(other_todo::Column::IsArchived.eq(false))
        .one(db)
        .await?
        .ok_or(Error::TodoNotFound { id: todo_id })?;

    let mut todo: other_todo::ActiveModel = todo.into();
    todo.is_archived = Set(true);
    let archived = todo.update(db).await?;
    info!("Archived other TODO {} for user {}", todo_id, user_id);
    Ok(archived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_and_list() -> Result<()> {
        let db = setup_test_db().await?;
        create_other_todo(&db, TEST_USER, "  Reply to issues ").await?;
        create_other_todo(&db, TEST_USER, "Review PR").await?;
        create_other_todo(&db, "other_user", "Not mine").await?;

        let todos = list_other_todos(&db, TEST_USER).await?;
        let contents: Vec<&str> = todos.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["Reply to issues", "Review PR"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_rejects_empty() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_other_todo(&db, TEST_USER, "   ").await;
        assert!(matches!(result, Err(Error::Validation { field: "content", .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_archive_hides_todo_and_checks_owner() -> Result<()> {
        let db = setup_test_db().await?;
        let todo = create_other_todo(&db, TEST_USER, "Review PR").await?;

        let stranger = archive_other_todo(&db, "other_user", todo.id).await;
        assert!(matches!(stranger, Err(Error::TodoNotFound { id }) if id == todo.id));

        let archived = archive_other_todo(&db, TEST_USER, todo.id).await?;
        assert!(archived.is_archived);
        assert!(list_other_todos(&db, TEST_USER).await?.is_empty());

        let again = archive_other_todo(&db, TEST_USER, todo.id).await;
        assert!(matches!(again, Err(Error::TodoNotFound { .. })));
        Ok(())
    }
}
