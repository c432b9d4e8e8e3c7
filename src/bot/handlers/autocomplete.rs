//! Autocomplete handlers for Discord slash command parameters.

use crate::{bot::BotData, core::other_todos, entities::GoalLevel, errors::Error};

/// Discord's cap on autocomplete choices.
const MAX_CHOICES: usize = 25;

/// Suggests goal tiers matching the partial input.
pub async fn autocomplete_goal_level(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching_levels(partial)
}

fn matching_levels(partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    GoalLevel::ALL
        .iter()
        .map(|level| level.as_str())
        .filter(|name| name.contains(&partial_lower))
        .map(ToString::to_string)
        .collect()
}

/// Suggests the caller's active other TODOs as `id: content`.
///
/// Only the leading id is parsed by the command, so the content is just a hint.
pub async fn autocomplete_other_todo(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    let user_id = ctx.author().id.to_string();

    let Ok(todos) = other_todos::list_other_todos(db, &user_id).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();
    todos
        .into_iter()
        .map(|todo| format!("{}: {}", todo.id, todo.content))
        .filter(|label| label.to_lowercase().contains(&partial_lower))
        .take(MAX_CHOICES)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_levels() {
        assert_eq!(matching_levels(""), vec!["bronze", "silver", "gold"]);
        assert_eq!(matching_levels("GO"), vec!["gold"]);
        assert!(matching_levels("platinum").is_empty());
    }
}
