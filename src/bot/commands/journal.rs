//! Daily journal Discord commands - today, record, and history.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{
            daily::{self, DailyEntry},
            summary,
            suggestion::{self, Suggestion},
        },
        entities::{GoalLevel, SuggestionKind},
        errors::{Error, Result},
    };
    use chrono::Days;
    use std::fmt::Write;

    /// Longest history the bot will print at once.
    const MAX_HISTORY_DAYS: u32 = 31;

    /// One-line description of a suggestion.
    pub(crate) fn describe_suggestion(suggestion: &Suggestion) -> String {
        match (suggestion.kind, suggestion.target_level) {
            (SuggestionKind::LevelUp, Some(target)) => format!(
                "🎉 14 days at {} {target}! You can level up: {} editable.",
                target.emoji(),
                editable_list(suggestion)
            ),
            (SuggestionKind::LevelUp, None) => "🎉 You can level up.".to_string(),
            (SuggestionKind::LevelDown, _) => format!(
                "🌱 The last week was rough. Consider lowering your goals: {} editable.",
                editable_list(suggestion)
            ),
        }
    }

    fn editable_list(suggestion: &Suggestion) -> String {
        suggestion
            .editable
            .iter()
            .map(|level| level.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Shows today's goals, streaks, and any pending suggestion.
    #[poise::command(slash_command, prefix_command)]
    pub async fn today(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();
        data.ensure_starter_goals(&user_id).await;

        let today = data.today();
        let progress = summary::generate_progress_summary(&data.database, &user_id, today).await?;

        if !progress.has_goals() {
            ctx.say("📝 No goals yet. Set them with `/setup_goals` to get started!")
                .await?;
            return Ok(());
        }

        let mut response = format!("📅 **{today}**\n\n");
        for level in GoalLevel::ALL {
            let Some(slot) = progress.slots.get(level) else {
                continue;
            };
            writeln!(
                &mut response,
                "{} **{level}** (level {}) - streak {}",
                level.emoji(),
                slot.level,
                progress.tier_streaks.get(level)
            )?;
            for todo in progress.todos.get(level) {
                writeln!(&mut response, "  `#{}` {}", todo.id, todo.content)?;
            }
        }

        writeln!(&mut response)?;
        match progress.today_level {
            Some(level) => writeln!(&mut response, "Today: {} {level}", level.emoji())?,
            None => writeln!(&mut response, "Today: not recorded yet, use `/record`")?,
        }
        writeln!(
            &mut response,
            "🔥 Overall streak: {} day(s)",
            progress.overall_streak
        )?;
        writeln!(
            &mut response,
            "Last {} days: {}",
            progress.recent_days.len(),
            summary::format_history_strip(&progress.recent_days)
        )?;

        if progress.recovery.is_active {
            writeln!(
                &mut response,
                "🩹 Recovery mode is on: {}",
                progress.recovery.goal.as_deref().unwrap_or_default()
            )?;
        }
        if let Some(suggestion) = &progress.suggestion {
            writeln!(&mut response, "\n{}", describe_suggestion(suggestion))?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Saves today's record.
    ///
    /// TODO ids come from `/today` or `/goals`; separate several with spaces or commas.
    #[poise::command(slash_command, prefix_command)]
    pub async fn record(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Goal TODO ids you completed (e.g. '3 4 5')"] goal_todos: Option<String>,
        #[description = "Other TODO ids you completed"] other_todos: Option<String>,
        #[description = "Journal entry for today"] journal: Option<String>,
        #[description = "Did you do your recovery action? (recovery mode only)"]
        recovery_done: Option<bool>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;
        let user_id = ctx.author().id.to_string();
        let today = data.today();

        let entry = DailyEntry {
            achieved_goal_todo_ids: daily::parse_todo_ids(goal_todos.as_deref().unwrap_or_default())?,
            achieved_other_todo_ids: daily::parse_todo_ids(
                other_todos.as_deref().unwrap_or_default(),
            )?,
            journal,
            recovery_achieved: recovery_done,
        };
        let saved = daily::save_daily_record(db, &user_id, today, entry, today).await?;

        let level = saved.record.achievement_level;
        let mut response = format!("✅ Saved {today}: {} **{level}**\n", level.emoji());
        if saved.recovery_deactivated {
            let outcome = if saved.record.recovery_achieved == Some(true) {
                "done"
            } else {
                "not done"
            };
            writeln!(&mut response, "🩹 Recovery action {outcome}. Recovery mode is now off.")?;
        }

        // Announce each suggestion once per day
        if let Some(suggestion) = suggestion::suggestion_for_user(db, &user_id, today).await? {
            if !suggestion::suggestion_shown_on(db, &user_id, &suggestion, today).await? {
                suggestion::record_suggestion_shown(db, &user_id, &suggestion, today).await?;
                writeln!(&mut response, "\n{}", describe_suggestion(&suggestion))?;
                writeln!(&mut response, "Use `/accept_suggestion` to apply it.")?;
            }
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Shows your recent days.
    #[poise::command(slash_command, prefix_command)]
    pub async fn history(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Number of days to show (default 7, max 31)"] days: Option<u32>,
    ) -> Result<()> {
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();
        let today = data.today();

        let days = days.unwrap_or(7).clamp(1, MAX_HISTORY_DAYS);
        let from = today
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .unwrap_or(today);
        let records = daily::list_daily_records(&data.database, &user_id, from, today).await?;

        if records.is_empty() {
            ctx.say(format!("📖 No records in the last {days} day(s)."))
                .await?;
            return Ok(());
        }

        let mut response = format!("📖 **Last {days} day(s)**\n");
        for record in records.iter().rev() {
            write!(
                &mut response,
                "\n{} **{}** {}",
                record.achievement_level.emoji(),
                record.record_date,
                record.achievement_level
            )?;
            if let Some(journal) = &record.journal {
                let preview: String = journal.chars().take(80).collect();
                write!(&mut response, " - {preview}")?;
            }
        }

        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
