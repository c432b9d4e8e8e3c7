//! Goal Discord commands - goal setup, suggestions, and the goal timeline.
//!
//! Every goal change goes through the ledger so the timeline stays sealed.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::journal::describe_suggestion, handlers::autocomplete},
        core::{goals, ledger, suggestion, tiers::Tiers},
        entities::{ChangeReason, GoalLevel},
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Lists your current goals with their TODO ids.
    #[poise::command(slash_command, prefix_command)]
    pub async fn goals(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();
        data.ensure_starter_goals(&user_id).await;

        let slots = ledger::current_slots(&data.database, &user_id).await?;
        let todos = goals::get_goal_todos_by_level(&data.database, &user_id).await?;

        let mut response = String::from("🎯 **Your Goals**\n");
        for (level, slot) in slots.iter() {
            let Some(slot) = slot else {
                write!(&mut response, "\n{} **{level}** - not set", level.emoji())?;
                continue;
            };
            write!(
                &mut response,
                "\n{} **{level}** level {} (since {})",
                level.emoji(),
                slot.level,
                slot.started_at
            )?;
            for todo in todos.get(level) {
                write!(&mut response, "\n  `#{}` {}", todo.id, todo.content)?;
            }
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Sets your first goals for all three tiers.
    ///
    /// Separate several TODOs within a tier with `;`.
    #[poise::command(slash_command, prefix_command)]
    pub async fn setup_goals(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Bronze TODOs, the minimum for a good day (e.g. 'Read docs; Commit once')"]
        bronze: String,
        #[description = "Silver TODOs"] silver: String,
        #[description = "Gold TODOs"] gold: String,
    ) -> Result<()> {
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();

        let contents = Tiers {
            bronze: goals::parse_todo_input(&bronze),
            silver: goals::parse_todo_input(&silver),
            gold: goals::parse_todo_input(&gold),
        };
        ledger::initialize_goals(&data.database, &user_id, &contents, data.today()).await?;

        ctx.say("✅ Goals set! Check them with `/goals` and record your day with `/record`.")
            .await?;
        Ok(())
    }

    /// Checks whether a level-up or level-down is suggested.
    #[poise::command(slash_command, prefix_command)]
    pub async fn suggestion(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();
        let today = data.today();

        match suggestion::suggestion_for_user(&data.database, &user_id, today).await? {
            Some(found) => {
                ctx.say(format!(
                    "{}\nUse `/accept_suggestion` to apply it.",
                    describe_suggestion(&found)
                ))
                .await?;
            }
            None => {
                ctx.say("ℹ️ No suggestion right now. Keep recording your days!")
                    .await?;
            }
        }
        Ok(())
    }

    /// Applies the current suggestion with new goals.
    ///
    /// Only the tiers the suggestion unlocks can change; leave a tier empty to keep it.
    #[poise::command(slash_command, prefix_command)]
    pub async fn accept_suggestion(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "New bronze TODOs (separate with ';')"] bronze: Option<String>,
        #[description = "New silver TODOs"] silver: Option<String>,
        #[description = "New gold TODOs"] gold: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;
        let user_id = ctx.author().id.to_string();
        let today = data.today();

        let Some(found) = suggestion::suggestion_for_user(db, &user_id, today).await? else {
            ctx.say("ℹ️ There is no suggestion to accept right now.").await?;
            return Ok(());
        };

        let requested = Tiers { bronze, silver, gold };
        let current = goals::get_goal_todos_by_level(db, &user_id).await?;
        let contents = Tiers::from_fn(|level| match requested.get(level) {
            Some(input) => goals::parse_todo_input(input),
            None => current
                .get(level)
                .iter()
                .map(|todo| todo.content.clone())
                .collect(),
        });

        let ignored: Vec<&str> = requested
            .iter()
            .filter(|(level, input)| input.is_some() && !found.editable.contains(level))
            .map(|(level, _)| level.as_str())
            .collect();

        let opened = ledger::apply_transition(
            db,
            &user_id,
            &contents,
            &found.editable,
            ChangeReason::from(found.kind),
            today,
        )
        .await?;

        let mut response = if opened.is_empty() {
            String::from("ℹ️ No goals changed.")
        } else {
            let mut changed = String::from("✅ Goals updated:");
            for slot in &opened {
                write!(
                    &mut changed,
                    "\n{} **{}** is now level {}",
                    slot.goal_type.emoji(),
                    slot.goal_type,
                    slot.level
                )?;
            }
            changed
        };
        if !ignored.is_empty() {
            write!(
                &mut response,
                "\n⚠️ Not editable for this suggestion, ignored: {}",
                ignored.join(", ")
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Shows how a tier's goal changed over time.
    #[poise::command(slash_command, prefix_command)]
    pub async fn timeline(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Goal tier"]
        #[autocomplete = "autocomplete::autocomplete_goal_level"]
        level: String,
    ) -> Result<()> {
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();
        let level: GoalLevel = level.parse()?;

        let history = ledger::slot_history(&data.database, &user_id, level).await?;
        if history.is_empty() {
            ctx.say(format!("📜 No {level} goals yet.")).await?;
            return Ok(());
        }

        let mut response = format!("📜 **{} {level} timeline**\n", level.emoji());
        for slot in &history {
            let ended = slot
                .ended_at
                .map_or_else(|| "now".to_string(), |date| date.to_string());
            write!(
                &mut response,
                "\n**Level {}** {} → {} ({:?})",
                slot.level, slot.started_at, ended, slot.change_reason
            )?;
            for line in slot.goal_content.lines() {
                write!(&mut response, "\n  • {line}")?;
            }
        }

        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
