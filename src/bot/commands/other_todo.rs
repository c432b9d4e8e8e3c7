//! Other TODO Discord commands - free-form TODOs beside the tier goals.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{daily, other_todos},
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Parent command for managing free-form TODOs.
    #[poise::command(
        slash_command,
        subcommands("other_todo_add", "other_todo_list", "other_todo_archive")
    )]
    pub async fn other_todo(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Other TODO command. Available subcommands:\n\
            `/other_todo add` - Add a TODO\n\
            `/other_todo list` - List your TODOs\n\
            `/other_todo archive` - Archive a TODO";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a free-form TODO. It never affects your achievement level.
    #[poise::command(slash_command, rename = "add")]
    pub async fn other_todo_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "What to do"] content: String,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let todo = other_todos::create_other_todo(&ctx.data().database, &user_id, &content).await?;

        ctx.say(format!("✅ Added `#{}` {}", todo.id, todo.content))
            .await?;
        Ok(())
    }

    /// Lists your active free-form TODOs.
    #[poise::command(slash_command, rename = "list")]
    pub async fn other_todo_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let todos = other_todos::list_other_todos(&ctx.data().database, &user_id).await?;

        if todos.is_empty() {
            ctx.say("📋 No other TODOs. Add one with `/other_todo add`.")
                .await?;
            return Ok(());
        }

        let mut response = String::from("📋 **Other TODOs**");
        for todo in todos {
            write!(&mut response, "\n`#{}` {}", todo.id, todo.content)?;
        }
        ctx.say(response).await?;
        Ok(())
    }

    /// Archives a free-form TODO.
    #[poise::command(slash_command, rename = "archive")]
    pub async fn other_todo_archive(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "TODO to archive"]
        #[autocomplete = "autocomplete::autocomplete_other_todo"]
        todo: String,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        // Autocomplete labels look like "12: content"
        let id_part = todo.split(':').next().unwrap_or_default();
        let Some(&todo_id) = daily::parse_todo_ids(id_part)?.first() else {
            ctx.say("❌ Please pick a TODO to archive.").await?;
            return Ok(());
        };

        let archived =
            other_todos::archive_other_todo(&ctx.data().database, &user_id, todo_id).await?;
        ctx.say(format!("🗄️ Archived `#{}` {}", archived.id, archived.content))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
