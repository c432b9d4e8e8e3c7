//! Recovery mode Discord commands.
//!
//! Recovery mode swaps today's goals for one small action. It ends when today's
//! record is saved.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::recovery::{self, RecoveryStatus},
        errors::{Error, Result},
    };

    fn describe(status: &RecoveryStatus) -> String {
        let goal = status.goal.as_deref().unwrap_or("not set");
        if status.is_active {
            format!("🩹 Recovery mode is **on**. Today's action: {goal}")
        } else {
            format!("Recovery mode is off. Recovery goal: {goal}")
        }
    }

    /// Parent command for recovery mode.
    #[poise::command(
        slash_command,
        subcommands("recovery_goal", "recovery_on", "recovery_off", "recovery_status")
    )]
    pub async fn recovery(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Recovery mode command. Available subcommands:\n\
            `/recovery goal` - Set your recovery action\n\
            `/recovery on` - Use it for today\n\
            `/recovery off` - Abandon recovery mode\n\
            `/recovery status` - Show the current state";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Sets the small action you commit to on recovery days.
    #[poise::command(slash_command, rename = "goal")]
    pub async fn recovery_goal(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Recovery action (e.g. 'Read one page')"] goal: String,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let status = recovery::set_recovery_goal(&ctx.data().database, &user_id, &goal).await?;
        ctx.say(format!("✅ {}", describe(&status))).await?;
        Ok(())
    }

    /// Turns recovery mode on for today.
    #[poise::command(slash_command, rename = "on")]
    pub async fn recovery_on(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();
        let status = recovery::activate_recovery_mode(&data.database, &user_id, data.today()).await?;
        ctx.say(format!(
            "{}\nRecord it with `/record recovery_done:True` when you're done.",
            describe(&status)
        ))
        .await?;
        Ok(())
    }

    /// Turns recovery mode off without recording anything.
    #[poise::command(slash_command, rename = "off")]
    pub async fn recovery_off(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let status = recovery::deactivate_recovery_mode(&ctx.data().database, &user_id).await?;
        ctx.say(describe(&status)).await?;
        Ok(())
    }

    /// Shows the recovery mode state.
    #[poise::command(slash_command, rename = "status")]
    pub async fn recovery_status(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let status = recovery::get_recovery_status(&ctx.data().database, &user_id).await?;
        ctx.say(describe(&status)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
