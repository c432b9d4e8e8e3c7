//! General Discord commands - ping and help.
//! These commands don't touch the database.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**HabitBuddy Help**\n\
        Keep a daily journal against three goal tiers: 🥉 bronze, 🥈 silver and 🥇 gold.\n\n\
        **Daily Journal**\n\
        • `/today` - Shows today's goals, streaks and any suggestion.\n\
        • `/record [goal_todos] [other_todos] [journal] [recovery_done]` - Saves today's record.\n\
        • `/history [days]` - Shows your recent days.\n\
        • `/streak` - Shows streak progress toward the next level-up.\n\n\
        **Goals**\n\
        • `/setup_goals <bronze> <silver> <gold>` - Sets your first goals (separate TODOs with `;`).\n\
        • `/goals` - Lists your current goals and their TODO ids.\n\
        • `/suggestion` - Checks whether a level-up or level-down is suggested.\n\
        • `/accept_suggestion [bronze] [silver] [gold]` - Applies the suggestion with new goals.\n\
        • `/timeline <level>` - Shows how a tier's goal changed over time.\n\n\
        **Other**\n\
        • `/other_todo add|list|archive` - Manage free-form TODOs.\n\
        • `/recovery goal|on|off|status` - Swap today's goals for a small recovery action.\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
