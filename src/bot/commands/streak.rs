//! Streak Discord command - progress toward the next level-up.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{streak::LEVEL_UP_THRESHOLD, summary},
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Shows each tier's streak toward the next level-up.
    #[poise::command(slash_command, prefix_command)]
    pub async fn streak(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();
        let progress =
            summary::generate_progress_summary(&data.database, &user_id, data.today()).await?;

        if !progress.has_goals() {
            ctx.say("📝 No goals yet. Set them with `/setup_goals` first.")
                .await?;
            return Ok(());
        }

        let mut response = format!(
            "🔥 **Streaks** (overall {} day(s))\n",
            progress.overall_streak
        );
        for (level, days) in progress.tier_streaks.iter() {
            let bar = summary::format_progress_bar(summary::streak_progress_percent(*days), Some(14));
            write!(
                &mut response,
                "\n{} {level}: {days}/{LEVEL_UP_THRESHOLD} {bar}",
                level.emoji()
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
