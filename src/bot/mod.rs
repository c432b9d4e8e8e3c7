//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the HabitBuddy journal,
//! including all slash commands, autocomplete handlers, and bot context management.

/// Discord command implementations (journal, goals, recovery, other TODOs, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::journal::JournalSettings,
    core::ledger,
    errors::{Error, Result},
};
use chrono::NaiveDate;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

/// Shared data available to all bot commands.
/// This structure holds the database connection and the resolved journal settings.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Calendar offset and starter goals
    pub settings: JournalSettings,
}

impl BotData {
    /// Creates a new `BotData` instance.
    #[must_use]
    pub const fn new(database: DatabaseConnection, settings: JournalSettings) -> Self {
        Self { database, settings }
    }

    /// The journal's current calendar day.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.settings.today()
    }

    /// Seeds starter goals for a user on first contact, if configured.
    ///
    /// Failures are logged and swallowed; the user can still set goals by hand.
    pub async fn ensure_starter_goals(&self, user_id: &str) {
        let today = self.today();
        if let Err(e) =
            ledger::seed_starter_goals(&self.database, user_id, &self.settings.starter_goals, today)
                .await
        {
            warn!("Could not seed starter goals for {}: {}", user_id, e);
        }
    }
}

/// Poise context with the bot's data and error types.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            let reply = if error.is_user_facing() {
                format!("⚠️ {error}")
            } else {
                error!("Error in command `{}`: {:?}", ctx.command().name, error);
                "❌ Something went wrong while saving your journal. Please try again.".to_string()
            };
            if let Err(e) = ctx.say(reply).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Registers every command and runs the Discord client until it stops.
///
/// # Errors
/// Returns an error if the client cannot be created or the gateway connection fails.
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::today(),
                commands::record(),
                commands::history(),
                commands::streak(),
                commands::goals(),
                commands::setup_goals(),
                commands::suggestion(),
                commands::accept_suggestion(),
                commands::timeline(),
                commands::other_todo(),
                commands::recovery(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Registered commands globally");
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot client...");
    client.start().await?;
    Ok(())
}
