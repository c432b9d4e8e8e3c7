use dotenvy::dotenv;
use habit_buddy::{
    bot::{self, BotData},
    config::{database, journal},
    errors::{Error, Result},
};
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Env vars may also be set externally
    dotenv().ok();

    let config = journal::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    let settings = journal::JournalSettings::from_config(&config)?;
    info!("Journal day offset: {}", settings.utc_offset);

    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, BotData::new(db, settings)).await
}
