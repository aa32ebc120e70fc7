//! Fitness tracking Telegram bot
//!
//! Long-polls the Bot API and walks users through recording workout
//! sessions into a local SQLite table, one dialogue step at a time.

mod db;
mod dialogue;
mod dispatcher;
mod router;
mod telegram;
mod text;

use db::Database;
use dispatcher::Dispatcher;
use std::path::PathBuf;
use std::time::Duration;
use telegram::{TelegramClient, UpdatePoller};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pause after a failed poll so a dead network does not spin the loop
const POLL_RETRY_DELAY: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fitlog_bot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration
    let token = std::env::var("BOT_TOKEN")
        .map_err(|_| "BOT_TOKEN is not set; the bot cannot start without it")?;

    let db_path = std::env::var("FITLOG_DB_PATH").unwrap_or_else(|_| "trainings.db".to_string());
    let api_base = std::env::var("TELEGRAM_API_URL").ok();

    // Ensure database directory exists
    if let Some(parent) = PathBuf::from(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Initialize database
    tracing::info!(path = %db_path, "Opening database");
    let db = Database::open(&db_path)?;

    let client = TelegramClient::new(&token, api_base.as_deref());
    let mut dispatcher = Dispatcher::new(db, client.clone());
    let mut poller = UpdatePoller::new(client);

    tracing::info!("Bot started, polling for updates");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
            batch = poller.next_batch() => match batch {
                Ok(messages) => {
                    for message in messages {
                        dispatcher.handle(message.user_id, &message.text).await;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Polling failed, backing off");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                }
            }
        }
    }

    Ok(())
}
