//! Slayd Bot: a Telegram bot that builds PowerPoint decks.
//!
//! Users sign up with `/start`, spend credits on decks, and earn credits by
//! referring others.

mod config;
mod inbound;
mod telegram;

use std::sync::Arc;

use conversation::Conversation;
use database::{user, Database};
use deck_core::DeckGenerator;
use pptx_deck::PptxGenerator;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::telegram::TelegramSink;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    if let Some(dir) = &config.database_dir {
        std::fs::create_dir_all(dir)?;
    }

    // Connect to database
    let db = Database::connect_with_pool_size(&config.database_url, config.pool_size).await?;
    db.migrate().await?;
    info!("Database ready with {} users", user::count_users(db.pool()).await?);

    let bot = Bot::new(&config.token);
    let generator: Arc<dyn DeckGenerator> = Arc::new(PptxGenerator::new());
    info!("Generating decks with {}", generator.name());

    let conversation = Arc::new(
        Conversation::with_database(db.clone(), generator, TelegramSink::new(bot.clone()))
            .with_deck_file_name(config.deck_file_name.clone()),
    );

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(inbound::on_message))
        .branch(Update::filter_callback_query().endpoint(inbound::on_callback));

    info!("Slayd bot polling for updates");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![conversation])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    db.close().await;
    info!("Slayd bot stopped");
    Ok(())
}
