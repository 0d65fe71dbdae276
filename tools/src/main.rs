//! taptoearn-server: HTTP game endpoint plus the chat bot, in one process.
//!
//! Usage:
//!   taptoearn-server --db taptoearn.db --listen 127.0.0.1:5000
//!   taptoearn-server --broadcast "Double coins this weekend!"
//!
//! Environment: TELEGRAM_API_KEY, ADMIN_CHAT_ID, TAPTOEARN_DB,
//! TAPTOEARN_LISTEN, TAPTOEARN_PUBLIC_URL, TELEGRAM_API_BASE.

use anyhow::Result;
use std::env;
use std::sync::Arc;
use taptoearn_core::{
    broadcast::broadcast,
    chat::CommandHandler,
    config::AppConfig,
    error::GameError,
    game_api::{self, AppState},
    messenger::Messenger,
    store::PlayerStore,
    telegram::{self, TelegramClient},
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = AppConfig::from_env();
    if let Some(db) = flag_value(&args, "--db") {
        config.db_path = db;
    }
    if let Some(listen) = flag_value(&args, "--listen") {
        config.listen_addr = listen;
    }

    let store = Arc::new(PlayerStore::open(&config.db_path)?);
    store.ensure_schema()?;

    // Missing credential disables the bot, never the HTTP side.
    let telegram = match TelegramClient::from_config(&config) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            log::warn!("{e}; chat bot and broadcast disabled");
            None
        }
    };

    if let Some(text) = flag_value(&args, "--broadcast") {
        return run_broadcast(&store, telegram.as_deref(), &text).await;
    }

    if let Some(client) = telegram {
        let handler = CommandHandler::new(store.clone(), config.clone());
        let admin = config.admin_chat_id.clone();
        tokio::spawn(async move {
            telegram::run_polling(&client, &handler, admin.as_deref()).await;
            log::error!("chat poller stopped; HTTP keeps serving");
        });
    }

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    log::info!("game server listening on http://{}", config.listen_addr);
    axum::serve(listener, game_api::router(AppState::new(store)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn run_broadcast(
    store: &PlayerStore,
    client: Option<&TelegramClient>,
    text: &str,
) -> Result<()> {
    let messenger = client.map(|c| c as &dyn Messenger);
    match broadcast(store, messenger, text).await {
        Ok(report) => {
            println!("=== BROADCAST ===");
            println!("  recipients: {}", report.outcomes.len());
            println!("  delivered:  {}", report.delivered());
            println!("  failed:     {}", report.failed());
            Ok(())
        }
        Err(GameError::MissingCredential) => {
            println!("Broadcast not sent: TELEGRAM_API_KEY is not set.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("could not listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("shutting down");
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].clone())
}
