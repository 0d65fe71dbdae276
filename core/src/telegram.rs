//! Telegram Bot API client and the long-polling command loop.
//!
//! Only the two Bot API methods the game needs are wrapped: `getUpdates`
//! (inbound commands) and `sendMessage` (replies and broadcasts).

use crate::{
    chat::{CommandHandler, IncomingMessage},
    config::AppConfig,
    error::{GameError, GameResult},
    messenger::Messenger,
};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use std::time::Duration;

/// Seconds the Bot API holds a `getUpdates` call open when idle.
pub const POLL_TIMEOUT_SECS: u64 = 30;
/// Pause after a failed poll before trying again.
pub const POLL_BACKOFF: Duration = Duration::from_secs(5);

pub struct TelegramClient {
    http:     reqwest::Client,
    endpoint: String, // {api_base}/bot{token}
}

impl TelegramClient {
    pub fn new(api_base: &str, token: &str) -> Self {
        Self {
            http:     reqwest::Client::new(),
            endpoint: format!("{}/bot{token}", api_base.trim_end_matches('/')),
        }
    }

    /// Fails with `MissingCredential` when no token is configured.
    pub fn from_config(config: &AppConfig) -> GameResult<Self> {
        let token = config
            .telegram_api_key
            .as_deref()
            .ok_or(GameError::MissingCredential)?;
        Ok(Self::new(&config.telegram_api_base, token))
    }

    pub async fn get_updates(&self, offset: Option<i64>) -> GameResult<Vec<Update>> {
        let mut body = json!({
            "timeout": POLL_TIMEOUT_SECS,
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            body["offset"] = json!(offset);
        }
        self.call("getUpdates", &body).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> GameResult<T> {
        let url = format!("{}/{method}", self.endpoint);
        let resp: ApiResponse<T> = self.http.post(url).json(body).send().await?.json().await?;
        match (resp.ok, resp.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(GameError::Telegram {
                description: resp
                    .description
                    .unwrap_or_else(|| format!("{method} returned no result")),
            }),
        }
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_message(&self, chat_id: &str, text: &str) -> GameResult<()> {
        let _: serde_json::Value = self
            .call("sendMessage", &json!({ "chat_id": chat_id, "text": text }))
            .await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok:          bool,
    result:      Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message:   Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(default)]
    pub username: Option<String>,
}

impl Update {
    /// Text messages only; stickers, joins and edits are dropped.
    pub fn into_incoming(self) -> Option<IncomingMessage> {
        let message = self.message?;
        let text = message.text?;
        Some(IncomingMessage {
            chat_id:  message.chat.id.to_string(),
            username: message.from.and_then(|u| u.username),
            text,
        })
    }
}

/// Poll for commands forever, replying through the same client.
///
/// Transport failures are logged and retried after `POLL_BACKOFF`; a failed
/// reply never stops the loop.
pub async fn run_polling(
    client: &TelegramClient,
    handler: &CommandHandler,
    admin_chat_id: Option<&str>,
) {
    if let Some(admin) = admin_chat_id {
        if let Err(e) = client.send_message(admin, "Tap-to-earn bot is online.").await {
            log::warn!("startup notice to admin {admin} failed: {e}");
        }
    }
    log::info!("chat poller online");

    let mut offset: Option<i64> = None;
    loop {
        let updates = match client.get_updates(offset).await {
            Ok(updates) => updates,
            Err(e) => {
                log::warn!("getUpdates failed: {e}; retrying in {}s", POLL_BACKOFF.as_secs());
                tokio::time::sleep(POLL_BACKOFF).await;
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);
            let Some(incoming) = update.into_incoming() else {
                continue;
            };
            log::debug!("chat {}: {}", incoming.chat_id, incoming.text);
            let Some(reply) = handler.handle(&incoming) else {
                continue;
            };
            if let Err(e) = client.send_message(&incoming.chat_id, &reply).await {
                log::warn!("reply to {} failed: {e}", incoming.chat_id);
            }
        }
    }
}
