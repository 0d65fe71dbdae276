//! Process configuration.
//!
//! RULE: Configuration is read once, at startup, and handed to each component
//! by value. Nothing in `core` reads the environment on its own.

use crate::types::Coins;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DB_PATH: &str = "taptoearn.db";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_PUBLIC_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub const REFERRAL_BONUS: Coins = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bot API token. `None` disables the chat poller and broadcast.
    pub telegram_api_key:  Option<String>,
    /// Chat that receives the startup notice.
    pub admin_chat_id:     Option<String>,
    pub db_path:           String,
    pub listen_addr:       String,
    /// Base of the game link handed out in the welcome message.
    pub public_url:        String,
    pub telegram_api_base: String,
    pub referral_bonus:    Coins,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            telegram_api_key:  None,
            admin_chat_id:     None,
            db_path:           DEFAULT_DB_PATH.to_string(),
            listen_addr:       DEFAULT_LISTEN_ADDR.to_string(),
            public_url:        DEFAULT_PUBLIC_URL.to_string(),
            telegram_api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
            referral_bonus:    REFERRAL_BONUS,
        }
    }
}

impl AppConfig {
    /// Build from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();
        Self {
            telegram_api_key:  get("TELEGRAM_API_KEY"),
            admin_chat_id:     get("ADMIN_CHAT_ID"),
            db_path:           get("TAPTOEARN_DB").unwrap_or(defaults.db_path),
            listen_addr:       get("TAPTOEARN_LISTEN").unwrap_or(defaults.listen_addr),
            public_url:        get("TAPTOEARN_PUBLIC_URL").unwrap_or(defaults.public_url),
            telegram_api_base: get("TELEGRAM_API_BASE").unwrap_or(defaults.telegram_api_base),
            referral_bonus:    defaults.referral_bonus,
        }
    }

    pub fn messaging_enabled(&self) -> bool {
        self.telegram_api_key.is_some()
    }

    /// Link a player shares so that others register with them as referrer.
    pub fn referral_link(&self, chat_id: &str) -> String {
        format!("{}/?ref={chat_id}", self.public_url.trim_end_matches('/'))
    }
}
