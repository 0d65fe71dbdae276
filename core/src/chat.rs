//! Chat command handlers.
//!
//! Handlers are transport-agnostic: they take a chat id and arguments, touch
//! the store, and return the reply text. `telegram::run_polling` feeds them.

use crate::{
    config::AppConfig,
    error::GameResult,
    store::PlayerStore,
    types::ANONYMOUS_USERNAME,
};
use std::sync::Arc;

pub const UNREGISTERED_REPLY: &str =
    "You are not registered yet. Send /start to begin.";
pub const FAILURE_REPLY: &str =
    "Something went wrong while processing your request. Please try again later.";

/// A command the bot understands. Everything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Start { referrer: Option<String> },
    Balance,
}

impl ChatCommand {
    /// Parse `/start`, `/start <ref>`, `/balance`, with or without a
    /// `@BotName` suffix on the command.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split_whitespace();
        let head = parts.next()?;
        let name = head.split('@').next().unwrap_or(head);
        match name {
            "/start"   => Some(Self::Start { referrer: parts.next().map(str::to_string) }),
            "/balance" => Some(Self::Balance),
            _ => None,
        }
    }
}

/// A text message from a player, already stripped of transport details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat_id:  String,
    pub username: Option<String>,
    pub text:     String,
}

pub struct CommandHandler {
    store:  Arc<PlayerStore>,
    config: AppConfig,
}

impl CommandHandler {
    pub fn new(store: Arc<PlayerStore>, config: AppConfig) -> Self {
        Self { store, config }
    }

    /// `/start [referrer]`: register the caller, pay the referrer, and hand
    /// back the caller's own referral link.
    pub fn start(
        &self,
        chat_id: &str,
        username: Option<&str>,
        referrer: Option<&str>,
    ) -> GameResult<String> {
        let outcome = self
            .store
            .register(chat_id, username, referrer, self.config.referral_bonus)?;
        if outcome.inserted {
            log::info!("registered player {chat_id} (referrer: {referrer:?})");
        }
        if outcome.referrer_credited {
            if let Some(r) = referrer {
                log::info!("referral bonus {} paid to {r} for {chat_id}", self.config.referral_bonus);
            }
        }

        let name = username.unwrap_or(ANONYMOUS_USERNAME);
        Ok(format!(
            "👋 Welcome {name}!\n\
             Your game link: {}\n\
             💰 Tap in the game to mine coins!",
            self.config.referral_link(chat_id)
        ))
    }

    /// `/balance`: the caller's coins, or a prompt to register.
    pub fn balance(&self, chat_id: &str) -> GameResult<String> {
        Ok(match self.store.get_balance(chat_id)? {
            Some(balance) => format!("💰 Your balance: {balance:.0} coins"),
            None => UNREGISTERED_REPLY.to_string(),
        })
    }

    /// Route one inbound message. `None` means the text was not a command.
    /// Store failures become an error reply rather than silence.
    pub fn handle(&self, msg: &IncomingMessage) -> Option<String> {
        let command = ChatCommand::parse(&msg.text)?;
        let result = match &command {
            ChatCommand::Start { referrer } => {
                self.start(&msg.chat_id, msg.username.as_deref(), referrer.as_deref())
            }
            ChatCommand::Balance => self.balance(&msg.chat_id),
        };
        Some(result.unwrap_or_else(|e| {
            log::error!("chat {}: {command:?} failed: {e}", msg.chat_id);
            FAILURE_REPLY.to_string()
        }))
    }
}
