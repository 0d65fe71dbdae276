//! Shared primitive types used across the entire backend.

use serde::{Deserialize, Serialize};

/// A player's chat identifier. Also the primary key of the ledger.
pub type ChatId = String;

/// Coins. Fractional amounts are allowed by the schema.
pub type Coins = f64;

/// Display name stored when the chat platform gives us none.
pub const ANONYMOUS_USERNAME: &str = "Anonymous";

/// One row of the `players` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub chat_id:   ChatId,
    pub username:  String,
    pub balance:   Coins,
    pub per_click: Coins,
    pub referrer:  Option<ChatId>,
}

/// Aggregate view returned to the web client by `GET /api/state`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub balance:   Coins,
    pub per_click: Coins,
}

impl Default for GameState {
    /// Empty ledger: nothing earned, one coin per click.
    fn default() -> Self {
        Self { balance: 0.0, per_click: 1.0 }
    }
}

/// Outcome of a `/start` registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registration {
    /// A new row was created. False on repeat `/start`.
    pub inserted:          bool,
    /// The named referrer existed and received the bonus.
    pub referrer_credited: bool,
}
