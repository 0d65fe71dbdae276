//! Tap-to-earn game backend.
//!
//! Two front doors share one player ledger:
//!   - `game_api`: the HTTP endpoints the web clicker calls
//!   - `chat`:     the `/start` and `/balance` bot commands
//!
//! They never call each other. All shared state lives in `store::PlayerStore`.

pub mod broadcast;
pub mod chat;
pub mod config;
pub mod error;
pub mod game_api;
pub mod messenger;
pub mod store;
pub mod telegram;
pub mod types;
