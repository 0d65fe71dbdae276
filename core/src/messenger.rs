//! Outbound chat transport.
//!
//! Everything that pushes a message to a player goes through `Messenger`, so
//! the broadcast path can be exercised without a network.

use crate::error::GameResult;
use async_trait::async_trait;

#[async_trait]
pub trait Messenger: Send + Sync {
    /// Deliver `text` to one chat. No retry.
    async fn send_message(&self, chat_id: &str, text: &str) -> GameResult<()>;
}
