//! Best-effort fan-out of one message to every registered player.

use crate::{
    error::{GameError, GameResult},
    messenger::Messenger,
    store::PlayerStore,
    types::ChatId,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed(String),
}

/// Per-recipient results, in the order recipients were attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub outcomes: Vec<(ChatId, DeliveryOutcome)>,
}

impl BroadcastReport {
    pub fn delivered(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == DeliveryOutcome::Delivered)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }
}

/// Send `text` to every player. `messenger` is `None` when no credential is
/// configured, which aborts before touching the store.
///
/// A failure for one recipient is recorded and logged; the rest still get
/// their attempt. No retry.
pub async fn broadcast(
    store: &PlayerStore,
    messenger: Option<&dyn Messenger>,
    text: &str,
) -> GameResult<BroadcastReport> {
    let Some(messenger) = messenger else {
        log::warn!("broadcast skipped: no messaging credential configured");
        return Err(GameError::MissingCredential);
    };

    let recipients = store.list_chat_ids()?;
    let mut report = BroadcastReport::default();
    for chat_id in recipients {
        let outcome = match messenger.send_message(&chat_id, text).await {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(e) => {
                log::warn!("broadcast to {chat_id} failed: {e}");
                DeliveryOutcome::Failed(e.to_string())
            }
        };
        report.outcomes.push((chat_id, outcome));
    }

    log::info!(
        "broadcast finished: {} delivered, {} failed",
        report.delivered(),
        report.failed()
    );
    Ok(report)
}
