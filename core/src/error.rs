use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Messaging credential not configured (set TELEGRAM_API_KEY)")]
    MissingCredential,

    #[error("Telegram API rejected the request: {description}")]
    Telegram { description: String },

    #[error("Player store unavailable: a previous operation panicked while holding it")]
    StoreUnavailable,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type GameResult<T> = Result<T, GameError>;
