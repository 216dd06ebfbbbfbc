//! Errors raised while polling, decoding, storing or serving FundMe events.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The RPC refused the request itself; retrying the same call cannot help.
    #[error("getEvents rejected ({code}): {message}")]
    RpcRejected { code: i64, message: String },

    #[error("getEvents returned neither a result nor an error")]
    EmptyResult,

    /// An event from the watched contract that does not have the shape the
    /// FundMe contract publishes.
    #[error("event {id} is not a FundMe event: {reason}")]
    UndecodableEvent { id: String, reason: String },
}

impl IndexerError {
    pub fn undecodable(id: &str, reason: impl Into<String>) -> Self {
        Self::UndecodableEvent {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IndexerError>;
