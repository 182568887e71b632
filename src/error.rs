use std::fmt::Display;

use thiserror::Error;

/// Failure taxonomy of the ingestion pipeline. Fetch, missing-data and
/// malformed-document errors are scoped to a single game; persistence
/// errors poison the current batch; configuration errors abort a run
/// before any fetching happens.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("fetching game {game_id} failed: {reason}")]
    Fetch { game_id: String, reason: String },

    #[error("game {game_id}: document is missing {what}")]
    MissingData { game_id: String, what: &'static str },

    #[error("game {game_id}: malformed document: {source}")]
    MalformedDocument {
        game_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("batch persistence failed: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("storage configuration: {0}")]
    Configuration(String),
}

impl IngestError {
    pub fn fetch(game_id: &str, reason: impl Display) -> Self {
        IngestError::Fetch {
            game_id: game_id.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn missing_data(game_id: &str, what: &'static str) -> Self {
        IngestError::MissingData {
            game_id: game_id.to_string(),
            what,
        }
    }
}
