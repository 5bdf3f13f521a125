use thiserror::Error;

use super::domain::{GameCode, GameSession};

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session {0} already exists")]
    Duplicate(GameCode),
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Storage boundary for session aggregates. The in-memory adapter lives in
/// the API service; anything durable would implement the same trait.
pub trait SessionStore: Send + Sync {
    fn insert(&self, session: GameSession) -> Result<(), SessionStoreError>;
    fn update(&self, session: GameSession) -> Result<(), SessionStoreError>;
    fn fetch(&self, code: &GameCode) -> Result<Option<GameSession>, SessionStoreError>;
}
