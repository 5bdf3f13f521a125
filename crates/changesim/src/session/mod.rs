//! Multiplayer session layer: game lifecycle, facilitator authorization,
//! submission validation, and the HTTP surface around the simulation core.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    FacilitatorKey, GameCode, GameSession, Player, PlayerId, RoundLogEntry, NEWS_FEED_LIMIT,
};
pub use repository::{SessionStore, SessionStoreError};
pub use router::session_router;
pub use service::{
    GameCreated, GameService, RoundResolved, SessionError, SessionView, SubmissionError,
};
