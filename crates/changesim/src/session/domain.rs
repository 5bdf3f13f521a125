use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::simulation::{
    generate_starting_news, GameState, MetricSnapshot, NewsItem, RandomEvent, SubmittedDecisions,
};

/// Feed entries beyond this window are dropped oldest-first.
pub const NEWS_FEED_LIMIT: usize = 15;

/// Shareable six-character code players use to find a session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameCode(pub String);

impl fmt::Display for GameCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Secret handed to the session creator; start and resolve require it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilitatorKey(pub String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

/// Audit record of one resolved round.
#[derive(Debug, Clone, Serialize)]
pub struct RoundLogEntry {
    pub round: u8,
    pub decisions: SubmittedDecisions,
    pub outcomes: Vec<String>,
    pub summary: String,
    pub event: Option<RandomEvent>,
}

/// The mutable per-session aggregate. Owned by exactly one session store
/// entry; the service is the single writer.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub code: GameCode,
    pub facilitator_key: FacilitatorKey,
    pub players: BTreeMap<PlayerId, Player>,
    pub current_round: u8,
    pub state: GameState,
    pub submitted: SubmittedDecisions,
    pub all_submitted: bool,
    pub started: bool,
    pub ended: bool,
    pub news_feed: Vec<NewsItem>,
    pub metric_history: Vec<MetricSnapshot>,
    pub active_event: Option<RandomEvent>,
    pub log: Vec<RoundLogEntry>,
}

impl GameSession {
    /// Fresh session: opening state, seeded news feed, and a round-0 history
    /// entry so charts have a baseline before the first resolution.
    pub fn new(code: GameCode, facilitator_key: FacilitatorKey) -> Self {
        let state = GameState::opening();
        Self {
            code,
            facilitator_key,
            players: BTreeMap::new(),
            current_round: 1,
            state,
            submitted: SubmittedDecisions::new(),
            all_submitted: false,
            started: false,
            ended: false,
            news_feed: generate_starting_news(),
            metric_history: vec![MetricSnapshot {
                round: 0,
                metrics: state.metrics,
            }],
            active_event: None,
            log: Vec::new(),
        }
    }

    /// Append feed entries, keeping only the most recent window.
    pub fn push_news(&mut self, items: impl IntoIterator<Item = NewsItem>) {
        self.news_feed.extend(items);
        if self.news_feed.len() > NEWS_FEED_LIMIT {
            let excess = self.news_feed.len() - NEWS_FEED_LIMIT;
            self.news_feed.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::generate_starting_news;

    fn session() -> GameSession {
        GameSession::new(
            GameCode("TEST01".to_string()),
            FacilitatorKey("key".to_string()),
        )
    }

    #[test]
    fn new_sessions_are_seeded_with_news_and_history() {
        let session = session();
        assert_eq!(session.news_feed.len(), 3);
        assert_eq!(session.metric_history.len(), 1);
        assert_eq!(session.metric_history[0].round, 0);
        assert_eq!(session.current_round, 1);
        assert!(!session.started);
    }

    #[test]
    fn news_feed_keeps_only_the_recent_window() {
        let mut session = session();
        for _ in 0..6 {
            session.push_news(generate_starting_news());
        }
        assert_eq!(session.news_feed.len(), NEWS_FEED_LIMIT);
    }
}
