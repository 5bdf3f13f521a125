//! Round-resolution core: the pure functions that turn a round of submitted
//! decisions plus the current organizational state into the next state,
//! outcome narrative, score, exogenous events, and news.

pub mod engine;
pub mod events;
pub mod metrics;
pub mod news;
pub mod scenario;
pub mod scoring;
pub mod state;

pub use engine::{resolve_round, EngineError, RoundResult, SubmittedDecision, SubmittedDecisions};
pub use events::{select_random_event, should_trigger_event, EventPolarity, RandomEvent};
pub use metrics::{MetricKind, MetricSnapshot, Metrics};
pub use news::{generate_news_for_round, generate_starting_news, NewsCategory, NewsItem, Sentiment};
pub use scenario::{
    AllocationCategory, AllocationConfig, Decision, DecisionOption, InvestmentFocus, Scenario,
    ScenarioCatalog,
};
pub use scoring::{calculate_score, FinalScore, ScoreTier};
pub use state::{BridgesStage, ChangeCurvePhase, GameState};
