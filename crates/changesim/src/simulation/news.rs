use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::events::{EventPolarity, RandomEvent};
use super::metrics::Metrics;
use super::state::{BridgesStage, ChangeCurvePhase, GameState};

/// Source channel a news item is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsCategory {
    Employee,
    Department,
    External,
    Rumor,
    Event,
}

impl NewsCategory {
    pub const fn label(self) -> &'static str {
        match self {
            NewsCategory::Employee => "Employee",
            NewsCategory::Department => "Department",
            NewsCategory::External => "External",
            NewsCategory::Rumor => "Rumor",
            NewsCategory::Event => "Event",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl From<EventPolarity> for Sentiment {
    fn from(polarity: EventPolarity) -> Self {
        match polarity {
            EventPolarity::Positive => Sentiment::Positive,
            EventPolarity::Negative => Sentiment::Negative,
            EventPolarity::Neutral => Sentiment::Neutral,
        }
    }
}

/// One entry of the in-game news feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub category: NewsCategory,
    pub text: String,
    pub sentiment: Sentiment,
}

static NEWS_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_news_id() -> String {
    let id = NEWS_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("news-{id:05}")
}

fn item(category: NewsCategory, sentiment: Sentiment, text: &str) -> NewsItem {
    NewsItem {
        id: next_news_id(),
        timestamp: Utc::now(),
        category,
        text: text.to_string(),
        sentiment,
    }
}

impl NewsItem {
    /// The distinguished feed entry announcing an exogenous event.
    pub fn for_event(round: u8, event: &RandomEvent) -> NewsItem {
        NewsItem {
            id: format!("event-{round}"),
            timestamp: Utc::now(),
            category: NewsCategory::Event,
            text: format!("{}: {}", event.title, event.description),
            sentiment: event.polarity.into(),
        }
    }
}

/// Derive the round's flavor-text feed from metric thresholds, the round
/// number, activated themes, and the categorical state. Condition order is
/// significant: when more than four fire, the first four win.
pub fn generate_news_for_round(
    round: u8,
    metrics: &Metrics,
    state: &GameState,
    themes: &[String],
) -> Vec<NewsItem> {
    use NewsCategory::{Department, Employee, External, Rumor};
    use Sentiment::{Negative, Neutral, Positive};

    let mut news = Vec::new();
    let has_theme = |tag: &str| themes.iter().any(|theme| theme == tag);

    if metrics.ee < 40.0 {
        news.push(item(
            Employee,
            Negative,
            "\"I'm exhausted. Another initiative that means more work with less support.\"",
        ));
    } else if metrics.ee > 70.0 {
        news.push(item(
            Employee,
            Positive,
            "\"Finally seeing how this benefits us. The training actually helped!\"",
        ));
    }

    if metrics.tr < 40.0 {
        news.push(item(
            Rumor,
            Negative,
            "Rumor mill: \"They say one thing but do another. Why should we believe them?\"",
        ));
    } else if metrics.tr > 70.0 {
        news.push(item(
            Department,
            Positive,
            "HR Update: Employee confidence surveys show marked improvement in leadership trust.",
        ));
    }

    if metrics.rs > 70.0 {
        news.push(item(
            Department,
            Negative,
            "Operations: Multiple teams report workarounds to avoid new processes.",
        ));
    } else if metrics.rs < 30.0 {
        news.push(item(
            Department,
            Positive,
            "Sales: Early adoption exceeding expectations. Team morale high.",
        ));
    }

    if metrics.ca > 60.0 {
        news.push(item(
            Department,
            Positive,
            "IT: System adoption at 75%. Champions program showing real impact.",
        ));
    } else if metrics.ca < 35.0 {
        news.push(item(
            Employee,
            Negative,
            "\"Nobody showed us how to use the new system. We're making it up as we go.\"",
        ));
    }

    if metrics.lc < 40.0 {
        news.push(item(
            Rumor,
            Negative,
            "Corridor talk: \"Leadership doesn't understand what it's like on the ground.\"",
        ));
    }

    if metrics.mo > 65.0 {
        news.push(item(
            Department,
            Positive,
            "Change Office: Quick wins generating genuine excitement across divisions.",
        ));
    }

    if round == 2 {
        news.push(item(
            External,
            Neutral,
            "Industry News: Competitor announces parallel transformation. Market watching closely.",
        ));
    }

    if round == 4 {
        news.push(item(
            External,
            Negative,
            "Analyst Report: Early indicators suggest transformation timeline may slip.",
        ));
    }

    if has_theme("acknowledge_loss") {
        news.push(item(
            Employee,
            Positive,
            "\"Leadership actually listened. First time someone acknowledged what we're giving up.\"",
        ));
    }

    if has_theme("overconfident") {
        news.push(item(
            Rumor,
            Negative,
            "Water cooler: \"They think this is easy. Have they even talked to anyone doing the work?\"",
        ));
    }

    if has_theme("force") {
        news.push(item(
            Employee,
            Negative,
            "\"Comply or else. Not exactly inspiring, is it?\"",
        ));
    }

    if has_theme("capability") {
        news.push(item(
            Department,
            Positive,
            "Learning & Development: Training completion rates ahead of plan. Skills gaps closing.",
        ));
    }

    if state.bridges_stage == BridgesStage::NeutralZone {
        news.push(item(
            Employee,
            Neutral,
            "\"Everything feels uncertain. Old ways gone, new ways not working yet.\"",
        ));
    }

    if state.curve_phase == ChangeCurvePhase::Anger {
        news.push(item(
            Rumor,
            Negative,
            "Anonymous feedback: \"Why are we destroying what worked? This feels reckless.\"",
        ));
    }

    if state.curve_phase == ChangeCurvePhase::Commitment {
        news.push(item(
            Department,
            Positive,
            "All Hands Feedback: \"Seeing the vision now. This is going somewhere good.\"",
        ));
    }

    news.truncate(4);
    news
}

/// The fixed three-item feed every session opens with.
pub fn generate_starting_news() -> Vec<NewsItem> {
    vec![
        item(
            NewsCategory::External,
            Sentiment::Neutral,
            "Board Announcement: Major digital transformation initiative launched. Timeline: 18 months.",
        ),
        item(
            NewsCategory::Employee,
            Sentiment::Negative,
            "\"Here we go again. Another change program...\"",
        ),
        item(
            NewsCategory::Rumor,
            Sentiment::Negative,
            "Rumor mill: \"Is this really about digital or are there redundancies coming?\"",
        ),
    ]
}
