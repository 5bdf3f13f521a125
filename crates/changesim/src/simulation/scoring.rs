use serde::{Deserialize, Serialize};

use super::metrics::Metrics;

/// Qualitative band for the terminal composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Thriving,
    Stabilising,
    Struggling,
    Failing,
}

impl ScoreTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Thriving => "Thriving",
            Self::Stabilising => "Stabilising",
            Self::Struggling => "Struggling",
            Self::Failing => "Failing",
        }
    }

    fn for_score(score: u8) -> Self {
        if score >= 75 {
            Self::Thriving
        } else if score >= 60 {
            Self::Stabilising
        } else if score >= 40 {
            Self::Struggling
        } else {
            Self::Failing
        }
    }
}

/// Composite terminal score with its qualitative band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    pub score: u8,
    pub tier: ScoreTier,
}

/// Weighted composite of the terminal metric vector. Adoption carries the
/// most weight; resistance counts inverted. The weights sum to 1.10, so the
/// raw sum is normalized back to a 0–100 scale before rounding.
pub fn calculate_score(metrics: &Metrics) -> FinalScore {
    let raw = metrics.ca * 0.30
        + metrics.tr * 0.20
        + metrics.lc * 0.20
        + metrics.mo * 0.15
        + metrics.bp * 0.15
        + (100.0 - metrics.rs) * 0.10;

    let score = (raw / 1.10).round() as u8;

    FinalScore {
        score,
        tier: ScoreTier::for_score(score),
    }
}
