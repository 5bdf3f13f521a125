use serde::{Deserialize, Serialize};

use super::metrics::Metrics;

/// Bridges-model transition phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgesStage {
    Ending,
    NeutralZone,
    NewBeginning,
}

impl BridgesStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ending => "Ending",
            Self::NeutralZone => "Neutral Zone",
            Self::NewBeginning => "New Beginning",
        }
    }
}

/// Emotional-response phase along the change curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCurvePhase {
    Shock,
    Denial,
    Anger,
    Confusion,
    Acceptance,
    Commitment,
}

impl ChangeCurvePhase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Shock => "Shock",
            Self::Denial => "Denial",
            Self::Anger => "Anger",
            Self::Confusion => "Confusion",
            Self::Acceptance => "Acceptance",
            Self::Commitment => "Commitment",
        }
    }
}

/// Metric vector plus the two categorical classifiers derived from it.
///
/// The stage and curve phase are never stored independently of the metrics
/// that produced them; both are recomputed from the post-round vector and the
/// round number every resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub metrics: Metrics,
    pub bridges_stage: BridgesStage,
    pub curve_phase: ChangeCurvePhase,
}

impl GameState {
    /// The state every session starts from, before round 1.
    pub fn opening() -> Self {
        Self {
            metrics: Metrics {
                bp: 50.0,
                ca: 30.0,
                ee: 60.0,
                tr: 55.0,
                rs: 40.0,
                lc: 60.0,
                mo: 35.0,
            },
            bridges_stage: BridgesStage::Ending,
            curve_phase: ChangeCurvePhase::Shock,
        }
    }
}

/// Re-classify the curve phase from the post-round metrics and round number.
///
/// The previous phase is deliberately not an input: the classification has no
/// memory beyond what the metrics themselves encode. First match wins.
pub fn infer_change_curve(metrics: &Metrics, round: u8) -> ChangeCurvePhase {
    match round {
        1 => {
            if metrics.tr < 50.0 {
                ChangeCurvePhase::Denial
            } else {
                ChangeCurvePhase::Shock
            }
        }
        2 => {
            if metrics.tr < 40.0 && metrics.rs > 60.0 {
                ChangeCurvePhase::Anger
            } else {
                ChangeCurvePhase::Confusion
            }
        }
        3 => {
            if metrics.ca < 50.0 {
                ChangeCurvePhase::Confusion
            } else {
                ChangeCurvePhase::Acceptance
            }
        }
        _ => {
            if metrics.ca > 60.0 && metrics.mo > 55.0 {
                ChangeCurvePhase::Commitment
            } else {
                ChangeCurvePhase::Acceptance
            }
        }
    }
}

/// Re-classify the Bridges stage from the post-round metrics, round number,
/// and the freshly inferred curve phase. First match wins.
pub fn infer_bridges_stage(metrics: &Metrics, round: u8, curve: ChangeCurvePhase) -> BridgesStage {
    if round == 1 {
        return BridgesStage::Ending;
    }
    if round >= 5 && metrics.ca > 55.0 && metrics.lc > 50.0 {
        return BridgesStage::NewBeginning;
    }
    if round >= 2 && curve != ChangeCurvePhase::Shock && curve != ChangeCurvePhase::Denial {
        return BridgesStage::NeutralZone;
    }
    BridgesStage::Ending
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_metrics(tr: f64, rs: f64, ca: f64, mo: f64, lc: f64) -> Metrics {
        Metrics {
            bp: 50.0,
            ca,
            ee: 50.0,
            tr,
            rs,
            lc,
            mo,
        }
    }

    #[test]
    fn round_one_trust_boundary_splits_denial_from_shock() {
        let low = with_metrics(49.9, 40.0, 30.0, 35.0, 60.0);
        assert_eq!(infer_change_curve(&low, 1), ChangeCurvePhase::Denial);

        // Exactly 50 is not "below 50".
        let at_boundary = with_metrics(50.0, 40.0, 30.0, 35.0, 60.0);
        assert_eq!(infer_change_curve(&at_boundary, 1), ChangeCurvePhase::Shock);
    }

    #[test]
    fn round_two_anger_requires_both_low_trust_and_high_resistance() {
        let angry = with_metrics(39.0, 61.0, 30.0, 35.0, 60.0);
        assert_eq!(infer_change_curve(&angry, 2), ChangeCurvePhase::Anger);

        let only_low_trust = with_metrics(39.0, 60.0, 30.0, 35.0, 60.0);
        assert_eq!(
            infer_change_curve(&only_low_trust, 2),
            ChangeCurvePhase::Confusion
        );
    }

    #[test]
    fn late_rounds_reach_commitment_on_adoption_and_momentum() {
        let committed = with_metrics(50.0, 40.0, 61.0, 56.0, 60.0);
        assert_eq!(infer_change_curve(&committed, 4), ChangeCurvePhase::Commitment);
        assert_eq!(infer_change_curve(&committed, 6), ChangeCurvePhase::Commitment);

        let stalled = with_metrics(50.0, 40.0, 61.0, 55.0, 60.0);
        assert_eq!(infer_change_curve(&stalled, 5), ChangeCurvePhase::Acceptance);
    }

    #[test]
    fn stage_inference_orders_its_predicates() {
        let strong = with_metrics(70.0, 20.0, 70.0, 70.0, 70.0);

        // Round 1 is always Ending regardless of metrics.
        assert_eq!(
            infer_bridges_stage(&strong, 1, ChangeCurvePhase::Commitment),
            BridgesStage::Ending
        );

        assert_eq!(
            infer_bridges_stage(&strong, 5, ChangeCurvePhase::Commitment),
            BridgesStage::NewBeginning
        );

        // Same metrics in round 3 only qualify for the neutral zone.
        assert_eq!(
            infer_bridges_stage(&strong, 3, ChangeCurvePhase::Acceptance),
            BridgesStage::NeutralZone
        );

        // Shock/Denial keep the organization in Ending.
        assert_eq!(
            infer_bridges_stage(&strong, 2, ChangeCurvePhase::Denial),
            BridgesStage::Ending
        );
    }

    #[test]
    fn opening_state_matches_the_scenario_seed() {
        let opening = GameState::opening();
        assert_eq!(opening.metrics.ca, 30.0);
        assert_eq!(opening.metrics.lc, 60.0);
        assert_eq!(opening.bridges_stage, BridgesStage::Ending);
        assert_eq!(opening.curve_phase, ChangeCurvePhase::Shock);
    }
}
