use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::metrics::Metrics;
use super::scenario::{AllocationConfig, Decision, InvestmentFocus, Scenario};
use super::state::{infer_bridges_stage, infer_change_curve, BridgesStage, ChangeCurvePhase, GameState};

/// A team's submitted answer to one decision: an option id for a choice, a
/// numeric split for an allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmittedDecision {
    Choice(String),
    Allocation(Vec<f64>),
}

/// Accumulated answers for the active round, keyed by decision id.
pub type SubmittedDecisions = BTreeMap<String, SubmittedDecision>;

/// Everything one resolution produces: the next state, a summary line, the
/// outcome text per resolved decision (scenario order), and the theme tags
/// the chosen options activated.
#[derive(Debug, Clone, Serialize)]
pub struct RoundResult {
    pub state: GameState,
    pub summary: String,
    pub outcomes: Vec<String>,
    pub themes: Vec<String>,
}

/// Errors the resolver itself can raise. Missing or unknown submissions are
/// not among them: the resolver skips those, and completeness is enforced
/// upstream at submission time.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("decision {id} uses an unsupported decision type")]
    UnsupportedDecision { id: String },
}

/// Resolve one round: sum the chosen deltas, reweight them for the current
/// stage and metric extremes, apply and clamp, then re-infer the categorical
/// state from the new vector.
pub fn resolve_round(
    current: &GameState,
    scenario: &Scenario,
    submitted: &SubmittedDecisions,
) -> Result<RoundResult, EngineError> {
    let mut total = Metrics::ZERO;
    let mut themes: Vec<String> = Vec::new();
    let mut outcomes: Vec<String> = Vec::new();

    for decision in &scenario.decisions {
        match decision {
            Decision::Choice { id, options, .. } => {
                let Some(SubmittedDecision::Choice(option_id)) = submitted.get(*id) else {
                    continue;
                };
                let Some(option) = options.iter().find(|option| option.id == option_id) else {
                    continue;
                };
                total = total.add(option.deltas);
                if let Some(theme) = option.theme {
                    themes.push(theme.to_string());
                }
                outcomes.push(option.outcome_text.to_string());
            }
            Decision::Allocation {
                id,
                config,
                outcome_text,
                ..
            } => {
                let Some(SubmittedDecision::Allocation(split)) = submitted.get(*id) else {
                    continue;
                };
                total = total.add(allocation_impact(split, config));
                outcomes.push(outcome_text.to_string());
            }
            Decision::Ranking { id, .. } => {
                return Err(EngineError::UnsupportedDecision { id: id.to_string() });
            }
        }
    }

    let adjusted = apply_contextual_modifiers(total, &themes, current);
    let new_metrics = current.metrics.add(adjusted).clamp();

    let curve = infer_change_curve(&new_metrics, scenario.round_number);
    let stage = infer_bridges_stage(&new_metrics, scenario.round_number, curve);

    let summary = format!(
        "Round {} complete. Stage: {} / {}. CA:{:.0} TR:{:.0} RS:{:.0}",
        scenario.round_number,
        stage.label(),
        curve.label(),
        new_metrics.ca,
        new_metrics.tr,
        new_metrics.rs,
    );

    Ok(RoundResult {
        state: GameState {
            metrics: new_metrics,
            bridges_stage: stage,
            curve_phase: curve,
        },
        summary,
        outcomes,
        themes,
    })
}

/// Convert an allocation split into a delta vector. Each focused category is
/// independently mapped through a three-tier step function of its share of
/// the budget, and the per-category partials are summed.
fn allocation_impact(split: &[f64], config: &AllocationConfig) -> Metrics {
    let budget = config.effective_budget();
    let mut impact = Metrics::ZERO;

    for (category, amount) in config.categories.iter().zip(split) {
        let Some(focus) = category.focus else {
            continue;
        };
        impact = impact.add(focus_impact(focus, amount / budget));
    }

    impact
}

fn focus_impact(focus: InvestmentFocus, fraction: f64) -> Metrics {
    let m = |ca, ee, tr, rs, lc, mo| Metrics {
        bp: 0.0,
        ca,
        ee,
        tr,
        rs,
        lc,
        mo,
    };

    match focus {
        InvestmentFocus::Training => {
            if fraction > 0.40 {
                m(8.0, 5.0, 4.0, -6.0, 0.0, 6.0)
            } else if fraction > 0.25 {
                m(4.0, 2.0, 2.0, -3.0, 0.0, 3.0)
            } else {
                m(0.0, -2.0, -1.0, 2.0, 0.0, 0.0)
            }
        }
        InvestmentFocus::Communication => {
            if fraction > 0.40 {
                m(0.0, 0.0, 8.0, -8.0, 6.0, 5.0)
            } else if fraction > 0.25 {
                m(0.0, 0.0, 4.0, -4.0, 3.0, 2.0)
            } else {
                m(0.0, 0.0, -2.0, 5.0, -2.0, -1.0)
            }
        }
        InvestmentFocus::Support => {
            if fraction > 0.40 {
                m(4.0, 8.0, 5.0, -6.0, 0.0, 0.0)
            } else if fraction > 0.25 {
                m(2.0, 4.0, 2.0, -3.0, 0.0, 0.0)
            } else {
                m(-1.0, -3.0, -1.0, 4.0, 0.0, 0.0)
            }
        }
    }
}

/// Reweight the summed delta vector against the pre-round categorical state,
/// the activated themes, and metric extremes. Each rule rescales components
/// multiplicatively; qualifying themes compound.
fn apply_contextual_modifiers(deltas: Metrics, themes: &[String], current: &GameState) -> Metrics {
    let mut modified = deltas;
    let stage = current.bridges_stage;
    let curve = current.curve_phase;

    // Emotional-response amplification while the organization is still
    // letting go: empathy pays off more, pressure backfires harder.
    let raw_phase = (stage == BridgesStage::Ending
        && (curve == ChangeCurvePhase::Shock || curve == ChangeCurvePhase::Denial))
        || curve == ChangeCurvePhase::Anger;
    if raw_phase {
        for theme in themes {
            match theme.as_str() {
                "acknowledge_loss" | "listen" => {
                    modified.tr *= 1.3;
                    modified.rs *= 1.2;
                }
                "overconfident" | "force" => {
                    modified.rs *= 1.4;
                    modified.ee *= 1.2;
                }
                _ => {}
            }
        }
    }

    if stage == BridgesStage::NeutralZone && themes.iter().any(|theme| theme == "capability") {
        modified.ca *= 1.4;
        modified.mo *= 1.3;
    }

    if stage == BridgesStage::NewBeginning && themes.iter().any(|theme| theme == "reinforce") {
        modified.ca *= 1.2;
        modified.mo *= 1.2;
    }

    // Momentum and resistance act on the current (pre-round) metrics.
    if current.metrics.mo > 70.0 {
        modified.ca *= 1.2;
    }
    if current.metrics.rs > 70.0 {
        if modified.ee < 0.0 {
            modified.ee *= 1.3;
        }
        if modified.ca > 0.0 {
            modified.ca *= 0.7;
        }
    }

    modified
}
