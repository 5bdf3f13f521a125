use rand::Rng;
use serde::{Deserialize, Serialize};

use super::metrics::Metrics;

/// Selection-weighting and display polarity of an exogenous event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPolarity {
    Positive,
    Negative,
    Neutral,
}

/// A catalog entry describing one exogenous shock. The impact vector is
/// applied directly to the already-finalized post-round metrics, outside the
/// normal delta pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct RandomEvent {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub impact: Metrics,
    pub polarity: EventPolarity,
}

const fn d(bp: f64, ca: f64, ee: f64, tr: f64, rs: f64, lc: f64, mo: f64) -> Metrics {
    Metrics {
        bp,
        ca,
        ee,
        tr,
        rs,
        lc,
        mo,
    }
}

fn event_catalog() -> Vec<RandomEvent> {
    use EventPolarity::{Negative, Neutral, Positive};

    vec![
        RandomEvent {
            id: "event_champion_emerge",
            title: "Unexpected Champion Emerges",
            description: "A respected mid-level manager has become a vocal advocate, \
                influencing peers across departments.",
            impact: d(3.0, 8.0, 5.0, 6.0, -10.0, 4.0, 8.0),
            polarity: Positive,
        },
        RandomEvent {
            id: "event_quick_win",
            title: "Early Quick Win Delivered",
            description: "A pilot project exceeded expectations, delivering measurable \
                results ahead of schedule.",
            impact: d(8.0, 6.0, 6.0, 5.0, -8.0, 7.0, 10.0),
            polarity: Positive,
        },
        RandomEvent {
            id: "event_ceo_backing",
            title: "CEO Public Endorsement",
            description: "CEO publicly champions the transformation at an industry \
                conference, signaling unwavering commitment.",
            impact: d(2.0, 5.0, 4.0, 10.0, -12.0, 12.0, 8.0),
            polarity: Positive,
        },
        RandomEvent {
            id: "event_peer_success",
            title: "Peer Company Success Story",
            description: "Similar transformation at competitor yields impressive \
                results, validating your approach.",
            impact: d(4.0, 7.0, 5.0, 8.0, -10.0, 6.0, 9.0),
            polarity: Positive,
        },
        RandomEvent {
            id: "event_innovation",
            title: "Team Innovates Solution",
            description: "A team finds creative workaround to a major blocker, sharing \
                it across the organization.",
            impact: d(6.0, 10.0, 8.0, 5.0, -8.0, 3.0, 12.0),
            polarity: Positive,
        },
        RandomEvent {
            id: "event_champion_resigns",
            title: "Key Change Champion Resigns",
            description: "Your most effective change champion accepts an external \
                offer, citing burnout.",
            impact: d(-5.0, -10.0, -8.0, -6.0, 15.0, -8.0, -12.0),
            polarity: Negative,
        },
        RandomEvent {
            id: "event_department_revolts",
            title: "Department Reverts to Old Ways",
            description: "A major department stops using new systems, citing \
                productivity concerns.",
            impact: d(-8.0, -15.0, -10.0, -10.0, 20.0, -12.0, -15.0),
            polarity: Negative,
        },
        RandomEvent {
            id: "event_budget_cut",
            title: "Budget Cuts Announced",
            description: "Financial pressures force 30% reduction in transformation \
                budget mid-program.",
            impact: d(-6.0, -8.0, -12.0, -15.0, 18.0, -10.0, -10.0),
            polarity: Negative,
        },
        RandomEvent {
            id: "event_exec_turnover",
            title: "Executive Sponsor Departs",
            description: "Your executive sponsor takes a new role. Replacement is \
                skeptical of the initiative.",
            impact: d(-4.0, -6.0, -5.0, -12.0, 15.0, -15.0, -8.0),
            polarity: Negative,
        },
        RandomEvent {
            id: "event_system_failure",
            title: "Major System Outage",
            description: "New platform crashes during peak period, reverting to manual \
                processes for 48 hours.",
            impact: d(-10.0, -12.0, -15.0, -8.0, 20.0, -10.0, -12.0),
            polarity: Negative,
        },
        RandomEvent {
            id: "event_negative_press",
            title: "Negative Press Coverage",
            description: "Industry publication questions the transformation strategy, \
                citing anonymous insider sources.",
            impact: d(-5.0, -5.0, -6.0, -10.0, 12.0, -12.0, -8.0),
            polarity: Negative,
        },
        RandomEvent {
            id: "event_union_concern",
            title: "Union Raises Concerns",
            description: "Employee representatives formally object to pace of change \
                and lack of consultation.",
            impact: d(-3.0, -8.0, -10.0, -12.0, 18.0, -10.0, -10.0),
            polarity: Negative,
        },
        RandomEvent {
            id: "event_competitor_move",
            title: "Competitor Announces Similar Initiative",
            description: "Main competitor launches parallel transformation. Board \
                increases pressure for results.",
            impact: d(0.0, 3.0, -5.0, 0.0, 5.0, -3.0, 5.0),
            polarity: Neutral,
        },
        RandomEvent {
            id: "event_consultant_report",
            title: "External Assessment Results",
            description: "Consultant review highlights both progress and significant \
                remaining challenges.",
            impact: d(2.0, 4.0, -2.0, 3.0, -3.0, 2.0, 3.0),
            polarity: Neutral,
        },
    ]
}

fn sentiment_average(metrics: &Metrics) -> f64 {
    (metrics.ca + metrics.tr + metrics.mo) / 3.0
}

/// Decide whether an exogenous shock fires this round. Only rounds 2–5 are
/// eligible; the base 40% chance grows with metric extremity up to 65%.
pub fn should_trigger_event(round: u8, metrics: &Metrics, rng: &mut impl Rng) -> bool {
    if !(2..=5).contains(&round) {
        return false;
    }

    let extremity = (sentiment_average(metrics) - 50.0).abs();
    let chance = 0.4 + extremity / 200.0;

    rng.gen::<f64>() < chance
}

/// Pick an event uniformly from the polarity-filtered pool: struggling teams
/// draw from the helpful end of the catalog, thriving teams from the
/// challenging end.
pub fn select_random_event(metrics: &Metrics, _round: u8, rng: &mut impl Rng) -> RandomEvent {
    let average = sentiment_average(metrics);
    let catalog = event_catalog();

    let pool: Vec<RandomEvent> = if average < 40.0 {
        catalog
            .into_iter()
            .filter(|event| event.polarity != EventPolarity::Negative)
            .collect()
    } else if average > 65.0 {
        catalog
            .into_iter()
            .filter(|event| event.polarity != EventPolarity::Positive)
            .collect()
    } else {
        catalog
    };

    let index = rng.gen_range(0..pool.len());
    pool[index].clone()
}
