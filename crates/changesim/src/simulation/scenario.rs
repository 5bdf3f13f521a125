use serde::Serialize;

use super::metrics::Metrics;

/// Role a budget category plays when its share of spend is converted into a
/// metric impact. Declared per category in the catalog so the binding is
/// explicit instead of hanging off array position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentFocus {
    Training,
    Communication,
    Support,
}

/// One spendable category inside an allocation decision. Categories without
/// a focus accept budget but carry no metric impact of their own.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationCategory {
    pub name: &'static str,
    pub focus: Option<InvestmentFocus>,
}

/// Budget configuration for an allocation decision.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationConfig {
    pub categories: Vec<AllocationCategory>,
    pub total_budget: f64,
    pub min_per_category: f64,
}

impl AllocationConfig {
    /// Denominator for category fractions. Falls back to a nominal budget of
    /// 100 per category when the configured total is zero.
    pub fn effective_budget(&self) -> f64 {
        if self.total_budget > 0.0 {
            self.total_budget
        } else {
            self.categories.len() as f64 * 100.0
        }
    }
}

/// A selectable option on a multiple-choice decision.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionOption {
    pub id: &'static str,
    pub label: &'static str,
    pub deltas: Metrics,
    pub theme: Option<&'static str>,
    pub outcome_text: &'static str,
}

/// A decision posed to the team within one round.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Decision {
    Choice {
        id: &'static str,
        prompt: &'static str,
        options: Vec<DecisionOption>,
    },
    Allocation {
        id: &'static str,
        prompt: &'static str,
        config: AllocationConfig,
        outcome_text: &'static str,
    },
    /// Declared by the content format but not resolvable; the engine rejects
    /// scenarios that use it.
    Ranking {
        id: &'static str,
        prompt: &'static str,
    },
}

impl Decision {
    pub fn id(&self) -> &'static str {
        match self {
            Decision::Choice { id, .. }
            | Decision::Allocation { id, .. }
            | Decision::Ranking { id, .. } => id,
        }
    }
}

/// One round of scenario content: title, narrative, and ordered decisions.
#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    pub round_number: u8,
    pub title: &'static str,
    pub narrative: &'static str,
    pub decisions: Vec<Decision>,
}

/// The fixed six-round scenario catalog fed into the engine.
#[derive(Debug, Clone)]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    pub fn standard() -> Self {
        Self {
            scenarios: standard_scenarios(),
        }
    }

    pub fn for_round(&self, round: u8) -> Option<&Scenario> {
        self.scenarios
            .iter()
            .find(|scenario| scenario.round_number == round)
    }

    pub fn rounds(&self) -> u8 {
        self.scenarios.len() as u8
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }
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

fn spend(
    name: &'static str,
    focus: Option<InvestmentFocus>,
) -> AllocationCategory {
    AllocationCategory { name, focus }
}

fn standard_scenarios() -> Vec<Scenario> {
    use InvestmentFocus::{Communication, Support, Training};

    vec![
        Scenario {
            round_number: 1,
            title: "The Case for Change",
            narrative: "The board has announced a major digital transformation. \
                Employees are uncertain. How will you establish the foundation?",
            decisions: vec![
                Decision::Allocation {
                    id: "r1_budget",
                    prompt: "Financial Investment: Allocate £500K transformation budget",
                    config: AllocationConfig {
                        categories: vec![
                            spend("Training & Skills", Some(Training)),
                            spend("Communication", Some(Communication)),
                            spend("Tech & Tools", Some(Support)),
                            spend("Change Support", None),
                        ],
                        total_budget: 500_000.0,
                        min_per_category: 50_000.0,
                    },
                    outcome_text: "Budget allocated across transformation priorities.",
                },
                Decision::Allocation {
                    id: "r1_time",
                    prompt: "Time Investment: Weekly hours dedicated to transformation (per person)",
                    config: AllocationConfig {
                        categories: vec![
                            spend("Change Champions", Some(Training)),
                            spend("Line Managers", Some(Communication)),
                            spend("Team Members", Some(Support)),
                        ],
                        total_budget: 40.0,
                        min_per_category: 5.0,
                    },
                    outcome_text: "Time commitments established.",
                },
                Decision::Allocation {
                    id: "r1_people",
                    prompt: "People Investment: Assign FTEs to transformation roles",
                    config: AllocationConfig {
                        categories: vec![
                            spend("Program Team", Some(Training)),
                            spend("Change Network", Some(Communication)),
                            spend("Technical Specialists", Some(Support)),
                        ],
                        total_budget: 15.0,
                        min_per_category: 2.0,
                    },
                    outcome_text: "Transformation team structure defined.",
                },
                Decision::Choice {
                    id: "r1_d1",
                    prompt: "Communication Strategy: How do you announce the transformation?",
                    options: vec![
                        DecisionOption {
                            id: "A",
                            label: "Town halls with honest Q&A sessions",
                            deltas: d(0.0, 5.0, 3.0, 8.0, -5.0, 6.0, 4.0),
                            theme: Some("acknowledge_loss"),
                            outcome_text: "Transparency builds trust.",
                        },
                        DecisionOption {
                            id: "B",
                            label: "CEO video focusing on opportunities",
                            deltas: d(2.0, 2.0, -4.0, -6.0, 8.0, -3.0, 1.0),
                            theme: Some("overconfident"),
                            outcome_text: "Message feels one-sided.",
                        },
                        DecisionOption {
                            id: "C",
                            label: "Written briefing cascaded through managers",
                            deltas: d(0.0, 3.0, 1.0, 2.0, -2.0, 2.0, 2.0),
                            theme: None,
                            outcome_text: "Mixed reception across teams.",
                        },
                    ],
                },
                Decision::Choice {
                    id: "r1_d2",
                    prompt: "Engagement Approach: How do you involve employees?",
                    options: vec![
                        DecisionOption {
                            id: "A",
                            label: "Form cross-functional design groups",
                            deltas: d(-2.0, 7.0, 5.0, 6.0, -6.0, 4.0, 6.0),
                            theme: Some("acknowledge_loss"),
                            outcome_text: "People feel valued and heard.",
                        },
                        DecisionOption {
                            id: "B",
                            label: "Present consultant-designed solution",
                            deltas: d(3.0, 1.0, -5.0, -5.0, 9.0, -4.0, 0.0),
                            theme: Some("overconfident"),
                            outcome_text: "Feels imposed from above.",
                        },
                        DecisionOption {
                            id: "C",
                            label: "Survey input then decide centrally",
                            deltas: d(1.0, 3.0, 0.0, 1.0, -1.0, 1.0, 2.0),
                            theme: None,
                            outcome_text: "Input gathered but influence unclear.",
                        },
                    ],
                },
                Decision::Choice {
                    id: "r1_d3",
                    prompt: "Implementation Pace: What speed do you set?",
                    options: vec![
                        DecisionOption {
                            id: "A",
                            label: "Aggressive: 12 months, maximum pressure",
                            deltas: d(5.0, -3.0, -8.0, -5.0, 12.0, -4.0, 3.0),
                            theme: None,
                            outcome_text: "Speed creates stress and resistance.",
                        },
                        DecisionOption {
                            id: "B",
                            label: "Measured: 18 months, phased rollout",
                            deltas: d(-2.0, 6.0, 4.0, 5.0, -5.0, 5.0, 5.0),
                            theme: None,
                            outcome_text: "Sustainable pace allows adaptation.",
                        },
                        DecisionOption {
                            id: "C",
                            label: "Adaptive: Adjust based on readiness",
                            deltas: d(0.0, 4.0, 2.0, 3.0, -2.0, 3.0, 3.0),
                            theme: None,
                            outcome_text: "Flexible approach maintains options.",
                        },
                    ],
                },
            ],
        },
        Scenario {
            round_number: 2,
            title: "Letting Go",
            narrative: "Reality is setting in. Roles changing, systems being \
                decommissioned. Anger and resistance surface.",
            decisions: vec![
                Decision::Allocation {
                    id: "r2_budget",
                    prompt: "Additional Budget: Allocate from remaining transformation fund",
                    config: AllocationConfig {
                        categories: vec![
                            spend("Change Support", Some(Training)),
                            spend("Communication", Some(Communication)),
                            spend("Training", Some(Support)),
                            spend("Technical Help", None),
                        ],
                        total_budget: 300_000.0,
                        min_per_category: 0.0,
                    },
                    outcome_text: "Budget allocated for resistance management.",
                },
                Decision::Allocation {
                    id: "r2_time",
                    prompt: "Time Investment: Weekly hours per person for transition support",
                    config: AllocationConfig {
                        categories: vec![
                            spend("One-on-Ones", Some(Training)),
                            spend("Team Workshops", Some(Communication)),
                            spend("Coaching Sessions", Some(Support)),
                        ],
                        total_budget: 25.0,
                        min_per_category: 0.0,
                    },
                    outcome_text: "Time allocated for emotional support.",
                },
                Decision::Choice {
                    id: "r2_d1",
                    prompt: "How handle rising resistance?",
                    options: vec![
                        DecisionOption {
                            id: "A",
                            label: "Listen actively, address concerns",
                            deltas: d(-3.0, 4.0, 5.0, 8.0, -12.0, 6.0, 3.0),
                            theme: Some("listen"),
                            outcome_text: "Difficult but trust builds.",
                        },
                        DecisionOption {
                            id: "B",
                            label: "Crack down on negativity",
                            deltas: d(5.0, -2.0, -8.0, -9.0, 10.0, -7.0, -4.0),
                            theme: Some("force"),
                            outcome_text: "Resistance goes underground.",
                        },
                        DecisionOption {
                            id: "C",
                            label: "Increase positive messaging",
                            deltas: d(1.0, 1.0, -3.0, -4.0, 5.0, -2.0, 0.0),
                            theme: None,
                            outcome_text: "People feel unheard.",
                        },
                    ],
                },
                Decision::Choice {
                    id: "r2_d2",
                    prompt: "How support affected roles?",
                    options: vec![
                        DecisionOption {
                            id: "A",
                            label: "Comprehensive reskilling and support",
                            deltas: d(-4.0, 3.0, 6.0, 9.0, -8.0, 7.0, 4.0),
                            theme: Some("listen"),
                            outcome_text: "Fair treatment acknowledged.",
                        },
                        DecisionOption {
                            id: "B",
                            label: "Minimal support",
                            deltas: d(3.0, -3.0, -10.0, -12.0, 15.0, -9.0, -5.0),
                            theme: Some("force"),
                            outcome_text: "Morale crashes.",
                        },
                        DecisionOption {
                            id: "C",
                            label: "Standard HR package",
                            deltas: d(0.0, 1.0, -2.0, -1.0, 2.0, 0.0, 0.0),
                            theme: None,
                            outcome_text: "Meets minimum expectations.",
                        },
                    ],
                },
            ],
        },
        Scenario {
            round_number: 3,
            title: "The Neutral Zone",
            narrative: "In the messy middle. Old ways gone, new ways not yet \
                working. Confusion is high.",
            decisions: vec![
                Decision::Choice {
                    id: "r3_d1",
                    prompt: "How build capability?",
                    options: vec![
                        DecisionOption {
                            id: "A",
                            label: "Invest in hands-on training",
                            deltas: d(-2.0, 8.0, 6.0, 5.0, -7.0, 4.0, 8.0),
                            theme: Some("capability"),
                            outcome_text: "Teams gain confidence.",
                        },
                        DecisionOption {
                            id: "B",
                            label: "Detailed procedures and oversight",
                            deltas: d(2.0, -1.0, -10.0, -6.0, 12.0, -6.0, -5.0),
                            theme: Some("control"),
                            outcome_text: "Micromanagement stifles learning.",
                        },
                        DecisionOption {
                            id: "C",
                            label: "Online modules and practice",
                            deltas: d(0.0, 3.0, 1.0, 1.0, -2.0, 1.0, 2.0),
                            theme: None,
                            outcome_text: "Standard results.",
                        },
                    ],
                },
                Decision::Allocation {
                    id: "r3_d2",
                    prompt: "Allocate 200 staff hours this week across competing priorities:",
                    config: AllocationConfig {
                        categories: vec![
                            spend("Business As Usual", Some(Training)),
                            spend("Learning New Systems", Some(Communication)),
                            spend("Peer Coaching", Some(Support)),
                        ],
                        total_budget: 200.0,
                        min_per_category: 30.0,
                    },
                    outcome_text: "Time allocation complete. Balance will affect both \
                        current performance and future capability.",
                },
                Decision::Choice {
                    id: "r3_d3",
                    prompt: "How handle productivity dip?",
                    options: vec![
                        DecisionOption {
                            id: "A",
                            label: "Normalize dip, encourage experimentation",
                            deltas: d(-3.0, 6.0, 5.0, 7.0, -8.0, 5.0, 6.0),
                            theme: Some("capability"),
                            outcome_text: "Permission to struggle reduces stress.",
                        },
                        DecisionOption {
                            id: "B",
                            label: "Demand immediate recovery",
                            deltas: d(3.0, -3.0, -9.0, -8.0, 13.0, -7.0, -6.0),
                            theme: Some("control"),
                            outcome_text: "Pressure creates panic.",
                        },
                        DecisionOption {
                            id: "C",
                            label: "Extend some timelines",
                            deltas: d(-1.0, 2.0, 0.0, 1.0, -1.0, 0.0, 1.0),
                            theme: None,
                            outcome_text: "Partial relief helps some.",
                        },
                    ],
                },
            ],
        },
        Scenario {
            round_number: 4,
            title: "Early Adoption",
            narrative: "Pockets of success emerging. Early adopters demonstrate \
                results. Scale what's working.",
            decisions: vec![
                Decision::Allocation {
                    id: "r4_budget",
                    prompt: "Scaling Budget: Allocate resources to spread success",
                    config: AllocationConfig {
                        categories: vec![
                            spend("Champion Network", Some(Training)),
                            spend("Best Practice Sharing", Some(Communication)),
                            spend("Additional Training", Some(Support)),
                        ],
                        total_budget: 250_000.0,
                        min_per_category: 0.0,
                    },
                    outcome_text: "Resources allocated for scaling adoption.",
                },
                Decision::Allocation {
                    id: "r4_time",
                    prompt: "Scaling Time: Weekly hours for adoption activities",
                    config: AllocationConfig {
                        categories: vec![
                            spend("Peer Coaching", Some(Training)),
                            spend("Knowledge Transfer", Some(Communication)),
                            spend("Practice Sessions", Some(Support)),
                        ],
                        total_budget: 20.0,
                        min_per_category: 0.0,
                    },
                    outcome_text: "Time committed to spreading success.",
                },
                Decision::Choice {
                    id: "r4_d1",
                    prompt: "How accelerate adoption?",
                    options: vec![
                        DecisionOption {
                            id: "A",
                            label: "Deploy change champions to coach",
                            deltas: d(2.0, 9.0, 5.0, 6.0, -10.0, 5.0, 9.0),
                            theme: Some("capability"),
                            outcome_text: "Peer support proves powerful.",
                        },
                        DecisionOption {
                            id: "B",
                            label: "Set firm deadlines with consequences",
                            deltas: d(4.0, 2.0, -8.0, -7.0, 11.0, -6.0, -3.0),
                            theme: Some("control"),
                            outcome_text: "Forced compliance, not commitment.",
                        },
                        DecisionOption {
                            id: "C",
                            label: "Let adoption happen organically",
                            deltas: d(0.0, 4.0, 2.0, 2.0, -3.0, 1.0, 3.0),
                            theme: None,
                            outcome_text: "Some adopt, many wait.",
                        },
                    ],
                },
                Decision::Choice {
                    id: "r4_d2",
                    prompt: "How handle laggards?",
                    options: vec![
                        DecisionOption {
                            id: "A",
                            label: "Understand barriers, provide support",
                            deltas: d(-1.0, 6.0, 4.0, 7.0, -9.0, 5.0, 5.0),
                            theme: Some("listen"),
                            outcome_text: "Many resisters become advocates.",
                        },
                        DecisionOption {
                            id: "B",
                            label: "Make examples of persistent resisters",
                            deltas: d(3.0, 0.0, -9.0, -10.0, 8.0, -8.0, -4.0),
                            theme: Some("force"),
                            outcome_text: "Fear-based compliance.",
                        },
                        DecisionOption {
                            id: "C",
                            label: "Focus on willing adopters",
                            deltas: d(1.0, 5.0, 1.0, 0.0, -2.0, 0.0, 4.0),
                            theme: None,
                            outcome_text: "Two-speed organization.",
                        },
                    ],
                },
            ],
        },
        Scenario {
            round_number: 5,
            title: "Embedding New Ways",
            narrative: "New ways taking hold. Make changes stick through systems \
                and culture.",
            decisions: vec![
                Decision::Allocation {
                    id: "r5_budget",
                    prompt: "Embedding Budget: Invest in making changes permanent",
                    config: AllocationConfig {
                        categories: vec![
                            spend("System Updates", Some(Training)),
                            spend("Process Redesign", Some(Communication)),
                            spend("Culture Programs", Some(Support)),
                        ],
                        total_budget: 200_000.0,
                        min_per_category: 0.0,
                    },
                    outcome_text: "Resources committed to institutionalization.",
                },
                Decision::Allocation {
                    id: "r5_time",
                    prompt: "Embedding Time: Weekly hours for sustainability",
                    config: AllocationConfig {
                        categories: vec![
                            spend("Process Refinement", Some(Training)),
                            spend("Documentation", Some(Communication)),
                            spend("Capability Building", Some(Support)),
                        ],
                        total_budget: 15.0,
                        min_per_category: 0.0,
                    },
                    outcome_text: "Time dedicated to embedding changes.",
                },
                Decision::Choice {
                    id: "r5_d1",
                    prompt: "How reinforce behaviors?",
                    options: vec![
                        DecisionOption {
                            id: "A",
                            label: "Align metrics, rewards, consequences",
                            deltas: d(6.0, 8.0, 3.0, 6.0, -8.0, 7.0, 8.0),
                            theme: Some("reinforce"),
                            outcome_text: "Systems alignment removes ambiguity.",
                        },
                        DecisionOption {
                            id: "B",
                            label: "Talk change, don't update systems",
                            deltas: d(2.0, -2.0, -6.0, -9.0, 10.0, -10.0, -6.0),
                            theme: Some("inconsistent"),
                            outcome_text: "Rhetoric-reality gap erodes trust.",
                        },
                        DecisionOption {
                            id: "C",
                            label: "Update some systems, plan broader change",
                            deltas: d(3.0, 3.0, 0.0, 0.0, -2.0, 1.0, 2.0),
                            theme: None,
                            outcome_text: "Partial reinforcement.",
                        },
                    ],
                },
                Decision::Choice {
                    id: "r5_d2",
                    prompt: "Handle old culture remnants?",
                    options: vec![
                        DecisionOption {
                            id: "A",
                            label: "Actively dismantle conflicting practices",
                            deltas: d(5.0, 9.0, 4.0, 7.0, -10.0, 8.0, 9.0),
                            theme: Some("reinforce"),
                            outcome_text: "Clear message: no going back.",
                        },
                        DecisionOption {
                            id: "B",
                            label: "Allow old and new to coexist",
                            deltas: d(1.0, -3.0, -4.0, -6.0, 8.0, -7.0, -5.0),
                            theme: Some("inconsistent"),
                            outcome_text: "Cultural tug-of-war.",
                        },
                        DecisionOption {
                            id: "C",
                            label: "Gradually phase out old practices",
                            deltas: d(3.0, 4.0, 1.0, 2.0, -3.0, 2.0, 3.0),
                            theme: None,
                            outcome_text: "Gentle transition.",
                        },
                    ],
                },
            ],
        },
        Scenario {
            round_number: 6,
            title: "Outcomes and Reflection",
            narrative: "Approaching transformation complete. Transition from \
                program to continuous evolution.",
            decisions: vec![
                Decision::Allocation {
                    id: "r6_budget",
                    prompt: "Final Budget: Allocate remaining funds for sustainability",
                    config: AllocationConfig {
                        categories: vec![
                            spend("Continuous Improvement", Some(Training)),
                            spend("Knowledge Management", Some(Communication)),
                            spend("Celebration & Recognition", Some(Support)),
                        ],
                        total_budget: 150_000.0,
                        min_per_category: 0.0,
                    },
                    outcome_text: "Final resources allocated for transition to BAU.",
                },
                Decision::Allocation {
                    id: "r6_time",
                    prompt: "Transition Time: Weekly hours for handover and closure",
                    config: AllocationConfig {
                        categories: vec![
                            spend("Documentation", Some(Training)),
                            spend("Knowledge Transfer", Some(Communication)),
                            spend("Team Recognition", Some(Support)),
                        ],
                        total_budget: 10.0,
                        min_per_category: 0.0,
                    },
                    outcome_text: "Time committed to proper closure.",
                },
                Decision::Choice {
                    id: "r6_d1",
                    prompt: "Transition to BAU?",
                    options: vec![
                        DecisionOption {
                            id: "A",
                            label: "Integrate change capability into roles",
                            deltas: d(8.0, 10.0, 5.0, 8.0, -8.0, 9.0, 10.0),
                            theme: Some("reinforce"),
                            outcome_text: "Change becomes how you work.",
                        },
                        DecisionOption {
                            id: "B",
                            label: "Disband team, return to operations",
                            deltas: d(5.0, -5.0, -6.0, -8.0, 10.0, -9.0, -10.0),
                            theme: Some("inconsistent"),
                            outcome_text: "Abrupt ending creates regression.",
                        },
                        DecisionOption {
                            id: "C",
                            label: "Keep small transformation office",
                            deltas: d(6.0, 5.0, 2.0, 3.0, -3.0, 3.0, 4.0),
                            theme: None,
                            outcome_text: "Safety net provides continuity.",
                        },
                    ],
                },
                Decision::Choice {
                    id: "r6_d2",
                    prompt: "Recognize the journey?",
                    options: vec![
                        DecisionOption {
                            id: "A",
                            label: "Major celebration and lessons learned",
                            deltas: d(3.0, 5.0, 8.0, 7.0, -5.0, 7.0, 8.0),
                            theme: Some("reinforce"),
                            outcome_text: "People feel valued.",
                        },
                        DecisionOption {
                            id: "B",
                            label: "No special recognition",
                            deltas: d(2.0, -2.0, -8.0, -7.0, 8.0, -8.0, -6.0),
                            theme: Some("inconsistent"),
                            outcome_text: "Sacrifice unacknowledged.",
                        },
                        DecisionOption {
                            id: "C",
                            label: "Thank-you notes and reviews",
                            deltas: d(2.0, 2.0, 3.0, 3.0, -2.0, 3.0, 3.0),
                            theme: None,
                            outcome_text: "Appreciated but insufficient.",
                        },
                    ],
                },
            ],
        },
    ]
}
