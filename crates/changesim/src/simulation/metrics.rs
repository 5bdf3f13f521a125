use serde::{Deserialize, Serialize};

/// The seven-dimensional organizational health vector.
///
/// Every field is conceptually bounded to `[0, 100]`, but the bound is only
/// enforced by [`Metrics::clamp`]: delta arithmetic deliberately runs
/// unclamped so the modifier engine can rescale intermediate values that
/// temporarily leave the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub bp: f64,
    pub ca: f64,
    pub ee: f64,
    pub tr: f64,
    pub rs: f64,
    pub lc: f64,
    pub mo: f64,
}

impl Metrics {
    pub const ZERO: Metrics = Metrics {
        bp: 0.0,
        ca: 0.0,
        ee: 0.0,
        tr: 0.0,
        rs: 0.0,
        lc: 0.0,
        mo: 0.0,
    };

    /// Component-wise sum. Clamping is a distinct, later step.
    pub fn add(self, other: Metrics) -> Metrics {
        Metrics {
            bp: self.bp + other.bp,
            ca: self.ca + other.ca,
            ee: self.ee + other.ee,
            tr: self.tr + other.tr,
            rs: self.rs + other.rs,
            lc: self.lc + other.lc,
            mo: self.mo + other.mo,
        }
    }

    /// Clamp every component into `[0, 100]`. Idempotent.
    pub fn clamp(self) -> Metrics {
        Metrics {
            bp: clamp_component(self.bp),
            ca: clamp_component(self.ca),
            ee: clamp_component(self.ee),
            tr: clamp_component(self.tr),
            rs: clamp_component(self.rs),
            lc: clamp_component(self.lc),
            mo: clamp_component(self.mo),
        }
    }

    pub fn get(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::BusinessPerformance => self.bp,
            MetricKind::ChangeAdoption => self.ca,
            MetricKind::EmployeeEnergy => self.ee,
            MetricKind::Trust => self.tr,
            MetricKind::Resistance => self.rs,
            MetricKind::LeadershipCredibility => self.lc,
            MetricKind::Momentum => self.mo,
        }
    }
}

fn clamp_component(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Names for the seven metric axes, used for display and charting payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    BusinessPerformance,
    ChangeAdoption,
    EmployeeEnergy,
    Trust,
    Resistance,
    LeadershipCredibility,
    Momentum,
}

impl MetricKind {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::BusinessPerformance,
            Self::ChangeAdoption,
            Self::EmployeeEnergy,
            Self::Trust,
            Self::Resistance,
            Self::LeadershipCredibility,
            Self::Momentum,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::BusinessPerformance => "Business Performance",
            Self::ChangeAdoption => "Change Adoption",
            Self::EmployeeEnergy => "Employee Energy",
            Self::Trust => "Trust",
            Self::Resistance => "Resistance",
            Self::LeadershipCredibility => "Leadership Credibility",
            Self::Momentum => "Momentum",
        }
    }
}

/// One entry of the append-only metric history: the vector as it stood after
/// a given round (round 0 is the pre-game seed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub round: u8,
    pub metrics: Metrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds_every_component() {
        let wild = Metrics {
            bp: -12.0,
            ca: 140.0,
            ee: 0.0,
            tr: 100.0,
            rs: 100.1,
            lc: -0.1,
            mo: 55.5,
        };
        let clamped = wild.clamp();
        for kind in MetricKind::ordered() {
            let value = clamped.get(kind);
            assert!((0.0..=100.0).contains(&value), "{kind:?} out of range");
        }
        assert_eq!(clamped.mo, 55.5);
    }

    #[test]
    fn clamp_is_idempotent() {
        let wild = Metrics {
            bp: 250.0,
            ca: -30.0,
            ee: 17.3,
            tr: 99.9,
            rs: 0.0,
            lc: 100.0,
            mo: -1.0,
        };
        assert_eq!(wild.clamp(), wild.clamp().clamp());
    }

    #[test]
    fn add_does_not_clamp() {
        let base = Metrics {
            bp: 95.0,
            ..Metrics::ZERO
        };
        let delta = Metrics {
            bp: 10.0,
            ..Metrics::ZERO
        };
        assert_eq!(base.add(delta).bp, 105.0);
    }
}
