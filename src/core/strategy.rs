//! Scoring strategy abstraction
//!
//! The engine ships two scoring models that were developed independently and
//! use different unit conventions:
//! - [`ZoneRiskModel`](crate::core::zone_risk::ZoneRiskModel): zone/time/speed/stop, 0-1 scale, with reasons
//! - [`ThreatCalculator`](crate::core::threat_score::ThreatCalculator): deviation/location/time, 0-100 scale, with a component breakdown
//!
//! They are kept apart on purpose. Callers pick one; the batch processor works
//! with either through this trait.

use serde::Serialize;

use crate::models::errors::AppResult;
use crate::models::types::{Observation, RiskLevel, RiskResult, ThreatLevel, ThreatScore};

/// An ordered five-step level scale
pub trait LevelScale: Copy + Eq + Ord + Serialize + Send + Sync + 'static {
    /// All levels, lowest first
    const ALL: [Self; 5];

    fn label(&self) -> &'static str;

    /// Position in [`LevelScale::ALL`]
    fn ordinal(&self) -> usize {
        Self::ALL.iter().position(|l| l == self).unwrap_or(0)
    }

    fn from_ordinal(ordinal: usize) -> Self {
        Self::ALL[ordinal.min(Self::ALL.len() - 1)]
    }
}

impl LevelScale for RiskLevel {
    const ALL: [Self; 5] = [
        RiskLevel::Safe,
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    fn label(&self) -> &'static str {
        self.as_str()
    }
}

impl LevelScale for ThreatLevel {
    const ALL: [Self; 5] = [
        ThreatLevel::Minimal,
        ThreatLevel::Low,
        ThreatLevel::Medium,
        ThreatLevel::High,
        ThreatLevel::Critical,
    ];

    fn label(&self) -> &'static str {
        self.as_str()
    }
}

/// Common view over a scored observation
pub trait Assessment {
    type Level: LevelScale;

    fn score(&self) -> f64;
    fn level(&self) -> Self::Level;
}

impl Assessment for RiskResult {
    type Level = RiskLevel;

    fn score(&self) -> f64 {
        self.score
    }

    fn level(&self) -> RiskLevel {
        self.level
    }
}

impl Assessment for ThreatScore {
    type Level = ThreatLevel;

    fn score(&self) -> f64 {
        self.threat_score
    }

    fn level(&self) -> ThreatLevel {
        self.risk_level
    }
}

/// A scoring model applicable to a single observation
pub trait RiskStrategy: Sync {
    type Output: Assessment + Send;

    /// Stable identifier for logs
    fn name(&self) -> &'static str;

    /// Score one observation. Fails on malformed input; never panics.
    fn assess(&self, observation: &Observation) -> AppResult<Self::Output>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_round_trip() {
        for (i, level) in RiskLevel::ALL.iter().enumerate() {
            assert_eq!(level.ordinal(), i);
            assert_eq!(RiskLevel::from_ordinal(i), *level);
        }
        assert_eq!(ThreatLevel::from_ordinal(0), ThreatLevel::Minimal);
        assert_eq!(ThreatLevel::from_ordinal(99), ThreatLevel::Critical);
    }

    #[test]
    fn test_all_is_sorted() {
        assert!(RiskLevel::ALL.windows(2).all(|w| w[0] < w[1]));
        assert!(ThreatLevel::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_labels() {
        assert_eq!(RiskLevel::Safe.label(), "SAFE");
        assert_eq!(ThreatLevel::Minimal.label(), "MINIMAL");
    }
}
