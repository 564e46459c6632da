//! Threat Score Calculator
//!
//! Point-scale (0-100) model driven by behavioral deviations:
//!
//! ```text
//! threat = deviation * 0.60 + location * 0.20 + time * 0.20
//! ```
//!
//! rounded to 2 decimals. Location risk comes from proximity to flagged
//! high-risk circles owned by the calculator instance, not from the zone
//! catalog. No reasons are produced; the component breakdown is returned
//! instead.

use tracing::info;

use crate::core::factors::{deviation_risk, hourly_threat_risk, proximity_risk};
use crate::core::strategy::{LevelScale, RiskStrategy};
use crate::models::config::{LevelThresholds, ThreatModelWeights};
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{ComponentScores, Coordinate, HighRiskCircle, Observation, ThreatLevel, ThreatScore};
use crate::utils::constants::{round_to, THREAT_SCORE_DECIMALS};

/// Deviation/location/time scoring model
///
/// The circle list is append-only and owned by this instance; share it across
/// threads only behind external synchronization.
#[derive(Debug, Clone)]
pub struct ThreatCalculator {
    high_risk_zones: Vec<HighRiskCircle>,
    weights: ThreatModelWeights,
    thresholds: LevelThresholds,
}

impl Default for ThreatCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreatCalculator {
    /// Calculator with no flagged circles
    pub fn new() -> Self {
        Self {
            high_risk_zones: Vec::new(),
            weights: ThreatModelWeights::default(),
            thresholds: LevelThresholds::threat_model(),
        }
    }

    /// Calculator preloaded with the Nagpur hotspots: MIDC Hingna (1.5 km)
    /// and Sitabuldi (2.0 km)
    pub fn with_nagpur_hotspots() -> Self {
        let mut calculator = Self::new();
        calculator.high_risk_zones.extend([
            HighRiskCircle {
                center: Coordinate::new(21.0850, 79.1100),
                radius_km: 1.5,
            },
            HighRiskCircle {
                center: Coordinate::new(21.1458, 79.0882),
                radius_km: 2.0,
            },
        ]);
        calculator
    }

    pub fn with_weights(mut self, weights: ThreatModelWeights) -> AppResult<Self> {
        weights.validate()?;
        self.weights = weights;
        Ok(self)
    }

    pub fn with_thresholds(mut self, thresholds: LevelThresholds) -> AppResult<Self> {
        thresholds.validate()?;
        self.thresholds = thresholds;
        Ok(self)
    }

    /// Flag a circular area
    pub fn add_high_risk_zone(&mut self, latitude: f64, longitude: f64, radius_km: f64) -> AppResult<()> {
        let center = Coordinate::new(latitude, longitude);
        if !center.is_finite() {
            return Err(AppError::invalid_coordinate(latitude, longitude));
        }
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(AppError::invalid_radius(radius_km));
        }

        self.high_risk_zones.push(HighRiskCircle { center, radius_km });
        info!(
            "🚩 Flagged high-risk circle ({:.4}, {:.4}) r={:.2}km, {} total",
            latitude,
            longitude,
            radius_km,
            self.high_risk_zones.len()
        );
        Ok(())
    }

    pub fn high_risk_zones(&self) -> &[HighRiskCircle] {
        &self.high_risk_zones
    }

    /// Location component for a position (10 base, up to 100)
    pub fn location_risk(&self, position: Coordinate) -> f64 {
        proximity_risk(position, &self.high_risk_zones)
    }

    /// >=75 CRITICAL, >=60 HIGH, >=40 MEDIUM, >=20 LOW, else MINIMAL
    pub fn level(&self, score: f64) -> ThreatLevel {
        ThreatLevel::from_ordinal(self.thresholds.band(score))
    }

    /// Score from explicit parameters; `hour` is the wall-clock hour
    pub fn calculate(&self, position: Coordinate, hour: u32, deviation_count: u32) -> ThreatScore {
        let deviation = deviation_risk(deviation_count);
        let location = self.location_risk(position);
        let time = hourly_threat_risk(hour);

        let raw = deviation * self.weights.deviation
            + location * self.weights.location
            + time * self.weights.time;
        // Level is taken from the unrounded score
        let risk_level = self.level(raw);

        ThreatScore {
            threat_score: round_to(raw, THREAT_SCORE_DECIMALS).clamp(0.0, 100.0),
            risk_level,
            component_scores: ComponentScores {
                deviation_risk: round_to(deviation, THREAT_SCORE_DECIMALS),
                location_risk: round_to(location, THREAT_SCORE_DECIMALS),
                time_risk: round_to(time, THREAT_SCORE_DECIMALS),
            },
            deviation_count,
            coordinates: position,
        }
    }
}

impl RiskStrategy for ThreatCalculator {
    type Output = ThreatScore;

    fn name(&self) -> &'static str {
        "threat_score"
    }

    fn assess(&self, observation: &Observation) -> AppResult<ThreatScore> {
        observation.validate()?;
        Ok(self.calculate(
            observation.coordinate,
            observation.hour(),
            observation.deviation_count,
        ))
    }
}
