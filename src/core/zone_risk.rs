//! Zone Risk Model
//!
//! Fractional (0-1) model combining four sub-scores:
//!
//! ```text
//! score = zone * 0.40 + time * 0.20 + speed * 0.15 + stop * 0.25
//! ```
//!
//! rounded to 3 decimals. Reasons are produced by an ordered table of
//! independent rules over the raw inputs, not from the score arithmetic, and
//! are displayed in table order.

use serde::{Deserialize, Serialize};

use crate::core::factors::{day_period_risk, speed_risk, stop_risk, zone_risk};
use crate::core::strategy::{LevelScale, RiskStrategy};
use crate::core::zones::ZoneClassifier;
use crate::models::config::{LevelThresholds, ZoneModelWeights, ZoneTagScores};
use crate::models::errors::AppResult;
use crate::models::types::{Observation, RiskLevel, RiskResult, ZoneClassification, ZoneTag};
use crate::utils::constants::*;

/// Sub-scores feeding one zone-model score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneRiskFactors {
    pub zone: f64,
    pub time: f64,
    pub speed: f64,
    pub stop: f64,
}

/// Raw inputs the reason rules look at
#[derive(Debug, Clone, Copy)]
struct ReasonInputs {
    tag: ZoneTag,
    hour: u32,
    speed_kmh: f64,
    stopped_seconds: u32,
}

type ReasonRule = fn(&ReasonInputs) -> Option<String>;

/// Evaluation order is display order
const REASON_RULES: [ReasonRule; 4] = [zone_reason, night_reason, slow_reason, long_stop_reason];

fn zone_reason(inputs: &ReasonInputs) -> Option<String> {
    match inputs.tag {
        ZoneTag::High => Some(format!("In high-risk zone ({})", inputs.tag.color())),
        ZoneTag::Medium => Some(format!("In medium-risk zone ({})", inputs.tag.color())),
        ZoneTag::Safe => None,
    }
}

fn night_reason(inputs: &ReasonInputs) -> Option<String> {
    (inputs.hour >= NIGHT_REASON_FROM_HOUR || inputs.hour < NIGHT_REASON_UNTIL_HOUR)
        .then(|| "Traveling at night (10 PM - 5 AM)".to_string())
}

fn slow_reason(inputs: &ReasonInputs) -> Option<String> {
    (inputs.speed_kmh < SLOW_REASON_KMH).then(|| "Vehicle moving very slowly or stopped".to_string())
}

fn long_stop_reason(inputs: &ReasonInputs) -> Option<String> {
    // Independent of the 120 s stop-risk tier
    (inputs.stopped_seconds > LONG_STOP_REASON_SECS)
        .then(|| format!("Stopped for {} seconds", inputs.stopped_seconds))
}

/// Zone/time/speed/stop scoring model
#[derive(Debug, Clone)]
pub struct ZoneRiskModel {
    classifier: ZoneClassifier,
    tag_scores: ZoneTagScores,
    weights: ZoneModelWeights,
    thresholds: LevelThresholds,
}

impl Default for ZoneRiskModel {
    fn default() -> Self {
        Self::new(ZoneClassifier::default())
    }
}

impl ZoneRiskModel {
    pub fn new(classifier: ZoneClassifier) -> Self {
        Self {
            classifier,
            tag_scores: ZoneTagScores::default(),
            weights: ZoneModelWeights::default(),
            thresholds: LevelThresholds::zone_model(),
        }
    }

    /// Substitute the per-tag sub-scores; each must be finite and >= 0
    pub fn with_tag_scores(mut self, tag_scores: ZoneTagScores) -> AppResult<Self> {
        tag_scores.validate()?;
        self.tag_scores = tag_scores;
        Ok(self)
    }

    /// Substitute the factor weights; each must be finite and >= 0
    pub fn with_weights(mut self, weights: ZoneModelWeights) -> AppResult<Self> {
        weights.validate()?;
        self.weights = weights;
        Ok(self)
    }

    /// Substitute the level bounds; they must descend strictly
    pub fn with_thresholds(mut self, thresholds: LevelThresholds) -> AppResult<Self> {
        thresholds.validate()?;
        self.thresholds = thresholds;
        Ok(self)
    }

    pub fn classifier(&self) -> &ZoneClassifier {
        &self.classifier
    }

    /// Per-factor sub-scores for a classified observation at `hour`
    pub fn factors(&self, zone: &ZoneClassification, hour: u32, observation: &Observation) -> ZoneRiskFactors {
        ZoneRiskFactors {
            zone: zone_risk(zone.tag, &self.tag_scores),
            time: day_period_risk(hour),
            speed: speed_risk(observation.speed_kmh),
            stop: stop_risk(observation.stopped_seconds),
        }
    }

    /// Weighted sum, rounded to 3 decimals
    pub fn combine(&self, factors: &ZoneRiskFactors) -> f64 {
        let total = factors.zone * self.weights.zone
            + factors.time * self.weights.time
            + factors.speed * self.weights.speed
            + factors.stop * self.weights.stop;

        round_to(total, ZONE_SCORE_DECIMALS).clamp(0.0, 1.0)
    }

    /// >=0.70 CRITICAL, >=0.50 HIGH, >=0.30 MEDIUM, >=0.15 LOW, else SAFE
    pub fn level(&self, score: f64) -> RiskLevel {
        RiskLevel::from_ordinal(self.thresholds.band(score))
    }

    fn reasons(inputs: &ReasonInputs) -> Vec<String> {
        REASON_RULES.iter().filter_map(|rule| rule(inputs)).collect()
    }
}

impl RiskStrategy for ZoneRiskModel {
    type Output = RiskResult;

    fn name(&self) -> &'static str {
        "zone_risk"
    }

    fn assess(&self, observation: &Observation) -> AppResult<RiskResult> {
        observation.validate()?;

        let zone = self.classifier.classify(observation.coordinate)?;
        // Resolve "now" once so the time factor and the night reason agree
        let hour = observation.hour();

        let factors = self.factors(&zone, hour, observation);
        let score = self.combine(&factors);
        let level = self.level(score);

        let reasons = Self::reasons(&ReasonInputs {
            tag: zone.tag,
            hour,
            speed_kmh: observation.speed_kmh,
            stopped_seconds: observation.stopped_seconds,
        });

        Ok(RiskResult {
            score,
            level,
            zone_name: zone.zone_name,
            zone_tag: zone.tag,
            zone_weight: zone.weight,
            distance_km: zone.distance_km,
            reasons,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(hour, 15, 0))
            .unwrap()
    }

    #[test]
    fn test_safe_daytime_drive() {
        let model = ZoneRiskModel::default();
        let obs = Observation::new(21.1458, 79.0882, 40.0).with_timestamp(at(14));

        let result = model.assess(&obs).unwrap();

        // 0.20*0.4 + 0.10*0.2 + 0.10*0.15 + 0.10*0.25
        assert!((result.score - 0.14).abs() < 1e-9, "Score was {}", result.score);
        assert_eq!(result.level, RiskLevel::Safe);
        assert_eq!(result.zone_name, "Sitabuldi");
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_midnight_stop_in_high_risk_zone() {
        let model = ZoneRiskModel::default();
        let obs = Observation::new(21.0976, 78.9772, 0.0)
            .with_timestamp(at(0))
            .with_stopped_seconds(300);

        let result = model.assess(&obs).unwrap();

        // 0.80*0.4 + 0.60*0.2 + 0.60*0.15 + 0.70*0.25
        assert!((result.score - 0.705).abs() < 1e-9, "Score was {}", result.score);
        assert_eq!(result.level, RiskLevel::Critical);
        assert_eq!(result.zone_name, "MIDC Industrial");
        assert_eq!(
            result.reasons,
            vec![
                "In high-risk zone (RED)".to_string(),
                "Traveling at night (10 PM - 5 AM)".to_string(),
                "Vehicle moving very slowly or stopped".to_string(),
            ]
        );
    }

    #[test]
    fn test_long_stop_reason_only_above_300() {
        let model = ZoneRiskModel::default();
        let base = Observation::new(21.1458, 79.0882, 40.0).with_timestamp(at(12));

        let at_tier = model.assess(&base.clone().with_stopped_seconds(120)).unwrap();
        assert!(at_tier.reasons.is_empty());

        let long = model.assess(&base.with_stopped_seconds(301)).unwrap();
        assert_eq!(long.reasons, vec!["Stopped for 301 seconds".to_string()]);
    }

    #[test]
    fn test_medium_zone_reason() {
        let model = ZoneRiskModel::default();
        let obs = Observation::new(21.0950, 79.1200, 50.0).with_timestamp(at(10));
        let result = model.assess(&obs).unwrap();
        assert_eq!(result.reasons, vec!["In medium-risk zone (YELLOW)".to_string()]);
    }

    #[test]
    fn test_night_reason_window_differs_from_time_tier() {
        let model = ZoneRiskModel::default();
        // Hour 5 is still night for the time factor but outside the reason window
        let obs = Observation::new(21.1458, 79.0882, 40.0).with_timestamp(at(5));
        let result = model.assess(&obs).unwrap();
        assert!(result.reasons.is_empty());
        let factors = model.factors(
            &model.classifier().classify(obs.coordinate).unwrap(),
            5,
            &obs,
        );
        assert_eq!(factors.time, 0.60);

        let late = obs.with_timestamp(at(22));
        let result = model.assess(&late).unwrap();
        assert_eq!(result.reasons, vec!["Traveling at night (10 PM - 5 AM)".to_string()]);
    }

    #[test]
    fn test_level_thresholds() {
        let model = ZoneRiskModel::default();
        assert_eq!(model.level(0.0), RiskLevel::Safe);
        assert_eq!(model.level(0.149), RiskLevel::Safe);
        assert_eq!(model.level(0.15), RiskLevel::Low);
        assert_eq!(model.level(0.30), RiskLevel::Medium);
        assert_eq!(model.level(0.50), RiskLevel::High);
        assert_eq!(model.level(0.70), RiskLevel::Critical);
    }

    #[test]
    fn test_invalid_input_fails_fast() {
        let model = ZoneRiskModel::default();
        let err = model.assess(&Observation::new(21.0, 79.0, -5.0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InputInvalidSpeed);
    }

    #[test]
    fn test_custom_weights() {
        let model = ZoneRiskModel::default()
            .with_weights(ZoneModelWeights {
                zone: 1.0,
                time: 0.0,
                speed: 0.0,
                stop: 0.0,
            })
            .unwrap();
        let obs = Observation::new(21.0976, 78.9772, 60.0).with_timestamp(at(12));
        let result = model.assess(&obs).unwrap();
        assert_eq!(result.score, 0.8);
        assert_eq!(result.level, RiskLevel::Critical);
    }

    #[test]
    fn test_non_finite_weight_rejected_at_configuration() {
        let err = ZoneRiskModel::default()
            .with_weights(ZoneModelWeights {
                zone: f64::NAN,
                ..ZoneModelWeights::default()
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);

        let err = ZoneRiskModel::default()
            .with_tag_scores(ZoneTagScores {
                medium: -0.5,
                ..ZoneTagScores::default()
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);
    }

    #[test]
    fn test_unordered_thresholds_rejected() {
        let err = ZoneRiskModel::default()
            .with_thresholds(LevelThresholds {
                critical: 0.40,
                ..LevelThresholds::zone_model()
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);

        let stricter = ZoneRiskModel::default()
            .with_thresholds(LevelThresholds {
                critical: 0.90,
                high: 0.60,
                medium: 0.40,
                low: 0.20,
            })
            .unwrap();
        assert_eq!(stricter.level(0.75), RiskLevel::High);
    }
}
