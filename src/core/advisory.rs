//! Advisory helpers
//!
//! Rider-facing advice derived from a classification or a level: per-zone
//! safety recommendations, the alert gate, and the ETA overrun check.

use serde::Serialize;

use crate::core::strategy::LevelScale;
use crate::core::zones::ZoneClassifier;
use crate::models::errors::AppResult;
use crate::models::types::{Coordinate, RiskLevel, ZoneClassification, ZoneTag};
use crate::utils::constants::*;

const HIGH_RISK_ADVICE: [&str; 4] = [
    "High-risk area detected",
    "Automatic monitoring enabled",
    "Emergency services on standby",
    "Avoid stopping in this area",
];

const MEDIUM_RISK_ADVICE: [&str; 4] = [
    "Medium-risk area",
    "Stay alert",
    "Keep doors locked",
    "Share live location with contacts",
];

const SAFE_ADVICE: [&str; 3] = ["Safe area", "Normal monitoring active", "Continue journey safely"];

/// Safety recommendations for a zone tag
pub fn zone_recommendations(tag: ZoneTag) -> &'static [&'static str] {
    match tag {
        ZoneTag::High => &HIGH_RISK_ADVICE,
        ZoneTag::Medium => &MEDIUM_RISK_ADVICE,
        ZoneTag::Safe => &SAFE_ADVICE,
    }
}

/// Classification of a position plus the advice for its zone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneAdvice {
    pub zone: ZoneClassification,
    pub recommendations: Vec<&'static str>,
}

impl ZoneClassifier {
    /// Classify `position` and attach the recommendations for its zone
    pub fn recommend(&self, position: Coordinate) -> AppResult<ZoneAdvice> {
        let zone = self.classify(position)?;
        let recommendations = zone_recommendations(zone.tag).to_vec();
        Ok(ZoneAdvice { zone, recommendations })
    }
}

/// MEDIUM and above raise an alert, on either scale
pub fn should_trigger_alert<L: LevelScale>(level: L) -> bool {
    level >= L::from_ordinal(ALERT_MIN_BAND)
}

/// Journey-time overrun assessment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EtaRisk {
    pub expected_minutes: u32,
    pub elapsed_minutes: u32,
    /// Negative when the journey is ahead of schedule
    pub deviation_minutes: i64,
    pub deviation_percentage: f64,
    pub risk_level: RiskLevel,
    pub message: &'static str,
}

/// Rate how far a journey has overrun its expected duration.
///
/// An expected duration of 0 has no meaningful overrun and rates SAFE.
pub fn eta_risk(expected_minutes: u32, elapsed_minutes: u32) -> EtaRisk {
    let deviation_minutes = i64::from(elapsed_minutes) - i64::from(expected_minutes);
    let deviation_percentage = if expected_minutes > 0 {
        deviation_minutes as f64 / f64::from(expected_minutes) * 100.0
    } else {
        0.0
    };

    let (risk_level, message) = if deviation_percentage > ETA_OVERRUN_CRITICAL_PCT {
        (RiskLevel::Critical, "Journey taking significantly longer than expected")
    } else if deviation_percentage > ETA_OVERRUN_HIGH_PCT {
        (RiskLevel::High, "Journey delayed beyond normal traffic")
    } else if deviation_percentage > ETA_OVERRUN_MEDIUM_PCT {
        (RiskLevel::Medium, "Minor delay detected")
    } else {
        (RiskLevel::Safe, "Journey on schedule")
    };

    EtaRisk {
        expected_minutes,
        elapsed_minutes,
        deviation_minutes,
        deviation_percentage,
        risk_level,
        message,
    }
}
