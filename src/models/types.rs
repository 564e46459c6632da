//! Type definitions for the risk engine
//! All core data structures for observations, zones and scored results

use chrono::{Local, NaiveDateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::errors::{AppError, AppResult};

/// Latitude/longitude pair in decimal degrees (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components are finite. Range is intentionally not checked.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Qualitative risk tag of a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ZoneTag {
    #[serde(alias = "GREEN")]
    Safe,
    #[serde(alias = "YELLOW")]
    Medium,
    #[serde(alias = "RED")]
    High,
}

impl ZoneTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneTag::Safe => "SAFE",
            ZoneTag::Medium => "MEDIUM",
            ZoneTag::High => "HIGH",
        }
    }

    /// Map color used on dashboards and in reason strings
    pub fn color(&self) -> &'static str {
        match self {
            ZoneTag::Safe => "GREEN",
            ZoneTag::Medium => "YELLOW",
            ZoneTag::High => "RED",
        }
    }
}

/// Named classification anchor. Zones are points, not polygons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub center: Coordinate,
    pub tag: ZoneTag,
    /// Crime weight in [0, 1]
    pub weight: f64,
}

impl Zone {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, tag: ZoneTag, weight: f64) -> Self {
        Self {
            name: name.into(),
            center: Coordinate::new(latitude, longitude),
            tag,
            weight,
        }
    }
}

/// Output of nearest-zone lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneClassification {
    pub zone_name: String,
    pub tag: ZoneTag,
    pub weight: f64,
    /// Minimum haversine distance to any zone center (km)
    pub distance_km: f64,
}

/// One positional sample of a moving entity. Transient, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub coordinate: Coordinate,
    pub speed_kmh: f64,
    /// Local wall-clock time; `None` means "now"
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    pub stopped_seconds: u32,
    #[serde(default)]
    pub deviation_count: u32,
}

impl Observation {
    pub fn new(latitude: f64, longitude: f64, speed_kmh: f64) -> Self {
        Self {
            coordinate: Coordinate::new(latitude, longitude),
            speed_kmh,
            timestamp: None,
            stopped_seconds: 0,
            deviation_count: 0,
        }
    }

    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Interpret unix seconds in the host's local timezone
    pub fn with_unix_timestamp(mut self, secs: i64) -> AppResult<Self> {
        let local = Local
            .timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| AppError::invalid_timestamp(format!("Unrepresentable unix timestamp: {}", secs)))?;
        self.timestamp = Some(local.naive_local());
        Ok(self)
    }

    pub fn with_stopped_seconds(mut self, stopped_seconds: u32) -> Self {
        self.stopped_seconds = stopped_seconds;
        self
    }

    pub fn with_deviations(mut self, deviation_count: u32) -> Self {
        self.deviation_count = deviation_count;
        self
    }

    /// Reject inputs that would produce a misleading score
    pub fn validate(&self) -> AppResult<()> {
        if !self.coordinate.is_finite() {
            return Err(AppError::invalid_coordinate(
                self.coordinate.latitude,
                self.coordinate.longitude,
            ));
        }
        if !self.speed_kmh.is_finite() || self.speed_kmh < 0.0 {
            return Err(AppError::invalid_speed(self.speed_kmh));
        }
        Ok(())
    }

    /// Wall-clock hour as given, falling back to the current local hour
    pub fn hour(&self) -> u32 {
        match self.timestamp {
            Some(ts) => ts.hour(),
            None => Local::now().hour(),
        }
    }
}

/// Discrete level for the zone model (0-1 scale)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Safe,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

/// Discrete level for the threat model (0-100 scale)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThreatLevel {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatLevel::Minimal => "MINIMAL",
            ThreatLevel::Low => "LOW",
            ThreatLevel::Medium => "MEDIUM",
            ThreatLevel::High => "HIGH",
            ThreatLevel::Critical => "CRITICAL",
        }
    }
}

/// Zone model result for one observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    /// Weighted score in [0, 1], 3 decimals
    pub score: f64,
    pub level: RiskLevel,
    pub zone_name: String,
    pub zone_tag: ZoneTag,
    pub zone_weight: f64,
    pub distance_km: f64,
    /// Display-ordered explanations
    pub reasons: Vec<String>,
}

impl RiskResult {
    /// Multi-line text block for logs and demos
    pub fn summary(&self) -> String {
        let mut output = format!(
            "Risk: {} ({:.3}) | Zone: {} [{}] {:.2} km\n",
            self.level.as_str(),
            self.score,
            self.zone_name,
            self.zone_tag.color(),
            self.distance_km
        );
        for reason in &self.reasons {
            output.push_str(&format!("   - {}\n", reason));
        }
        output
    }
}

/// Per-component breakdown of a threat score (each 0-100, 2 decimals)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentScores {
    pub deviation_risk: f64,
    pub location_risk: f64,
    pub time_risk: f64,
}

/// Threat model result for one observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatScore {
    /// Weighted score in [0, 100], 2 decimals
    pub threat_score: f64,
    pub risk_level: ThreatLevel,
    pub component_scores: ComponentScores,
    pub deviation_count: u32,
    pub coordinates: Coordinate,
}

/// Flagged circular area used by the threat model's location factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighRiskCircle {
    pub center: Coordinate,
    pub radius_km: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .and_then(|d| d.and_hms_opt(hour, 30, 0))
            .unwrap()
    }

    #[test]
    fn test_unrepresentable_unix_timestamp() {
        let err = Observation::new(21.1, 79.0, 35.0)
            .with_unix_timestamp(i64::MAX)
            .unwrap_err();
        assert_eq!(err.code, crate::models::errors::ErrorCode::InputInvalidTimestamp);
    }

    #[test]
    fn test_observation_defaults() {
        let obs = Observation::new(21.1, 79.0, 35.0);
        assert_eq!(obs.stopped_seconds, 0);
        assert_eq!(obs.deviation_count, 0);
        assert!(obs.timestamp.is_none());
        assert!(obs.hour() < 24);
    }

    #[test]
    fn test_hour_as_given() {
        let obs = Observation::new(21.1, 79.0, 35.0).with_timestamp(at(23));
        assert_eq!(obs.hour(), 23);
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let err = Observation::new(f64::NAN, 79.0, 10.0).validate().unwrap_err();
        assert_eq!(err.code, crate::models::ErrorCode::InputInvalidCoordinate);

        let err = Observation::new(21.0, f64::INFINITY, 10.0).validate().unwrap_err();
        assert_eq!(err.code, crate::models::ErrorCode::InputInvalidCoordinate);
    }

    #[test]
    fn test_validate_rejects_negative_speed() {
        let err = Observation::new(21.0, 79.0, -1.0).validate().unwrap_err();
        assert_eq!(err.code, crate::models::ErrorCode::InputInvalidSpeed);
        assert!(Observation::new(21.0, 79.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_out_of_range_coordinates() {
        assert!(Observation::new(123.0, 500.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_zone_tag_accepts_color_names() {
        let tag: ZoneTag = serde_json::from_str("\"RED\"").unwrap();
        assert_eq!(tag, ZoneTag::High);
        let tag: ZoneTag = serde_json::from_str("\"MEDIUM\"").unwrap();
        assert_eq!(tag, ZoneTag::Medium);
        assert_eq!(serde_json::to_string(&ZoneTag::Safe).unwrap(), "\"SAFE\"");
    }

    #[test]
    fn test_observation_from_json_defaults() {
        let obs: Observation = serde_json::from_str(
            r#"{"coordinate":{"latitude":21.1,"longitude":79.0},"speed_kmh":12.5}"#,
        )
        .unwrap();
        assert_eq!(obs.stopped_seconds, 0);
        assert_eq!(obs.deviation_count, 0);
        assert!(obs.timestamp.is_none());
    }

    #[test]
    fn test_level_ordering() {
        assert!(RiskLevel::Safe < RiskLevel::Low);
        assert!(RiskLevel::High < RiskLevel::Critical);
        assert!(ThreatLevel::Minimal < ThreatLevel::Low);
    }
}
