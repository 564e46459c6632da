//! GeoRisk Library
//!
//! Geospatial risk classification and scoring for moving entities:
//! - Nearest-zone classification over a fixed zone catalog (haversine)
//! - Zone/time/speed/stop scoring with human-readable reasons (0-1 scale)
//! - Deviation/location/time threat scoring with a component breakdown (0-100 scale)
//! - Zone safety advice, the alert gate and ETA overrun rating
//! - Ordered batch processing with per-level distribution statistics
//!
//! The engine is pure and synchronous: no storage, no network, no global
//! mutable state.

pub mod core;
pub mod models;
pub mod utils;

pub use crate::core::{
    eta_risk, should_trigger_alert, zone_recommendations, Assessment, BatchProcessor, BatchSummary, EtaRisk,
    LevelCount, LevelScale, RiskStrategy, ThreatCalculator, ZoneAdvice, ZoneClassifier, ZoneRiskFactors,
    ZoneRiskModel,
};
pub use models::{
    AppError, AppResult, ComponentScores, Coordinate, EngineConfig, ErrorCode, HighRiskCircle, LevelThresholds,
    Observation, RiskLevel, RiskResult, ThreatLevel, ThreatModelWeights, ThreatScore, Zone, ZoneCatalog,
    ZoneClassification, ZoneModelWeights, ZoneTag, ZoneTagScores,
};
pub use utils::haversine_km;
