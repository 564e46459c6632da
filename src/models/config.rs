//! Configuration module for the risk engine
//!
//! Uses constants from utils/constants.rs. The zone catalog and the weighting
//! constants are data, so callers (and tests) can substitute their own.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Zone, ZoneTag};
use crate::utils::constants::*;

lazy_static! {
    /// Built-in Nagpur catalog, seeded once per process
    static ref NAGPUR_ZONES: Vec<Zone> = vec![
        // Safe zones
        Zone::new("Sitabuldi", 21.1458, 79.0882, ZoneTag::Safe, 0.20),
        Zone::new("Dharampeth", 21.1356, 79.0603, ZoneTag::Safe, 0.20),
        Zone::new("Civil Lines", 21.1541, 79.0735, ZoneTag::Safe, 0.22),
        // Medium risk
        Zone::new("Manewada", 21.0950, 79.1200, ZoneTag::Medium, 0.42),
        Zone::new("Hingna Road", 21.0985, 79.0030, ZoneTag::Medium, 0.48),
        Zone::new("Railway Station", 21.1450, 79.0800, ZoneTag::Medium, 0.52),
        // High risk
        Zone::new("MIDC Industrial", 21.0976, 78.9772, ZoneTag::High, 0.78),
        Zone::new("Outer Ring Road", 21.1850, 79.2300, ZoneTag::High, 0.85),
        Zone::new("Butibori", 21.0530, 79.1800, ZoneTag::High, 0.75),
    ];
}

/// Immutable, validated list of classification anchors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneCatalog {
    zones: Vec<Zone>,
}

impl ZoneCatalog {
    /// Build a catalog, enforcing: non-empty, unique names, finite centers,
    /// weight in [0, 1]
    pub fn new(zones: Vec<Zone>) -> AppResult<Self> {
        if zones.is_empty() {
            return Err(AppError::empty_catalog());
        }

        let mut seen = HashSet::with_capacity(zones.len());
        for zone in &zones {
            if !seen.insert(zone.name.as_str()) {
                return Err(AppError::duplicate_zone(&zone.name));
            }
            if !zone.center.is_finite() {
                return Err(AppError::invalid_config(format!(
                    "Zone '{}' has a non-finite center",
                    zone.name
                )));
            }
            if !(0.0..=1.0).contains(&zone.weight) {
                return Err(AppError::invalid_config(format!(
                    "Zone '{}' weight {} is outside [0, 1]",
                    zone.name, zone.weight
                )));
            }
        }

        Ok(Self { zones })
    }

    /// Parse a JSON array of zones
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let zones: Vec<Zone> = serde_json::from_str(json)?;
        Self::new(zones)
    }

    /// Read and parse a JSON catalog file
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| AppError::from(e).context(format!("reading {}", path.display())))?;
        let catalog = Self::from_json_str(&json)
            .map_err(|e| e.context(format!("parsing {}", path.display())))?;
        info!("🗺️ Loaded {} zones from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Zones in catalog order (the order ties are broken by)
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.name == name)
    }
}

/// Finite and non-negative, or a CFG_INVALID_VALUE naming the field
fn check_weight(field: &str, value: f64) -> AppResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AppError::invalid_config(format!(
            "{} must be a finite value >= 0, got {}",
            field, value
        )))
    }
}

impl Default for ZoneCatalog {
    /// The 9-zone Nagpur catalog
    fn default() -> Self {
        Self {
            zones: NAGPUR_ZONES.clone(),
        }
    }
}

/// Sub-score assigned to each zone tag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneTagScores {
    pub safe: f64,
    pub medium: f64,
    pub high: f64,
}

impl ZoneTagScores {
    pub fn score(&self, tag: ZoneTag) -> f64 {
        match tag {
            ZoneTag::Safe => self.safe,
            ZoneTag::Medium => self.medium,
            ZoneTag::High => self.high,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        check_weight("tag score 'safe'", self.safe)?;
        check_weight("tag score 'medium'", self.medium)?;
        check_weight("tag score 'high'", self.high)
    }
}

impl Default for ZoneTagScores {
    fn default() -> Self {
        Self {
            safe: ZONE_SCORE_SAFE,
            medium: ZONE_SCORE_MEDIUM,
            high: ZONE_SCORE_HIGH,
        }
    }
}

/// Weights of the zone/time/speed/stop model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneModelWeights {
    pub zone: f64,
    pub time: f64,
    pub speed: f64,
    pub stop: f64,
}

impl ZoneModelWeights {
    pub fn validate(&self) -> AppResult<()> {
        check_weight("zone weight", self.zone)?;
        check_weight("time weight", self.time)?;
        check_weight("speed weight", self.speed)?;
        check_weight("stop weight", self.stop)
    }
}

impl Default for ZoneModelWeights {
    fn default() -> Self {
        Self {
            zone: ZONE_WEIGHT_ZONE,
            time: ZONE_WEIGHT_TIME,
            speed: ZONE_WEIGHT_SPEED,
            stop: ZONE_WEIGHT_STOP,
        }
    }
}

/// Weights of the deviation/location/time model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatModelWeights {
    pub deviation: f64,
    pub location: f64,
    pub time: f64,
}

impl ThreatModelWeights {
    pub fn validate(&self) -> AppResult<()> {
        check_weight("deviation weight", self.deviation)?;
        check_weight("location weight", self.location)?;
        check_weight("time weight", self.time)
    }
}

impl Default for ThreatModelWeights {
    fn default() -> Self {
        Self {
            deviation: THREAT_WEIGHT_DEVIATION,
            location: THREAT_WEIGHT_LOCATION,
            time: THREAT_WEIGHT_TIME,
        }
    }
}

/// Inclusive lower bounds of the four upper levels, on the model's own scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelThresholds {
    pub critical: f64,
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl LevelThresholds {
    /// Zone model bounds (0-1 scale)
    pub fn zone_model() -> Self {
        Self {
            critical: ZONE_LEVEL_CRITICAL,
            high: ZONE_LEVEL_HIGH,
            medium: ZONE_LEVEL_MEDIUM,
            low: ZONE_LEVEL_LOW,
        }
    }

    /// Threat model bounds (0-100 scale)
    pub fn threat_model() -> Self {
        Self {
            critical: THREAT_LEVEL_CRITICAL,
            high: THREAT_LEVEL_HIGH,
            medium: THREAT_LEVEL_MEDIUM,
            low: THREAT_LEVEL_LOW,
        }
    }

    /// All bounds finite and strictly descending from critical to low
    pub fn validate(&self) -> AppResult<()> {
        let bounds = [self.critical, self.high, self.medium, self.low];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(AppError::invalid_config(format!(
                "Level thresholds must be finite, got {:?}",
                bounds
            )));
        }
        if !bounds.windows(2).all(|w| w[0] > w[1]) {
            return Err(AppError::invalid_config(format!(
                "Level thresholds must descend strictly (critical > high > medium > low), got {:?}",
                bounds
            )));
        }
        Ok(())
    }

    /// Band index 0 (lowest) ..= 4 (critical)
    pub fn band(&self, score: f64) -> usize {
        if score >= self.critical {
            4
        } else if score >= self.high {
            3
        } else if score >= self.medium {
            2
        } else if score >= self.low {
            1
        } else {
            0
        }
    }
}

/// Process-level settings resolved from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// JSON zone catalog; `None` means the built-in catalog
    pub zone_catalog_path: Option<PathBuf>,
    /// Thread count for parallel batch processing
    pub batch_workers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            zone_catalog_path: None,
            batch_workers: DEFAULT_BATCH_WORKERS,
        }
    }
}

impl EngineConfig {
    /// Read GEORISK_ZONE_CATALOG and GEORISK_BATCH_WORKERS
    pub fn from_env() -> Self {
        let zone_catalog_path = std::env::var(ENV_ZONE_CATALOG)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let batch_workers = match std::env::var(ENV_BATCH_WORKERS) {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warn!(
                        "⚠️ {}={:?} is not a positive integer, using {}",
                        ENV_BATCH_WORKERS, raw, DEFAULT_BATCH_WORKERS
                    );
                    DEFAULT_BATCH_WORKERS
                }
            },
            Err(_) => DEFAULT_BATCH_WORKERS,
        };

        Self {
            zone_catalog_path,
            batch_workers,
        }
    }

    /// Resolve the zone catalog this config points at
    pub fn load_catalog(&self) -> AppResult<ZoneCatalog> {
        match &self.zone_catalog_path {
            Some(path) => ZoneCatalog::from_json_file(path),
            None => {
                info!("🗺️ Using built-in Nagpur zone catalog");
                Ok(ZoneCatalog::default())
            }
        }
    }
}
