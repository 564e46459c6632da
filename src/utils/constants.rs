//! Constants Module - Single Source of Truth
//!
//! Every numeric tier, weight and threshold used by the scorers lives here.
//! Config structs in `models::config` take their defaults from these values.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "GeoRisk";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Env var pointing at a JSON zone catalog
pub const ENV_ZONE_CATALOG: &str = "GEORISK_ZONE_CATALOG";

/// Env var for parallel batch width
pub const ENV_BATCH_WORKERS: &str = "GEORISK_BATCH_WORKERS";

/// Default parallel batch width
pub const DEFAULT_BATCH_WORKERS: usize = 4;

/// Batch progress is logged every N observations
pub const BATCH_PROGRESS_INTERVAL: usize = 5000;

// ============================================
// GEODESY
// ============================================

/// Mean Earth radius (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// ============================================
// ZONE MODEL (fractional 0-1 scale)
// ============================================

/// Zone tag sub-scores
pub const ZONE_SCORE_SAFE: f64 = 0.20;
pub const ZONE_SCORE_MEDIUM: f64 = 0.50;
pub const ZONE_SCORE_HIGH: f64 = 0.80;

/// Daytime window is [DAY_START_HOUR, DAY_END_HOUR] inclusive
pub const DAY_START_HOUR: u32 = 6;
pub const DAY_END_HOUR: u32 = 21;
pub const TIME_RISK_DAY: f64 = 0.10;
pub const TIME_RISK_EVENING: f64 = 0.30;
pub const TIME_RISK_NIGHT: f64 = 0.60;

/// Speed tiers (km/h, strict greater-than)
pub const SPEED_NORMAL_KMH: f64 = 30.0;
pub const SPEED_SLOW_KMH: f64 = 10.0;
pub const SPEED_RISK_NORMAL: f64 = 0.10;
pub const SPEED_RISK_SLOW: f64 = 0.30;
pub const SPEED_RISK_CRAWL: f64 = 0.60;

/// Stop tiers (seconds, strict less-than)
pub const STOP_BRIEF_SECS: u32 = 30;
pub const STOP_MEDIUM_SECS: u32 = 120;
pub const STOP_RISK_BRIEF: f64 = 0.10;
pub const STOP_RISK_MEDIUM: f64 = 0.40;
pub const STOP_RISK_LONG: f64 = 0.70;

/// Zone model weights
pub const ZONE_WEIGHT_ZONE: f64 = 0.40;
pub const ZONE_WEIGHT_TIME: f64 = 0.20;
pub const ZONE_WEIGHT_SPEED: f64 = 0.15;
pub const ZONE_WEIGHT_STOP: f64 = 0.25;

/// Zone model level thresholds (inclusive lower bounds)
pub const ZONE_LEVEL_CRITICAL: f64 = 0.70;
pub const ZONE_LEVEL_HIGH: f64 = 0.50;
pub const ZONE_LEVEL_MEDIUM: f64 = 0.30;
pub const ZONE_LEVEL_LOW: f64 = 0.15;

/// Zone model scores are rounded to this many decimals
pub const ZONE_SCORE_DECIMALS: i32 = 3;

// ============================================
// REASON TRIGGERS
// ============================================

/// Night reason fires for hour >= NIGHT_REASON_FROM_HOUR or < NIGHT_REASON_UNTIL_HOUR
pub const NIGHT_REASON_FROM_HOUR: u32 = 22;
pub const NIGHT_REASON_UNTIL_HOUR: u32 = 5;

/// Slow-movement reason fires below this speed (km/h)
pub const SLOW_REASON_KMH: f64 = 10.0;

/// Long-stop reason fires strictly above this duration.
/// Deliberately independent of STOP_MEDIUM_SECS (120 s); the two were never
/// reconciled and must not be unified without product sign-off.
pub const LONG_STOP_REASON_SECS: u32 = 300;

// ============================================
// THREAT MODEL (point 0-100 scale)
// ============================================

/// Deviation curve: min(cap, scale * ln(n + 1))
pub const DEVIATION_LOG_SCALE: f64 = 200.0;
pub const DEVIATION_RISK_CAP: f64 = 100.0;

/// Location risk outside every flagged circle
pub const LOCATION_BASE_RISK: f64 = 10.0;
/// Location risk at a circle's rim; rises linearly to the ceiling at its center
pub const LOCATION_RIM_RISK: f64 = 50.0;
pub const LOCATION_PROXIMITY_SPAN: f64 = 50.0;
pub const LOCATION_RISK_CEILING: f64 = 100.0;

/// Late-night window [0, LATE_NIGHT_END_HOUR)
pub const LATE_NIGHT_END_HOUR: u32 = 5;
pub const LATE_NIGHT_BASE: f64 = 60.0;
pub const LATE_NIGHT_STEP: f64 = 8.0;
pub const RUSH_HOURS: [u32; 4] = [7, 8, 17, 18];
pub const RUSH_HOUR_RISK: f64 = 40.0;
pub const NORMAL_HOUR_RISK: f64 = 20.0;

/// Threat model weights
pub const THREAT_WEIGHT_DEVIATION: f64 = 0.60;
pub const THREAT_WEIGHT_LOCATION: f64 = 0.20;
pub const THREAT_WEIGHT_TIME: f64 = 0.20;

/// Threat model level thresholds (inclusive lower bounds)
pub const THREAT_LEVEL_CRITICAL: f64 = 75.0;
pub const THREAT_LEVEL_HIGH: f64 = 60.0;
pub const THREAT_LEVEL_MEDIUM: f64 = 40.0;
pub const THREAT_LEVEL_LOW: f64 = 20.0;

/// Threat model scores are rounded to this many decimals
pub const THREAT_SCORE_DECIMALS: i32 = 2;

// ============================================
// ADVISORY
// ============================================

/// Alerts fire at this band index (MEDIUM) and above, on either level scale
pub const ALERT_MIN_BAND: usize = 2;

/// ETA overrun tiers (percent over the expected duration, strict greater-than)
pub const ETA_OVERRUN_CRITICAL_PCT: f64 = 50.0;
pub const ETA_OVERRUN_HIGH_PCT: f64 = 25.0;
pub const ETA_OVERRUN_MEDIUM_PCT: f64 = 10.0;

// ============================================
// CONVERSION HELPERS
// ============================================

/// Round half away from zero to `decimals` places
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
