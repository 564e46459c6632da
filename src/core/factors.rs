//! Factor Scorers
//!
//! Independent pure functions mapping one raw signal to a sub-score.
//! Zone-model scorers return fractions (0-1); threat-model scorers return
//! points (0-100). The tier values are part of the observable contract: the
//! reasons generator and downstream dashboards depend on them.

use crate::models::config::ZoneTagScores;
use crate::models::types::{Coordinate, HighRiskCircle, ZoneTag};
use crate::utils::constants::*;
use crate::utils::geo::haversine_km;

// ============================================
// ZONE MODEL (0-1)
// ============================================

/// SAFE 0.20, MEDIUM 0.50, HIGH 0.80 with default scores
pub fn zone_risk(tag: ZoneTag, scores: &ZoneTagScores) -> f64 {
    scores.score(tag)
}

/// Day [6, 21] -> 0.10, evening (21, 24] -> 0.30, night [0, 6) -> 0.60
pub fn day_period_risk(hour: u32) -> f64 {
    if (DAY_START_HOUR..=DAY_END_HOUR).contains(&hour) {
        TIME_RISK_DAY
    } else if hour > DAY_END_HOUR && hour <= 24 {
        TIME_RISK_EVENING
    } else {
        TIME_RISK_NIGHT
    }
}

/// Faster is safer: >30 km/h -> 0.10, >10 -> 0.30, else 0.60
pub fn speed_risk(speed_kmh: f64) -> f64 {
    if speed_kmh > SPEED_NORMAL_KMH {
        SPEED_RISK_NORMAL
    } else if speed_kmh > SPEED_SLOW_KMH {
        SPEED_RISK_SLOW
    } else {
        SPEED_RISK_CRAWL
    }
}

/// <30 s -> 0.10, <120 s -> 0.40, else 0.70
pub fn stop_risk(stopped_seconds: u32) -> f64 {
    if stopped_seconds < STOP_BRIEF_SECS {
        STOP_RISK_BRIEF
    } else if stopped_seconds < STOP_MEDIUM_SECS {
        STOP_RISK_MEDIUM
    } else {
        STOP_RISK_LONG
    }
}

// ============================================
// THREAT MODEL (0-100)
// ============================================

/// 0 for no deviations, otherwise min(100, 200 * ln(n + 1)).
///
/// With the default scale a single deviation already saturates the cap.
pub fn deviation_risk(deviation_count: u32) -> f64 {
    if deviation_count == 0 {
        return 0.0;
    }
    (DEVIATION_LOG_SCALE * (f64::from(deviation_count) + 1.0).ln()).min(DEVIATION_RISK_CAP)
}

/// Late night [0, 5) ramps from 100 down to 68, rush hours 40, otherwise 20
pub fn hourly_threat_risk(hour: u32) -> f64 {
    if hour < LATE_NIGHT_END_HOUR {
        LATE_NIGHT_BASE + f64::from(LATE_NIGHT_END_HOUR - hour) * LATE_NIGHT_STEP
    } else if RUSH_HOURS.contains(&hour) {
        RUSH_HOUR_RISK
    } else {
        NORMAL_HOUR_RISK
    }
}

/// Base 10; inside a circle the risk rises from 50 at the rim to 100 at the
/// center. Overlapping circles take the maximum. Points exactly on the rim
/// count as outside.
pub fn proximity_risk(position: Coordinate, circles: &[HighRiskCircle]) -> f64 {
    let risk = circles
        .iter()
        .filter_map(|circle| {
            let distance = haversine_km(position, circle.center);
            (distance < circle.radius_km).then(|| {
                let proximity = 1.0 - distance / circle.radius_km;
                LOCATION_RIM_RISK + proximity * LOCATION_PROXIMITY_SPAN
            })
        })
        .fold(LOCATION_BASE_RISK, f64::max);

    risk.min(LOCATION_RISK_CEILING)
}
