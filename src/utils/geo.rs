//! Great-circle distance on a spherical Earth.

use crate::models::types::Coordinate;
use crate::utils::constants::EARTH_RADIUS_KM;

/// Haversine distance between two coordinates in kilometres.
///
/// Symmetric and non-negative. Out-of-range latitudes/longitudes are not
/// rejected; they just produce large distances. The square-root argument is
/// clamped to `[0, 1]` so rounding near antipodal points cannot push `asin`
/// outside its domain.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}
