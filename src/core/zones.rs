//! Zone Classification
//!
//! Nearest-center lookup over the zone catalog. Every point is assigned to the
//! closest zone center however far away it is (a Voronoi partition over the
//! centers), so there is no "outside every zone" outcome and no cutoff.

use tracing::debug;

use crate::models::config::ZoneCatalog;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Coordinate, Zone, ZoneClassification};
use crate::utils::geo::haversine_km;

/// Classifier bound to one immutable catalog
#[derive(Debug, Clone, Default)]
pub struct ZoneClassifier {
    catalog: ZoneCatalog,
}

impl ZoneClassifier {
    pub fn new(catalog: ZoneCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ZoneCatalog {
        &self.catalog
    }

    pub fn zones(&self) -> &[Zone] {
        self.catalog.zones()
    }

    /// Closest zone and its distance in km. Ties go to the earlier zone.
    pub fn nearest_zone(&self, position: Coordinate) -> AppResult<(&Zone, f64)> {
        let mut best: Option<(&Zone, f64)> = None;

        for zone in self.catalog.zones() {
            let distance = haversine_km(position, zone.center);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((zone, distance)),
            }
        }

        best.ok_or_else(AppError::empty_catalog)
    }

    /// Nearest-zone classification of one position
    pub fn classify(&self, position: Coordinate) -> AppResult<ZoneClassification> {
        let (zone, distance_km) = self.nearest_zone(position)?;

        debug!(
            zone = %zone.name,
            tag = zone.tag.as_str(),
            distance_km,
            "classified ({:.5}, {:.5})",
            position.latitude,
            position.longitude
        );

        Ok(ZoneClassification {
            zone_name: zone.name.clone(),
            tag: zone.tag,
            weight: zone.weight,
            distance_km,
        })
    }
}
