#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Geospatial engine for campus incident reports.
//!
//! Pure, stateless functions over caller-supplied collections:
//!
//! - [`haversine_distance`]: great-circle distance in meters.
//! - [`detect_duplicate`]: spatial and title overlap between a new report
//!   and a pre-filtered window of open incidents. A whitespace-only
//!   candidate title is treated as absent.
//! - [`build_density_grid`]: uniform weighted grid for heatmaps.
//! - [`cluster_points`]: greedy seed-anchored proximity clusters.
//!
//! None of these touch storage. The query layer decides which incidents
//! go in; this crate only decides what comes out.

pub mod cluster;
pub mod density;
pub mod distance;
pub mod duplicate;

use campus_incidents_geo_models::{GridCell, WeightedPoint};
use campus_incidents_incident_models::IncidentSnapshot;

pub use cluster::{DEFAULT_CLUSTER_RADIUS_METERS, cluster_points};
pub use density::{
    DEFAULT_CELL_SIZE_DEGREES, DensityGrid, MIN_CELL_SIZE_DEGREES, build_density_grid,
    is_valid_cell_size,
};
pub use distance::{EARTH_RADIUS_METERS, haversine_distance};
pub use duplicate::{DUPLICATE_RADIUS_METERS, MAX_NEARBY_MATCHES, detect_duplicate};

/// Converts incidents into priority-weighted points, preserving order.
#[must_use]
pub fn weighted_points(incidents: &[IncidentSnapshot]) -> Vec<WeightedPoint> {
    incidents.iter().map(WeightedPoint::from).collect()
}

/// Builds heatmap cells for `incidents` at the default cell size.
#[must_use]
pub fn generate_heatmap(incidents: &[IncidentSnapshot]) -> Vec<GridCell> {
    build_density_grid(&weighted_points(incidents), DEFAULT_CELL_SIZE_DEGREES)
}

#[cfg(test)]
mod tests {
    use campus_incidents_geo_models::DuplicateCandidate;
    use campus_incidents_incident_models::{
        Coordinate, IncidentCategory, IncidentPriority, IncidentStatus,
    };
    use chrono::{Duration, Utc};

    use super::*;

    fn snapshot(
        id: &str,
        latitude: f64,
        longitude: f64,
        priority: Option<IncidentPriority>,
    ) -> IncidentSnapshot {
        IncidentSnapshot {
            id: id.to_string(),
            category: IncidentCategory::Water,
            status: IncidentStatus::New,
            title: format!("Incident {id}"),
            coordinate: Coordinate::new(latitude, longitude),
            created_at: Utc::now() - Duration::hours(1),
            priority,
        }
    }

    #[test]
    fn weights_follow_priority() {
        let points = weighted_points(&[
            snapshot("a", 0.0, 0.0, Some(IncidentPriority::Critical)),
            snapshot("b", 0.0, 0.0, Some(IncidentPriority::Low)),
            snapshot("c", 0.0, 0.0, None),
        ]);
        let weights: Vec<f64> = points.iter().map(|p| p.weight).collect();
        assert_eq!(weights, vec![4.0, 1.0, 1.0]);
    }

    #[test]
    fn heatmap_conserves_priority_weight() {
        let incidents = [
            snapshot("a", 28.5355, 77.2707, Some(IncidentPriority::High)),
            snapshot("b", 28.5356, 77.2708, Some(IncidentPriority::Critical)),
            snapshot("c", 28.5360, 77.2710, Some(IncidentPriority::Medium)),
        ];
        let total: f64 = generate_heatmap(&incidents).iter().map(|c| c.weight).sum();
        assert!((total - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn water_report_fifty_five_meters_away_is_duplicate() {
        let window = [snapshot("w1", 28.5356, 77.2708, Some(IncidentPriority::Critical))];
        let candidate = DuplicateCandidate {
            category: IncidentCategory::Water,
            coordinate: Coordinate::new(28.5356 + 0.0005, 77.2708),
            title: None,
        };
        let verdict = detect_duplicate(&candidate, &window);
        assert!(verdict.is_duplicate);
        assert_eq!(verdict.nearby_matches[0].id, "w1");
    }

    #[test]
    fn clusters_account_for_every_incident() {
        let incidents = [
            snapshot("a", 28.5355, 77.2707, Some(IncidentPriority::High)),
            snapshot("b", 28.5356, 77.2708, Some(IncidentPriority::Critical)),
            snapshot("c", 28.5500, 77.2900, None),
        ];
        let clusters = cluster_points(&weighted_points(&incidents), DEFAULT_CLUSTER_RADIUS_METERS);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters.iter().map(|c| c.member_count).sum::<usize>(), 3);
        assert!((clusters[0].total_weight - 7.0).abs() < f64::EPSILON);
    }
}
