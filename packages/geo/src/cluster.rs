//! Greedy proximity clustering for map markers.
//!
//! Single pass over the input: every not-yet-claimed point seeds a new
//! cluster, which then claims every remaining unclaimed point within the
//! radius of the seed's own coordinate. Membership is tested against the
//! seed, never the drifting centroid, so two members of one cluster may be
//! up to twice the radius apart and a point between two seeds goes to
//! whichever seed comes first in input order. The output therefore depends
//! on input order; callers that need stable clusters should sort first.

use campus_incidents_geo_models::{Cluster, WeightedPoint};
use campus_incidents_incident_models::Coordinate;

use crate::distance::haversine_distance;

/// Default clustering radius in meters.
pub const DEFAULT_CLUSTER_RADIUS_METERS: f64 = 100.0;

/// Running state of a cluster under construction.
struct ClusterBuilder {
    seed: Coordinate,
    latitude_sum: f64,
    longitude_sum: f64,
    total_weight: f64,
    members: Vec<usize>,
}

impl ClusterBuilder {
    fn seeded(index: usize, point: &WeightedPoint) -> Self {
        Self {
            seed: point.coordinate,
            latitude_sum: point.coordinate.latitude,
            longitude_sum: point.coordinate.longitude,
            total_weight: point.weight,
            members: vec![index],
        }
    }

    fn push(&mut self, index: usize, point: &WeightedPoint) {
        self.latitude_sum += point.coordinate.latitude;
        self.longitude_sum += point.coordinate.longitude;
        self.total_weight += point.weight;
        self.members.push(index);
    }

    #[allow(clippy::cast_precision_loss)]
    fn centroid(&self) -> Coordinate {
        let n = self.members.len() as f64;
        Coordinate::new(self.latitude_sum / n, self.longitude_sum / n)
    }

    fn build(self) -> Cluster {
        Cluster {
            centroid: self.centroid(),
            member_count: self.members.len(),
            total_weight: self.total_weight,
            members: self.members,
        }
    }
}

/// Groups `points` into seed-anchored clusters of `radius_meters`.
///
/// Every input point lands in exactly one cluster. A negative or
/// non-finite radius is treated as zero, so only exactly co-located
/// points are grouped. This deliberately differs from applying
/// `distance <= radius` literally, under which a negative radius would
/// claim nothing and leave every point a singleton.
#[must_use]
pub fn cluster_points(points: &[WeightedPoint], radius_meters: f64) -> Vec<Cluster> {
    let radius = if radius_meters.is_finite() && radius_meters > 0.0 {
        radius_meters
    } else {
        0.0
    };

    let mut used = vec![false; points.len()];
    let mut clusters = Vec::new();

    for (seed_index, seed) in points.iter().enumerate() {
        if used[seed_index] {
            continue;
        }
        used[seed_index] = true;

        let mut builder = ClusterBuilder::seeded(seed_index, seed);

        // Everything before the seed is already claimed.
        for (index, point) in points.iter().enumerate().skip(seed_index + 1) {
            if used[index] {
                continue;
            }
            if haversine_distance(builder.seed, point.coordinate) <= radius {
                used[index] = true;
                builder.push(index, point);
            }
        }

        clusters.push(builder.build());
    }

    log::debug!(
        "Clustered {} points into {} clusters (radius {radius} m)",
        points.len(),
        clusters.len()
    );

    clusters
}
