#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Input and output types for the geospatial engine.
//!
//! Everything here is ephemeral: built per call from incident snapshots,
//! returned to the caller, and dropped. Nothing is persisted.

use campus_incidents_incident_models::{Coordinate, IncidentCategory, IncidentSnapshot};
use serde::{Deserialize, Serialize};

/// A coordinate carrying a non-negative weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedPoint {
    /// Position of the point.
    pub coordinate: Coordinate,
    /// Non-negative weight (priority-derived for incidents).
    pub weight: f64,
}

impl WeightedPoint {
    /// Creates a weighted point.
    #[must_use]
    pub const fn new(coordinate: Coordinate, weight: f64) -> Self {
        Self { coordinate, weight }
    }
}

impl From<&IncidentSnapshot> for WeightedPoint {
    fn from(incident: &IncidentSnapshot) -> Self {
        Self::new(incident.coordinate, incident.weight())
    }
}

/// Integer bucket index of a density grid cell.
///
/// Computed as `floor(lat / cell_size)` and `floor(lng / cell_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridKey {
    /// Latitude bucket.
    pub row: i64,
    /// Longitude bucket.
    pub col: i64,
}

/// One occupied bucket of a density grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    /// Bucket index.
    pub key: GridKey,
    /// Geometric center of the bucket (corner plus half a cell).
    pub center: Coordinate,
    /// Sum of the weights of every point in the bucket.
    pub weight: f64,
}

/// A group of nearby points produced by the proximity clusterer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// Arithmetic mean of the members' latitudes and longitudes.
    pub centroid: Coordinate,
    /// Number of input points in this cluster.
    pub member_count: usize,
    /// Sum of the members' weights.
    pub total_weight: f64,
    /// Indices of the member points in the input sequence, seed first.
    #[serde(skip)]
    pub members: Vec<usize>,
}

/// A freshly submitted report to check against existing incidents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCandidate {
    /// Category the reporter picked.
    pub category: IncidentCategory,
    /// Where the reporter is.
    pub coordinate: Coordinate,
    /// Optional title; an empty title is treated as absent.
    #[serde(default)]
    pub title: Option<String>,
}

/// An existing incident found close to a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyMatch {
    /// Identifier of the existing incident.
    pub id: String,
    /// Title of the existing incident.
    pub title: String,
    /// Distance from the candidate, rounded to the whole meter.
    pub distance_meters: f64,
}

/// Outcome of a duplicate check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateVerdict {
    /// Whether any spatial or title match was found.
    pub is_duplicate: bool,
    /// Total number of spatial matches before truncation.
    pub nearby_count: usize,
    /// Closest spatial matches, nearest first, at most three.
    pub nearby_matches: Vec<NearbyMatch>,
    /// Every title-matching incident id, in window order.
    pub title_matches: Vec<String>,
}
