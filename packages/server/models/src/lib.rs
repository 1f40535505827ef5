#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the campus incident server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the stored record types and the geospatial engine's types so the
//! API contract can evolve independently.

use campus_incidents_database_models::{IncidentPage, IncidentRecord};
use campus_incidents_geo_models::{Cluster, DuplicateVerdict, GridCell, NearbyMatch};
use campus_incidents_incident_models::{IncidentCategory, IncidentPriority, IncidentStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable reason.
    pub message: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of `POST /api/incidents/duplicate`.
///
/// Every field is optional at the JSON level so missing fields can be
/// reported with a clear message instead of a generic parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCheckRequest {
    /// Category name.
    pub category: Option<String>,
    /// Latitude of the new report.
    pub latitude: Option<f64>,
    /// Longitude of the new report.
    pub longitude: Option<f64>,
    /// Optional title.
    pub title: Option<String>,
}

/// An existing incident close to the checked location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiNearbyIncident {
    /// Incident ID.
    pub id: String,
    /// Incident title.
    pub title: String,
    /// Distance in whole meters.
    pub distance: f64,
}

impl From<NearbyMatch> for ApiNearbyIncident {
    fn from(m: NearbyMatch) -> Self {
        Self {
            id: m.id,
            title: m.title,
            distance: m.distance_meters,
        }
    }
}

/// Response of `POST /api/incidents/duplicate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCheckResponse {
    /// Whether the report looks like a duplicate.
    pub is_duplicate: bool,
    /// Number of open incidents within the duplicate radius.
    pub nearby_count: usize,
    /// Number of open incidents with an overlapping title.
    pub similar_title_count: usize,
    /// Up to three nearest incidents.
    pub nearby_incidents: Vec<ApiNearbyIncident>,
    /// IDs of every incident with an overlapping title.
    pub title_matches: Vec<String>,
}

impl From<DuplicateVerdict> for DuplicateCheckResponse {
    fn from(verdict: DuplicateVerdict) -> Self {
        Self {
            is_duplicate: verdict.is_duplicate,
            nearby_count: verdict.nearby_count,
            similar_title_count: verdict.title_matches.len(),
            nearby_incidents: verdict
                .nearby_matches
                .into_iter()
                .map(ApiNearbyIncident::from)
                .collect(),
            title_matches: verdict.title_matches,
        }
    }
}

/// Location part of a create request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLocationInput {
    /// Latitude.
    pub latitude: Option<f64>,
    /// Longitude.
    pub longitude: Option<f64>,
    /// Free-form address.
    pub address: Option<String>,
}

/// Body of `POST /api/incidents`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentRequest {
    /// Short title.
    pub title: Option<String>,
    /// Category name.
    pub category: Option<String>,
    /// Longer description.
    pub description: Option<String>,
    /// Priority name; anything unrecognized becomes `medium`.
    pub priority: Option<String>,
    /// Where the issue is.
    pub location: Option<ApiLocationInput>,
    /// Attached image names.
    #[serde(default)]
    pub images: Vec<String>,
}

/// Summary of a freshly created incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCreatedIncident {
    /// Incident ID.
    pub id: String,
    /// Title.
    pub title: String,
    /// Category.
    pub category: IncidentCategory,
    /// Priority.
    pub priority: IncidentPriority,
    /// Status (always `new`).
    pub status: IncidentStatus,
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// Address, if given.
    pub address: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<&IncidentRecord> for ApiCreatedIncident {
    fn from(record: &IncidentRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            category: record.category,
            priority: record.priority,
            status: record.status,
            latitude: record.location.latitude,
            longitude: record.location.longitude,
            address: record.location.address.clone(),
            created_at: record.created_at,
        }
    }
}

/// Response of a successful `POST /api/incidents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentResponse {
    /// Confirmation message.
    pub message: String,
    /// The stored incident.
    pub incident: ApiCreatedIncident,
}

/// 409 body when a report is rejected as a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateConflict {
    /// Explanation for the reporter.
    pub message: String,
    /// Always `true`.
    pub is_duplicate: bool,
    /// Nearest open incidents that caused the rejection.
    pub nearby_incidents: Vec<ApiNearbyIncident>,
}

/// Query parameters for `GET /api/incidents`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentListParams {
    /// Category name filter.
    pub category: Option<String>,
    /// Status name filter.
    pub status: Option<String>,
    /// Page size (default 100).
    pub limit: Option<usize>,
    /// Offset (default 0).
    pub skip: Option<usize>,
}

/// Query parameters for `GET /api/incidents/user`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIncidentParams {
    /// Status name filter.
    pub status: Option<String>,
    /// Case-insensitive search over title, category, and description.
    pub search: Option<String>,
    /// Page size (default 20).
    pub limit: Option<usize>,
    /// Offset (default 0).
    pub skip: Option<usize>,
}

/// A page of incidents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentListResponse {
    /// Incidents on this page.
    pub incidents: Vec<IncidentRecord>,
    /// Total matching incidents.
    pub total: usize,
    /// Page size used.
    pub limit: usize,
    /// Offset used.
    pub skip: usize,
    /// Whether another page exists.
    pub has_more: bool,
}

impl From<IncidentPage> for IncidentListResponse {
    fn from(page: IncidentPage) -> Self {
        let has_more = page.has_more();
        Self {
            incidents: page.incidents,
            total: page.total,
            limit: page.limit,
            skip: page.skip,
            has_more,
        }
    }
}

/// Response of `GET /api/incidents/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentResponse {
    /// The incident.
    pub incident: IncidentRecord,
}

/// Query parameters for `GET /api/incidents/map`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapQueryParams {
    /// Category name filter.
    pub category: Option<String>,
    /// Status name filter.
    pub status: Option<String>,
    /// Earliest creation time (RFC 3339).
    pub start_date: Option<DateTime<Utc>>,
    /// Latest creation time (RFC 3339).
    pub end_date: Option<DateTime<Utc>>,
    /// Bounding box as `west,south,east,north`.
    pub bbox: Option<String>,
    /// Heatmap cell size in degrees (overrides server default).
    pub cell_size: Option<f64>,
    /// Cluster radius in meters (overrides server default).
    pub radius: Option<f64>,
}

/// An incident marker on the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapIncident {
    /// Incident ID.
    pub id: String,
    /// Title.
    pub title: String,
    /// Category.
    pub category: IncidentCategory,
    /// Priority.
    pub priority: IncidentPriority,
    /// Status.
    pub status: IncidentStatus,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// Address, if given.
    pub address: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Reporting user.
    pub reported_by: String,
}

impl From<IncidentRecord> for ApiMapIncident {
    fn from(record: IncidentRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            category: record.category,
            priority: record.priority,
            status: record.status,
            lat: record.location.latitude,
            lng: record.location.longitude,
            address: record.location.address,
            created_at: record.created_at,
            reported_by: record.reported_by,
        }
    }
}

/// A heatmap cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ApiHeatmapCell {
    /// Cell center latitude.
    pub lat: f64,
    /// Cell center longitude.
    pub lng: f64,
    /// Summed priority weight.
    pub weight: f64,
}

impl From<GridCell> for ApiHeatmapCell {
    fn from(cell: GridCell) -> Self {
        Self {
            lat: cell.center.latitude,
            lng: cell.center.longitude,
            weight: cell.weight,
        }
    }
}

/// A marker cluster.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ApiCluster {
    /// Centroid latitude.
    pub lat: f64,
    /// Centroid longitude.
    pub lng: f64,
    /// Number of incidents in the cluster.
    pub count: usize,
    /// Summed priority weight.
    pub weight: f64,
}

impl From<Cluster> for ApiCluster {
    fn from(cluster: Cluster) -> Self {
        Self {
            lat: cluster.centroid.latitude,
            lng: cluster.centroid.longitude,
            count: cluster.member_count,
            weight: cluster.total_weight,
        }
    }
}

/// Response of `GET /api/incidents/map`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapResponse {
    /// Individual markers, newest first.
    pub incidents: Vec<ApiMapIncident>,
    /// Number of markers.
    pub total: usize,
    /// Priority-weighted density grid.
    pub heatmap: Vec<ApiHeatmapCell>,
    /// Proximity clusters over the same incidents.
    pub clusters: Vec<ApiCluster>,
}
