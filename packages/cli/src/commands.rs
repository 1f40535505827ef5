//! Offline analysis commands over a JSON incident file.
//!
//! Each command loads incident records in the same shape the server's seed
//! file uses, runs one geospatial operation, and renders the result as the
//! JSON the API would return for it.

use std::path::Path;

use campus_incidents_database::{DbError, IncidentStore, MemoryStore, seed};
use campus_incidents_database_models::{
    DuplicateWindowQuery, IncidentRecord, duplicate_window_duration,
};
use campus_incidents_geo::{
    build_density_grid, cluster_points, detect_duplicate, haversine_distance, weighted_points,
};
use campus_incidents_geo_models::DuplicateCandidate;
use campus_incidents_incident_models::{Coordinate, IncidentCategory, IncidentSnapshot};
use campus_incidents_server_models::{ApiCluster, ApiHeatmapCell, DuplicateCheckResponse};
use chrono::{DateTime, Utc};

/// Errors from an offline command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Loading or querying incidents failed.
    #[error(transparent)]
    Db(#[from] DbError),

    /// Rendering output failed.
    #[error("Failed to render output: {0}")]
    Json(#[from] serde_json::Error),

    /// The duplicate window length was not a positive, representable
    /// number of hours.
    #[error("Invalid duplicate window of {hours} hours")]
    InvalidWindow {
        /// The rejected window length.
        hours: i64,
    },

    /// A coordinate argument was out of range.
    #[error(transparent)]
    InvalidCoordinate(#[from] campus_incidents_incident_models::InvalidCoordinateError),
}

/// Arguments for a duplicate check.
#[derive(Debug, Clone)]
pub struct CheckArgs {
    /// Category of the prospective report.
    pub category: IncidentCategory,
    /// Latitude of the prospective report.
    pub latitude: f64,
    /// Longitude of the prospective report.
    pub longitude: f64,
    /// Optional title.
    pub title: Option<String>,
    /// Hours back the duplicate window reaches.
    pub window_hours: i64,
    /// Reference time for the window; defaults to now.
    pub now: Option<DateTime<Utc>>,
}

/// Snapshots of `records`, oldest first so clustering is stable across runs.
fn snapshots(records: &[IncidentRecord]) -> Vec<IncidentSnapshot> {
    let mut snapshots: Vec<IncidentSnapshot> =
        records.iter().map(IncidentRecord::snapshot).collect();
    snapshots.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    snapshots
}

/// Checks a prospective report against the open incidents in `records`.
///
/// # Errors
///
/// Returns [`CommandError`] if the coordinate or window length is invalid,
/// or a record is malformed.
pub async fn check(
    records: Vec<IncidentRecord>,
    args: &CheckArgs,
) -> Result<String, CommandError> {
    let coordinate = Coordinate::validated(args.latitude, args.longitude)?;
    let window = duplicate_window_duration(args.window_hours).ok_or(CommandError::InvalidWindow {
        hours: args.window_hours,
    })?;
    let store = MemoryStore::with_incidents(records)?;

    let query = DuplicateWindowQuery::new(args.category, args.now.unwrap_or_else(Utc::now))
        .with_window(window);
    let window = store.duplicate_window(&query).await?;
    log::info!("Checking against {} open {} incidents", window.len(), args.category);

    let candidate = DuplicateCandidate {
        category: args.category,
        coordinate,
        title: args.title.clone(),
    };
    let verdict = detect_duplicate(&candidate, &window);

    Ok(serde_json::to_string_pretty(&DuplicateCheckResponse::from(verdict))?)
}

/// Renders the priority-weighted density grid of `records`.
///
/// # Errors
///
/// Returns [`CommandError::Json`] if rendering fails.
pub fn heatmap(records: &[IncidentRecord], cell_size: f64) -> Result<String, CommandError> {
    let points = weighted_points(&snapshots(records));
    let cells: Vec<ApiHeatmapCell> = build_density_grid(&points, cell_size)
        .into_iter()
        .map(ApiHeatmapCell::from)
        .collect();
    log::info!("{} incidents fell into {} cells", points.len(), cells.len());
    Ok(serde_json::to_string_pretty(&cells)?)
}

/// Renders the proximity clusters of `records`.
///
/// # Errors
///
/// Returns [`CommandError::Json`] if rendering fails.
pub fn clusters(records: &[IncidentRecord], radius_meters: f64) -> Result<String, CommandError> {
    let points = weighted_points(&snapshots(records));
    let clusters: Vec<ApiCluster> = cluster_points(&points, radius_meters)
        .into_iter()
        .map(ApiCluster::from)
        .collect();
    log::info!("{} incidents formed {} clusters", points.len(), clusters.len());
    Ok(serde_json::to_string_pretty(&clusters)?)
}

/// Great-circle distance between two coordinates, in meters.
///
/// # Errors
///
/// Returns [`CommandError::InvalidCoordinate`] if either point is out of
/// range.
pub fn distance(from: (f64, f64), to: (f64, f64)) -> Result<f64, CommandError> {
    let from = Coordinate::validated(from.0, from.1)?;
    let to = Coordinate::validated(to.0, to.1)?;
    Ok(haversine_distance(from, to))
}

/// Loads incident records from a seed-format JSON file.
///
/// # Errors
///
/// Returns [`CommandError::Db`] if the file cannot be read or parsed.
pub async fn load(path: &Path) -> Result<Vec<IncidentRecord>, CommandError> {
    Ok(seed::load_seed(path).await?)
}
