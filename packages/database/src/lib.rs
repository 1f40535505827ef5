#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident query interface for the campus incident portal.
//!
//! [`IncidentStore`] is the seam between the HTTP layer and whatever keeps
//! incidents. It owns the category/status/time filtering for the duplicate
//! window and the per-user authorization scoping for listings, so the
//! geospatial engine only ever sees pre-filtered snapshots.
//!
//! [`memory::MemoryStore`] is the bundled implementation, optionally
//! seeded from a JSON file via [`seed::load_seed`].

pub mod memory;
pub mod seed;

use async_trait::async_trait;
use campus_incidents_database_models::{
    DuplicateWindowQuery, IncidentListQuery, IncidentPage, IncidentRecord, MapQuery,
    NewIncident, UserIncidentQuery, Viewer,
};
use campus_incidents_incident_models::{IncidentSnapshot, InvalidCoordinateError};

pub use memory::MemoryStore;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Reading a seed file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Seed file JSON was malformed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record carried an out-of-range coordinate.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(#[from] InvalidCoordinateError),

    /// Two records share an ID.
    #[error("Duplicate incident id: {id}")]
    DuplicateId {
        /// The repeated ID.
        id: String,
    },
}

/// Queries the portal needs from incident storage.
#[async_trait]
pub trait IncidentStore: Send + Sync {
    /// Open incidents of the query's category created inside its window,
    /// as snapshots for duplicate detection.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backing store fails.
    async fn duplicate_window(
        &self,
        query: &DuplicateWindowQuery,
    ) -> Result<Vec<IncidentSnapshot>, DbError>;

    /// Incidents for the map view, newest first. Non-admin viewers only
    /// see incidents they reported.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backing store fails.
    async fn map_incidents(
        &self,
        query: &MapQuery,
        viewer: &Viewer,
    ) -> Result<Vec<IncidentRecord>, DbError>;

    /// One page of incidents, newest first, scoped like
    /// [`Self::map_incidents`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backing store fails.
    async fn list_incidents(
        &self,
        query: &IncidentListQuery,
        viewer: &Viewer,
    ) -> Result<IncidentPage, DbError>;

    /// One page of the viewer's own incidents, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backing store fails.
    async fn user_incidents(
        &self,
        query: &UserIncidentQuery,
        viewer: &Viewer,
    ) -> Result<IncidentPage, DbError>;

    /// Looks up a single incident. Authorization is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backing store fails.
    async fn get_incident(&self, id: &str) -> Result<Option<IncidentRecord>, DbError>;

    /// Stores a new incident with status `new` and a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidCoordinate`] if the location is out of
    /// range, or another [`DbError`] if the backing store fails.
    async fn insert_incident(&self, incident: NewIncident) -> Result<IncidentRecord, DbError>;
}
