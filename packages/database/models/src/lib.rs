#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Stored incident records, viewer identity, and query parameter types.
//!
//! These types describe what the storage layer keeps and what callers may
//! ask of it. They are distinct from the API response types in
//! `campus_incidents_server_models` and from the read-only
//! [`IncidentSnapshot`] handed to the geospatial engine.

use campus_incidents_incident_models::{
    Coordinate, IncidentCategory, IncidentPriority, IncidentSnapshot, IncidentStatus,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How far back the duplicate window reaches by default.
pub const DEFAULT_DUPLICATE_WINDOW_HOURS: i64 = 24;

/// Converts a window length in hours into a [`Duration`].
///
/// Returns `None` unless `hours` is positive and representable, so a bad
/// setting can never move the window start into the future.
#[must_use]
pub fn duplicate_window_duration(hours: i64) -> Option<Duration> {
    if hours <= 0 {
        return None;
    }
    Duration::try_hours(hours)
}

/// Default page size for the general incident listing.
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Default page size for a user's own incident listing.
pub const DEFAULT_USER_LIST_LIMIT: usize = 20;

/// Campus role of the person making a request.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UserRole {
    /// Student reporter
    #[default]
    Student,
    /// Faculty or administrative staff
    Staff,
    /// Maintenance technician
    Technician,
    /// Portal administrator, sees everything
    Admin,
}

/// Identity of the caller, as resolved by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    /// User identifier.
    pub user_id: String,
    /// Campus role.
    pub role: UserRole,
}

impl Viewer {
    /// Whether this viewer bypasses per-user scoping.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Whether this viewer may see `incident`: its reporter, its assignee,
    /// or an admin.
    #[must_use]
    pub fn can_view(&self, incident: &IncidentRecord) -> bool {
        self.is_admin()
            || incident.reported_by == self.user_id
            || incident.assigned_to.as_deref() == Some(self.user_id.as_str())
    }
}

/// Where an incident was reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentLocation {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Free-form address or building name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl IncidentLocation {
    /// The bare coordinate of this location.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// An incident as kept by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Primary key.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Maintenance category.
    pub category: IncidentCategory,
    /// Longer description.
    pub description: String,
    /// Urgency.
    #[serde(default)]
    pub priority: IncidentPriority,
    /// Lifecycle status.
    #[serde(default)]
    pub status: IncidentStatus,
    /// Location of the issue.
    pub location: IncidentLocation,
    /// Names of attached images.
    #[serde(default)]
    pub images: Vec<String>,
    /// User who reported the incident.
    pub reported_by: String,
    /// Technician the incident is assigned to.
    #[serde(default)]
    pub assigned_to: Option<String>,
    /// When the incident was created.
    pub created_at: DateTime<Utc>,
    /// When the incident was last modified.
    pub updated_at: DateTime<Utc>,
    /// When the incident was resolved.
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl IncidentRecord {
    /// Read-only view used by the geospatial engine.
    #[must_use]
    pub fn snapshot(&self) -> IncidentSnapshot {
        IncidentSnapshot {
            id: self.id.clone(),
            category: self.category,
            status: self.status,
            title: self.title.clone(),
            coordinate: self.location.coordinate(),
            created_at: self.created_at,
            priority: Some(self.priority),
        }
    }
}

/// Fields supplied when reporting a new incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIncident {
    /// Short title.
    pub title: String,
    /// Maintenance category.
    pub category: IncidentCategory,
    /// Longer description.
    pub description: String,
    /// Urgency.
    pub priority: IncidentPriority,
    /// Location of the issue.
    pub location: IncidentLocation,
    /// Names of attached images.
    pub images: Vec<String>,
    /// Reporting user.
    pub reported_by: String,
}

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Whether `coordinate` lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (self.south..=self.north).contains(&coordinate.latitude)
            && (self.west..=self.east).contains(&coordinate.longitude)
    }
}

/// Window of incidents a new report is checked against: open, same
/// category, created within `window` of `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateWindowQuery {
    /// Category of the new report.
    pub category: IncidentCategory,
    /// Reference time, usually the current time.
    pub now: DateTime<Utc>,
    /// How far back to look.
    pub window: Duration,
}

impl DuplicateWindowQuery {
    /// Window of [`DEFAULT_DUPLICATE_WINDOW_HOURS`] ending at `now`.
    #[must_use]
    pub fn new(category: IncidentCategory, now: DateTime<Utc>) -> Self {
        Self {
            category,
            now,
            window: Duration::hours(DEFAULT_DUPLICATE_WINDOW_HOURS),
        }
    }

    /// Overrides the window length.
    #[must_use]
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Earliest creation time still inside the window.
    #[must_use]
    pub fn since(&self) -> DateTime<Utc> {
        self.now - self.window
    }

    /// Whether `incident` belongs in this window.
    #[must_use]
    pub fn matches(&self, incident: &IncidentRecord) -> bool {
        incident.category == self.category
            && incident.status.is_open()
            && incident.created_at >= self.since()
    }
}

/// Filters for the map view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapQuery {
    /// Only this category.
    pub category: Option<IncidentCategory>,
    /// Only this status.
    pub status: Option<IncidentStatus>,
    /// Created at or after.
    pub from: Option<DateTime<Utc>>,
    /// Created at or before.
    pub to: Option<DateTime<Utc>>,
    /// Spatial filter.
    pub bbox: Option<BoundingBox>,
}

impl MapQuery {
    /// Whether `incident` passes every filter.
    #[must_use]
    pub fn matches(&self, incident: &IncidentRecord) -> bool {
        self.category.is_none_or(|c| incident.category == c)
            && self.status.is_none_or(|s| incident.status == s)
            && self.from.is_none_or(|from| incident.created_at >= from)
            && self.to.is_none_or(|to| incident.created_at <= to)
            && self
                .bbox
                .is_none_or(|bbox| bbox.contains(incident.location.coordinate()))
    }
}

/// Filters and paging for the general incident listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentListQuery {
    /// Only this category.
    pub category: Option<IncidentCategory>,
    /// Only this status.
    pub status: Option<IncidentStatus>,
    /// Maximum number of results.
    pub limit: usize,
    /// Number of results to skip.
    pub skip: usize,
}

impl Default for IncidentListQuery {
    fn default() -> Self {
        Self {
            category: None,
            status: None,
            limit: DEFAULT_LIST_LIMIT,
            skip: 0,
        }
    }
}

/// Filters and paging for a user's own incidents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIncidentQuery {
    /// Only this status.
    pub status: Option<IncidentStatus>,
    /// Case-insensitive search over title, category, and description.
    pub search: Option<String>,
    /// Maximum number of results.
    pub limit: usize,
    /// Number of results to skip.
    pub skip: usize,
}

impl Default for UserIncidentQuery {
    fn default() -> Self {
        Self {
            status: None,
            search: None,
            limit: DEFAULT_USER_LIST_LIMIT,
            skip: 0,
        }
    }
}

impl UserIncidentQuery {
    /// Whether `incident` passes the status and search filters.
    #[must_use]
    pub fn matches(&self, incident: &IncidentRecord) -> bool {
        if self.status.is_some_and(|s| incident.status != s) {
            return false;
        }
        let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) else {
            return true;
        };
        let needle = search.to_lowercase();
        incident.title.to_lowercase().contains(&needle)
            || incident.category.as_ref().contains(&needle)
            || incident.description.to_lowercase().contains(&needle)
    }
}

/// One page of incidents plus the total matching count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentPage {
    /// Incidents on this page, newest first.
    pub incidents: Vec<IncidentRecord>,
    /// Number of incidents matching the query across all pages.
    pub total: usize,
    /// Page size used.
    pub limit: usize,
    /// Offset used.
    pub skip: usize,
}

impl IncidentPage {
    /// Whether more incidents exist beyond this page.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.skip.saturating_add(self.limit) < self.total
    }
}
