#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Campus incident taxonomy, coordinates, and snapshot types.
//!
//! This crate defines the canonical vocabulary shared by every other
//! package: the fixed set of maintenance categories, the incident
//! lifecycle statuses, the priority levels (and their heatmap weights),
//! and the immutable [`IncidentSnapshot`] view that the geospatial engine
//! consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Maintenance category an incident is filed under.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum IncidentCategory {
    /// Power outages, broken lights, faulty sockets
    Electricity,
    /// Leaks, no supply, drainage
    Water,
    /// Wi-Fi and wired network connectivity
    Internet,
    /// Hostel rooms and common areas (furniture, AC, doors)
    Hostel,
    /// Waste collection and overflowing bins
    Garbage,
    /// Servers, accounts, and campus IT services
    It,
    /// Classroom and lab equipment (projectors, instruments)
    Equipment,
}

impl IncidentCategory {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Electricity,
            Self::Water,
            Self::Internet,
            Self::Hostel,
            Self::Garbage,
            Self::It,
            Self::Equipment,
        ]
    }
}

/// Lifecycle status of an incident.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum IncidentStatus {
    /// Freshly reported, nobody assigned yet
    #[default]
    New,
    /// A technician is working on it
    InProgress,
    /// Fixed, awaiting confirmation
    Resolved,
    /// Done
    Closed,
}

impl IncidentStatus {
    /// Whether the incident still counts as open for duplicate detection.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::New | Self::InProgress)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::New, Self::InProgress, Self::Resolved, Self::Closed]
    }
}

/// Urgency assigned to an incident.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IncidentPriority {
    /// Cosmetic or minor inconvenience
    Low,
    /// Regular issue
    #[default]
    Medium,
    /// Urgent, affects many people
    High,
    /// Safety hazard or campus-wide outage
    Critical,
}

impl IncidentPriority {
    /// Heatmap weight for this priority level.
    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            Self::Low => 1.0,
            Self::Medium => 2.0,
            Self::High => 3.0,
            Self::Critical => 4.0,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }
}

/// Weight used when an incident carries no priority at all.
pub const DEFAULT_PRIORITY_WEIGHT: f64 = 1.0;

/// Heatmap weight for an optional priority, falling back to
/// [`DEFAULT_PRIORITY_WEIGHT`].
#[must_use]
pub fn priority_weight(priority: Option<IncidentPriority>) -> f64 {
    priority.map_or(DEFAULT_PRIORITY_WEIGHT, IncidentPriority::weight)
}

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in `[-180, 180]`.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate without range checks.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a coordinate, rejecting values outside the WGS84 ranges.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinateError`] if either component is not finite
    /// or falls outside its valid range.
    pub fn validated(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinateError> {
        let coordinate = Self::new(latitude, longitude);
        if coordinate.is_valid() {
            Ok(coordinate)
        } else {
            Err(InvalidCoordinateError {
                latitude,
                longitude,
            })
        }
    }

    /// Whether both components are finite and within range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Error returned when a latitude/longitude pair is out of range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidCoordinateError {
    /// The rejected latitude.
    pub latitude: f64,
    /// The rejected longitude.
    pub longitude: f64,
}

impl std::fmt::Display for InvalidCoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid coordinate ({}, {}): latitude must be in [-90, 90] and longitude in [-180, 180]",
            self.latitude, self.longitude
        )
    }
}

impl std::error::Error for InvalidCoordinateError {}

/// Immutable view of an incident handed to the geospatial engine.
///
/// Supplied by the storage layer; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentSnapshot {
    /// Opaque identifier.
    pub id: String,
    /// Maintenance category.
    pub category: IncidentCategory,
    /// Lifecycle status.
    pub status: IncidentStatus,
    /// Short title entered by the reporter.
    pub title: String,
    /// Where the incident was reported.
    pub coordinate: Coordinate,
    /// When the incident was created.
    pub created_at: DateTime<Utc>,
    /// Urgency, if one was recorded.
    #[serde(default)]
    pub priority: Option<IncidentPriority>,
}

impl IncidentSnapshot {
    /// Heatmap weight derived from this incident's priority.
    #[must_use]
    pub fn weight(&self) -> f64 {
        priority_weight(self.priority)
    }
}
