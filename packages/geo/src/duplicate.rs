//! Duplicate detection for newly submitted reports.
//!
//! Compares a candidate against a window of existing incidents on two
//! independent signals: spatial proximity and title overlap. The window is
//! expected to be pre-filtered by the storage layer (open, same category,
//! recent), so no status, category, or time filtering happens here.
//!
//! A whitespace-only candidate title counts as absent, like a missing or
//! empty one, so it cannot match every stored title containing a space.

use campus_incidents_geo_models::{DuplicateCandidate, DuplicateVerdict, NearbyMatch};
use campus_incidents_incident_models::IncidentSnapshot;

use crate::distance::haversine_distance;

/// Incidents strictly closer than this are spatial matches.
pub const DUPLICATE_RADIUS_METERS: f64 = 100.0;

/// Maximum number of spatial matches reported back to the caller.
pub const MAX_NEARBY_MATCHES: usize = 3;

/// Checks whether `candidate` duplicates any incident in `window`.
#[must_use]
pub fn detect_duplicate(
    candidate: &DuplicateCandidate,
    window: &[IncidentSnapshot],
) -> DuplicateVerdict {
    let mut nearby: Vec<(&IncidentSnapshot, f64)> = window
        .iter()
        .map(|incident| {
            (
                incident,
                haversine_distance(candidate.coordinate, incident.coordinate),
            )
        })
        .filter(|(_, distance)| *distance < DUPLICATE_RADIUS_METERS)
        .collect();

    let title_matches: Vec<String> = normalized_title(candidate.title.as_deref())
        .map(|title| {
            window
                .iter()
                .filter(|incident| titles_overlap(&title, &incident.title))
                .map(|incident| incident.id.clone())
                .collect()
        })
        .unwrap_or_default();

    // Stable sort keeps window order for equidistant matches.
    nearby.sort_by(|a, b| a.1.total_cmp(&b.1));

    let nearby_count = nearby.len();
    let nearby_matches: Vec<NearbyMatch> = nearby
        .into_iter()
        .take(MAX_NEARBY_MATCHES)
        .map(|(incident, distance)| NearbyMatch {
            id: incident.id.clone(),
            title: incident.title.clone(),
            distance_meters: distance.round(),
        })
        .collect();

    let is_duplicate = nearby_count > 0 || !title_matches.is_empty();

    log::debug!(
        "duplicate check for {}: window={} nearby={nearby_count} title_matches={} duplicate={is_duplicate}",
        candidate.category,
        window.len(),
        title_matches.len(),
    );

    DuplicateVerdict {
        is_duplicate,
        nearby_count,
        nearby_matches,
        title_matches,
    }
}

/// Lowercases a candidate title, treating blank titles as absent.
fn normalized_title(title: Option<&str>) -> Option<String> {
    title
        .filter(|t| !t.trim().is_empty())
        .map(str::to_lowercase)
}

/// Symmetric, case-insensitive substring containment.
///
/// Blank existing titles never match; an empty string would otherwise be
/// contained in every candidate.
fn titles_overlap(candidate_lower: &str, existing: &str) -> bool {
    if existing.trim().is_empty() {
        return false;
    }
    let existing_lower = existing.to_lowercase();
    existing_lower.contains(candidate_lower) || candidate_lower.contains(&existing_lower)
}
