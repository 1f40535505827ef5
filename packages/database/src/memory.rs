//! In-process [`IncidentStore`] backed by a `Vec` behind an async lock.

use std::collections::BTreeSet;

use async_trait::async_trait;
use campus_incidents_database_models::{
    DuplicateWindowQuery, IncidentListQuery, IncidentPage, IncidentRecord, MapQuery,
    NewIncident, UserIncidentQuery, Viewer,
};
use campus_incidents_incident_models::{Coordinate, IncidentSnapshot, IncidentStatus};
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{DbError, IncidentStore};

/// Keeps every incident in memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    incidents: RwLock<Vec<IncidentRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `incidents`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidCoordinate`] if any record's location is
    /// out of range, or [`DbError::DuplicateId`] if two records share an ID.
    pub fn with_incidents(incidents: Vec<IncidentRecord>) -> Result<Self, DbError> {
        let mut ids = BTreeSet::new();
        for incident in &incidents {
            Coordinate::validated(incident.location.latitude, incident.location.longitude)?;
            if !ids.insert(incident.id.as_str()) {
                return Err(DbError::DuplicateId {
                    id: incident.id.clone(),
                });
            }
        }
        Ok(Self {
            incidents: RwLock::new(incidents),
        })
    }

    /// Number of stored incidents.
    pub async fn len(&self) -> usize {
        self.incidents.read().await.len()
    }

    /// Whether the store holds no incidents.
    pub async fn is_empty(&self) -> bool {
        self.incidents.read().await.is_empty()
    }
}

/// Records visible to `viewer` that pass `filter`, newest first.
fn scoped<'a>(
    incidents: &'a [IncidentRecord],
    viewer: &Viewer,
    filter: impl Fn(&IncidentRecord) -> bool,
) -> Vec<&'a IncidentRecord> {
    let mut rows: Vec<&IncidentRecord> = incidents
        .iter()
        .filter(|i| viewer.is_admin() || i.reported_by == viewer.user_id)
        .filter(|i| filter(*i))
        .collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    rows
}

fn page(rows: &[&IncidentRecord], limit: usize, skip: usize) -> IncidentPage {
    IncidentPage {
        incidents: rows
            .iter()
            .skip(skip)
            .take(limit)
            .map(|r| (*r).clone())
            .collect(),
        total: rows.len(),
        limit,
        skip,
    }
}

#[async_trait]
impl IncidentStore for MemoryStore {
    async fn duplicate_window(
        &self,
        query: &DuplicateWindowQuery,
    ) -> Result<Vec<IncidentSnapshot>, DbError> {
        let incidents = self.incidents.read().await;
        let window: Vec<IncidentSnapshot> = incidents
            .iter()
            .filter(|i| query.matches(i))
            .map(IncidentRecord::snapshot)
            .collect();

        log::debug!(
            "Duplicate window for {} since {}: {} incidents",
            query.category,
            query.since(),
            window.len()
        );

        Ok(window)
    }

    async fn map_incidents(
        &self,
        query: &MapQuery,
        viewer: &Viewer,
    ) -> Result<Vec<IncidentRecord>, DbError> {
        let incidents = self.incidents.read().await;
        Ok(scoped(&incidents, viewer, |i| query.matches(i))
            .into_iter()
            .cloned()
            .collect())
    }

    async fn list_incidents(
        &self,
        query: &IncidentListQuery,
        viewer: &Viewer,
    ) -> Result<IncidentPage, DbError> {
        let incidents = self.incidents.read().await;
        let rows = scoped(&incidents, viewer, |i| {
            query.category.is_none_or(|c| i.category == c)
                && query.status.is_none_or(|s| i.status == s)
        });
        Ok(page(&rows, query.limit, query.skip))
    }

    async fn user_incidents(
        &self,
        query: &UserIncidentQuery,
        viewer: &Viewer,
    ) -> Result<IncidentPage, DbError> {
        let incidents = self.incidents.read().await;
        // Always scoped to the viewer, admins included.
        let rows: Vec<&IncidentRecord> = scoped(&incidents, viewer, |i| {
            i.reported_by == viewer.user_id && query.matches(i)
        });
        Ok(page(&rows, query.limit, query.skip))
    }

    async fn get_incident(&self, id: &str) -> Result<Option<IncidentRecord>, DbError> {
        let incidents = self.incidents.read().await;
        Ok(incidents.iter().find(|i| i.id == id).cloned())
    }

    async fn insert_incident(&self, incident: NewIncident) -> Result<IncidentRecord, DbError> {
        Coordinate::validated(incident.location.latitude, incident.location.longitude)?;

        let now = Utc::now();
        let record = IncidentRecord {
            id: uuid::Uuid::new_v4().to_string(),
            title: incident.title.trim().to_string(),
            category: incident.category,
            description: incident.description,
            priority: incident.priority,
            status: IncidentStatus::New,
            location: incident.location,
            images: incident.images,
            reported_by: incident.reported_by,
            assigned_to: None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
        };

        log::info!(
            "Stored incident {} ({}) reported by {}",
            record.id,
            record.category,
            record.reported_by
        );

        self.incidents.write().await.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use campus_incidents_database_models::{IncidentLocation, UserRole};
    use campus_incidents_incident_models::{IncidentCategory, IncidentPriority};
    use chrono::Duration;

    use super::*;

    fn new_incident(title: &str, category: IncidentCategory, reporter: &str) -> NewIncident {
        NewIncident {
            title: title.to_string(),
            category,
            description: format!("{title} description"),
            priority: IncidentPriority::High,
            location: IncidentLocation {
                latitude: 28.5355,
                longitude: 77.2707,
                address: Some("Hostel A, Building 1".to_string()),
            },
            images: Vec::new(),
            reported_by: reporter.to_string(),
        }
    }

    fn viewer(user_id: &str, role: UserRole) -> Viewer {
        Viewer {
            user_id: user_id.to_string(),
            role,
        }
    }

    fn stored(
        id: &str,
        category: IncidentCategory,
        status: IncidentStatus,
        age_hours: i64,
    ) -> IncidentRecord {
        let created_at = Utc::now() - Duration::hours(age_hours);
        IncidentRecord {
            id: id.to_string(),
            title: format!("Incident {id}"),
            category,
            description: String::new(),
            priority: IncidentPriority::Medium,
            status,
            location: IncidentLocation {
                latitude: 28.5356,
                longitude: 77.2708,
                address: None,
            },
            images: Vec::new(),
            reported_by: "student-1".to_string(),
            assigned_to: None,
            created_at,
            updated_at: created_at,
            resolved_at: None,
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_new_status() {
        let store = MemoryStore::new();
        let record = store
            .insert_incident(new_incident(
                "  Broken Light Bulb ",
                IncidentCategory::Electricity,
                "s1",
            ))
            .await
            .unwrap();
        assert!(!record.id.is_empty());
        assert_eq!(record.status, IncidentStatus::New);
        assert_eq!(record.title, "Broken Light Bulb");
        assert_eq!(store.get_incident(&record.id).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn insert_rejects_out_of_range_location() {
        let store = MemoryStore::new();
        let mut incident = new_incident("Bad", IncidentCategory::Water, "s1");
        incident.location.latitude = 123.0;
        assert!(matches!(
            store.insert_incident(incident).await,
            Err(DbError::InvalidCoordinate(_))
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn duplicate_window_filters_status_category_and_age() {
        let store = MemoryStore::with_incidents(vec![
            stored("open", IncidentCategory::Water, IncidentStatus::New, 1),
            stored("working", IncidentCategory::Water, IncidentStatus::InProgress, 5),
            stored("resolved", IncidentCategory::Water, IncidentStatus::Resolved, 1),
            stored("other", IncidentCategory::Garbage, IncidentStatus::New, 1),
            stored("stale", IncidentCategory::Water, IncidentStatus::New, 30),
        ])
        .unwrap();

        let window = store
            .duplicate_window(&DuplicateWindowQuery::new(IncidentCategory::Water, Utc::now()))
            .await
            .unwrap();
        let ids: Vec<&str> = window.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["open", "working"]);
    }

    #[test]
    fn seeding_rejects_repeated_ids() {
        let result = MemoryStore::with_incidents(vec![
            stored("same", IncidentCategory::Water, IncidentStatus::New, 1),
            stored("same", IncidentCategory::It, IncidentStatus::New, 2),
        ]);
        assert!(matches!(result, Err(DbError::DuplicateId { id }) if id == "same"));
    }

    #[tokio::test]
    async fn listing_is_scoped_to_reporter_unless_admin() {
        let store = MemoryStore::new();
        store
            .insert_incident(new_incident("Mine", IncidentCategory::Water, "s1"))
            .await
            .unwrap();
        store
            .insert_incident(new_incident("Theirs", IncidentCategory::Water, "s2"))
            .await
            .unwrap();

        let query = IncidentListQuery::default();
        let own = store
            .list_incidents(&query, &viewer("s1", UserRole::Student))
            .await
            .unwrap();
        assert_eq!(own.total, 1);
        assert_eq!(own.incidents[0].title, "Mine");

        let all = store
            .list_incidents(&query, &viewer("a1", UserRole::Admin))
            .await
            .unwrap();
        assert_eq!(all.total, 2);

        let map = store
            .map_incidents(&MapQuery::default(), &viewer("s2", UserRole::Staff))
            .await
            .unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[0].title, "Theirs");
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_paged() {
        let store = MemoryStore::with_incidents(vec![
            stored("old", IncidentCategory::Water, IncidentStatus::New, 10),
            stored("new", IncidentCategory::Water, IncidentStatus::New, 1),
            stored("mid", IncidentCategory::Water, IncidentStatus::New, 5),
        ])
        .unwrap();

        let query = IncidentListQuery {
            limit: 2,
            ..IncidentListQuery::default()
        };
        let first = store
            .list_incidents(&query, &viewer("a1", UserRole::Admin))
            .await
            .unwrap();
        let ids: Vec<&str> = first.incidents.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid"]);
        assert!(first.has_more());

        let second = store
            .list_incidents(
                &IncidentListQuery { skip: 2, ..query },
                &viewer("a1", UserRole::Admin),
            )
            .await
            .unwrap();
        assert_eq!(second.incidents.len(), 1);
        assert!(!second.has_more());
    }

    #[tokio::test]
    async fn user_incidents_ignore_admin_scope() {
        let store = MemoryStore::with_incidents(vec![stored(
            "x",
            IncidentCategory::Water,
            IncidentStatus::New,
            1,
        )])
        .unwrap();
        let page = store
            .user_incidents(&UserIncidentQuery::default(), &viewer("a1", UserRole::Admin))
            .await
            .unwrap();
        assert_eq!(page.total, 0);

        let page = store
            .user_incidents(
                &UserIncidentQuery {
                    search: Some("incident X".to_string()),
                    ..UserIncidentQuery::default()
                },
                &viewer("student-1", UserRole::Student),
            )
            .await
            .unwrap();
        assert_eq!(page.total, 1);
    }
}
