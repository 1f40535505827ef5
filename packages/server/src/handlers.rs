//! HTTP handler functions for the campus incident API.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use campus_incidents_database_models::{
    BoundingBox, DuplicateWindowQuery, IncidentListQuery, IncidentLocation, MapQuery,
    NewIncident, UserIncidentQuery, UserRole, Viewer, DEFAULT_LIST_LIMIT,
    DEFAULT_USER_LIST_LIMIT,
};
use campus_incidents_geo::{
    build_density_grid, cluster_points, detect_duplicate, is_valid_cell_size, weighted_points,
};
use campus_incidents_geo_models::{DuplicateCandidate, DuplicateVerdict};
use campus_incidents_incident_models::{
    Coordinate, IncidentCategory, IncidentPriority, IncidentSnapshot, IncidentStatus,
};
use campus_incidents_server_models::{
    ApiCluster, ApiCreatedIncident, ApiError, ApiHealth, ApiHeatmapCell, ApiMapIncident,
    ApiNearbyIncident, CreateIncidentRequest, CreateIncidentResponse, DuplicateCheckRequest,
    DuplicateCheckResponse, DuplicateConflict, IncidentListParams, IncidentListResponse,
    IncidentResponse, MapQueryParams, MapResponse, UserIncidentParams,
};
use chrono::Utc;

use crate::AppState;
use crate::config::is_valid_radius;

/// Header carrying the authenticated user's ID, set by the session layer.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the authenticated user's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Largest page size a listing request may ask for.
pub const MAX_PAGE_LIMIT: usize = 1000;

fn error(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ApiError::new(message))
}

fn internal_error(context: &str, e: &dyn std::fmt::Display) -> HttpResponse {
    log::error!("{context}: {e}");
    error(StatusCode::INTERNAL_SERVER_ERROR, context)
}

/// Resolves the caller from the session headers.
///
/// A missing or unknown role is treated as the least privileged one.
fn viewer(req: &HttpRequest) -> Result<Viewer, HttpResponse> {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let Some(user_id) = header(USER_ID_HEADER) else {
        return Err(error(StatusCode::UNAUTHORIZED, "Unauthorized - Please log in"));
    };
    let role = header(USER_ROLE_HEADER)
        .and_then(|r| r.parse::<UserRole>().ok())
        .unwrap_or_default();

    Ok(Viewer {
        user_id: user_id.to_string(),
        role,
    })
}

/// Parses an optional filter value, rejecting unknown names.
fn parse_filter<T: std::str::FromStr>(
    value: Option<&str>,
    what: &str,
) -> Result<Option<T>, HttpResponse> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| error(StatusCode::BAD_REQUEST, &format!("Invalid {what}"))),
    }
}

/// Parses a bounding box string `"west,south,east,north"` into a
/// [`BoundingBox`].
fn parse_bbox(s: &str) -> Option<BoundingBox> {
    let parts: Vec<f64> = s.split(',').filter_map(|p| p.trim().parse().ok()).collect();
    if parts.len() == 4 {
        Some(BoundingBox::new(parts[0], parts[1], parts[2], parts[3]))
    } else {
        None
    }
}

/// Loads the duplicate window for `category` and runs the detector.
async fn check_against_window(
    state: &AppState,
    candidate: &DuplicateCandidate,
) -> Result<DuplicateVerdict, HttpResponse> {
    let Some(window) = state.config.duplicate_window() else {
        return Err(internal_error(
            "Error checking for duplicates",
            &format!(
                "invalid duplicate window of {} hours",
                state.config.duplicate_window_hours
            ),
        ));
    };
    let query = DuplicateWindowQuery::new(candidate.category, Utc::now()).with_window(window);

    let window = state
        .store
        .duplicate_window(&query)
        .await
        .map_err(|e| internal_error("Error checking for duplicates", &e))?;

    Ok(detect_duplicate(candidate, &window))
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/categories`
///
/// Returns the fixed list of incident category names.
pub async fn categories() -> HttpResponse {
    let names: Vec<&str> = IncidentCategory::all().iter().map(AsRef::as_ref).collect();
    HttpResponse::Ok().json(names)
}

/// `POST /api/incidents/duplicate`
///
/// Reports whether a prospective incident overlaps an open one of the
/// same category, by location or by title.
pub async fn check_duplicate(
    state: web::Data<AppState>,
    body: web::Json<DuplicateCheckRequest>,
) -> HttpResponse {
    let body = body.into_inner();

    let (Some(category), Some(latitude), Some(longitude)) =
        (body.category.as_deref(), body.latitude, body.longitude)
    else {
        return error(
            StatusCode::BAD_REQUEST,
            "Missing required fields: category, latitude, longitude are required",
        );
    };

    let category = match parse_filter::<IncidentCategory>(Some(category), "category") {
        Ok(Some(c)) => c,
        Ok(None) => return error(StatusCode::BAD_REQUEST, "Invalid category"),
        Err(response) => return response,
    };

    let Ok(coordinate) = Coordinate::validated(latitude, longitude) else {
        return error(StatusCode::BAD_REQUEST, "Invalid location coordinates");
    };

    let candidate = DuplicateCandidate {
        category,
        coordinate,
        title: body.title,
    };

    match check_against_window(&state, &candidate).await {
        Ok(verdict) => HttpResponse::Ok().json(DuplicateCheckResponse::from(verdict)),
        Err(response) => response,
    }
}

/// `POST /api/incidents`
///
/// Creates an incident unless an open incident of the same category was
/// already reported nearby, in which case it answers 409.
pub async fn create_incident(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<CreateIncidentRequest>,
) -> HttpResponse {
    let viewer = match viewer(&req) {
        Ok(v) => v,
        Err(response) => return response,
    };
    let body = body.into_inner();

    let non_blank = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
    let (Some(title), Some(category), Some(description), Some(location)) = (
        non_blank(body.title),
        non_blank(body.category),
        non_blank(body.description),
        body.location,
    ) else {
        return error(
            StatusCode::BAD_REQUEST,
            "Missing required fields: title, category, description, and location are required",
        );
    };

    let (Some(latitude), Some(longitude)) = (location.latitude, location.longitude) else {
        return error(StatusCode::BAD_REQUEST, "Invalid location coordinates");
    };
    let Ok(coordinate) = Coordinate::validated(latitude, longitude) else {
        return error(StatusCode::BAD_REQUEST, "Invalid location coordinates");
    };

    let Ok(category) = category.trim().parse::<IncidentCategory>() else {
        return error(StatusCode::BAD_REQUEST, "Invalid category");
    };

    // Only proximity blocks creation; a similar title alone does not.
    let candidate = DuplicateCandidate {
        category,
        coordinate,
        title: None,
    };
    let verdict = match check_against_window(&state, &candidate).await {
        Ok(v) => v,
        Err(response) => return response,
    };
    if verdict.nearby_count > 0 {
        log::info!(
            "Rejected {category} report from {}: {} open incidents nearby",
            viewer.user_id,
            verdict.nearby_count
        );
        return HttpResponse::Conflict().json(DuplicateConflict {
            message:
                "A similar incident was already reported nearby. Please check existing incidents."
                    .to_string(),
            is_duplicate: true,
            nearby_incidents: verdict
                .nearby_matches
                .into_iter()
                .map(ApiNearbyIncident::from)
                .collect(),
        });
    }

    let priority = body
        .priority
        .as_deref()
        .and_then(|p| p.trim().parse::<IncidentPriority>().ok())
        .unwrap_or_default();

    let new_incident = NewIncident {
        title,
        category,
        description,
        priority,
        location: IncidentLocation {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            address: location.address,
        },
        images: body.images,
        reported_by: viewer.user_id,
    };

    match state.store.insert_incident(new_incident).await {
        Ok(record) => HttpResponse::Created().json(CreateIncidentResponse {
            message: "Incident reported successfully".to_string(),
            incident: ApiCreatedIncident::from(&record),
        }),
        Err(e) => internal_error("Error creating incident", &e),
    }
}

/// `GET /api/incidents`
///
/// Paginated listing. Admins see every incident, everyone else only their
/// own reports.
pub async fn list_incidents(
    req: HttpRequest,
    state: web::Data<AppState>,
    params: web::Query<IncidentListParams>,
) -> HttpResponse {
    let viewer = match viewer(&req) {
        Ok(v) => v,
        Err(response) => return response,
    };

    let query = match (
        parse_filter::<IncidentCategory>(params.category.as_deref(), "category"),
        parse_filter::<IncidentStatus>(params.status.as_deref(), "status"),
    ) {
        (Ok(category), Ok(status)) => IncidentListQuery {
            category,
            status,
            limit: params.limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_PAGE_LIMIT),
            skip: params.skip.unwrap_or(0),
        },
        (Err(response), _) | (_, Err(response)) => return response,
    };

    match state.store.list_incidents(&query, &viewer).await {
        Ok(page) => HttpResponse::Ok().json(IncidentListResponse::from(page)),
        Err(e) => internal_error("Error fetching incidents", &e),
    }
}

/// `GET /api/incidents/user`
///
/// The caller's own reports, with optional status filter and text search.
pub async fn user_incidents(
    req: HttpRequest,
    state: web::Data<AppState>,
    params: web::Query<UserIncidentParams>,
) -> HttpResponse {
    let viewer = match viewer(&req) {
        Ok(v) => v,
        Err(response) => return response,
    };

    let status = match parse_filter::<IncidentStatus>(params.status.as_deref(), "status") {
        Ok(s) => s,
        Err(response) => return response,
    };
    let query = UserIncidentQuery {
        status,
        search: params.search.clone(),
        limit: params
            .limit
            .unwrap_or(DEFAULT_USER_LIST_LIMIT)
            .min(MAX_PAGE_LIMIT),
        skip: params.skip.unwrap_or(0),
    };

    match state.store.user_incidents(&query, &viewer).await {
        Ok(page) => HttpResponse::Ok().json(IncidentListResponse::from(page)),
        Err(e) => internal_error("Error fetching incidents", &e),
    }
}

/// `GET /api/incidents/{id}`
pub async fn get_incident(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let viewer = match viewer(&req) {
        Ok(v) => v,
        Err(response) => return response,
    };

    match state.store.get_incident(&path.into_inner()).await {
        Ok(Some(incident)) if viewer.can_view(&incident) => {
            HttpResponse::Ok().json(IncidentResponse { incident })
        }
        Ok(Some(_)) => error(StatusCode::FORBIDDEN, "Unauthorized to view this incident"),
        Ok(None) => error(StatusCode::NOT_FOUND, "Incident not found"),
        Err(e) => internal_error("Error fetching incident", &e),
    }
}

/// `GET /api/incidents/map`
///
/// Incident markers plus a priority-weighted heatmap grid and proximity
/// clusters computed over the same filtered set.
pub async fn map_incidents(
    req: HttpRequest,
    state: web::Data<AppState>,
    params: web::Query<MapQueryParams>,
) -> HttpResponse {
    let viewer = match viewer(&req) {
        Ok(v) => v,
        Err(response) => return response,
    };

    let (category, status) = match (
        parse_filter::<IncidentCategory>(params.category.as_deref(), "category"),
        parse_filter::<IncidentStatus>(params.status.as_deref(), "status"),
    ) {
        (Ok(category), Ok(status)) => (category, status),
        (Err(response), _) | (_, Err(response)) => return response,
    };

    let query = MapQuery {
        category,
        status,
        from: params.start_date,
        to: params.end_date,
        bbox: params.bbox.as_deref().and_then(parse_bbox),
    };

    let cell_size = params.cell_size.unwrap_or(state.config.density_cell_size);
    if !is_valid_cell_size(cell_size) {
        return error(StatusCode::BAD_REQUEST, "Invalid cellSize");
    }
    let radius = params.radius.unwrap_or(state.config.cluster_radius_meters);
    if !is_valid_radius(radius) {
        return error(StatusCode::BAD_REQUEST, "Invalid radius");
    }

    let records = match state.store.map_incidents(&query, &viewer).await {
        Ok(records) => records,
        Err(e) => return internal_error("Error fetching map incidents", &e),
    };

    // Clustering is order-dependent; seed from the oldest incidents so new
    // reports join existing clusters instead of re-seeding them.
    let mut snapshots: Vec<IncidentSnapshot> = records.iter().map(|r| r.snapshot()).collect();
    snapshots.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    let points = weighted_points(&snapshots);

    let heatmap: Vec<ApiHeatmapCell> = build_density_grid(&points, cell_size)
        .into_iter()
        .map(ApiHeatmapCell::from)
        .collect();
    let clusters: Vec<ApiCluster> = cluster_points(&points, radius)
        .into_iter()
        .map(ApiCluster::from)
        .collect();

    let incidents: Vec<ApiMapIncident> = records.into_iter().map(ApiMapIncident::from).collect();

    HttpResponse::Ok().json(MapResponse {
        total: incidents.len(),
        incidents,
        heatmap,
        clusters,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test};
    use campus_incidents_database::MemoryStore;
    use serde_json::{Value, json};

    use super::*;
    use crate::ServerConfig;

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState {
            store: Arc::new(MemoryStore::new()),
            config: ServerConfig::default(),
        })
    }

    fn report(title: &str, category: &str, latitude: f64, longitude: f64) -> Value {
        json!({
            "title": title,
            "category": category,
            "description": format!("{title} description"),
            "priority": "high",
            "location": { "latitude": latitude, "longitude": longitude, "address": "Hostel A" },
        })
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state.clone()).configure(crate::configure)).await
        };
    }

    #[actix_web::test]
    async fn health_is_ok() {
        let state = state();
        let app = app!(state);
        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn duplicate_check_requires_fields() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::post()
            .uri("/api/incidents/duplicate")
            .set_json(json!({ "category": "water" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn create_then_detect_duplicate() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/incidents")
            .insert_header((USER_ID_HEADER, "student-1"))
            .set_json(report("Water Leakage", "water", 28.5356, 77.2708))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/incidents/duplicate")
            .set_json(json!({
                "category": "water",
                "latitude": 28.5361,
                "longitude": 77.2708,
                "title": "leakage",
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["isDuplicate"], json!(true));
        assert_eq!(body["nearbyCount"], json!(1));
        assert_eq!(body["similarTitleCount"], json!(1));
        assert_eq!(body["nearbyIncidents"][0]["title"], json!("Water Leakage"));

        let req = test::TestRequest::post()
            .uri("/api/incidents/duplicate")
            .set_json(json!({ "category": "electricity", "latitude": 28.5361, "longitude": 77.2708 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["isDuplicate"], json!(false));
    }

    #[actix_web::test]
    async fn nearby_report_is_rejected_with_conflict() {
        let state = state();
        let app = app!(state);

        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let req = test::TestRequest::post()
                .uri("/api/incidents")
                .insert_header((USER_ID_HEADER, "student-1"))
                .set_json(report("Broken Light Bulb", "electricity", 28.5355, 77.2707))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), expected);
        }

        // Far enough away to pass, same title notwithstanding.
        let req = test::TestRequest::post()
            .uri("/api/incidents")
            .insert_header((USER_ID_HEADER, "student-1"))
            .set_json(report("Broken Light Bulb", "electricity", 28.5400, 77.2707))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn create_requires_session_and_valid_category() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/incidents")
            .set_json(report("WiFi Down", "internet", 28.5355, 77.2707))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/api/incidents")
            .insert_header((USER_ID_HEADER, "student-1"))
            .set_json(report("WiFi Down", "plumbing", 28.5355, 77.2707))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/incidents")
            .insert_header((USER_ID_HEADER, "student-1"))
            .set_json(report("WiFi Down", "internet", 95.0, 77.2707))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn incident_visibility() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/incidents")
            .insert_header((USER_ID_HEADER, "student-1"))
            .set_json(report("Server Down", "it", 28.535, 77.2705))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["incident"]["id"].as_str().unwrap().to_string();
        let uri = format!("/api/incidents/{id}");

        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header((USER_ID_HEADER, "student-2"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header((USER_ID_HEADER, "admin-1"))
            .insert_header((USER_ROLE_HEADER, "admin"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/incidents/does-not-exist")
            .insert_header((USER_ID_HEADER, "admin-1"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn map_returns_heatmap_and_clusters() {
        let state = state();
        let app = app!(state);

        for (title, category, lat, lng) in [
            ("Broken Light Bulb", "electricity", 28.5355, 77.2707),
            ("WiFi Down", "internet", 28.5355, 77.2707),
            ("Garbage Not Collected", "garbage", 28.5360, 77.2710),
            ("Projector Not Working", "equipment", 28.6000, 77.3000),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/incidents")
                .insert_header((USER_ID_HEADER, "staff-1"))
                .set_json(report(title, category, lat, lng))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get()
            .uri("/api/incidents/map")
            .insert_header((USER_ID_HEADER, "staff-1"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], json!(4));

        let heat: f64 = body["heatmap"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["weight"].as_f64().unwrap())
            .sum();
        assert!((heat - 12.0).abs() < f64::EPSILON);

        let clusters = body["clusters"].as_array().unwrap();
        assert_eq!(clusters.len(), 2);
        let counted: u64 = clusters.iter().map(|c| c["count"].as_u64().unwrap()).sum();
        assert_eq!(counted, 4);

        let req = test::TestRequest::get()
            .uri("/api/incidents/map?category=garbage")
            .insert_header((USER_ID_HEADER, "staff-1"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], json!(1));

        let req = test::TestRequest::get()
            .uri("/api/incidents/map")
            .insert_header((USER_ID_HEADER, "student-9"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], json!(0));
    }

    #[actix_web::test]
    async fn list_rejects_unknown_status() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::get()
            .uri("/api/incidents?status=pending")
            .insert_header((USER_ID_HEADER, "student-1"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn huge_page_limit_is_capped() {
        let state = state();
        let app = app!(state);
        for uri in [
            "/api/incidents?limit=18446744073709551615&skip=1",
            "/api/incidents/user?limit=18446744073709551615&skip=1",
        ] {
            let req = test::TestRequest::get()
                .uri(uri)
                .insert_header((USER_ID_HEADER, "student-1"))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["limit"], json!(MAX_PAGE_LIMIT));
            assert_eq!(body["hasMore"], json!(false));
        }
    }

    #[actix_web::test]
    async fn map_overrides_cell_size_and_radius() {
        let state = state();
        let app = app!(state);

        for (title, category, lat, lng) in [
            ("Broken Light Bulb", "electricity", 28.5355, 77.2707),
            ("Server Down", "it", 28.5404, 77.2707),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/incidents")
                .insert_header((USER_ID_HEADER, "staff-1"))
                .set_json(report(title, category, lat, lng))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }

        let map = |uri: &'static str| {
            test::TestRequest::get()
                .uri(uri)
                .insert_header((USER_ID_HEADER, "staff-1"))
                .to_request()
        };

        // Defaults: ~545 m apart, so two cells and two clusters.
        let body: Value = test::call_and_read_body_json(&app, map("/api/incidents/map")).await;
        assert_eq!(body["heatmap"].as_array().unwrap().len(), 2);
        assert_eq!(body["clusters"].as_array().unwrap().len(), 2);

        let body: Value = test::call_and_read_body_json(
            &app,
            map("/api/incidents/map?cellSize=0.1&radius=1000"),
        )
        .await;
        let heatmap = body["heatmap"].as_array().unwrap();
        assert_eq!(heatmap.len(), 1);
        assert!((heatmap[0]["lat"].as_f64().unwrap() - 28.55).abs() < 1e-9);
        let clusters = body["clusters"].as_array().unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0]["count"], json!(2));

        for uri in [
            "/api/incidents/map?cellSize=0",
            "/api/incidents/map?cellSize=1e-300",
            "/api/incidents/map?cellSize=-1",
            "/api/incidents/map?radius=0",
            "/api/incidents/map?radius=-5",
        ] {
            let resp = test::call_service(&app, map(uri)).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[actix_web::test]
    async fn invalid_window_config_fails_closed() {
        for hours in [-24, i64::MAX] {
            let state = web::Data::new(AppState {
                store: Arc::new(MemoryStore::new()),
                config: ServerConfig {
                    duplicate_window_hours: hours,
                    ..ServerConfig::default()
                },
            });
            let app = app!(state);

            let req = test::TestRequest::post()
                .uri("/api/incidents/duplicate")
                .set_json(json!({ "category": "water", "latitude": 28.5356, "longitude": 77.2708 }))
                .to_request();
            assert_eq!(
                test::call_service(&app, req).await.status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );

            let req = test::TestRequest::post()
                .uri("/api/incidents")
                .insert_header((USER_ID_HEADER, "student-1"))
                .set_json(report("Water Leakage", "water", 28.5356, 77.2708))
                .to_request();
            assert_eq!(
                test::call_service(&app, req).await.status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }
}
