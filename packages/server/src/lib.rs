#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the campus incident portal.
//!
//! Serves the REST API for reporting incidents, checking a prospective
//! report for duplicates, and querying incidents for the map view with a
//! priority-weighted heatmap and proximity clusters. Incidents live in an
//! [`IncidentStore`]; the bundled [`MemoryStore`] can be pre-loaded from a
//! JSON seed file.

mod config;
mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use campus_incidents_database::{DbError, IncidentStore, MemoryStore, seed};

pub use config::{CONFIG_PATH_ENV, ConfigError, ServerConfig};
pub use handlers::{USER_ID_HEADER, USER_ROLE_HEADER};

/// Errors that stop the server from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The incident store could not be opened.
    #[error("Failed to open incident store: {0}")]
    Store(#[from] DbError),

    /// Binding or serving failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    /// Incident persistence.
    pub store: Arc<dyn IncidentStore>,
    /// Resolved server configuration.
    pub config: ServerConfig,
}

/// Registers the `/api` routes.
///
/// The fixed `/incidents/*` paths are registered ahead of
/// `/incidents/{id}` so they are not captured as IDs.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/categories", web::get().to(handlers::categories))
            .route("/incidents/map", web::get().to(handlers::map_incidents))
            .route("/incidents/user", web::get().to(handlers::user_incidents))
            .route(
                "/incidents/duplicate",
                web::post().to(handlers::check_duplicate),
            )
            .service(
                web::resource("/incidents")
                    .route(web::get().to(handlers::list_incidents))
                    .route(web::post().to(handlers::create_incident)),
            )
            .route("/incidents/{id}", web::get().to(handlers::get_incident)),
    );
}

/// Starts the API server with configuration resolved from the environment.
///
/// This is a regular async function; the caller is responsible for
/// providing the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError`] if configuration is invalid, the seed file
/// cannot be loaded, or the HTTP server fails to bind.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> Result<(), ServerError> {
    run_server_with(ServerConfig::from_env()?).await
}

/// Starts the API server with an explicit configuration.
///
/// # Errors
///
/// Returns [`ServerError`] if the seed file cannot be loaded or the HTTP
/// server fails to bind.
#[allow(clippy::future_not_send)]
pub async fn run_server_with(config: ServerConfig) -> Result<(), ServerError> {
    log::info!("Opening incident store...");
    let store: MemoryStore = seed::open_store(config.seed_path.as_deref()).await?;
    log::info!("Incident store ready with {} incidents", store.len().await);

    let bind_addr = config.bind_addr.clone();
    let port = config.port;

    let state = web::Data::new(AppState {
        store: Arc::new(store),
        config,
    });

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await?;

    Ok(())
}
