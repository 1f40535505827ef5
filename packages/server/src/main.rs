#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the campus incident portal.

#[actix_web::main]
async fn main() -> Result<(), campus_incidents_server::ServerError> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    campus_incidents_server::run_server().await
}
