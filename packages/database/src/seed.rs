//! Loading incident fixtures from JSON.
//!
//! A seed file is a JSON array of [`IncidentRecord`]s in the same camelCase
//! shape the API returns. Used to pre-populate the in-memory store for demos
//! and drills.

use std::path::Path;

use campus_incidents_database_models::IncidentRecord;

use crate::{DbError, MemoryStore};

/// Parses a JSON array of incident records.
///
/// # Errors
///
/// Returns [`DbError::Json`] if the text is not a valid record array.
pub fn parse_seed(json: &str) -> Result<Vec<IncidentRecord>, DbError> {
    Ok(serde_json::from_str(json)?)
}

/// Reads and parses the seed file at `path`.
///
/// # Errors
///
/// Returns [`DbError::Io`] if the file cannot be read, or
/// [`DbError::Json`] if it is malformed.
pub async fn load_seed(path: &Path) -> Result<Vec<IncidentRecord>, DbError> {
    let json = tokio::fs::read_to_string(path).await?;
    let records = parse_seed(&json)?;
    log::info!("Loaded {} seed incidents from {}", records.len(), path.display());
    Ok(records)
}

/// Builds a [`MemoryStore`] from an optional seed file.
///
/// # Errors
///
/// Returns [`DbError`] if the seed file cannot be read or contains an
/// invalid record.
pub async fn open_store(seed: Option<&Path>) -> Result<MemoryStore, DbError> {
    match seed {
        Some(path) => MemoryStore::with_incidents(load_seed(path).await?),
        None => {
            log::info!("No seed file configured, starting with an empty store");
            Ok(MemoryStore::new())
        }
    }
}
