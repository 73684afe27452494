//! Loads the attendance dataset from a local file or an `http(s)` URL.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::fetch::{BasicClient, fetch_bytes};
use crate::parser::{RawTable, parse_table};

/// Why a dataset could not be loaded. Callers turn any of these into a
/// no-data report rather than aborting.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Attendance file not found: {0}")]
    NotFound(String),

    #[error("Failed to download {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Failed to read {source_name}: {reason}")]
    Unreadable { source_name: String, reason: String },

    #[error("Attendance file {0} has no header row")]
    Empty(String),
}

/// Reads and parses the dataset at `source`.
#[tracing::instrument]
pub async fn load_table(source: &str) -> Result<RawTable, SourceError> {
    let bytes = if is_url(source) {
        let client = BasicClient::new().map_err(|e| SourceError::Fetch {
            url: source.to_string(),
            reason: e.to_string(),
        })?;
        fetch_bytes(&client, source)
            .await
            .map_err(|e| SourceError::Fetch {
                url: source.to_string(),
                reason: e.to_string(),
            })?
            .to_vec()
    } else {
        read_file(source)?
    };
    debug!(bytes = bytes.len(), "Dataset bytes loaded");

    parse_bytes(source, &bytes)
}

/// Parses already-loaded dataset bytes, naming `source` in errors.
pub fn parse_bytes(source: &str, bytes: &[u8]) -> Result<RawTable, SourceError> {
    let table = parse_table(bytes).map_err(|e| SourceError::Unreadable {
        source_name: source.to_string(),
        reason: format!("{e:#}"),
    })?;

    if table.headers.is_empty() {
        return Err(SourceError::Empty(source.to_string()));
    }

    info!(rows = table.rows.len(), columns = table.headers.len(), "Dataset parsed");
    Ok(table)
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn read_file(path: &str) -> Result<Vec<u8>, SourceError> {
    if !Path::new(path).exists() {
        return Err(SourceError::NotFound(path.to_string()));
    }
    std::fs::read(path).map_err(|e| SourceError::Unreadable {
        source_name: path.to_string(),
        reason: e.to_string(),
    })
}
