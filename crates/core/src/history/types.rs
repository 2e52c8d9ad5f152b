//! Types for the conversion history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Format;

/// A completed conversion, as retained by the history store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Id of the queue job that produced this entry.
    pub id: Uuid,
    /// Original filename as uploaded.
    pub file_name: String,
    pub source_format: Format,
    pub target_format: Format,
    /// Size of the uploaded source file in bytes.
    pub size_bytes: u64,
    pub completed_at: DateTime<Utc>,
    /// Server-relative path the converted file is served from.
    pub download_path: String,
    pub converted_file_name: String,
}

/// Change notification emitted by the history store.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryEvent {
    Appended { entry: HistoryEntry },
    Cleared,
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
