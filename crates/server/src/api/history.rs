//! History API handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use holliday_core::{Format, HistoryEntry};

use crate::state::AppState;

/// Response for a single history entry
#[derive(Debug, Serialize)]
pub struct HistoryEntryResponse {
    pub id: Uuid,
    pub file_name: String,
    pub source_format: Format,
    pub target_format: Format,
    pub size_bytes: u64,
    pub completed_at: String,
    pub download_path: String,
    pub converted_file_name: String,
}

impl From<HistoryEntry> for HistoryEntryResponse {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: entry.id,
            file_name: entry.file_name,
            source_format: entry.source_format,
            target_format: entry.target_format,
            size_bytes: entry.size_bytes,
            completed_at: entry.completed_at.to_rfc3339(),
            download_path: entry.download_path,
            converted_file_name: entry.converted_file_name,
        }
    }
}

/// Response for listing history
#[derive(Debug, Serialize)]
pub struct ListHistoryResponse {
    pub entries: Vec<HistoryEntryResponse>,
    /// Suggested poll interval for clients without a websocket.
    pub poll_interval_secs: u32,
}

/// List retained history entries, newest first.
pub async fn list_history(State(state): State<Arc<AppState>>) -> Json<ListHistoryResponse> {
    Json(ListHistoryResponse {
        entries: state
            .history()
            .list()
            .into_iter()
            .map(HistoryEntryResponse::from)
            .collect(),
        poll_interval_secs: state.config().history.poll_interval_secs,
    })
}

/// Drop all history entries.
pub async fn clear_history(State(state): State<Arc<AppState>>) -> StatusCode {
    state.history().clear();
    StatusCode::NO_CONTENT
}
