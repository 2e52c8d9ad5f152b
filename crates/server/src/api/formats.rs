//! Format compatibility API handlers.

use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};

use holliday_core::{CompatibilityResolver, Format};

/// Query parameters for format resolution
#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    /// Comma-separated filenames to resolve targets for. Omitting this
    /// returns every target reachable from some source.
    pub names: Option<String>,
}

/// Response for format resolution
#[derive(Debug, Serialize)]
pub struct FormatsResponse {
    pub targets: Vec<Format>,
}

/// Resolve the target formats every named file can convert to.
pub async fn resolve_formats(Query(params): Query<ResolveParams>) -> Json<FormatsResponse> {
    let names: Vec<&str> = params
        .names
        .as_deref()
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Json(FormatsResponse {
        targets: CompatibilityResolver::resolve(names),
    })
}
