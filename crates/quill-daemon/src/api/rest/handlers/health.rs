//! Health and status handlers

use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{extract::State, Json};
use quill_types::ManuscriptStatus;
use serde::Serialize;
use std::collections::BTreeMap;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
    })
}

/// Daemon status response
#[derive(Debug, Serialize)]
pub struct DaemonStatusResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub stats: DaemonStats,
}

/// Daemon statistics
#[derive(Debug, Serialize)]
pub struct DaemonStats {
    pub total_manuscripts: usize,
    pub by_status: BTreeMap<&'static str, usize>,
    pub publish_runs_in_flight: usize,
}

/// Daemon status endpoint
pub async fn daemon_status(State(state): State<AppState>) -> ApiResult<Json<DaemonStatusResponse>> {
    let manuscripts = state.store.list_manuscripts().await?;

    let mut by_status: BTreeMap<&'static str, usize> = ManuscriptStatus::ALL
        .iter()
        .map(|s| (s.as_str(), 0))
        .collect();
    for manuscript in &manuscripts {
        *by_status.entry(manuscript.status.as_str()).or_default() += 1;
    }

    Ok(Json(DaemonStatusResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
        started_at: state.started_at,
        stats: DaemonStats {
            total_manuscripts: manuscripts.len(),
            by_status,
            publish_runs_in_flight: state.publisher.in_flight(),
        },
    }))
}
