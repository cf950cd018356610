//! Liveness and readiness probes
//!
//! `/health` answers from local state only. `/ready` also reaches the data
//! service, since no page works without it.

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::{Deserialize, Serialize};

use super::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always "healthy" while the process answers
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub dependencies: DependencyStatus,
}

/// What the portal depends on
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyStatus {
    /// Configured data service base URL
    pub backend_url: String,
    /// Whether service credentials are configured
    pub service_auth: bool,
    /// Live sessions in the store
    pub active_sessions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyResponse {
    pub ready: bool,
    /// HTTP status the data service answered with, if it answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_status: Option<u16>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend = state.backend.config();
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        dependencies: DependencyStatus {
            backend_url: backend.base_url.clone(),
            service_auth: backend.service_auth.is_configured(),
            active_sessions: state.sessions.len(),
        },
    })
}

/// GET /ready: 503 until the data service answers
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let report = state.backend.ping().await;
    let status = if report.success {
        StatusCode::OK
    } else {
        tracing::warn!(backend_url = %report.backend_url, "Not ready: data service unreachable");
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(ReadyResponse {
            ready: report.success,
            backend_status: report.status,
        }),
    )
}
