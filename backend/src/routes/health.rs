//! Health check endpoints
//!
//! - /health - process is up
//! - /health/live - liveness probe
//! - /health/ready - readiness probe, checks the database

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

const SERVICE: &str = "job-tracker";

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<CheckStatus>,
}

/// Status of a dependency check
#[derive(Serialize)]
pub struct CheckStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn response(status: &'static str, database: Option<CheckStatus>) -> HealthResponse {
    HealthResponse {
        service: SERVICE,
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
    }
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(response("healthy", None))
}

/// GET /health/live
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(response("alive", None))
}

/// GET /health/ready - 503 while the database is unreachable
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    match db::health_check(state.db()).await {
        Ok(()) => Ok(Json(response(
            "ready",
            Some(CheckStatus {
                healthy: true,
                message: None,
            }),
        ))),
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(response(
                "not_ready",
                Some(CheckStatus {
                    healthy: false,
                    message: Some(e.to_string()),
                }),
            )),
        )),
    }
}
