use crate::state::ServerState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

fn uptime_seconds() -> u64 {
    SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Health check endpoint (liveness)
/// Returns 200 if server is running
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "dealership-reviews-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
    }))
}

/// Readiness check endpoint
///
/// Always 200: a failed seed degrades the data but the service keeps
/// answering. The body says whether both collections were loaded.
pub async fn readiness_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let seed = state.seed_report();
    let status = match seed {
        Some(report) if !report.is_complete() => "degraded",
        _ => "ready",
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": status,
            "service": "dealership-reviews-server",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "uptime_seconds": uptime_seconds(),
            "id_allocation": state.reviews.allocation(),
            "seed": seed,
        })),
    )
}
