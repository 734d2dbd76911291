// Health check endpoint handler implementation

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::handlers::AppState;
use crate::services::health::HealthChecker;

/// Handler for GET /health - liveness check
pub async fn health_check() -> impl IntoResponse {
    "OK"
}

/// Handler for GET /health/ready - reports database and chain reachability
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let report = HealthChecker::new(&state).check().await;
    let status = if report.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
