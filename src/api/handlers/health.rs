//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Storage**: A read against the link store
/// 2. **Click Recorder**: In-flight writes against the configured cap
/// 3. **Cache**: Redis PING (always ok when caching is disabled)
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "message": "Reachable" },
///     "click_recorder": { "status": "ok", "message": "In flight: 0/1024" },
///     "cache": { "status": "ok", "message": "Cache reachable" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage_check = check_storage(&state).await;

    let recorder_check = check_click_recorder(&state);

    let cache_check = check_cache(&state).await;

    let all_healthy = storage_check.is_ok() && recorder_check.is_ok() && cache_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            storage: storage_check,
            click_recorder: recorder_check,
            cache: cache_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_storage(state: &AppState) -> CheckStatus {
    match state.link_service.check_storage().await {
        Ok(()) => CheckStatus::ok("Reachable"),
        Err(e) => CheckStatus::error(format!("Storage error: {}", e)),
    }
}

/// Saturation means clicks are currently being dropped.
fn check_click_recorder(state: &AppState) -> CheckStatus {
    let recorder = &state.click_recorder;
    let message = format!(
        "In flight: {}/{}",
        recorder.in_flight(),
        recorder.max_in_flight()
    );

    if recorder.in_flight() < recorder.max_in_flight() {
        CheckStatus::ok(message)
    } else {
        CheckStatus::error(message)
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    if state.cache.health_check().await {
        CheckStatus::ok("Cache reachable")
    } else {
        CheckStatus::error("Cache connection failed")
    }
}
