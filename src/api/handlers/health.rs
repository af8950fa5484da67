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
/// - **503 Service Unavailable**: Storage does not answer
///
/// # Components Checked
///
/// 1. **Storage**: Round trip to PostgreSQL, or the in-memory backend
/// 2. **Moderation**: Number of banned words loaded
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "message": "postgres connected" },
///     "moderation": { "status": "ok", "message": "2 banned words" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage_check = check_storage(&state).await;
    let moderation_check = check_moderation(&state);

    let all_healthy = storage_check.is_ok() && moderation_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            storage: storage_check,
            moderation: moderation_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_storage(state: &AppState) -> CheckStatus {
    let backend = state.repositories.backend;
    if state.repositories.ping().await {
        CheckStatus::ok(format!("{backend} connected"))
    } else {
        CheckStatus::error(format!("{backend} is not reachable"))
    }
}

/// An empty banned word list is allowed, so this check only reports.
fn check_moderation(state: &AppState) -> CheckStatus {
    let count = state.news_service.banned_words().len();
    CheckStatus::ok(format!("{count} banned words"))
}
