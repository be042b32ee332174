//! Liveness endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use till_db::Store;

use crate::dto::HealthResponse;
use crate::AppState;

/// `GET /health`: 200 when storage answers, 503 otherwise.
pub async fn health_check<S: Store>(
    State(state): State<AppState<S>>,
) -> (StatusCode, Json<HealthResponse>) {
    let database = state.store.health_check().await;
    let (status, label) = if database {
        (StatusCode::OK, "healthy")
    } else {
        tracing::warn!("Health check failed: database unavailable");
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            database,
        }),
    )
}
