use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::dto::switch_dto::HealthResponse;

/**
 * GET liveness check. Never authenticated.
 */
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { ok: true }))
}
