use axum::Json;

use crate::app::dto::HealthResponse;
use crate::app::errors::ApiError;

/// Liveness check. Never touches the catalog or the auth gate.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// Method fallback for every known path.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
