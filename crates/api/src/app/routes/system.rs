use axum::{http::StatusCode, response::IntoResponse, Json};

/// Unauthenticated liveness check.
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "ok", "service": "Banksy Backend" })),
    )
}
