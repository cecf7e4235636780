use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Persisted error-log rows, newest first.
pub async fn list_errors(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.recent_errors().await {
        Ok(logs) => {
            let items = logs.iter().map(dto::error_log_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}
