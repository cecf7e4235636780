//! Backend introspection endpoints.

use std::sync::Arc;

use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/dbinfo", get(dbinfo))
        .route("/users", get(list_users))
}

pub async fn dbinfo(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let (backend, tables) = services.backend_info();
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "backend": backend,
            "tables": tables,
        })),
    )
        .into_response()
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.all_users().await {
        Ok(users) => {
            let items = users.iter().map(dto::user_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}
