use std::sync::Arc;

use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new().route("/", post(generate_statements))
}

/// One statement per owned account over the inclusive date range.
pub async fn generate_statements(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<dto::StatementRequest>,
) -> axum::response::Response {
    match services
        .generate_statements(user.id(), body.start_date, body.end_date)
        .await
    {
        Ok(statements) => {
            let items = statements
                .iter()
                .map(dto::statement_to_json)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}
