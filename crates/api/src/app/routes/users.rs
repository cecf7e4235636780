use axum::{extract::Extension, response::IntoResponse, Json};

use crate::app::dto;
use crate::context::CurrentUser;

/// The resolved current user (upserted by the auth middleware).
pub async fn me(Extension(user): Extension<CurrentUser>) -> impl IntoResponse {
    Json(dto::user_to_json(user.user()))
}
