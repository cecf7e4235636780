use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use banksy_core::AccountId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CurrentUser;

/// GET /transactions?account_id= lists entries of an owned account, newest first.
pub async fn list_transactions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<dto::TransactionsQuery>,
) -> axum::response::Response {
    match services
        .account_transactions(user.id(), AccountId::new(query.account_id))
        .await
    {
        Ok(entries) => {
            let items = entries.iter().map(dto::entry_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}
