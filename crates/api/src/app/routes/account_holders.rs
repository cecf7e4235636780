use std::sync::Arc;

use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};

use banksy_accounts::NewAccountHolder;
use banksy_core::{AccountId, UserId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new().route("/", get(list_account_holders).post(create_account_holder))
}

pub async fn list_account_holders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    match services.list_holders(user.id()).await {
        Ok(holders) => {
            let items = holders.iter().map(dto::holder_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_account_holder(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<dto::CreateAccountHolderRequest>,
) -> axum::response::Response {
    let new = NewAccountHolder {
        user_id: UserId::new(body.user_id),
        account_id: AccountId::new(body.account_id),
        holder_type: body.holder_type,
    };

    match services.create_holder(user.id(), new).await {
        Ok(holder) => (StatusCode::CREATED, Json(dto::holder_to_json(&holder))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
