use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use banksy_core::{AccountId, TransferGroupId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_money_transfer))
        .route("/:transfer_id", get(get_transfer))
}

pub async fn create_money_transfer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<dto::MoneyTransferRequest>,
) -> axum::response::Response {
    match services
        .execute_transfer(
            user.id(),
            AccountId::new(body.sender_account_id),
            AccountId::new(body.recipient_account_id),
            body.amount,
            body.description,
        )
        .await
    {
        Ok(group) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "transfer_id": group.to_string(),
                "status": "success",
            })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_transfer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(transfer_id): Path<String>,
) -> axum::response::Response {
    // An unparseable id cannot match any stored group; same signal as unknown.
    let group = match transfer_id.parse::<TransferGroupId>() {
        Ok(g) => g,
        Err(_) => {
            return errors::json_error(StatusCode::NOT_FOUND, "Transfer not found");
        }
    };

    match services.transfer_entries(user.id(), group).await {
        Ok(entries) => {
            let items = entries.iter().map(dto::entry_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}
