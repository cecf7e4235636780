use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use banksy_accounts::{CardStatus, CardType, NewCard};
use banksy_core::AccountId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_cards).post(create_card))
        .route("/ship/:account_id", post(ship_card))
}

pub async fn list_cards(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    match services.list_cards(user.id()).await {
        Ok(cards) => {
            let items = cards.iter().map(dto::card_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_card(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<dto::CreateCardRequest>,
) -> axum::response::Response {
    let card_type = match CardType::parse(&body.card_type) {
        Ok(t) => t,
        Err(e) => return errors::json_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
    };
    let status = match body.status.as_deref() {
        Some(s) => match CardStatus::parse(s) {
            Ok(s) => s,
            Err(e) => return errors::json_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        },
        None => CardStatus::default(),
    };

    let new = match NewCard::new(
        AccountId::new(body.account_id),
        body.card_number_last4,
        card_type,
        body.expiration_month,
        body.expiration_year,
        status,
    ) {
        Ok(n) => n,
        Err(e) => return errors::json_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
    };

    match services.create_card(user.id(), new).await {
        Ok(card) => (StatusCode::CREATED, Json(dto::card_to_json(&card))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Mint a dev card with a random last4 against an owned account.
pub async fn ship_card(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(account_id): Path<i64>,
) -> axum::response::Response {
    match services.ship_card(user.id(), AccountId::new(account_id)).await {
        Ok(card) => (StatusCode::OK, Json(dto::card_to_json(&card))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
