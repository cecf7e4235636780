use axum::{routing::get, Router};

pub mod account_holders;
pub mod accounts;
pub mod admin;
pub mod cards;
pub mod errors;
pub mod money_transfers;
pub mod statements;
pub mod system;
pub mod transactions;
pub mod users;

/// Router for all authenticated endpoints (nested under /api/v1).
pub fn router() -> Router {
    Router::new()
        .route("/me", get(users::me))
        .route("/transactions", get(transactions::list_transactions))
        .route("/errors", get(errors::list_errors))
        .nest("/accounts", accounts::router())
        .nest("/cards", cards::router())
        .nest("/account-holders", account_holders::router())
        .nest("/money-transfers", money_transfers::router())
        .nest("/statements", statements::router())
        .nest("/admin", admin::router())
}
