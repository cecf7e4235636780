use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::app::services::ServiceError;

/// Uniform error body: `{"detail": "..."}`.
pub fn json_error(status: StatusCode, detail: impl Into<String>) -> axum::response::Response {
    (status, axum::Json(json!({ "detail": detail.into() }))).into_response()
}

/// Internal error detail for the error-logger middleware.
///
/// Attached to 500 responses as an extension and removed before the response
/// leaves the process; never serialized to the client.
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

/// A 500 with a stable client-facing body; the real message rides along for
/// the error logger only.
pub fn internal_error(detail: impl Into<String>) -> axum::response::Response {
    let mut res = json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "An internal error occurred. It has been logged.",
    );
    res.extensions_mut().insert(InternalErrorDetail(detail.into()));
    res
}

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::InvalidAmount(msg) | ServiceError::Validation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, msg)
        }
        // Not-found responses are deliberately identical for "does not
        // exist" and "exists but not owned".
        ServiceError::SenderNotFound
        | ServiceError::RecipientNotFound
        | ServiceError::TransferNotFound
        | ServiceError::NoAccountsFound
        | ServiceError::AccountNotFound => json_error(StatusCode::NOT_FOUND, err.to_string()),
        ServiceError::Store(e) => internal_error(e.to_string()),
    }
}
