use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use banksy_auth::TokenVerifier;
use banksy_infra::NewErrorLog;

use crate::app::errors::{self, InternalErrorDetail};
use crate::app::services::AppServices;
use crate::context::CurrentUser;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
    pub services: Arc<AppServices>,
}

/// Bearer auth: verify the token, then resolve (upsert-on-first-seen) the
/// user record and attach it to the request.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer(req.headers()) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let claims = match state.verifier.verify(token, Utc::now()) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = %e, "token rejected");
            return errors::json_error(StatusCode::UNAUTHORIZED, "Invalid token");
        }
    };

    let user = match state.services.resolve_user(&claims).await {
        Ok(u) => u,
        Err(e) => return errors::service_error_to_response(e),
    };

    let current = CurrentUser::new(user);
    req.extensions_mut().insert(current.clone());
    let mut res = next.run(req).await;
    // Echo the identity on the response so outer layers can attribute it.
    res.extensions_mut().insert(current);
    res
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, Response> {
    let unauthorized = || errors::json_error(StatusCode::UNAUTHORIZED, "Missing bearer token");

    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(unauthorized)?;

    let header = header.to_str().map_err(|_| unauthorized())?;

    let token = header.strip_prefix("Bearer ").ok_or_else(unauthorized)?.trim();
    if token.is_empty() {
        return Err(unauthorized());
    }

    Ok(token)
}

#[derive(Clone)]
pub struct ErrorLogState {
    pub services: Arc<AppServices>,
}

/// Persist a row for every 500 the inner layers produce.
///
/// Runs outside the auth layer so failures inside auth itself (say, the user
/// upsert hitting a dead store) are logged too. The identity, when auth got
/// far enough to establish one, rides back on the response as a `CurrentUser`
/// extension. The internal detail travels the same way (see
/// `errors::internal_error`) and is stripped here; the client only ever sees
/// the stable generic body.
pub async fn error_logger_middleware(
    State(state): State<ErrorLogState>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut res = next.run(req).await;

    if res.status() == StatusCode::INTERNAL_SERVER_ERROR {
        let user_id = res.extensions().get::<CurrentUser>().map(|u| u.id());
        let message = res
            .extensions_mut()
            .remove::<InternalErrorDetail>()
            .map(|d| d.0)
            .unwrap_or_else(|| "internal error (no detail attached)".to_string());

        let log = NewErrorLog {
            user_id,
            error_code: Some(res.status().as_u16() as i32),
            message,
            location: Some(format!("{method} {path}")),
        };

        if let Err(e) = state.services.log_error(log).await {
            tracing::error!(error = %e, "failed to persist error log");
        }
    }

    res
}
