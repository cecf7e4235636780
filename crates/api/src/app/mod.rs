//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: store wiring + the transfer/statement orchestration
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent `{"detail": ...}` error responses

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use banksy_auth::{Hs256Verifier, TokenVerifier};

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let services = Arc::new(match &config.database_url {
        Some(url) => services::AppServices::postgres(url).await?,
        None => services::AppServices::in_memory(),
    });

    let verifier: Arc<dyn TokenVerifier> =
        Arc::new(Hs256Verifier::new(config.jwt_secret.as_bytes()));

    Ok(build_router(services, verifier, &config.cors_origins))
}

/// Assemble the router from already-wired parts (shared with tests).
pub fn build_router(
    services: Arc<services::AppServices>,
    verifier: Arc<dyn TokenVerifier>,
    cors_origins: &[String],
) -> Router {
    let auth_state = middleware::AuthState {
        verifier,
        services: services.clone(),
    };
    let error_state = middleware::ErrorLogState {
        services: services.clone(),
    };

    // The error logger wraps auth so a failure inside auth itself still
    // lands in the error log; the user id comes back on the response.
    let protected = routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                error_state,
                middleware::error_logger_middleware,
            ))
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                middleware::auth_middleware,
            ))
            .layer(Extension(services)),
    );

    Router::new()
        .route("/api/v1/health", get(routes::system::health))
        .nest("/api/v1", protected)
        .layer(cors_layer(cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.is_empty() {
        // Permissive dev default; credentials require explicit origins.
        layer.allow_origin(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse::<HeaderValue>().ok())
            .collect();
        layer
            .allow_origin(AllowOrigin::list(parsed))
            .allow_credentials(true)
    }
}
