//! Application router and its middleware stack.
//!
//! The binary and the integration tests both go through [`build_app_router`],
//! so every request in tests sees the same layers as production.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// How long browsers may cache a CORS preflight answer.
const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

/// The router could not be assembled from the given configuration.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("Invalid CORS origin '{0}'")]
    CorsOrigin(String),
}

/// Build the full application [`Router`].
///
/// Layers run outermost first: CORS, request id assignment, tracing, request
/// id propagation, timeout, panic recovery. The timeout also bounds the SMTP
/// exchange behind `POST /accidents/notify`.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Result<Router, RouterError> {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let middleware = ServiceBuilder::new()
        .layer(build_cors_layer(config)?)
        .map_response(|res: axum::response::Response<_>| res.map(axum::body::Body::new))
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(request_id))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(CatchPanicLayer::new());

    Ok(Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(middleware)
        .with_state(state))
}

/// CORS policy for the configured origins.
///
/// Only the methods the API serves are allowed, and the request id header is
/// exposed so browser clients can quote it when reporting problems.
pub fn build_cors_layer(config: &ServerConfig) -> Result<CorsLayer, RouterError> {
    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| RouterError::CorsOrigin(origin.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::JwtConfig;

    fn config(origins: &[&str]) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: origins.iter().map(|o| o.to_string()).collect(),
            request_timeout_secs: 5,
            password_min_length: 8,
            jwt: JwtConfig {
                secret: "router-test-secret".to_string(),
                access_token_expiry_mins: 5,
            },
        }
    }

    #[test]
    fn configured_origins_build_a_cors_layer() {
        assert!(build_cors_layer(&config(&["http://localhost:5173", "https://ops.example"])).is_ok());
    }

    #[test]
    fn origin_with_control_character_is_reported() {
        let err = build_cors_layer(&config(&["http://ok.example", "http://bad\n.example"]))
            .unwrap_err();
        assert!(err.to_string().contains("bad"));
    }
}
