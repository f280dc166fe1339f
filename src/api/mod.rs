//! HTTP API server

use anyhow::Context;
use axum::{
    http::{HeaderName, HeaderValue, Method},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::CorsSection;

pub mod docs;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

/// Build the API router using the provided application state.
///
/// Health routes answer both at the root and under the versioned prefix;
/// stock routes and the API docs live under the prefix only.
pub fn create_router(state: AppState) -> anyhow::Result<Router> {
    let prefix = state.config.app.api_prefix.clone();
    let cors = build_cors(&state.config.cors)?;

    let router = Router::new()
        .route("/", get(handlers::root))
        .merge(health_routes());

    let router = if prefix == "/" {
        router.merge(stock_routes())
    } else {
        router.nest(&prefix, health_routes().merge(stock_routes()))
    };
    let router = router.merge(docs::swagger_ui(&state.config));

    Ok(router
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CatchPanicLayer::custom(error::handle_panic)),
        )
        .with_state(state))
}

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/health/ready", get(handlers::readiness))
        .route("/health/live", get(handlers::liveness))
}

fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/stocks/info/:symbol", get(handlers::stock_info))
        .route("/stocks/popular", get(handlers::popular_stocks))
}

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v.trim() == "*")
}

/// Translate the CORS section into a layer.
///
/// Browsers reject `*` alongside credentials, so with credentials enabled a
/// wildcard mirrors the request's origin, method or headers instead.
pub fn build_cors(config: &CorsSection) -> anyhow::Result<CorsLayer> {
    let credentials = config.allow_credentials;

    let origin = if is_wildcard(&config.origins) {
        if credentials {
            AllowOrigin::mirror_request()
        } else {
            AllowOrigin::any()
        }
    } else {
        let origins = config
            .origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o.trim())
                    .with_context(|| format!("invalid CORS origin '{}'", o))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    let methods = if is_wildcard(&config.allow_methods) {
        if credentials {
            AllowMethods::mirror_request()
        } else {
            AllowMethods::any()
        }
    } else {
        let methods = config
            .allow_methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.trim().to_ascii_uppercase().as_bytes())
                    .with_context(|| format!("invalid CORS method '{}'", m))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowMethods::list(methods)
    };

    let headers = if is_wildcard(&config.allow_headers) {
        if credentials {
            AllowHeaders::mirror_request()
        } else {
            AllowHeaders::any()
        }
    } else {
        let headers = config
            .allow_headers
            .iter()
            .map(|h| {
                HeaderName::from_bytes(h.trim().as_bytes())
                    .with_context(|| format!("invalid CORS header '{}'", h))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowHeaders::list(headers)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(credentials))
}
