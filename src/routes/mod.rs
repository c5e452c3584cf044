//! HTTP route definitions.
//!
//! Everything is mounted under [`API_BASE_PATH`] behind request logging and
//! CORS. Handlers answer with `ResponseEnvelope`s.

mod health_routes;
mod session_routes;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::DEFAULT_BASE_URL;
use crate::state::AppState;

pub use health_routes::{DatabaseHealth, HealthReport};

pub const API_BASE_PATH: &str = "/api";

/// Creates the application router with all configured routes.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(health_routes::routes())
        .merge(session_routes::routes(state.clone()));

    Router::new()
        .nest(API_BASE_PATH, api)
        .layer(cors_layer(&state.config.base_url))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Credentialed CORS for the configured front-end origin only.
fn cors_layer(base_url: &str) -> CorsLayer {
    let origin = HeaderValue::from_str(base_url.trim_end_matches('/')).unwrap_or_else(|e| {
        warn!(
            "Invalid base_url '{}' ({}); falling back to {}",
            base_url, e, DEFAULT_BASE_URL
        );
        HeaderValue::from_static(DEFAULT_BASE_URL)
    });

    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
