//! # FlixFlex Server
//!
//! axum HTTP surface over [`flixflex_core`]: movie and series browsing backed
//! by the cached TMDB proxy, account signup/login with JWTs, and per-user
//! favorites.

pub mod handlers;
pub mod infra;
pub mod routes;
pub mod users;

pub use infra::app_state::AppState;

use axum::{Router, http::HeaderValue};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Full application router with CORS and request tracing.
pub fn create_app(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config()
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };
    let cors_layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    routes::create_api_router(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}
