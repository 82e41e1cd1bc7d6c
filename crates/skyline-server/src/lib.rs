//! skyline-server
//!
//! HTTP surface of the booking-form intake service: serves the reservation
//! form, accepts submissions, renders the certified PDF and emails it.

pub mod config;
pub mod error;
pub mod middleware;
pub mod pipeline;
pub mod routes;
pub mod state;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

/// The service router, shared by the TCP listener and the Lambda runtime.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let body_limit = state.limits.max_request_bytes();

    Router::new()
        .route("/", get(routes::form::reservation_form))
        .route("/health", get(routes::health::health_check))
        .route("/submit-form", post(routes::submit::submit_form))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum_mw::from_fn(middleware::request_log::log_request))
        .layer(cors)
        .with_state(state)
}
