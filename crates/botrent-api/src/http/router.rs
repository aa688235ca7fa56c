//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/trials",
            get(handlers::trial::list_trials).post(handlers::trial::activate_trial),
        )
        .route("/trials/sweep", post(handlers::trial::sweep_trials))
        .route(
            "/trials/{bot_id}",
            get(handlers::trial::get_trial).delete(handlers::trial::deactivate_trial),
        )
        .route(
            "/trials/{bot_id}/active",
            get(handlers::trial::is_trial_active),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
