use super::handlers;
use super::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        // Buffer
        .route("/buffer", get(handlers::get_buffer))
        .route("/entries", post(handlers::record_entry))
        // Analysis
        .route("/analyze", post(handlers::analyze))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::require_token,
        ));

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .merge(protected)
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
