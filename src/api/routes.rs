//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    answer_handler, autocomplete_handler, health_handler, search_handler,
    search_with_answer_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/search", post(search_handler))
        .route("/answer", post(answer_handler))
        .route("/search-with-answer", post(search_with_answer_handler))
        .route("/autocomplete", post(autocomplete_handler))
        .route("/stats", get(stats_handler));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
