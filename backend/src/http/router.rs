//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Wizard sessions
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/sessions/{id}/navigate", post(handlers::navigate))
        .route("/sessions/{id}/filters", put(handlers::update_filters))
        .route("/sessions/{id}/restart", post(handlers::restart_session))
        // Search
        .route(
            "/sessions/{id}/search",
            post(handlers::start_search).delete(handlers::cancel_search),
        )
        .route("/searches/{search_id}", get(handlers::get_search))
        .route(
            "/searches/{search_id}/events",
            get(handlers::stream_search_events),
        )
        // Candidate and questionnaire
        .route("/sessions/{id}/candidate", get(handlers::get_candidate))
        .route("/sessions/{id}/investigate", post(handlers::investigate))
        .route("/sessions/{id}/ignore", post(handlers::ignore))
        .route("/sessions/{id}/questions", get(handlers::get_question))
        .route("/sessions/{id}/answers/{index}", put(handlers::set_answer))
        .route("/sessions/{id}/advance", post(handlers::advance))
        .route("/sessions/{id}/summary", get(handlers::get_summary))
        .route("/sessions/{id}/assessment", post(handlers::submit_assessment))
        // Catalog and synthesis
        .route("/catalog", get(handlers::list_catalog))
        .route(
            "/light-curves/transit",
            post(handlers::synthesize_light_curve),
        )
        .route("/light-curves/samples", get(handlers::get_samples))
        .route("/periodogram", get(handlers::get_periodogram))
        .route("/system-view", get(handlers::get_system_view))
        .route("/tutorial", get(handlers::get_tutorial_curve))
        .route("/tutorial/stream", get(handlers::stream_tutorial));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InMemoryCatalog, RoundRobinSelection};
    use crate::config::SynthesisConfig;
    use crate::services::SearchPlan;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let state = AppState::new(
            Arc::new(InMemoryCatalog::builtin()),
            Arc::new(RoundRobinSelection::new()),
            SearchPlan::default(),
            SynthesisConfig::default(),
        );
        let _router = create_router(state);
    }
}
