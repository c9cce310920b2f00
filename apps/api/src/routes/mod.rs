pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::cache::handlers as cache;
use crate::orchestrator::handlers as agents;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Agents API
        .route("/api/v1/agents/orchestrate", post(agents::handle_orchestrate))
        .route("/api/v1/agents/batch", post(agents::handle_batch))
        .route(
            "/api/v1/agents/interview-questions",
            post(agents::handle_comprehensive_interview),
        )
        .route("/api/v1/agents/available", get(agents::handle_available))
        .route("/api/v1/agents/cache", delete(agents::handle_clear_cache))
        // Cache API
        .route("/api/v1/cache/statistics", get(cache::handle_statistics))
        .route(
            "/api/v1/cache/profile/:id/similar-cached",
            get(cache::handle_find_similar),
        )
        .route("/api/v1/cache/entries", post(cache::handle_put_entry))
        .route("/api/v1/cache/clear", delete(cache::handle_clear))
        .route("/api/v1/cache/sweep", post(cache::handle_sweep))
        .route(
            "/api/v1/cache/similarity/calculate",
            post(cache::handle_similarity),
        )
        .route("/api/v1/cache/warmup", post(cache::handle_warmup))
        .with_state(state)
}
