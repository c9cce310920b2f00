use std::sync::Arc;

use crate::cache::SimilarityCache;
use crate::orchestrator::Orchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<SimilarityCache>,
    pub orchestrator: Arc<Orchestrator>,
}
