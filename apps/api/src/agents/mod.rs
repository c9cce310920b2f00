//! Coaching agents. Each agent answers a fixed set of request kinds with its own
//! prompt, token budget, confidence heuristic and fallback payload.

pub mod base;
pub mod behavioral;
pub mod career_path;
pub mod interview;
pub mod models;
pub mod prompts;
pub mod technical;

use std::sync::Arc;

pub use base::{Agent, GenerativeAgent};
pub use models::{AgentInfo, AgentResult, RequestContext, Specialization};

use crate::cache::SimilarityCache;
use crate::llm_client::GenerationBackend;
use crate::profiles::ProfileDirectory;

/// The registered agents, in registration order.
pub fn default_agents(
    directory: Arc<dyn ProfileDirectory>,
    backend: Arc<dyn GenerationBackend>,
    cache: Arc<SimilarityCache>,
) -> Vec<Arc<dyn Agent>> {
    vec![
        Arc::new(
            GenerativeAgent::new(interview::InterviewAgent, directory.clone(), backend.clone())
                .with_cache(cache.clone()),
        ),
        Arc::new(GenerativeAgent::new(
            technical::TechnicalAgent,
            directory.clone(),
            backend.clone(),
        )),
        Arc::new(GenerativeAgent::new(
            behavioral::BehavioralAgent,
            directory.clone(),
            backend.clone(),
        )),
        Arc::new(
            GenerativeAgent::new(career_path::CareerPathAgent, directory, backend)
                .with_cache(cache),
        ),
    ]
}
