use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use super::models::{AgentInfo, AgentResult, RequestContext, Specialization};
use crate::cache::{CacheKind, SimilarityCache};
use crate::llm_client::GenerationBackend;
use crate::models::profile::{Profile, Skill};
use crate::profiles::{load_snapshot, ProfileDirectory};

/// Cache hits at or below this adjusted confidence are regenerated instead.
pub const CACHE_CONFIDENCE_FLOOR: f64 = 0.7;

/// A capability-gated unit of work. `process` never fails: problems surface as a
/// fallback result flagged in its metadata.
#[async_trait]
pub trait Agent: Send + Sync {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn specialization(&self) -> Specialization;
    fn can_handle(&self, context: &RequestContext) -> bool;
    async fn process(&self, context: &RequestContext) -> AgentResult;

    fn info(&self) -> AgentInfo {
        AgentInfo {
            id: self.id().to_string(),
            description: self.description().to_string(),
            specialization: self.specialization(),
        }
    }
}

/// Everything that distinguishes one generative agent from another.
pub trait AgentSpec: Send + Sync + 'static {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn specialization(&self) -> Specialization;
    /// Request kinds this agent answers.
    fn kinds(&self) -> &'static [&'static str];
    fn max_tokens(&self) -> u32;
    fn temperature(&self) -> f32;

    /// Content map consulted before generating, if any.
    fn cache_kind(&self) -> Option<CacheKind> {
        None
    }

    fn build_prompt(&self, context: &RequestContext, profile: &Profile, skills: &[Skill]) -> String;
    fn confidence(&self, text: &str) -> f64;

    fn extend_metadata(&self, _metadata: &mut Map<String, Value>) {}

    fn fallback_content(&self) -> &'static str;
    fn fallback_confidence(&self) -> f64;
}

/// Agent that resolves the profile, optionally consults the similarity cache, and
/// otherwise asks the generation backend.
pub struct GenerativeAgent<S> {
    spec: S,
    directory: Arc<dyn ProfileDirectory>,
    backend: Arc<dyn GenerationBackend>,
    cache: Option<Arc<SimilarityCache>>,
}

impl<S: AgentSpec> GenerativeAgent<S> {
    pub fn new(
        spec: S,
        directory: Arc<dyn ProfileDirectory>,
        backend: Arc<dyn GenerationBackend>,
    ) -> Self {
        Self {
            spec,
            directory,
            backend,
            cache: None,
        }
    }

    /// Routes generation through `cache` when its `AgentSpec` names a cache kind.
    pub fn with_cache(mut self, cache: Arc<SimilarityCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    fn fallback(&self, reason: String) -> AgentResult {
        let mut metadata = Map::new();
        metadata.insert("fallback".to_string(), Value::Bool(true));
        metadata.insert("error".to_string(), Value::String(reason));
        AgentResult {
            agent_id: self.spec.id().to_string(),
            content: self.spec.fallback_content().to_string(),
            confidence: self.spec.fallback_confidence(),
            metadata,
            generation: None,
        }
    }

    async fn cached(&self, context: &RequestContext) -> Option<AgentResult> {
        let cache = self.cache.as_ref()?;
        let kind = self.spec.cache_kind()?;
        let entry = cache
            .find_similar(
                kind,
                context.profile_id,
                context.target_role.as_deref(),
                context.target_organization.as_deref(),
            )
            .await?;

        if entry.confidence <= CACHE_CONFIDENCE_FLOOR {
            debug!(
                "{}: cached {} too weak ({:.2}), regenerating",
                self.spec.id(),
                kind.as_str(),
                entry.confidence
            );
            return None;
        }

        let mut metadata = entry.metadata;
        metadata.insert("cache_hit".to_string(), Value::Bool(true));
        metadata.insert("similarity_score".to_string(), entry.similarity_score.into());
        Some(AgentResult {
            agent_id: self.spec.id().to_string(),
            content: entry.payload,
            confidence: entry.confidence,
            metadata,
            generation: None,
        })
    }
}

#[async_trait]
impl<S: AgentSpec> Agent for GenerativeAgent<S> {
    fn id(&self) -> &'static str {
        self.spec.id()
    }

    fn description(&self) -> &'static str {
        self.spec.description()
    }

    fn specialization(&self) -> Specialization {
        self.spec.specialization()
    }

    fn can_handle(&self, context: &RequestContext) -> bool {
        self.spec.kinds().contains(&context.request_kind.as_str())
    }

    async fn process(&self, context: &RequestContext) -> AgentResult {
        let Some((profile, skills)) =
            load_snapshot(self.directory.as_ref(), context.profile_id).await
        else {
            warn!("{}: profile {} not found", self.spec.id(), context.profile_id);
            return self.fallback(format!("Profile not found with id: {}", context.profile_id));
        };

        if let Some(hit) = self.cached(context).await {
            return hit;
        }

        let prompt = self.spec.build_prompt(context, &profile, &skills);
        let generation = match self
            .backend
            .generate(&prompt, self.spec.max_tokens(), self.spec.temperature())
            .await
        {
            Ok(generation) => generation,
            Err(e) => {
                error!("Error in {} agent processing: {e}", self.spec.id());
                return self.fallback(e.to_string());
            }
        };

        let mut metadata = Map::new();
        metadata.insert("model".to_string(), Value::String(generation.model.clone()));
        metadata.insert("tokens_used".to_string(), generation.usage.total_tokens.into());
        metadata.insert(
            "agent_type".to_string(),
            Value::String(self.spec.specialization().as_str().to_string()),
        );
        self.spec.extend_metadata(&mut metadata);

        if let (Some(cache), Some(kind)) = (&self.cache, self.spec.cache_kind()) {
            cache.put(
                kind,
                context.profile_id,
                context.target_role.as_deref(),
                context.target_organization.as_deref(),
                generation.text.clone(),
                metadata.clone(),
            );
        }

        AgentResult {
            agent_id: self.spec.id().to_string(),
            confidence: self.spec.confidence(&generation.text),
            content: generation.text.clone(),
            metadata,
            generation: Some(generation),
        }
    }
}

/// Profile lines shared by the prompt builders.
pub(crate) fn render_skills(skills: &[Skill]) -> String {
    if skills.is_empty() {
        return "- (none listed)".to_string();
    }
    skills
        .iter()
        .map(|s| {
            format!(
                "- {}: {} ({} years)",
                s.name,
                s.level.map(|l| l.as_str()).unwrap_or("UNSPECIFIED"),
                s.years_of_experience
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn render_recent_experience(profile: &Profile) -> String {
    if profile.experiences.is_empty() {
        return "- (no experience recorded)".to_string();
    }
    profile
        .experiences
        .iter()
        .take(3)
        .map(|e| {
            let end = e
                .end_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "present".to_string());
            format!("- {} {} ({} ~ {})", e.organization, e.role, e.start_date, end)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
