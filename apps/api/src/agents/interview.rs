use serde_json::{Map, Value};

use super::base::{render_recent_experience, render_skills, AgentSpec};
use super::models::{RequestContext, Specialization};
use super::prompts::{INTERVIEW_FALLBACK, INTERVIEW_PROMPT_TEMPLATE};
use crate::cache::CacheKind;
use crate::llm_client::prompts::PROFILE_GROUNDING_INSTRUCTION;
use crate::models::profile::{Profile, Skill};

/// General interview questions across experience, depth, problem solving and growth.
pub struct InterviewAgent;

impl AgentSpec for InterviewAgent {
    fn id(&self) -> &'static str {
        "interview"
    }

    fn description(&self) -> &'static str {
        "Generates comprehensive interview questions grounded in the candidate's history"
    }

    fn specialization(&self) -> Specialization {
        Specialization::Interview
    }

    fn kinds(&self) -> &'static [&'static str] {
        &["interview", "interview_questions", "general_interview"]
    }

    fn max_tokens(&self) -> u32 {
        3000
    }

    fn temperature(&self) -> f32 {
        0.7
    }

    fn cache_kind(&self) -> Option<CacheKind> {
        Some(CacheKind::Questions)
    }

    fn build_prompt(&self, context: &RequestContext, profile: &Profile, skills: &[Skill]) -> String {
        INTERVIEW_PROMPT_TEMPLATE
            .replace(
                "{organization}",
                context.target_organization.as_deref().unwrap_or("a technology company"),
            )
            .replace("{role}", context.target_role.as_deref().unwrap_or("Backend Developer"))
            .replace("{name}", &profile.name)
            .replace("{years}", &profile.years_of_experience.to_string())
            .replace(
                "{current_role}",
                profile.current_role.as_deref().unwrap_or("undecided"),
            )
            .replace("{skills}", &render_skills(skills))
            .replace("{experience}", &render_recent_experience(profile))
            .replace("{grounding_instruction}", PROFILE_GROUNDING_INSTRUCTION)
    }

    fn confidence(&self, text: &str) -> f64 {
        if text.len() > 500 {
            0.95
        } else {
            0.8
        }
    }

    fn extend_metadata(&self, metadata: &mut Map<String, Value>) {
        metadata.insert("question_types".to_string(), 5.into());
    }

    fn fallback_content(&self) -> &'static str {
        INTERVIEW_FALLBACK
    }

    fn fallback_confidence(&self) -> f64 {
        0.6
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::agents::base::testing::ScriptedBackend;
    use crate::agents::base::{Agent, GenerativeAgent};
    use crate::cache::SimilarityCache;
    use crate::models::profile::SkillLevel;
    use crate::profiles::memory::{sample_profile, sample_skill};
    use crate::profiles::InMemoryProfileStore;

    fn store_with(id: Uuid) -> Arc<InMemoryProfileStore> {
        let store = Arc::new(InMemoryProfileStore::new());
        store.insert(
            sample_profile(id, 6, Some("Backend Developer"), &["Kakao", "Acme Labs"]),
            vec![sample_skill("Rust", SkillLevel::Advanced, 4)],
        );
        store
    }

    fn context(id: Uuid) -> RequestContext {
        RequestContext::new(id, "interview")
            .with_target(Some("Senior Backend Developer".into()), Some("Toss".into()))
    }

    #[test]
    fn test_can_handle_interview_kinds_only() {
        let store = Arc::new(InMemoryProfileStore::new());
        let agent = GenerativeAgent::new(
            InterviewAgent,
            store,
            Arc::new(ScriptedBackend::replying("{}")),
        );
        let id = Uuid::new_v4();
        assert!(agent.can_handle(&RequestContext::new(id, "interview_questions")));
        assert!(agent.can_handle(&RequestContext::new(id, "general_interview")));
        assert!(!agent.can_handle(&RequestContext::new(id, "technical")));
    }

    #[test]
    fn test_prompt_includes_profile_and_target() {
        let id = Uuid::new_v4();
        let profile = sample_profile(id, 6, Some("Backend Developer"), &["Kakao"]);
        let skills = vec![sample_skill("Rust", SkillLevel::Advanced, 4)];

        let prompt = InterviewAgent.build_prompt(&context(id), &profile, &skills);

        assert!(prompt.contains("senior interviewer at Toss"));
        assert!(prompt.contains("Senior Backend Developer position"));
        assert!(prompt.contains("- Rust: ADVANCED (4 years)"));
        assert!(prompt.contains("- Kakao Developer"));
        assert!(!prompt.contains("{role}"));
        assert!(!prompt.contains("{grounding_instruction}"));
    }

    #[test]
    fn test_confidence_rewards_long_answers() {
        assert_eq!(InterviewAgent.confidence(&"x".repeat(501)), 0.95);
        assert_eq!(InterviewAgent.confidence("short"), 0.8);
    }

    #[tokio::test]
    async fn test_process_generates_and_tags_metadata() {
        let id = Uuid::new_v4();
        let backend = Arc::new(ScriptedBackend::replying(&"q".repeat(600)));
        let agent = GenerativeAgent::new(InterviewAgent, store_with(id), backend.clone());

        let result = agent.process(&context(id)).await;

        assert_eq!(result.agent_id, "interview");
        assert_eq!(result.confidence, 0.95);
        assert_eq!(result.metadata["model"], "scripted");
        assert_eq!(result.metadata["tokens_used"], 150);
        assert_eq!(result.metadata["agent_type"], "INTERVIEW");
        assert!(result.generation.is_some());
        assert_eq!(backend.call_count(), 1);
        assert!(backend.prompts.lock().unwrap()[0].contains("senior interviewer at Toss"));
    }

    #[tokio::test]
    async fn test_backend_failure_yields_fallback() {
        let id = Uuid::new_v4();
        let agent = GenerativeAgent::new(
            InterviewAgent,
            store_with(id),
            Arc::new(ScriptedBackend::failing()),
        );

        let result = agent.process(&context(id)).await;

        assert!(result.is_fallback());
        assert_eq!(result.confidence, 0.6);
        assert_eq!(result.content, INTERVIEW_FALLBACK);
    }

    #[tokio::test]
    async fn test_missing_profile_yields_fallback_without_calling_backend() {
        let backend = Arc::new(ScriptedBackend::replying("{}"));
        let agent = GenerativeAgent::new(
            InterviewAgent,
            Arc::new(InMemoryProfileStore::new()),
            backend.clone(),
        );

        let result = agent.process(&context(Uuid::new_v4())).await;

        assert!(result.is_fallback());
        assert!(result.metadata["error"]
            .as_str()
            .unwrap()
            .starts_with("Profile not found"));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_similar_profile_is_served_from_cache() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let store = store_with(first);
        store.insert(
            sample_profile(second, 6, Some("Backend Developer"), &["Kakao", "Acme Labs"]),
            vec![sample_skill("Rust", SkillLevel::Advanced, 4)],
        );
        let cache = Arc::new(SimilarityCache::new(store.clone(), chrono::Duration::hours(24)));
        let backend = Arc::new(ScriptedBackend::replying("{\"questions\": [\"generated\"]}"));
        let agent = GenerativeAgent::new(InterviewAgent, store, backend.clone())
            .with_cache(cache.clone());

        let generated = agent.process(&context(first)).await;
        assert!(generated.generation.is_some());
        assert_eq!(cache.sizes().questions, 1);

        let reused = agent.process(&context(second)).await;

        assert_eq!(backend.call_count(), 1);
        assert_eq!(reused.content, generated.content);
        assert_eq!(reused.metadata["cache_hit"], true);
        assert!((reused.confidence - 0.97).abs() < 1e-9);
    }
}
