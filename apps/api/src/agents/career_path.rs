use super::base::{render_recent_experience, render_skills, AgentSpec};
use super::models::{RequestContext, Specialization};
use super::prompts::{CAREER_PATH_FALLBACK, CAREER_PATH_PROMPT_TEMPLATE};
use crate::cache::CacheKind;
use crate::llm_client::prompts::PROFILE_GROUNDING_INSTRUCTION;
use crate::models::profile::{Profile, Skill};

const DEFAULT_HORIZON: &str = "12 month";

/// Milestone-based learning paths toward a target role.
pub struct CareerPathAgent;

impl AgentSpec for CareerPathAgent {
    fn id(&self) -> &'static str {
        "career_path"
    }

    fn description(&self) -> &'static str {
        "Builds milestone-based learning paths toward a target role"
    }

    fn specialization(&self) -> Specialization {
        Specialization::CareerPath
    }

    fn kinds(&self) -> &'static [&'static str] {
        &["learning_path", "career_path", "roadmap"]
    }

    fn max_tokens(&self) -> u32 {
        3500
    }

    fn temperature(&self) -> f32 {
        0.7
    }

    fn cache_kind(&self) -> Option<CacheKind> {
        Some(CacheKind::LearningPath)
    }

    fn build_prompt(&self, context: &RequestContext, profile: &Profile, skills: &[Skill]) -> String {
        CAREER_PATH_PROMPT_TEMPLATE
            .replace("{role}", context.target_role.as_deref().unwrap_or("Senior Developer"))
            .replace(
                "{organization}",
                context.target_organization.as_deref().unwrap_or("a technology company"),
            )
            .replace("{name}", &profile.name)
            .replace("{years}", &profile.years_of_experience.to_string())
            .replace(
                "{current_role}",
                profile.current_role.as_deref().unwrap_or("undecided"),
            )
            .replace("{skills}", &render_skills(skills))
            .replace("{experience}", &render_recent_experience(profile))
            .replace(
                "{horizon}",
                context.parameter_str("horizon").unwrap_or(DEFAULT_HORIZON),
            )
            .replace("{grounding_instruction}", PROFILE_GROUNDING_INSTRUCTION)
    }

    fn confidence(&self, text: &str) -> f64 {
        let structured = text.contains("milestones") || text.contains("steps");
        if structured && text.len() > 800 {
            0.9
        } else {
            0.75
        }
    }

    fn fallback_content(&self) -> &'static str {
        CAREER_PATH_FALLBACK
    }

    fn fallback_confidence(&self) -> f64 {
        0.55
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

    #[test]
    fn test_prompt_honors_horizon_parameter() {
        let id = Uuid::new_v4();
        let profile = sample_profile(id, 3, Some("Frontend Developer"), &[]);
        let context = RequestContext::new(id, "roadmap")
            .with_target(Some("Staff Engineer".into()), None)
            .with_parameter("horizon", "6 month");

        let prompt = CareerPathAgent.build_prompt(&context, &profile, &[]);

        assert!(prompt.contains("to a Staff Engineer position"));
        assert!(prompt.contains("over a 6 month horizon"));
        assert!(prompt.contains("- (none listed)"));
    }

    #[test]
    fn test_confidence_detects_milestones() {
        let text = format!("{{\"milestones\": \"{}\"}}", "x".repeat(800));
        assert_eq!(CareerPathAgent.confidence(&text), 0.9);
        assert_eq!(CareerPathAgent.confidence("{\"milestones\": []}"), 0.75);
    }

    #[tokio::test]
    async fn test_dissimilar_profile_is_regenerated() {
        let junior = Uuid::new_v4();
        let senior = Uuid::new_v4();
        let store = Arc::new(InMemoryProfileStore::new());
        store.insert(
            sample_profile(junior, 1, Some("Junior Frontend Developer"), &["Acme Labs"]),
            vec![sample_skill("React", SkillLevel::Beginner, 1)],
        );
        store.insert(
            sample_profile(senior, 12, Some("Senior Backend Engineer"), &["Naver"]),
            vec![sample_skill("Java", SkillLevel::Expert, 10)],
        );
        let cache = Arc::new(SimilarityCache::new(store.clone(), chrono::Duration::hours(24)));
        let backend = Arc::new(ScriptedBackend::replying("{\"milestones\": []}"));
        let agent = GenerativeAgent::new(CareerPathAgent, store, backend.clone())
            .with_cache(cache.clone());

        agent.process(&RequestContext::new(junior, "learning_path")).await;
        let second = agent
            .process(&RequestContext::new(senior, "learning_path"))
            .await;

        assert_eq!(backend.call_count(), 2);
        assert!(second.metadata.get("cache_hit").is_none());
        assert_eq!(cache.sizes().learning_paths, 2);
    }
}
