use serde_json::{Map, Value};

use super::base::{render_skills, AgentSpec};
use super::models::{RequestContext, Specialization};
use super::prompts::{TECHNICAL_FALLBACK, TECHNICAL_PROMPT_TEMPLATE};
use crate::llm_client::prompts::PROFILE_GROUNDING_INSTRUCTION;
use crate::models::profile::{Profile, Skill};

/// Algorithms, system design, code review and stack-depth questions.
pub struct TechnicalAgent;

/// Difficulty band from years of experience.
pub fn difficulty_for(years: i32) -> &'static str {
    match years {
        i32::MIN..=2 => "junior",
        3..=5 => "mid-level",
        _ => "senior",
    }
}

impl AgentSpec for TechnicalAgent {
    fn id(&self) -> &'static str {
        "technical"
    }

    fn description(&self) -> &'static str {
        "Deep technical assessments and coding challenges"
    }

    fn specialization(&self) -> Specialization {
        Specialization::Technical
    }

    fn kinds(&self) -> &'static [&'static str] {
        &["technical", "coding", "algorithm", "system_design"]
    }

    fn max_tokens(&self) -> u32 {
        4000
    }

    fn temperature(&self) -> f32 {
        0.6
    }

    fn build_prompt(&self, context: &RequestContext, profile: &Profile, skills: &[Skill]) -> String {
        TECHNICAL_PROMPT_TEMPLATE
            .replace("{difficulty}", difficulty_for(profile.years_of_experience))
            .replace("{role}", context.target_role.as_deref().unwrap_or("Backend Developer"))
            .replace("{skills}", &render_skills(skills))
            .replace("{grounding_instruction}", PROFILE_GROUNDING_INSTRUCTION)
    }

    fn confidence(&self, text: &str) -> f64 {
        let structured = text.contains("questions") || text.contains("problems");
        if structured && text.len() > 1000 {
            0.9
        } else {
            0.7
        }
    }

    fn extend_metadata(&self, metadata: &mut Map<String, Value>) {
        metadata.insert("question_count".to_string(), 8.into());
    }

    fn fallback_content(&self) -> &'static str {
        TECHNICAL_FALLBACK
    }

    fn fallback_confidence(&self) -> f64 {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::SkillLevel;
    use crate::profiles::memory::{sample_profile, sample_skill};
    use uuid::Uuid;

    #[test]
    fn test_difficulty_bands() {
        assert_eq!(difficulty_for(0), "junior");
        assert_eq!(difficulty_for(2), "junior");
        assert_eq!(difficulty_for(3), "mid-level");
        assert_eq!(difficulty_for(5), "mid-level");
        assert_eq!(difficulty_for(6), "senior");
    }

    #[test]
    fn test_confidence_requires_structure_and_length() {
        let long_structured = format!("{{\"questions\": [\"{}\"]}}", "x".repeat(1000));
        assert_eq!(TechnicalAgent.confidence(&long_structured), 0.9);
        assert_eq!(TechnicalAgent.confidence(&"x".repeat(2000)), 0.7);
        assert_eq!(TechnicalAgent.confidence("{\"problems\": []}"), 0.7);
    }

    #[test]
    fn test_prompt_uses_difficulty_and_skills() {
        let id = Uuid::new_v4();
        let profile = sample_profile(id, 1, None, &[]);
        let skills = vec![sample_skill("Go", SkillLevel::Beginner, 1)];
        let context = RequestContext::new(id, "coding");

        let prompt = TechnicalAgent.build_prompt(&context, &profile, &skills);

        assert!(prompt.contains("junior Backend Developer candidate"));
        assert!(prompt.contains("- Go: BEGINNER (1 years)"));
    }

    #[test]
    fn test_metadata_extension() {
        let mut metadata = Map::new();
        TechnicalAgent.extend_metadata(&mut metadata);
        assert_eq!(metadata["question_count"], 8);
    }
}
