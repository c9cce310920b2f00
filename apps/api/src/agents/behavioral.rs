use serde_json::{Map, Value};

use super::base::{render_recent_experience, AgentSpec};
use super::models::{RequestContext, Specialization};
use super::prompts::{BEHAVIORAL_FALLBACK, BEHAVIORAL_PROMPT_TEMPLATE};
use crate::llm_client::prompts::PROFILE_GROUNDING_INSTRUCTION;
use crate::models::profile::{Profile, Skill};

const FOCUS_AREAS: &[&str] = &["leadership", "teamwork", "communication", "growth_mindset"];

/// Behavioral and culture-fit questions, answerable in STAR form.
pub struct BehavioralAgent;

pub fn seniority_for(years: i32) -> &'static str {
    match years {
        i32::MIN..=2 => "junior",
        3..=5 => "mid-level",
        6..=9 => "senior",
        _ => "lead/principal",
    }
}

impl AgentSpec for BehavioralAgent {
    fn id(&self) -> &'static str {
        "behavioral"
    }

    fn description(&self) -> &'static str {
        "Behavioral and cultural fit assessments"
    }

    fn specialization(&self) -> Specialization {
        Specialization::Behavioral
    }

    fn kinds(&self) -> &'static [&'static str] {
        &["behavioral", "culture_fit", "soft_skills", "leadership"]
    }

    fn max_tokens(&self) -> u32 {
        3500
    }

    fn temperature(&self) -> f32 {
        0.8
    }

    fn build_prompt(&self, context: &RequestContext, profile: &Profile, _skills: &[Skill]) -> String {
        BEHAVIORAL_PROMPT_TEMPLATE
            .replace(
                "{organization}",
                context.target_organization.as_deref().unwrap_or("a technology company"),
            )
            .replace("{seniority}", seniority_for(profile.years_of_experience))
            .replace("{role}", context.target_role.as_deref().unwrap_or("Developer"))
            .replace("{name}", &profile.name)
            .replace("{years}", &profile.years_of_experience.to_string())
            .replace(
                "{current_role}",
                profile.current_role.as_deref().unwrap_or("undecided"),
            )
            .replace("{experience}", &render_recent_experience(profile))
            .replace("{grounding_instruction}", PROFILE_GROUNDING_INSTRUCTION)
    }

    fn confidence(&self, text: &str) -> f64 {
        let structured = text.contains("STAR") || text.contains("behavioral");
        if structured && text.len() > 800 {
            0.92
        } else {
            0.75
        }
    }

    fn extend_metadata(&self, metadata: &mut Map<String, Value>) {
        metadata.insert(
            "focus_areas".to_string(),
            Value::Array(FOCUS_AREAS.iter().map(|a| Value::from(*a)).collect()),
        );
    }

    fn fallback_content(&self) -> &'static str {
        BEHAVIORAL_FALLBACK
    }

    fn fallback_confidence(&self) -> f64 {
        0.55
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::memory::sample_profile;
    use uuid::Uuid;

    #[test]
    fn test_seniority_bands() {
        assert_eq!(seniority_for(1), "junior");
        assert_eq!(seniority_for(4), "mid-level");
        assert_eq!(seniority_for(7), "senior");
        assert_eq!(seniority_for(12), "lead/principal");
    }

    #[test]
    fn test_confidence_detects_star_structure() {
        let star = format!("STAR {}", "x".repeat(800));
        assert_eq!(BehavioralAgent.confidence(&star), 0.92);
        assert_eq!(BehavioralAgent.confidence("STAR"), 0.75);
        assert_eq!(BehavioralAgent.confidence(&"x".repeat(900)), 0.75);
    }

    #[test]
    fn test_prompt_defaults_when_targets_absent() {
        let id = Uuid::new_v4();
        let profile = sample_profile(id, 10, None, &["Nexon"]);
        let prompt = BehavioralAgent.build_prompt(&RequestContext::new(id, "leadership"), &profile, &[]);

        assert!(prompt.contains("specialist at a technology company"));
        assert!(prompt.contains("lead/principal Developer candidate"));
        assert!(prompt.contains("- Current role: undecided"));
    }

    #[test]
    fn test_fallback_is_valid_json() {
        let parsed: Value = serde_json::from_str(BehavioralAgent.fallback_content()).unwrap();
        assert_eq!(parsed["behavioral_questions"].as_array().unwrap().len(), 3);
    }
}
