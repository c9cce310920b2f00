use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Read-only snapshot of a candidate profile, as consumed by scoring and agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub years_of_experience: i32,
    pub current_role: Option<String>,
    pub experiences: Vec<Experience>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub organization: String,
    pub role: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Four-step proficiency ladder. Ordering matters: ladder distance drives level similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn rank(self) -> i32 {
        match self {
            SkillLevel::Beginner => 0,
            SkillLevel::Intermediate => 1,
            SkillLevel::Advanced => 2,
            SkillLevel::Expert => 3,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BEGINNER" => Some(SkillLevel::Beginner),
            "INTERMEDIATE" => Some(SkillLevel::Intermediate),
            "ADVANCED" => Some(SkillLevel::Advanced),
            "EXPERT" => Some(SkillLevel::Expert),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "BEGINNER",
            SkillLevel::Intermediate => "INTERMEDIATE",
            SkillLevel::Advanced => "ADVANCED",
            SkillLevel::Expert => "EXPERT",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub category: String,
    /// `None` when the profile never recorded a level.
    pub level: Option<SkillLevel>,
    pub years_of_experience: i32,
}

// ────────────────────────────────────────────────────────────────────────────
// Database rows
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub name: String,
    pub years_of_experience: i32,
    pub current_position: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ExperienceRow {
    pub company: String,
    pub position: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TechnicalSkillRow {
    pub name: String,
    pub category: String,
    pub level: Option<String>,
    pub years_of_experience: i32,
}

impl From<ExperienceRow> for Experience {
    fn from(row: ExperienceRow) -> Self {
        Experience {
            organization: row.company,
            role: row.position,
            start_date: row.start_date,
            end_date: row.end_date,
        }
    }
}

impl From<TechnicalSkillRow> for Skill {
    fn from(row: TechnicalSkillRow) -> Self {
        Skill {
            level: row.level.as_deref().and_then(SkillLevel::parse),
            name: row.name,
            category: row.category,
            years_of_experience: row.years_of_experience,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_level_parse_is_case_insensitive() {
        assert_eq!(SkillLevel::parse("advanced"), Some(SkillLevel::Advanced));
        assert_eq!(SkillLevel::parse(" EXPERT "), Some(SkillLevel::Expert));
        assert_eq!(SkillLevel::parse("guru"), None);
    }

    #[test]
    fn test_skill_row_with_unknown_level_maps_to_none() {
        let skill: Skill = TechnicalSkillRow {
            name: "Rust".to_string(),
            category: "language".to_string(),
            level: Some("wizard".to_string()),
            years_of_experience: 4,
        }
        .into();
        assert!(skill.level.is_none());
        assert_eq!(skill.years_of_experience, 4);
    }

    #[test]
    fn test_skill_level_serializes_screaming_case() {
        let json = serde_json::to_string(&SkillLevel::Intermediate).unwrap();
        assert_eq!(json, "\"INTERMEDIATE\"");
    }
}
