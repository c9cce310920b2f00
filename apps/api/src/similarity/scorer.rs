//! Profile Similarity: weighted multi-factor comparison of two profile snapshots.
//!
//! Pure and deterministic. Missing data degrades to neutral scores, never errors.
//!
//! overall = 0.25·experience + 0.20·role + 0.35·skills + 0.10·org_type + 0.10·education

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::profile::{Experience, Profile, Skill, SkillLevel};
use crate::similarity::vocabulary::{is_related_skill, org_categories, role_keywords};

pub const WEIGHT_EXPERIENCE: f64 = 0.25;
pub const WEIGHT_ROLE: f64 = 0.20;
pub const WEIGHT_SKILLS: f64 = 0.35;
pub const WEIGHT_ORG_TYPE: f64 = 0.10;
pub const WEIGHT_EDUCATION: f64 = 0.10;

pub const CACHEABLE_THRESHOLD: f64 = 0.80;
pub const HIGHLY_SIMILAR_THRESHOLD: f64 = 0.90;

/// Profiles carry no education field yet, so this dimension is a fixed neutral-high value.
pub const EDUCATION_PLACEHOLDER: f64 = 0.7;

const TARGET_ROLE_BOOST: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub experience: f64,
    pub role: f64,
    pub skills: f64,
    pub organization_type: f64,
    pub education: f64,
}

impl DimensionScores {
    pub fn weighted_sum(&self) -> f64 {
        self.experience * WEIGHT_EXPERIENCE
            + self.role * WEIGHT_ROLE
            + self.skills * WEIGHT_SKILLS
            + self.organization_type * WEIGHT_ORG_TYPE
            + self.education * WEIGHT_EDUCATION
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScore {
    pub overall: f64,
    pub by_dimension: DimensionScores,
    pub is_highly_similar: bool,
    pub is_cacheable: bool,
    pub explanation: String,
}

impl SimilarityScore {
    /// Builds a score from dimension values, clamping each into [0, 1].
    pub fn from_dimensions(dimensions: DimensionScores) -> Self {
        let by_dimension = DimensionScores {
            experience: dimensions.experience.clamp(0.0, 1.0),
            role: dimensions.role.clamp(0.0, 1.0),
            skills: dimensions.skills.clamp(0.0, 1.0),
            organization_type: dimensions.organization_type.clamp(0.0, 1.0),
            education: dimensions.education.clamp(0.0, 1.0),
        };
        let overall = by_dimension.weighted_sum();

        SimilarityScore {
            overall,
            is_highly_similar: overall >= HIGHLY_SIMILAR_THRESHOLD,
            is_cacheable: overall >= CACHEABLE_THRESHOLD,
            explanation: explain(overall).to_string(),
            by_dimension,
        }
    }

    /// Advice on how far a cached result for this pair can be trusted.
    pub fn recommendation(&self) -> &'static str {
        if self.is_highly_similar {
            "Profiles are nearly identical. Cached results can be reused as-is."
        } else if self.is_cacheable {
            "Profiles are similar enough. Reuse cached results, adjusting where needed."
        } else if self.overall >= 0.6 {
            "Moderate similarity. Use cached results for reference only."
        } else {
            "Low similarity. Generate fresh results."
        }
    }
}

/// Scores how alike two profiles are.
///
/// The target role only boosts the role dimension when both profiles match it.
/// `_target_organization` is accepted for call-site symmetry; organization similarity
/// is judged from work history alone.
pub fn score(
    profile_a: &Profile,
    skills_a: &[Skill],
    profile_b: &Profile,
    skills_b: &[Skill],
    target_role: Option<&str>,
    _target_organization: Option<&str>,
) -> SimilarityScore {
    SimilarityScore::from_dimensions(DimensionScores {
        experience: experience_similarity(
            profile_a.years_of_experience,
            profile_b.years_of_experience,
        ),
        role: role_similarity(
            profile_a.current_role.as_deref(),
            profile_b.current_role.as_deref(),
            target_role,
        ),
        skills: skills_similarity(skills_a, skills_b),
        organization_type: organization_type_similarity(
            &profile_a.experiences,
            &profile_b.experiences,
        ),
        education: EDUCATION_PLACEHOLDER,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Dimensions
// ────────────────────────────────────────────────────────────────────────────

pub fn experience_similarity(years_a: i32, years_b: i32) -> f64 {
    let diff = (years_a - years_b).abs();
    match diff {
        0 => 1.0,
        1 => 0.9,
        2 => 0.8,
        3 => 0.6,
        4 | 5 => 0.4,
        d => (1.0 - 0.1 * d as f64).max(0.0),
    }
}

pub fn role_similarity(role_a: Option<&str>, role_b: Option<&str>, target_role: Option<&str>) -> f64 {
    let (Some(role_a), Some(role_b)) = (role_a, role_b) else {
        return 0.5;
    };

    if role_a.to_lowercase() == role_b.to_lowercase() {
        return 1.0;
    }

    let keywords_a = role_keywords(role_a);
    let keywords_b = role_keywords(role_b);
    if keywords_a.is_empty() || keywords_b.is_empty() {
        return 0.3;
    }

    let jaccard = jaccard(&keywords_a, &keywords_b);

    let boost = match target_role {
        Some(target) => {
            let target_keywords = role_keywords(target);
            let a_matches = !keywords_a.is_disjoint(&target_keywords);
            let b_matches = !keywords_b.is_disjoint(&target_keywords);
            if a_matches && b_matches {
                TARGET_ROLE_BOOST
            } else {
                0.0
            }
        }
        None => 0.0,
    };

    (jaccard + boost).min(1.0)
}

pub fn skills_similarity(skills_a: &[Skill], skills_b: &[Skill]) -> f64 {
    match (skills_a.is_empty(), skills_b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }

    let map_a = index_by_name(skills_a);
    let map_b = index_by_name(skills_b);

    let all_skills: BTreeSet<String> = map_a.keys().chain(map_b.keys()).cloned().collect();

    let total: f64 = all_skills
        .iter()
        .map(|name| match (map_a.get(name), map_b.get(name)) {
            (Some(a), Some(b)) => {
                let level = level_similarity(a.level, b.level);
                let years = years_similarity(a.years_of_experience, b.years_of_experience);
                level * 0.6 + years * 0.4
            }
            _ if is_related_skill(name, &all_skills) => 0.3,
            _ => 0.1,
        })
        .sum();

    total / all_skills.len() as f64
}

pub fn organization_type_similarity(experiences_a: &[Experience], experiences_b: &[Experience]) -> f64 {
    if experiences_a.is_empty() && experiences_b.is_empty() {
        return 1.0;
    }

    let orgs_a: BTreeSet<String> = experiences_a
        .iter()
        .map(|e| e.organization.to_lowercase())
        .collect();
    let orgs_b: BTreeSet<String> = experiences_b
        .iter()
        .map(|e| e.organization.to_lowercase())
        .collect();

    if !orgs_a.is_disjoint(&orgs_b) {
        return 1.0;
    }

    let categories_a = org_categories(orgs_a.iter().map(String::as_str));
    let categories_b = org_categories(orgs_b.iter().map(String::as_str));

    if categories_a.is_empty() || categories_b.is_empty() {
        return 0.5;
    }

    jaccard(&categories_a, &categories_b)
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn level_similarity(level_a: Option<SkillLevel>, level_b: Option<SkillLevel>) -> f64 {
    let (Some(a), Some(b)) = (level_a, level_b) else {
        return 0.5;
    };
    match (a.rank() - b.rank()).abs() {
        0 => 1.0,
        1 => 0.7,
        2 => 0.4,
        _ => 0.1,
    }
}

fn years_similarity(years_a: i32, years_b: i32) -> f64 {
    let diff = (years_a - years_b).abs();
    match diff {
        0 => 1.0,
        1 => 0.8,
        2 => 0.6,
        d => (1.0 - 0.2 * d as f64).max(0.0),
    }
}

fn index_by_name(skills: &[Skill]) -> HashMap<String, &Skill> {
    skills.iter().map(|s| (s.name.to_lowercase(), s)).collect()
}

fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

fn explain(overall: f64) -> &'static str {
    if overall >= 0.9 {
        "Very similar profile (90%+)"
    } else if overall >= 0.8 {
        "Highly similar profile (80%+)"
    } else if overall >= 0.7 {
        "Moderately similar profile (70%+)"
    } else if overall >= 0.6 {
        "Partially similar profile (60%+)"
    } else {
        "Low similarity profile"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
