//! Fixed vocabularies used by the similarity scorer and the cache's fuzzy key matching.
//!
//! All matching is substring-based on lowercased input, so Korean and English
//! variants of the same term live side by side.

use std::collections::BTreeSet;

/// Role keywords: function, seniority, title, platform and domain terms.
pub const ROLE_TERMS: &[&str] = &[
    "backend", "frontend", "fullstack", "devops", "데브옵스",
    "senior", "junior", "lead", "principal", "staff",
    "시니어", "주니어", "리드", "팀장",
    "developer", "engineer", "architect", "manager",
    "개발자", "엔지니어", "아키텍트", "매니저",
    "mobile", "ios", "android", "web", "cloud",
    "모바일", "웹", "클라우드",
    "data", "ml", "ai", "데이터", "머신러닝",
];

/// Skills that count as "related" when only one profile lists them.
pub const RELATED_SKILL_GROUPS: &[&[&str]] = &[
    &["java", "kotlin", "spring", "springboot"],
    &["javascript", "typescript", "react", "vue", "angular", "node", "nodejs"],
    &["python", "django", "flask", "fastapi"],
    &["aws", "gcp", "azure", "cloud"],
    &["docker", "kubernetes", "k8s"],
    &["mysql", "postgresql", "oracle", "mariadb"],
    &["mongodb", "redis", "elasticsearch", "cassandra"],
    &["jenkins", "gitlab", "github", "ci/cd", "devops"],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrgCategory {
    Startup,
    LargeTech,
    Gaming,
    Finance,
    ECommerce,
}

const STARTUP_PATTERNS: &[&str] = &["스타트업", "startup", "labs", "ventures"];

const LARGE_TECH_PATTERNS: &[&str] = &[
    "네이버", "카카오", "쿠팡", "배달의민족", "토스", "당근",
    "naver", "kakao", "coupang", "toss",
];

const ORG_CATEGORY_PATTERNS: &[(OrgCategory, &[&str])] = &[
    (OrgCategory::Startup, STARTUP_PATTERNS),
    (OrgCategory::LargeTech, LARGE_TECH_PATTERNS),
    (OrgCategory::Gaming, &["게임", "game", "넥슨", "넷마블", "nexon", "netmarble"]),
    (
        OrgCategory::Finance,
        &["은행", "bank", "금융", "finance", "카드", "card", "보험", "insurance"],
    ),
    (
        OrgCategory::ECommerce,
        &["커머스", "commerce", "쇼핑", "shopping", "마켓", "market"],
    ),
];

/// Canonical substitutions applied before fuzzy role comparison.
const ROLE_CANONICAL_TERMS: &[(&str, &str)] = &[
    ("senior", "시니어"),
    ("junior", "주니어"),
    ("developer", "개발자"),
    ("engineer", "엔지니어"),
    ("backend", "백엔드"),
    ("frontend", "프론트엔드"),
];

/// Extracts the role keywords present in `role` (case-insensitive).
pub fn role_keywords(role: &str) -> BTreeSet<&'static str> {
    let lower = role.to_lowercase();
    ROLE_TERMS
        .iter()
        .copied()
        .filter(|term| lower.contains(term))
        .collect()
}

/// Returns true if `skill` belongs to a related group with at least two members in `all_skills`.
/// Only the first group containing the skill is consulted.
pub fn is_related_skill(skill: &str, all_skills: &BTreeSet<String>) -> bool {
    RELATED_SKILL_GROUPS
        .iter()
        .find(|group| group.contains(&skill))
        .map(|group| group.iter().filter(|s| all_skills.contains(**s)).count() > 1)
        .unwrap_or(false)
}

/// Maps organization names to the coarse categories they match.
pub fn org_categories<'a, I>(organizations: I) -> BTreeSet<OrgCategory>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut categories = BTreeSet::new();
    for org in organizations {
        let lower = org.to_lowercase();
        for (category, patterns) in ORG_CATEGORY_PATTERNS {
            if patterns.iter().any(|p| lower.contains(p)) {
                categories.insert(*category);
            }
        }
    }
    categories
}

pub fn is_startup(org: &str) -> bool {
    let lower = org.to_lowercase();
    STARTUP_PATTERNS.iter().any(|p| lower.contains(p))
}

pub fn is_large_tech(org: &str) -> bool {
    let lower = org.to_lowercase();
    LARGE_TECH_PATTERNS.iter().any(|p| lower.contains(p))
}

/// Lowercases and rewrites English role terms to their canonical Korean form.
pub fn normalize_role(role: &str) -> String {
    ROLE_CANONICAL_TERMS
        .iter()
        .fold(role.to_lowercase(), |acc, (from, to)| acc.replace(from, to))
}
