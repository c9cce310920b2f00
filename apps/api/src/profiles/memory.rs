use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use super::{ProfileStore, SkillStore, StoreError};
use chrono::NaiveDate;

use crate::models::profile::{Experience, Profile, Skill, SkillLevel};

/// In-process profile directory for tests.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: DashMap<Uuid, Profile>,
    skills: DashMap<Uuid, Vec<Skill>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, profile: Profile, skills: Vec<Skill>) {
        self.skills.insert(profile.id, skills);
        self.profiles.insert(profile.id, profile);
    }

    pub fn remove(&self, id: Uuid) {
        self.profiles.remove(&id);
        self.skills.remove(&id);
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.profiles.get(&id).map(|p| p.value().clone()))
    }
}

#[async_trait]
impl SkillStore for InMemoryProfileStore {
    async fn get_by_profile(&self, id: Uuid) -> Result<Vec<Skill>, StoreError> {
        Ok(self
            .skills
            .get(&id)
            .map(|s| s.value().clone())
            .unwrap_or_default())
    }
}

/// Builds a profile whose work history lists `organizations` in order.
pub fn sample_profile(id: Uuid, years: i32, role: Option<&str>, organizations: &[&str]) -> Profile {
    Profile {
        id,
        name: format!("Candidate {}", &id.to_string()[..8]),
        years_of_experience: years,
        current_role: role.map(str::to_string),
        experiences: organizations
            .iter()
            .map(|org| Experience {
                organization: org.to_string(),
                role: "Developer".to_string(),
                start_date: NaiveDate::from_ymd_opt(2019, 3, 1).unwrap(),
                end_date: None,
            })
            .collect(),
    }
}

pub fn sample_skill(name: &str, level: SkillLevel, years: i32) -> Skill {
    Skill {
        name: name.to_string(),
        category: "tech".to_string(),
        level: Some(level),
        years_of_experience: years,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::load_snapshot;

    fn profile(id: Uuid) -> Profile {
        Profile {
            id,
            name: "Test".to_string(),
            years_of_experience: 3,
            current_role: Some("Backend Developer".to_string()),
            experiences: vec![],
        }
    }

    #[tokio::test]
    async fn test_load_snapshot_returns_profile_and_skills() {
        let store = InMemoryProfileStore::new();
        let id = Uuid::new_v4();
        store.insert(
            profile(id),
            vec![Skill {
                name: "Rust".to_string(),
                category: "language".to_string(),
                level: None,
                years_of_experience: 2,
            }],
        );

        let (p, skills) = load_snapshot(&store, id).await.unwrap();
        assert_eq!(p.id, id);
        assert_eq!(skills.len(), 1);
    }

    #[tokio::test]
    async fn test_load_snapshot_missing_profile_is_none() {
        let store = InMemoryProfileStore::new();
        assert!(load_snapshot(&store, Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_remove_drops_profile() {
        let store = InMemoryProfileStore::new();
        let id = Uuid::new_v4();
        store.insert(profile(id), vec![]);
        store.remove(id);
        assert!(store.get(id).await.unwrap().is_none());
    }
}
