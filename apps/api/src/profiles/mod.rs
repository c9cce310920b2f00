//! Profile & skill lookup: read-only snapshots consumed by the similarity cache and agents.
//!
//! `PgProfileStore` reads the profile tables; `InMemoryProfileStore` backs tests.

#[cfg(test)]
pub mod memory;
pub mod store;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::profile::{Profile, Skill};

#[cfg(test)]
pub use memory::InMemoryProfileStore;
pub use store::PgProfileStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns `Ok(None)` when no profile exists with this id.
    async fn get(&self, id: Uuid) -> Result<Option<Profile>, StoreError>;
}

#[async_trait]
pub trait SkillStore: Send + Sync {
    async fn get_by_profile(&self, id: Uuid) -> Result<Vec<Skill>, StoreError>;
}

/// Anything that can serve both lookups. Carried as `Arc<dyn ProfileDirectory>`.
pub trait ProfileDirectory: ProfileStore + SkillStore {}

impl<T: ProfileStore + SkillStore> ProfileDirectory for T {}

/// Loads a profile together with its skills. Store failures and missing profiles both
/// come back as `None`: callers treat an unresolvable profile as "no data".
pub async fn load_snapshot(
    directory: &dyn ProfileDirectory,
    id: Uuid,
) -> Option<(Profile, Vec<Skill>)> {
    let profile = match directory.get(id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Profile lookup failed for {id}: {e}");
            return None;
        }
    };

    let skills = match directory.get_by_profile(id).await {
        Ok(skills) => skills,
        Err(e) => {
            tracing::warn!("Skill lookup failed for {id}: {e}");
            return None;
        }
    };

    Some((profile, skills))
}
