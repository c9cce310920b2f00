use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ProfileStore, SkillStore, StoreError};
use crate::models::profile::{
    Experience, ExperienceRow, Profile, ProfileRow, Skill, TechnicalSkillRow,
};

/// PostgreSQL-backed profile directory. Read-only: this service never writes profiles.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        let row: Option<ProfileRow> = sqlx::query_as(
            "SELECT id, name, years_of_experience, current_position FROM profiles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let experiences: Vec<ExperienceRow> = sqlx::query_as(
            r#"
            SELECT company, position, start_date, end_date
            FROM experiences
            WHERE profile_id = $1
            ORDER BY start_date DESC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Profile {
            id: row.id,
            name: row.name,
            years_of_experience: row.years_of_experience,
            current_role: row.current_position,
            experiences: experiences.into_iter().map(Experience::from).collect(),
        }))
    }
}

#[async_trait]
impl SkillStore for PgProfileStore {
    async fn get_by_profile(&self, id: Uuid) -> Result<Vec<Skill>, StoreError> {
        let rows: Vec<TechnicalSkillRow> = sqlx::query_as(
            r#"
            SELECT name, category, level, years_of_experience
            FROM technical_skills
            WHERE profile_id = $1
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Skill::from).collect())
    }
}
