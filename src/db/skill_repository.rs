use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::api::job::models::Skill;
use crate::db::models::SkillRow;
use crate::store::{SkillCatalog, StoreError};

/// Postgres adapter for the Skill Catalog port; read-only, seeded by migration
pub struct PgSkillCatalog {
    pool: Pool<Postgres>,
}

impl PgSkillCatalog {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SkillCatalog for PgSkillCatalog {
    async fn resolve_skills(&self, ids: &[String]) -> Result<Vec<Skill>, StoreError> {
        let rows =
            sqlx::query_as::<_, SkillRow>("SELECT id, name FROM skills WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Skill::from).collect())
    }

    async fn list_skills(&self) -> Result<Vec<Skill>, StoreError> {
        let rows = sqlx::query_as::<_, SkillRow>("SELECT id, name FROM skills ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Skill::from).collect())
    }
}
