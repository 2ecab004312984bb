use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::api::job::models::{Customer, Freelancer};
use crate::db::models::{CustomerRow, FreelancerRow};
use crate::store::{PartyDirectory, StoreError};

/// Postgres adapter for the Party Directory port; read-only
pub struct PgPartyDirectory {
    pool: Pool<Postgres>,
}

impl PgPartyDirectory {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PartyDirectory for PgPartyDirectory {
    async fn resolve_customer(&self, id: &str) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query_as::<_, CustomerRow>("SELECT id, name FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Customer::from))
    }

    async fn resolve_freelancer(&self, id: &str) -> Result<Option<Freelancer>, StoreError> {
        let row =
            sqlx::query_as::<_, FreelancerRow>("SELECT id, name FROM freelancers WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Freelancer::from))
    }
}
