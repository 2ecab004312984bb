use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::api::job::models::{Job, JobStatus};
use crate::db::models::JobRow;
use crate::store::{JobFilter, JobPatch, JobStore, StoreError};

const JOB_COLUMNS: &str = "id, title, description, deadline, customer_id, skills, \
     freelancer, request_freelancer, status, feedback_rate, feedback_text, \
     created_at, updated_at";

/// Postgres adapter for the JobStore port
///
/// Every mutation is a single-row statement; the status transition is a
/// conditional UPDATE keyed on the expected current status.
pub struct PgJobStore {
    pool: Pool<Postgres>,
}

impl PgJobStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn insert(&self, job: Job) -> Result<Job, StoreError> {
        debug!("Inserting job {} for customer {}", job.id, job.customer_id);

        let (feedback_rate, feedback_text) = match &job.feedback {
            Some(f) => (Some(f.rate), Some(f.text.clone())),
            None => (None, None),
        };

        let sql = format!(
            "INSERT INTO jobs ({JOB_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {JOB_COLUMNS}"
        );
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(job.id)
            .bind(&job.title)
            .bind(&job.description)
            .bind(job.deadline)
            .bind(&job.customer_id)
            .bind(&job.skills)
            .bind(&job.freelancer)
            .bind(&job.request_freelancer)
            .bind(job.status.as_str())
            .bind(feedback_rate)
            .bind(feedback_text)
            .bind(job.created_at)
            .bind(job.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Job::try_from(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Job::try_from).transpose()
    }

    async fn list(&self, filter: &JobFilter) -> Result<Vec<Job>, StoreError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {JOB_COLUMNS} FROM jobs WHERE TRUE"));

        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(customer_id) = &filter.customer_id {
            qb.push(" AND customer_id = ").push_bind(customer_id);
        }
        if let Some(freelancer_id) = &filter.freelancer_id {
            qb.push(" AND freelancer = ").push_bind(freelancer_id);
        }

        // seq is a serial column, so listing follows creation order.
        qb.push(" ORDER BY seq ASC");

        let rows = qb
            .build_query_as::<JobRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Job::try_from).collect()
    }

    async fn update(&self, id: Uuid, patch: JobPatch) -> Result<Option<Job>, StoreError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE jobs SET updated_at = now()");

        if let Some(title) = patch.title {
            qb.push(", title = ").push_bind(title);
        }
        if let Some(description) = patch.description {
            qb.push(", description = ").push_bind(description);
        }
        if let Some(deadline) = patch.deadline {
            qb.push(", deadline = ").push_bind(deadline);
        }
        if let Some(skills) = patch.skills {
            qb.push(", skills = ").push_bind(skills);
        }
        if let Some(freelancer) = patch.freelancer {
            qb.push(", freelancer = ").push_bind(freelancer);
        }
        if let Some(requests) = patch.request_freelancer {
            qb.push(", request_freelancer = ").push_bind(requests);
        }
        if let Some(status) = patch.status {
            qb.push(", status = ").push_bind(status.as_str());
        }
        if let Some(feedback) = patch.feedback {
            match feedback {
                Some(f) => {
                    qb.push(", feedback_rate = ").push_bind(f.rate);
                    qb.push(", feedback_text = ").push_bind(f.text);
                }
                None => {
                    qb.push(", feedback_rate = NULL, feedback_text = NULL");
                }
            }
        }

        qb.push(" WHERE id = ").push_bind(id);
        qb.push(format!(" RETURNING {JOB_COLUMNS}"));

        let row = qb
            .build_query_as::<JobRow>()
            .fetch_optional(&self.pool)
            .await?;

        row.map(Job::try_from).transpose()
    }

    async fn transition(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
    ) -> Result<Option<Job>, StoreError> {
        debug!(
            "Transitioning job {} from {} to {}",
            id,
            from.as_str(),
            to.as_str()
        );

        // Conditional update keyed on the pre-transition status: concurrent
        // callers cannot both apply the same step.
        let sql = format!(
            "UPDATE jobs SET status = $1, updated_at = now() \
             WHERE id = $2 AND status = $3 \
             RETURNING {JOB_COLUMNS}"
        );
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(to.as_str())
            .bind(id)
            .bind(from.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Job::try_from).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
