pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::api::job::models::{Customer, Feedback, Freelancer, Job, JobStatus, Skill};

/// Errors surfaced by the persistence adapters
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record for job {id}: {reason}")]
    Corrupt { id: Uuid, reason: String },
}

/// Filter for job listing; clauses are ANDed, omitted clauses match all.
/// Result order is creation order.
#[derive(Debug, Default, Clone)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub customer_id: Option<String>,
    pub freelancer_id: Option<String>,
}

/// Partial update applied to a job as one atomic single-document write.
/// `None` fields are left untouched; `freelancer` and `feedback` use a
/// double Option so the patch can distinguish "leave" from "clear".
#[derive(Debug, Default, Clone)]
pub struct JobPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub skills: Option<Vec<String>>,
    pub freelancer: Option<Option<String>>,
    pub request_freelancer: Option<Vec<String>>,
    pub status: Option<JobStatus>,
    pub feedback: Option<Option<Feedback>>,
}

/// Persistence port for jobs. Single-document atomicity only; the engine
/// never needs a multi-document transaction.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert(&self, job: Job) -> Result<Job, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Job>, StoreError>;

    async fn list(&self, filter: &JobFilter) -> Result<Vec<Job>, StoreError>;

    /// Apply `patch` to the job, or return `None` if it does not exist.
    async fn update(&self, id: Uuid, patch: JobPatch) -> Result<Option<Job>, StoreError>;

    /// Compare-and-swap status transition: moves `from` -> `to` only when the
    /// stored status still equals `from`, returning the updated job on a hit
    /// and `None` on a miss (absent job or status already moved on).
    async fn transition(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
    ) -> Result<Option<Job>, StoreError>;

    /// Returns false when the job was already absent; deletion is idempotent.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Read-only lookup of Customer and Freelancer identities
#[async_trait]
pub trait PartyDirectory: Send + Sync {
    async fn resolve_customer(&self, id: &str) -> Result<Option<Customer>, StoreError>;

    async fn resolve_freelancer(&self, id: &str) -> Result<Option<Freelancer>, StoreError>;
}

/// Read-only skill reference set
#[async_trait]
pub trait SkillCatalog: Send + Sync {
    /// Returns the catalog records found among `ids`; callers compare the
    /// returned count against the requested count to detect unknown ids.
    async fn resolve_skills(&self, ids: &[String]) -> Result<Vec<Skill>, StoreError>;

    async fn list_skills(&self) -> Result<Vec<Skill>, StoreError>;
}
