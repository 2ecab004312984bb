use std::sync::Arc;

use actix_web::{HttpResponse, ResponseError};
use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::validation::ErrorResponse;
use crate::store::{JobFilter, JobPatch, JobStore, PartyDirectory, SkillCatalog, StoreError};
use super::dto::{CreateJobDto, UpdateJobDto};
use super::models::{Feedback, Job, JobStatus};

/// Lifecycle engine errors, mapped onto HTTP responses by `ResponseError`
#[derive(Debug, Error)]
pub enum JobServiceError {
    #[error("Job {0} not found")]
    JobNotFound(Uuid),

    #[error("Customer {0} not found")]
    CustomerNotFound(String),

    #[error("Freelancer {0} not found")]
    FreelancerNotFound(String),

    #[error("Some skills not found")]
    SkillsNotFound,

    #[error("Skill {0} not found")]
    SkillNotFound(String),

    #[error("Skill {0} is not on this job")]
    SkillNotOnJob(String),

    #[error("Freelancer Request not found: {0}")]
    RequestNotFound(String),

    #[error("Job {0} is not completed yet")]
    NotCompleted(Uuid),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ResponseError for JobServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            JobServiceError::Store(e) => {
                tracing::error!("Store error: {}", e);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Storage error occurred"}),
                })
            }
            JobServiceError::NotCompleted(_) => {
                warn!("{}", self);
                HttpResponse::Conflict().json(ErrorResponse {
                    error: "Invalid state".to_string(),
                    fields: serde_json::json!({"message": self.to_string()}),
                })
            }
            _ => {
                warn!("{}", self);
                HttpResponse::NotFound().json(ErrorResponse {
                    error: "Not found".to_string(),
                    fields: serde_json::json!({"message": self.to_string()}),
                })
            }
        }
    }
}

/// Job lifecycle engine
///
/// Validates creation, enforces the status state machine, manages the
/// freelancer-request/assignment workflow, and attaches feedback. Every
/// mutation is one read, in-memory validation, then one atomic store write;
/// `start_job`/`finish_job` use the store's compare-and-swap transition so
/// concurrent callers cannot double-apply a step.
pub struct JobService {
    jobs: Arc<dyn JobStore>,
    parties: Arc<dyn PartyDirectory>,
    skills: Arc<dyn SkillCatalog>,
}

impl JobService {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        parties: Arc<dyn PartyDirectory>,
        skills: Arc<dyn SkillCatalog>,
    ) -> Self {
        Self {
            jobs,
            parties,
            skills,
        }
    }

    async fn load(&self, id: Uuid) -> Result<Job, JobServiceError> {
        self.jobs
            .get(id)
            .await?
            .ok_or(JobServiceError::JobNotFound(id))
    }

    /// Resolve a skill set against the catalog. The catalog returns each
    /// matching record once, so comparing the resolved count against the
    /// requested count fails a duplicate id the same way as an unknown one.
    /// Returns the ids in request order.
    async fn resolve_skill_set(&self, ids: &[String]) -> Result<Vec<String>, JobServiceError> {
        let found = self.skills.resolve_skills(ids).await?;
        if found.len() != ids.len() {
            return Err(JobServiceError::SkillsNotFound);
        }
        Ok(ids.to_vec())
    }

    async fn resolve_freelancer(&self, id: &str) -> Result<(), JobServiceError> {
        self.parties
            .resolve_freelancer(id)
            .await?
            .ok_or_else(|| JobServiceError::FreelancerNotFound(id.to_string()))?;
        Ok(())
    }

    pub async fn create_job(&self, dto: CreateJobDto) -> Result<Job, JobServiceError> {
        self.parties
            .resolve_customer(&dto.customer_id)
            .await?
            .ok_or_else(|| JobServiceError::CustomerNotFound(dto.customer_id.clone()))?;

        // All validation completes before anything is persisted.
        let skills = self.resolve_skill_set(&dto.skills).await?;

        let now = Utc::now().naive_utc();
        let job = Job {
            id: Uuid::new_v4(),
            title: dto.title,
            description: dto.description,
            deadline: dto.deadline,
            customer_id: dto.customer_id,
            skills,
            freelancer: None,
            request_freelancer: Vec::new(),
            status: JobStatus::Start,
            feedback: None,
            created_at: now,
            updated_at: now,
        };

        let job = self.jobs.insert(job).await?;
        info!("Created job {} for customer {}", job.id, job.customer_id);
        Ok(job)
    }

    pub async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>, JobServiceError> {
        Ok(self.jobs.list(&filter).await?)
    }

    pub async fn get_job(&self, id: Uuid) -> Result<Job, JobServiceError> {
        self.load(id).await
    }

    pub async fn update_job(&self, id: Uuid, dto: UpdateJobDto) -> Result<Job, JobServiceError> {
        self.load(id).await?;

        // Skill resolution happens before the write so a failure cannot
        // leave a half-updated skill set behind.
        let skills = match dto.skills {
            Some(ids) => Some(self.resolve_skill_set(&ids).await?),
            None => None,
        };

        let patch = JobPatch {
            title: dto.title,
            description: dto.description,
            deadline: dto.deadline,
            skills,
            ..JobPatch::default()
        };

        self.jobs
            .update(id, patch)
            .await?
            .ok_or(JobServiceError::JobNotFound(id))
    }

    /// Add a single skill to a job; idempotent when the skill is already on it
    pub async fn add_skill(&self, id: Uuid, skill_id: &str) -> Result<Job, JobServiceError> {
        let job = self.load(id).await?;

        let found = self.skills.resolve_skills(&[skill_id.to_string()]).await?;
        if found.is_empty() {
            return Err(JobServiceError::SkillNotFound(skill_id.to_string()));
        }

        if job.skills.iter().any(|s| s == skill_id) {
            return Ok(job);
        }

        let mut skills = job.skills;
        skills.push(skill_id.to_string());
        self.jobs
            .update(
                id,
                JobPatch {
                    skills: Some(skills),
                    ..JobPatch::default()
                },
            )
            .await?
            .ok_or(JobServiceError::JobNotFound(id))
    }

    pub async fn remove_skill(&self, id: Uuid, skill_id: &str) -> Result<Job, JobServiceError> {
        let job = self.load(id).await?;

        if !job.skills.iter().any(|s| s == skill_id) {
            return Err(JobServiceError::SkillNotOnJob(skill_id.to_string()));
        }

        let skills: Vec<String> = job.skills.into_iter().filter(|s| s != skill_id).collect();
        self.jobs
            .update(
                id,
                JobPatch {
                    skills: Some(skills),
                    ..JobPatch::default()
                },
            )
            .await?
            .ok_or(JobServiceError::JobNotFound(id))
    }

    /// Forward transition `start` -> `process`; a job in any other status is
    /// returned unchanged rather than treated as an error
    pub async fn start_job(&self, id: Uuid) -> Result<Job, JobServiceError> {
        self.step(id, JobStatus::Start, JobStatus::Process).await
    }

    /// Forward transition `process` -> `end`; never skips ahead from `start`
    pub async fn finish_job(&self, id: Uuid) -> Result<Job, JobServiceError> {
        self.step(id, JobStatus::Process, JobStatus::End).await
    }

    async fn step(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
    ) -> Result<Job, JobServiceError> {
        let job = self.load(id).await?;
        if job.status != from {
            return Ok(job);
        }

        match self.jobs.transition(id, from, to).await? {
            Some(job) => {
                info!("Job {} moved {} -> {}", id, from.as_str(), to.as_str());
                Ok(job)
            }
            // CAS miss: another caller won the race, return the current row.
            None => self.load(id).await,
        }
    }

    /// Privileged unconditional status override; does not enforce the
    /// forward-only rule
    pub async fn set_status(&self, id: Uuid, status: JobStatus) -> Result<Job, JobServiceError> {
        self.load(id).await?;
        let job = self
            .jobs
            .update(
                id,
                JobPatch {
                    status: Some(status),
                    ..JobPatch::default()
                },
            )
            .await?
            .ok_or(JobServiceError::JobNotFound(id))?;
        info!("Job {} status overridden to {}", id, status.as_str());
        Ok(job)
    }

    /// Record a freelancer's application; a repeat request is a no-op
    pub async fn request_freelancer(
        &self,
        id: Uuid,
        freelancer_id: &str,
    ) -> Result<Job, JobServiceError> {
        let job = self.load(id).await?;
        self.resolve_freelancer(freelancer_id).await?;

        if job.request_freelancer.iter().any(|f| f == freelancer_id) {
            return Ok(job);
        }

        let mut requests = job.request_freelancer;
        requests.push(freelancer_id.to_string());
        self.jobs
            .update(
                id,
                JobPatch {
                    request_freelancer: Some(requests),
                    ..JobPatch::default()
                },
            )
            .await?
            .ok_or(JobServiceError::JobNotFound(id))
    }

    /// Direct assignment: no request-membership check, no status gate, and
    /// pending requests are left untouched
    pub async fn assign_freelancer(
        &self,
        id: Uuid,
        freelancer_id: &str,
    ) -> Result<Job, JobServiceError> {
        self.load(id).await?;
        self.resolve_freelancer(freelancer_id).await?;

        let job = self
            .jobs
            .update(
                id,
                JobPatch {
                    freelancer: Some(Some(freelancer_id.to_string())),
                    ..JobPatch::default()
                },
            )
            .await?
            .ok_or(JobServiceError::JobNotFound(id))?;
        info!("Assigned freelancer {} to job {}", freelancer_id, id);
        Ok(job)
    }

    pub async fn delete_freelancer_request(
        &self,
        id: Uuid,
        freelancer_id: &str,
    ) -> Result<Job, JobServiceError> {
        let job = self.load(id).await?;

        let position = job
            .request_freelancer
            .iter()
            .position(|f| f == freelancer_id)
            .ok_or_else(|| JobServiceError::RequestNotFound(freelancer_id.to_string()))?;

        let mut requests = job.request_freelancer;
        requests.remove(position);
        self.jobs
            .update(
                id,
                JobPatch {
                    request_freelancer: Some(requests),
                    ..JobPatch::default()
                },
            )
            .await?
            .ok_or(JobServiceError::JobNotFound(id))
    }

    /// Attach feedback to a completed job; overwrites any prior feedback
    pub async fn add_feedback(
        &self,
        id: Uuid,
        rate: i16,
        text: String,
    ) -> Result<Job, JobServiceError> {
        let job = self.load(id).await?;

        if job.status != JobStatus::End {
            return Err(JobServiceError::NotCompleted(id));
        }

        self.jobs
            .update(
                id,
                JobPatch {
                    feedback: Some(Some(Feedback { rate, text })),
                    ..JobPatch::default()
                },
            )
            .await?
            .ok_or(JobServiceError::JobNotFound(id))
    }

    /// Idempotent deletion: false when the job was already absent
    pub async fn delete_job(&self, id: Uuid) -> Result<bool, JobServiceError> {
        let deleted = self.jobs.delete(id).await?;
        if deleted {
            info!("Deleted job {}", id);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{InMemoryJobStore, InMemoryPartyDirectory, InMemorySkillCatalog};
    use chrono::NaiveDate;

    fn service() -> JobService {
        let parties = InMemoryPartyDirectory::new()
            .with_customer("c1", "Acme")
            .with_customer("c2", "Globex")
            .with_freelancer("f1", "Ada")
            .with_freelancer("f2", "Grace");
        let catalog = InMemorySkillCatalog::new()
            .with_skill("s1", "Rust")
            .with_skill("s2", "Postgres")
            .with_skill("s3", "Design");
        JobService::new(
            Arc::new(InMemoryJobStore::new()),
            Arc::new(parties),
            Arc::new(catalog),
        )
    }

    fn create_dto(customer: &str, skills: &[&str]) -> CreateJobDto {
        CreateJobDto {
            title: "Build landing page".to_string(),
            description: "Static marketing site".to_string(),
            deadline: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            customer_id: customer.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn create_rejects_unknown_customer() {
        let svc = service();
        let err = svc.create_job(create_dto("nobody", &["s1"])).await.unwrap_err();
        assert!(matches!(err, JobServiceError::CustomerNotFound(_)));
    }

    #[tokio::test]
    async fn create_rejects_unknown_skill_and_persists_nothing() {
        let svc = service();
        let err = svc
            .create_job(create_dto("c1", &["s1", "missing"]))
            .await
            .unwrap_err();
        assert!(matches!(err, JobServiceError::SkillsNotFound));

        let jobs = svc.list_jobs(JobFilter::default()).await.unwrap();
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn create_stores_skills_and_starts_at_start() {
        let svc = service();
        let job = svc
            .create_job(create_dto("c1", &["s1", "s2"]))
            .await
            .unwrap();
        assert_eq!(job.skills, vec!["s1".to_string(), "s2".to_string()]);
        assert_eq!(job.status, JobStatus::Start);
        assert!(job.freelancer.is_none());
        assert!(job.request_freelancer.is_empty());
        assert!(job.feedback.is_none());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_skill_ids() {
        let svc = service();

        // A repeated id resolves to one catalog record, so the count check
        // fails it just like an unknown id.
        let err = svc
            .create_job(create_dto("c1", &["s1", "s1"]))
            .await
            .unwrap_err();
        assert!(matches!(err, JobServiceError::SkillsNotFound));

        let jobs = svc.list_jobs(JobFilter::default()).await.unwrap();
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn update_rejects_duplicate_skill_ids() {
        let svc = service();
        let job = svc.create_job(create_dto("c1", &["s1"])).await.unwrap();

        let dto = UpdateJobDto {
            title: None,
            description: None,
            deadline: None,
            skills: Some(vec!["s2".to_string(), "s2".to_string()]),
        };
        let err = svc.update_job(job.id, dto).await.unwrap_err();
        assert!(matches!(err, JobServiceError::SkillsNotFound));

        let current = svc.get_job(job.id).await.unwrap();
        assert_eq!(current.skills, vec!["s1".to_string()]);
    }

    #[tokio::test]
    async fn start_job_is_idempotent() {
        let svc = service();
        let job = svc.create_job(create_dto("c1", &["s1"])).await.unwrap();

        let first = svc.start_job(job.id).await.unwrap();
        assert_eq!(first.status, JobStatus::Process);

        let second = svc.start_job(job.id).await.unwrap();
        assert_eq!(second.status, JobStatus::Process);
    }

    #[tokio::test]
    async fn finish_job_does_not_skip_ahead() {
        let svc = service();
        let job = svc.create_job(create_dto("c1", &["s1"])).await.unwrap();

        let unchanged = svc.finish_job(job.id).await.unwrap();
        assert_eq!(unchanged.status, JobStatus::Start);
    }

    #[tokio::test]
    async fn set_status_overrides_unconditionally() {
        let svc = service();
        let job = svc.create_job(create_dto("c1", &[])).await.unwrap();

        let ended = svc.set_status(job.id, JobStatus::End).await.unwrap();
        assert_eq!(ended.status, JobStatus::End);

        // The override may also move backwards.
        let reset = svc.set_status(job.id, JobStatus::Start).await.unwrap();
        assert_eq!(reset.status, JobStatus::Start);
    }

    #[tokio::test]
    async fn feedback_is_gated_on_completion_and_overwrites() {
        let svc = service();
        let job = svc.create_job(create_dto("c1", &["s1"])).await.unwrap();

        let err = svc
            .add_feedback(job.id, 5, "great".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, JobServiceError::NotCompleted(_)));

        svc.start_job(job.id).await.unwrap();
        svc.finish_job(job.id).await.unwrap();

        let with_feedback = svc
            .add_feedback(job.id, 5, "great".to_string())
            .await
            .unwrap();
        assert_eq!(
            with_feedback.feedback,
            Some(Feedback {
                rate: 5,
                text: "great".to_string()
            })
        );

        let overwritten = svc
            .add_feedback(job.id, 1, String::new())
            .await
            .unwrap();
        assert_eq!(overwritten.feedback.unwrap().rate, 1);
    }

    #[tokio::test]
    async fn request_freelancer_is_idempotent_and_checks_directory() {
        let svc = service();
        let job = svc.create_job(create_dto("c1", &[])).await.unwrap();

        let err = svc.request_freelancer(job.id, "ghost").await.unwrap_err();
        assert!(matches!(err, JobServiceError::FreelancerNotFound(_)));

        svc.request_freelancer(job.id, "f1").await.unwrap();
        let job = svc.request_freelancer(job.id, "f1").await.unwrap();
        assert_eq!(job.request_freelancer, vec!["f1".to_string()]);
    }

    #[tokio::test]
    async fn delete_request_removes_exact_match_preserving_order() {
        let svc = service();
        let job = svc.create_job(create_dto("c1", &[])).await.unwrap();

        let err = svc
            .delete_freelancer_request(job.id, "f1")
            .await
            .unwrap_err();
        assert!(matches!(err, JobServiceError::RequestNotFound(_)));

        svc.request_freelancer(job.id, "f1").await.unwrap();
        svc.request_freelancer(job.id, "f2").await.unwrap();

        let job = svc.delete_freelancer_request(job.id, "f1").await.unwrap();
        assert_eq!(job.request_freelancer, vec!["f2".to_string()]);
    }

    #[tokio::test]
    async fn assignment_is_unconditional() {
        let svc = service();
        let job = svc.create_job(create_dto("c1", &[])).await.unwrap();
        assert!(job.request_freelancer.is_empty());

        // No prior request, job never started: assignment still succeeds.
        let assigned = svc.assign_freelancer(job.id, "f1").await.unwrap();
        assert_eq!(assigned.freelancer.as_deref(), Some("f1"));
        assert!(assigned.request_freelancer.is_empty());
    }

    #[tokio::test]
    async fn assignment_checks_directory() {
        let svc = service();
        let job = svc.create_job(create_dto("c1", &[])).await.unwrap();
        let err = svc.assign_freelancer(job.id, "ghost").await.unwrap_err();
        assert!(matches!(err, JobServiceError::FreelancerNotFound(_)));
    }

    #[tokio::test]
    async fn update_job_failure_leaves_skills_untouched() {
        let svc = service();
        let job = svc.create_job(create_dto("c1", &["s1"])).await.unwrap();

        let dto = UpdateJobDto {
            title: Some("Redesign".to_string()),
            description: None,
            deadline: None,
            skills: Some(vec!["s2".to_string(), "missing".to_string()]),
        };
        let err = svc.update_job(job.id, dto).await.unwrap_err();
        assert!(matches!(err, JobServiceError::SkillsNotFound));

        let current = svc.get_job(job.id).await.unwrap();
        assert_eq!(current.skills, vec!["s1".to_string()]);
        assert_eq!(current.title, "Build landing page");
    }

    #[tokio::test]
    async fn update_job_replaces_skill_set_atomically() {
        let svc = service();
        let job = svc.create_job(create_dto("c1", &["s1"])).await.unwrap();

        let dto = UpdateJobDto {
            title: None,
            description: None,
            deadline: None,
            skills: Some(vec!["s2".to_string(), "s3".to_string()]),
        };
        let updated = svc.update_job(job.id, dto).await.unwrap();
        assert_eq!(updated.skills, vec!["s2".to_string(), "s3".to_string()]);
    }

    #[tokio::test]
    async fn add_and_remove_single_skill() {
        let svc = service();
        let job = svc.create_job(create_dto("c1", &["s1"])).await.unwrap();

        let err = svc.add_skill(job.id, "missing").await.unwrap_err();
        assert!(matches!(err, JobServiceError::SkillNotFound(_)));

        let job = svc.add_skill(job.id, "s2").await.unwrap();
        assert_eq!(job.skills, vec!["s1".to_string(), "s2".to_string()]);

        // Re-adding an existing skill is a no-op.
        let job = svc.add_skill(job.id, "s2").await.unwrap();
        assert_eq!(job.skills, vec!["s1".to_string(), "s2".to_string()]);

        let err = svc.remove_skill(job.id, "s3").await.unwrap_err();
        assert!(matches!(err, JobServiceError::SkillNotOnJob(_)));

        let job = svc.remove_skill(job.id, "s1").await.unwrap();
        assert_eq!(job.skills, vec!["s2".to_string()]);
    }

    #[tokio::test]
    async fn delete_job_returns_false_when_absent() {
        let svc = service();
        let job = svc.create_job(create_dto("c1", &[])).await.unwrap();

        assert!(svc.delete_job(job.id).await.unwrap());
        assert!(!svc.delete_job(job.id).await.unwrap());
        assert!(!svc.delete_job(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn list_jobs_filters_by_owner() {
        let svc = service();
        let a = svc.create_job(create_dto("c1", &[])).await.unwrap();
        let b = svc.create_job(create_dto("c2", &[])).await.unwrap();
        svc.assign_freelancer(b.id, "f1").await.unwrap();

        let mine = svc
            .list_jobs(JobFilter {
                customer_id: Some("c1".to_string()),
                ..JobFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, a.id);

        let assigned = svc
            .list_jobs(JobFilter {
                freelancer_id: Some("f1".to_string()),
                ..JobFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].id, b.id);
    }

    #[tokio::test]
    async fn full_lifecycle_scenario() {
        let svc = service();
        let job = svc
            .create_job(create_dto("c1", &["s1", "s2"]))
            .await
            .unwrap();
        assert_eq!(job.status, JobStatus::Start);

        let job = svc.start_job(job.id).await.unwrap();
        assert_eq!(job.status, JobStatus::Process);

        let job = svc.finish_job(job.id).await.unwrap();
        assert_eq!(job.status, JobStatus::End);

        let job = svc
            .add_feedback(job.id, 5, "great".to_string())
            .await
            .unwrap();
        assert_eq!(job.feedback.as_ref().unwrap().rate, 5);

        let job = svc.add_feedback(job.id, 1, String::new()).await.unwrap();
        assert_eq!(job.feedback.unwrap().rate, 1);
    }

    #[test]
    fn error_messages_carry_the_offending_id() {
        let id = Uuid::new_v4();

        let err = JobServiceError::NotCompleted(id);
        assert_eq!(err.to_string(), format!("Job {} is not completed yet", id));

        let err = JobServiceError::RequestNotFound("f9".to_string());
        assert_eq!(err.to_string(), "Freelancer Request not found: f9");
    }

    #[tokio::test]
    async fn missing_job_fails_not_found() {
        let svc = service();
        let id = Uuid::new_v4();
        assert!(matches!(
            svc.get_job(id).await.unwrap_err(),
            JobServiceError::JobNotFound(_)
        ));
        assert!(matches!(
            svc.start_job(id).await.unwrap_err(),
            JobServiceError::JobNotFound(_)
        ));
        assert!(matches!(
            svc.add_feedback(id, 3, String::new()).await.unwrap_err(),
            JobServiceError::JobNotFound(_)
        ));
    }
}
