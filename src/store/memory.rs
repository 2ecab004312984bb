//! In-memory adapters for the store ports.
//!
//! Reference semantics for the Postgres adapters and the backing for the
//! service tests. Jobs are kept in insertion order so listing matches the
//! creation-order contract.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::api::job::models::{Customer, Freelancer, Job, JobStatus, Skill};
use super::{JobFilter, JobPatch, JobStore, PartyDirectory, SkillCatalog, StoreError};

#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: Mutex<Vec<Job>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(job: &Job, filter: &JobFilter) -> bool {
    if let Some(status) = filter.status {
        if job.status != status {
            return false;
        }
    }
    if let Some(customer_id) = &filter.customer_id {
        if &job.customer_id != customer_id {
            return false;
        }
    }
    if let Some(freelancer_id) = &filter.freelancer_id {
        if job.freelancer.as_deref() != Some(freelancer_id.as_str()) {
            return false;
        }
    }
    true
}

fn apply_patch(job: &mut Job, patch: JobPatch) {
    if let Some(title) = patch.title {
        job.title = title;
    }
    if let Some(description) = patch.description {
        job.description = description;
    }
    if let Some(deadline) = patch.deadline {
        job.deadline = deadline;
    }
    if let Some(skills) = patch.skills {
        job.skills = skills;
    }
    if let Some(freelancer) = patch.freelancer {
        job.freelancer = freelancer;
    }
    if let Some(requests) = patch.request_freelancer {
        job.request_freelancer = requests;
    }
    if let Some(status) = patch.status {
        job.status = status;
    }
    if let Some(feedback) = patch.feedback {
        job.feedback = feedback;
    }
    job.updated_at = Utc::now().naive_utc();
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn insert(&self, job: Job) -> Result<Job, StoreError> {
        let mut jobs = self.jobs.lock().unwrap();
        jobs.push(job.clone());
        Ok(job)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        let jobs = self.jobs.lock().unwrap();
        Ok(jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn list(&self, filter: &JobFilter) -> Result<Vec<Job>, StoreError> {
        let jobs = self.jobs.lock().unwrap();
        Ok(jobs.iter().filter(|j| matches(j, filter)).cloned().collect())
    }

    async fn update(&self, id: Uuid, patch: JobPatch) -> Result<Option<Job>, StoreError> {
        let mut jobs = self.jobs.lock().unwrap();
        match jobs.iter_mut().find(|j| j.id == id) {
            Some(job) => {
                apply_patch(job, patch);
                Ok(Some(job.clone()))
            }
            None => Ok(None),
        }
    }

    async fn transition(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
    ) -> Result<Option<Job>, StoreError> {
        let mut jobs = self.jobs.lock().unwrap();
        match jobs.iter_mut().find(|j| j.id == id && j.status == from) {
            Some(job) => {
                job.status = to;
                job.updated_at = Utc::now().naive_utc();
                Ok(Some(job.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut jobs = self.jobs.lock().unwrap();
        let before = jobs.len();
        jobs.retain(|j| j.id != id);
        Ok(jobs.len() < before)
    }
}

/// Fixed directory of customers and freelancers keyed by id
#[derive(Default)]
pub struct InMemoryPartyDirectory {
    customers: HashMap<String, Customer>,
    freelancers: HashMap<String, Freelancer>,
}

impl InMemoryPartyDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_customer(mut self, id: &str, name: &str) -> Self {
        self.customers.insert(
            id.to_string(),
            Customer {
                id: id.to_string(),
                name: name.to_string(),
            },
        );
        self
    }

    pub fn with_freelancer(mut self, id: &str, name: &str) -> Self {
        self.freelancers.insert(
            id.to_string(),
            Freelancer {
                id: id.to_string(),
                name: name.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl PartyDirectory for InMemoryPartyDirectory {
    async fn resolve_customer(&self, id: &str) -> Result<Option<Customer>, StoreError> {
        Ok(self.customers.get(id).cloned())
    }

    async fn resolve_freelancer(&self, id: &str) -> Result<Option<Freelancer>, StoreError> {
        Ok(self.freelancers.get(id).cloned())
    }
}

/// Fixed skill reference set, insertion-ordered for listing
#[derive(Default)]
pub struct InMemorySkillCatalog {
    skills: Vec<Skill>,
}

impl InMemorySkillCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skill(mut self, id: &str, name: &str) -> Self {
        self.skills.push(Skill {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }
}

#[async_trait]
impl SkillCatalog for InMemorySkillCatalog {
    async fn resolve_skills(&self, ids: &[String]) -> Result<Vec<Skill>, StoreError> {
        Ok(self
            .skills
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn list_skills(&self) -> Result<Vec<Skill>, StoreError> {
        Ok(self.skills.clone())
    }
}
