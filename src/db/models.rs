use chrono::{NaiveDate, NaiveDateTime};
use sqlx::FromRow;
use uuid::Uuid;

use crate::api::job::models::{Customer, Feedback, Freelancer, Job, JobStatus, Skill};
use crate::store::StoreError;

/// Database representation of a job
///
/// Feedback is flattened into nullable columns; both are set together or not
/// at all. Status is stored as its stable text form.
#[derive(Debug, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub deadline: NaiveDate,
    pub customer_id: String,
    pub skills: Vec<String>,
    pub freelancer: Option<String>,
    pub request_freelancer: Vec<String>,
    pub status: String,
    pub feedback_rate: Option<i16>,
    pub feedback_text: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<JobRow> for Job {
    type Error = StoreError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let status = JobStatus::parse(&row.status).ok_or_else(|| StoreError::Corrupt {
            id: row.id,
            reason: format!("unknown status '{}'", row.status),
        })?;

        let feedback = row.feedback_rate.map(|rate| Feedback {
            rate,
            text: row.feedback_text.unwrap_or_default(),
        });

        Ok(Job {
            id: row.id,
            title: row.title,
            description: row.description,
            deadline: row.deadline,
            customer_id: row.customer_id,
            skills: row.skills,
            freelancer: row.freelancer,
            request_freelancer: row.request_freelancer,
            status,
            feedback,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct SkillRow {
    pub id: String,
    pub name: String,
}

impl From<SkillRow> for Skill {
    fn from(row: SkillRow) -> Self {
        Skill {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct CustomerRow {
    pub id: String,
    pub name: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct FreelancerRow {
    pub id: String,
    pub name: String,
}

impl From<FreelancerRow> for Freelancer {
    fn from(row: FreelancerRow) -> Self {
        Freelancer {
            id: row.id,
            name: row.name,
        }
    }
}
