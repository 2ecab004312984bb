use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Job status enum representing the lifecycle state of a job
///
/// Transitions move forward only (`start` -> `process` -> `end`) through
/// `start_job`/`finish_job`; the privileged status override may set any value.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Start,
    Process,
    End,
}

impl JobStatus {
    /// Stable text form used as the database column value
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Start => "start",
            JobStatus::Process => "process",
            JobStatus::End => "end",
        }
    }

    pub fn parse(s: &str) -> Option<JobStatus> {
        match s {
            "start" => Some(JobStatus::Start),
            "process" => Some(JobStatus::Process),
            "end" => Some(JobStatus::End),
            _ => None,
        }
    }
}

/// Customer rating attached to a completed job; last write wins
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Feedback {
    pub rate: i16,
    pub text: String,
}

/// Job domain model
///
/// `skills` and `request_freelancer` are order-preserving and duplicate-free.
/// `freelancer` is set only by the assignment operation.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub deadline: NaiveDate,
    pub customer_id: String,
    pub skills: Vec<String>,
    pub freelancer: Option<String>,
    pub request_freelancer: Vec<String>,
    pub status: JobStatus,
    pub feedback: Option<Feedback>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Skill Catalog entry; the catalog is read-only to this service
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Skill {
    pub id: String,
    pub name: String,
}

/// Party Directory entry for a job owner
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Customer {
    pub id: String,
    pub name: String,
}

/// Party Directory entry for an applicant/assignee
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Freelancer {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text_form() {
        for status in [JobStatus::Start, JobStatus::Process, JobStatus::End] {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(JobStatus::parse("2"), None);
        assert_eq!(JobStatus::parse("done"), None);
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Process).unwrap(),
            "\"process\""
        );
    }
}
