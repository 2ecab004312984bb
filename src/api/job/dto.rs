use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::job::models::{Job, JobStatus};

/// Request body for creating a job
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobDto {
    #[validate(length(
        min = 3,
        max = 120,
        message = "Title must be between 3 and 120 characters"
    ))]
    pub title: String,

    #[validate(length(max = 4000, message = "Description must be at most 4000 characters"))]
    pub description: String,

    pub deadline: NaiveDate,

    #[validate(length(min = 1, message = "Customer id must not be empty"))]
    pub customer_id: String,

    #[serde(default)]
    pub skills: Vec<String>,
}

/// Request body for updating descriptive fields; all optional.
/// When `skills` is present the full set is re-validated and replaced.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateJobDto {
    #[validate(length(
        min = 3,
        max = 120,
        message = "Title must be between 3 and 120 characters"
    ))]
    pub title: Option<String>,

    #[validate(length(max = 4000, message = "Description must be at most 4000 characters"))]
    pub description: Option<String>,

    pub deadline: Option<NaiveDate>,

    pub skills: Option<Vec<String>>,
}

/// Request body for the single-skill add endpoint
#[derive(Debug, Deserialize, Validate)]
pub struct AddSkillDto {
    #[validate(length(min = 1, message = "Skill id must not be empty"))]
    pub skill_id: String,
}

/// Request body for the privileged status override
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusDto {
    pub status: JobStatus,
}

/// Request body for attaching feedback to a completed job
#[derive(Debug, Deserialize, Validate)]
pub struct FeedbackDto {
    #[validate(range(min = 1, max = 5, message = "Rate must be between 1 and 5"))]
    pub rate: i16,

    #[validate(length(max = 2000, message = "Feedback text must be at most 2000 characters"))]
    #[serde(default)]
    pub text: String,
}

/// Query parameters for the job listing endpoint
#[derive(Debug, Deserialize, Default)]
pub struct ListJobsQuery {
    pub status: Option<JobStatus>,
    pub customer: Option<String>,
    pub freelancer: Option<String>,
}

/// Response wrapping a single mutated job
#[derive(Serialize)]
pub struct JobResponse {
    pub message: String,
    pub job: Job,
}

/// Response for job deletion
#[derive(Serialize)]
pub struct DeleteJobResponse {
    pub message: String,
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_dto_rejects_short_title() {
        let dto = CreateJobDto {
            title: "ab".to_string(),
            description: String::new(),
            deadline: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            customer_id: "c1".to_string(),
            skills: vec![],
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn feedback_dto_bounds_rate() {
        let ok = FeedbackDto {
            rate: 5,
            text: "great".to_string(),
        };
        assert!(ok.validate().is_ok());

        let too_high = FeedbackDto {
            rate: 6,
            text: String::new(),
        };
        assert!(too_high.validate().is_err());

        let too_low = FeedbackDto {
            rate: 0,
            text: String::new(),
        };
        assert!(too_low.validate().is_err());
    }
}
