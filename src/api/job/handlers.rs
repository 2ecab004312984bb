use actix_web::{
    delete, get, patch, post,
    web::{Data, Path, Query, ServiceConfig, scope},
    HttpResponse, Responder,
};
use actix_web_validator::Json;
use uuid::Uuid;

use crate::store::JobFilter;
use super::dto::{
    AddSkillDto, CreateJobDto, DeleteJobResponse, FeedbackDto, JobResponse, ListJobsQuery,
    UpdateJobDto, UpdateStatusDto,
};
use super::service::{JobService, JobServiceError};

#[post("")]
async fn create_job(
    service: Data<JobService>,
    body: Json<CreateJobDto>,
) -> Result<impl Responder, JobServiceError> {
    let job = service.create_job(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(JobResponse {
        message: "Job created successfully".to_string(),
        job,
    }))
}

#[get("")]
async fn list_jobs(
    service: Data<JobService>,
    query: Query<ListJobsQuery>,
) -> Result<impl Responder, JobServiceError> {
    let query = query.into_inner();
    let filter = JobFilter {
        status: query.status,
        customer_id: query.customer,
        freelancer_id: query.freelancer,
    };
    let jobs = service.list_jobs(filter).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[get("/{id}")]
async fn get_job(
    service: Data<JobService>,
    path: Path<Uuid>,
) -> Result<impl Responder, JobServiceError> {
    let job = service.get_job(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[patch("/{id}")]
async fn update_job(
    service: Data<JobService>,
    path: Path<Uuid>,
    body: Json<UpdateJobDto>,
) -> Result<impl Responder, JobServiceError> {
    let job = service.update_job(path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JobResponse {
        message: "Job updated successfully".to_string(),
        job,
    }))
}

#[post("/{id}/skills")]
async fn add_skill(
    service: Data<JobService>,
    path: Path<Uuid>,
    body: Json<AddSkillDto>,
) -> Result<impl Responder, JobServiceError> {
    let job = service.add_skill(path.into_inner(), &body.skill_id).await?;
    Ok(HttpResponse::Ok().json(JobResponse {
        message: "Skill added successfully".to_string(),
        job,
    }))
}

#[delete("/{id}/skills/{skill_id}")]
async fn remove_skill(
    service: Data<JobService>,
    path: Path<(Uuid, String)>,
) -> Result<impl Responder, JobServiceError> {
    let (id, skill_id) = path.into_inner();
    let job = service.remove_skill(id, &skill_id).await?;
    Ok(HttpResponse::Ok().json(JobResponse {
        message: "Skill removed successfully".to_string(),
        job,
    }))
}

#[post("/{id}/start")]
async fn start_job(
    service: Data<JobService>,
    path: Path<Uuid>,
) -> Result<impl Responder, JobServiceError> {
    let job = service.start_job(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[post("/{id}/finish")]
async fn finish_job(
    service: Data<JobService>,
    path: Path<Uuid>,
) -> Result<impl Responder, JobServiceError> {
    let job = service.finish_job(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[patch("/{id}/status")]
async fn set_status(
    service: Data<JobService>,
    path: Path<Uuid>,
    body: Json<UpdateStatusDto>,
) -> Result<impl Responder, JobServiceError> {
    let job = service.set_status(path.into_inner(), body.status).await?;
    Ok(HttpResponse::Ok().json(JobResponse {
        message: "Job status updated successfully".to_string(),
        job,
    }))
}

#[post("/{id}/requests/{freelancer_id}")]
async fn request_freelancer(
    service: Data<JobService>,
    path: Path<(Uuid, String)>,
) -> Result<impl Responder, JobServiceError> {
    let (id, freelancer_id) = path.into_inner();
    let job = service.request_freelancer(id, &freelancer_id).await?;
    Ok(HttpResponse::Ok().json(JobResponse {
        message: "Freelancer request recorded".to_string(),
        job,
    }))
}

#[delete("/{id}/requests/{freelancer_id}")]
async fn delete_freelancer_request(
    service: Data<JobService>,
    path: Path<(Uuid, String)>,
) -> Result<impl Responder, JobServiceError> {
    let (id, freelancer_id) = path.into_inner();
    let job = service.delete_freelancer_request(id, &freelancer_id).await?;
    Ok(HttpResponse::Ok().json(JobResponse {
        message: "Freelancer request deleted successfully".to_string(),
        job,
    }))
}

#[patch("/{id}/assign/{freelancer_id}")]
async fn assign_freelancer(
    service: Data<JobService>,
    path: Path<(Uuid, String)>,
) -> Result<impl Responder, JobServiceError> {
    let (id, freelancer_id) = path.into_inner();
    let job = service.assign_freelancer(id, &freelancer_id).await?;
    Ok(HttpResponse::Ok().json(JobResponse {
        message: "Freelancer assigned successfully".to_string(),
        job,
    }))
}

#[patch("/{id}/feedback")]
async fn add_feedback(
    service: Data<JobService>,
    path: Path<Uuid>,
    body: Json<FeedbackDto>,
) -> Result<impl Responder, JobServiceError> {
    let body = body.into_inner();
    let job = service
        .add_feedback(path.into_inner(), body.rate, body.text)
        .await?;
    Ok(HttpResponse::Created().json(job))
}

#[delete("/{id}")]
async fn delete_job(
    service: Data<JobService>,
    path: Path<Uuid>,
) -> Result<impl Responder, JobServiceError> {
    let deleted = service.delete_job(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DeleteJobResponse {
        message: if deleted {
            "Job deleted successfully".to_string()
        } else {
            "Job was already absent".to_string()
        },
        deleted,
    }))
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("/jobs")
            .service(create_job)
            .service(list_jobs)
            .service(get_job)
            .service(update_job)
            .service(add_skill)
            .service(remove_skill)
            .service(start_job)
            .service(finish_job)
            .service(set_status)
            .service(request_freelancer)
            .service(delete_freelancer_request)
            .service(assign_freelancer)
            .service(add_feedback)
            .service(delete_job),
    );
}
