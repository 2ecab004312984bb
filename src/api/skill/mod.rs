//! Read-only Skill Catalog endpoint. The catalog is seeded by migration and
//! never mutated through this service.

use std::sync::Arc;

use actix_web::{get, web, HttpResponse, Responder};

use crate::api::job::service::JobServiceError;
use crate::store::SkillCatalog;

#[get("/skills")]
async fn list_skills(
    catalog: web::Data<Arc<dyn SkillCatalog>>,
) -> Result<impl Responder, JobServiceError> {
    let skills = catalog.list_skills().await.map_err(JobServiceError::Store)?;
    Ok(HttpResponse::Ok().json(skills))
}

pub fn skill_config(config: &mut web::ServiceConfig) {
    config.service(list_skills);
}
