use actix_web::{Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::dto::recruitment::{CandidateListParams, JobOpeningListParams};
use crate::forms::recruitment::{CandidateForm, CandidateStageForm, JobOpeningForm};
use crate::repository::DieselRepository;
use crate::routes::{created, no_content, ok};
use crate::services::recruitment as recruitment_service;

#[get("/jobs")]
pub async fn list_job_openings(
    params: web::Query<JobOpeningListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        recruitment_service::list_job_openings(&params, &user, repo.get_ref()),
        "list job openings",
    )
}

#[get("/jobs/{id}")]
pub async fn get_job_opening(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        recruitment_service::get_job_opening(id.into_inner(), &user, repo.get_ref()),
        "load job opening",
    )
}

#[post("/jobs")]
pub async fn create_job_opening(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<JobOpeningForm>,
) -> impl Responder {
    created(
        recruitment_service::create_job_opening(form, &user, repo.get_ref()),
        "create job opening",
    )
}

#[put("/jobs/{id}")]
pub async fn update_job_opening(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<JobOpeningForm>,
) -> impl Responder {
    ok(
        recruitment_service::update_job_opening(id.into_inner(), form, &user, repo.get_ref()),
        "update job opening",
    )
}

#[delete("/jobs/{id}")]
pub async fn delete_job_opening(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    no_content(
        recruitment_service::delete_job_opening(id.into_inner(), &user, repo.get_ref()),
        "delete job opening",
    )
}

#[get("/candidates")]
pub async fn list_candidates(
    params: web::Query<CandidateListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        recruitment_service::list_candidates(&params, &user, repo.get_ref()),
        "list candidates",
    )
}

#[get("/candidates/{id}")]
pub async fn get_candidate(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        recruitment_service::get_candidate(id.into_inner(), &user, repo.get_ref()),
        "load candidate",
    )
}

#[post("/candidates")]
pub async fn create_candidate(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CandidateForm>,
) -> impl Responder {
    created(
        recruitment_service::create_candidate(form, &user, repo.get_ref()),
        "create candidate",
    )
}

#[put("/candidates/{id}")]
pub async fn update_candidate(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CandidateForm>,
) -> impl Responder {
    ok(
        recruitment_service::update_candidate(id.into_inner(), form, &user, repo.get_ref()),
        "update candidate",
    )
}

#[delete("/candidates/{id}")]
pub async fn delete_candidate(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    no_content(
        recruitment_service::delete_candidate(id.into_inner(), &user, repo.get_ref()),
        "delete candidate",
    )
}

#[put("/candidates/{id}/stage")]
pub async fn move_candidate(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CandidateStageForm>,
) -> impl Responder {
    ok(
        recruitment_service::move_candidate(id.into_inner(), form, &user, repo.get_ref()),
        "move candidate",
    )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_job_openings)
        .service(create_job_opening)
        .service(get_job_opening)
        .service(update_job_opening)
        .service(delete_job_opening)
        .service(list_candidates)
        .service(create_candidate)
        .service(get_candidate)
        .service(update_candidate)
        .service(delete_candidate)
        .service(move_candidate);
}
