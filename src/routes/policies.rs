use actix_web::{Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::dto::policies::PolicyListParams;
use crate::forms::policies::PolicyForm;
use crate::repository::DieselRepository;
use crate::routes::{created, no_content, ok};
use crate::services::policies as policies_service;

#[get("/policies")]
pub async fn list_policies(
    params: web::Query<PolicyListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        policies_service::list_policies(&params, &user, repo.get_ref()),
        "list policies",
    )
}

#[get("/policies/{id}")]
pub async fn get_policy(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        policies_service::get_policy(id.into_inner(), &user, repo.get_ref()),
        "load policy",
    )
}

#[post("/policies")]
pub async fn create_policy(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<PolicyForm>,
) -> impl Responder {
    created(
        policies_service::create_policy(form, &user, repo.get_ref()),
        "create policy",
    )
}

#[put("/policies/{id}")]
pub async fn update_policy(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<PolicyForm>,
) -> impl Responder {
    ok(
        policies_service::update_policy(id.into_inner(), form, &user, repo.get_ref()),
        "update policy",
    )
}

#[delete("/policies/{id}")]
pub async fn delete_policy(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    no_content(
        policies_service::delete_policy(id.into_inner(), &user, repo.get_ref()),
        "delete policy",
    )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_policies)
        .service(get_policy)
        .service(create_policy)
        .service(update_policy)
        .service(delete_policy);
}
