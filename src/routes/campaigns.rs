use actix_web::{Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::dto::campaigns::CampaignListParams;
use crate::forms::campaigns::CampaignForm;
use crate::repository::DieselRepository;
use crate::routes::{created, no_content, ok};
use crate::services::campaigns as campaigns_service;

#[get("/campaigns")]
pub async fn list_campaigns(
    params: web::Query<CampaignListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        campaigns_service::list_campaigns(&params, &user, repo.get_ref()),
        "list campaigns",
    )
}

#[get("/campaigns/{id}")]
pub async fn get_campaign(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        campaigns_service::get_campaign(id.into_inner(), &user, repo.get_ref()),
        "load campaign",
    )
}

#[post("/campaigns")]
pub async fn create_campaign(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CampaignForm>,
) -> impl Responder {
    created(
        campaigns_service::create_campaign(form, &user, repo.get_ref()),
        "create campaign",
    )
}

#[put("/campaigns/{id}")]
pub async fn update_campaign(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CampaignForm>,
) -> impl Responder {
    ok(
        campaigns_service::update_campaign(id.into_inner(), form, &user, repo.get_ref()),
        "update campaign",
    )
}

#[delete("/campaigns/{id}")]
pub async fn delete_campaign(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    no_content(
        campaigns_service::delete_campaign(id.into_inner(), &user, repo.get_ref()),
        "delete campaign",
    )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_campaigns)
        .service(get_campaign)
        .service(create_campaign)
        .service(update_campaign)
        .service(delete_campaign);
}
