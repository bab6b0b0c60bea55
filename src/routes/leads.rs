use actix_multipart::form::MultipartForm;
use actix_web::{Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::dto::PageParams;
use crate::dto::leads::LeadListParams;
use crate::forms::lead_assignment::AssignmentSettingsForm;
use crate::forms::leads::{
    AddActivityForm, AddLeadForm, AssignLeadForm, ChangeLeadStatusForm, UpdateLeadForm,
    UploadLeadsForm,
};
use crate::repository::DieselRepository;
use crate::routes::{created, no_content, ok};
use crate::services::{lead_assignment as assignment_service, leads as leads_service};

#[get("/leads")]
pub async fn list_leads(
    params: web::Query<LeadListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(leads_service::list_leads(&params, &user, repo.get_ref()), "list leads")
}

#[post("/leads")]
pub async fn create_lead(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddLeadForm>,
) -> impl Responder {
    created(leads_service::create_lead(form, &user, repo.get_ref()), "create lead")
}

/// CSV upload with a `csv` file part. The whole file is rejected on the first
/// bad row.
#[post("/leads/import")]
pub async fn import_leads(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadLeadsForm>,
) -> impl Responder {
    created(leads_service::import_leads(&form, &user, repo.get_ref()), "import leads")
}

#[get("/leads/{id}")]
pub async fn get_lead(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(leads_service::get_lead(id.into_inner(), &user, repo.get_ref()), "load lead")
}

#[put("/leads/{id}")]
pub async fn update_lead(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateLeadForm>,
) -> impl Responder {
    ok(
        leads_service::update_lead(id.into_inner(), form, &user, repo.get_ref()),
        "update lead",
    )
}

#[delete("/leads/{id}")]
pub async fn delete_lead(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    no_content(
        leads_service::delete_lead(id.into_inner(), &user, repo.get_ref()),
        "delete lead",
    )
}

#[put("/leads/{id}/status")]
pub async fn change_status(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ChangeLeadStatusForm>,
) -> impl Responder {
    ok(
        leads_service::change_status(id.into_inner(), form, &user, repo.get_ref()),
        "change lead status",
    )
}

#[put("/leads/{id}/assignee")]
pub async fn assign_lead(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AssignLeadForm>,
) -> impl Responder {
    ok(
        leads_service::assign_lead(id.into_inner(), form, &user, repo.get_ref()),
        "assign lead",
    )
}

#[get("/leads/{id}/activities")]
pub async fn list_activities(
    id: web::Path<i32>,
    params: web::Query<PageParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        leads_service::list_activities(id.into_inner(), &params, &user, repo.get_ref()),
        "list lead activities",
    )
}

#[post("/leads/{id}/activities")]
pub async fn add_activity(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddActivityForm>,
) -> impl Responder {
    created(
        leads_service::add_activity(id.into_inner(), form, &user, repo.get_ref()),
        "add lead activity",
    )
}

#[get("/lead-assignment")]
pub async fn get_assignment_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        assignment_service::get_settings(&user, repo.get_ref()),
        "load assignment settings",
    )
}

#[put("/lead-assignment")]
pub async fn save_assignment_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AssignmentSettingsForm>,
) -> impl Responder {
    ok(
        assignment_service::save_settings(form, &user, repo.get_ref()),
        "save assignment settings",
    )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_leads)
        .service(create_lead)
        .service(import_leads)
        .service(get_lead)
        .service(update_lead)
        .service(delete_lead)
        .service(change_status)
        .service(assign_lead)
        .service(list_activities)
        .service(add_activity)
        .service(get_assignment_settings)
        .service(save_assignment_settings);
}
