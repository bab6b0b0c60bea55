use actix_web::{Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::dto::leave::{LeaveBalanceParams, LeaveRequestListParams};
use crate::forms::leave::{LeaveRequestForm, LeaveTypeForm, ReviewLeaveForm};
use crate::repository::DieselRepository;
use crate::routes::{created, no_content, ok};
use crate::services::leave as leave_service;

#[get("/leave/types")]
pub async fn list_leave_types(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        leave_service::list_leave_types(&user, repo.get_ref()),
        "list leave types",
    )
}

#[post("/leave/types")]
pub async fn create_leave_type(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<LeaveTypeForm>,
) -> impl Responder {
    created(
        leave_service::create_leave_type(form, &user, repo.get_ref()),
        "create leave type",
    )
}

#[put("/leave/types/{id}")]
pub async fn update_leave_type(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<LeaveTypeForm>,
) -> impl Responder {
    ok(
        leave_service::update_leave_type(id.into_inner(), form, &user, repo.get_ref()),
        "update leave type",
    )
}

#[delete("/leave/types/{id}")]
pub async fn delete_leave_type(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    no_content(
        leave_service::delete_leave_type(id.into_inner(), &user, repo.get_ref()),
        "delete leave type",
    )
}

#[get("/leave/requests")]
pub async fn list_leave_requests(
    params: web::Query<LeaveRequestListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        leave_service::list_leave_requests(&params, &user, repo.get_ref()),
        "list leave requests",
    )
}

#[post("/leave/requests")]
pub async fn request_leave(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<LeaveRequestForm>,
) -> impl Responder {
    created(
        leave_service::request_leave(form, &user, repo.get_ref()),
        "request leave",
    )
}

#[put("/leave/requests/{id}/review")]
pub async fn review_leave(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ReviewLeaveForm>,
) -> impl Responder {
    ok(
        leave_service::review_leave(id.into_inner(), form, &user, repo.get_ref()),
        "review leave request",
    )
}

#[post("/leave/requests/{id}/cancel")]
pub async fn cancel_leave(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        leave_service::cancel_leave(id.into_inner(), &user, repo.get_ref()),
        "cancel leave request",
    )
}

#[get("/leave/balances")]
pub async fn leave_balances(
    params: web::Query<LeaveBalanceParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        leave_service::leave_balances(&params, &user, repo.get_ref()),
        "load leave balances",
    )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_leave_types)
        .service(create_leave_type)
        .service(update_leave_type)
        .service(delete_leave_type)
        .service(list_leave_requests)
        .service(request_leave)
        .service(review_leave)
        .service(cancel_leave)
        .service(leave_balances);
}
