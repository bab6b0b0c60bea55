use actix_web::{Responder, get, post, put, web};
use chrono::Utc;

use crate::auth::AuthenticatedUser;
use crate::domain::attendance::AttendancePolicy;
use crate::dto::attendance::AttendanceListParams;
use crate::forms::attendance::{CheckInForm, MarkAttendanceForm, MonthQuery};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::ok;
use crate::services::attendance as attendance_service;

fn policy(config: &ServerConfig) -> AttendancePolicy {
    AttendancePolicy::from(&config.attendance)
}

#[post("/attendance/check-in")]
pub async fn check_in(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    form: Option<web::Json<CheckInForm>>,
) -> impl Responder {
    let form = form.map(web::Json::into_inner).unwrap_or_default();
    let now = Utc::now().naive_utc();
    ok(
        attendance_service::check_in(form, &policy(&config), now, &user, repo.get_ref()),
        "check in",
    )
}

#[post("/attendance/check-out")]
pub async fn check_out(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let now = Utc::now().naive_utc();
    ok(
        attendance_service::check_out(&policy(&config), now, &user, repo.get_ref()),
        "check out",
    )
}

#[put("/attendance")]
pub async fn mark_attendance(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<MarkAttendanceForm>,
) -> impl Responder {
    ok(
        attendance_service::mark_attendance(form, &user, repo.get_ref()),
        "mark attendance",
    )
}

#[get("/attendance")]
pub async fn list_attendance(
    params: web::Query<AttendanceListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        attendance_service::list_attendance(&params, &user, repo.get_ref()),
        "list attendance",
    )
}

#[get("/attendance/summary")]
pub async fn monthly_summary(
    params: web::Query<MonthQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        attendance_service::monthly_summary(&params, &user, repo.get_ref()),
        "summarize attendance",
    )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(check_in)
        .service(check_out)
        .service(mark_attendance)
        .service(list_attendance)
        .service(monthly_summary);
}
