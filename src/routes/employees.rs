use actix_web::{Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::dto::employees::EmployeeListParams;
use crate::forms::employees::{AddEmployeeForm, UpdateEmployeeForm};
use crate::repository::DieselRepository;
use crate::routes::{created, ok};
use crate::services::employees as employees_service;

#[get("/me")]
pub async fn me(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> impl Responder {
    ok(employees_service::me(&user, repo.get_ref()), "load current employee")
}

#[get("/employees")]
pub async fn list_employees(
    params: web::Query<EmployeeListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        employees_service::list_employees(&params, &user, repo.get_ref()),
        "list employees",
    )
}

#[get("/employees/{id}")]
pub async fn get_employee(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        employees_service::get_employee(id.into_inner(), &user, repo.get_ref()),
        "load employee",
    )
}

#[post("/employees")]
pub async fn create_employee(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddEmployeeForm>,
) -> impl Responder {
    created(
        employees_service::create_employee(form, &user, repo.get_ref()),
        "create employee",
    )
}

#[put("/employees/{id}")]
pub async fn update_employee(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateEmployeeForm>,
) -> impl Responder {
    ok(
        employees_service::update_employee(id.into_inner(), form, &user, repo.get_ref()),
        "update employee",
    )
}

/// Soft delete; the row is kept and flagged inactive.
#[delete("/employees/{id}")]
pub async fn deactivate_employee(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        employees_service::deactivate_employee(id.into_inner(), &user, repo.get_ref()),
        "deactivate employee",
    )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(me)
        .service(list_employees)
        .service(get_employee)
        .service(create_employee)
        .service(update_employee)
        .service(deactivate_employee);
}
