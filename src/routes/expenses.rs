use actix_web::{Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::dto::expenses::{ExpenseListParams, ExpenseSummaryParams};
use crate::forms::expenses::{ExpenseForm, ReviewExpenseForm};
use crate::repository::DieselRepository;
use crate::routes::{created, no_content, ok};
use crate::services::expenses as expenses_service;

#[get("/expenses")]
pub async fn list_expenses(
    params: web::Query<ExpenseListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        expenses_service::list_expenses(&params, &user, repo.get_ref()),
        "list expenses",
    )
}

#[get("/expenses/summary")]
pub async fn expense_summary(
    params: web::Query<ExpenseSummaryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        expenses_service::expense_summary(&params, &user, repo.get_ref()),
        "summarize expenses",
    )
}

#[get("/expenses/{id}")]
pub async fn get_expense(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        expenses_service::get_expense(id.into_inner(), &user, repo.get_ref()),
        "load expense",
    )
}

#[post("/expenses")]
pub async fn create_expense(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ExpenseForm>,
) -> impl Responder {
    created(
        expenses_service::create_expense(form, &user, repo.get_ref()),
        "create expense",
    )
}

#[put("/expenses/{id}")]
pub async fn update_expense(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ExpenseForm>,
) -> impl Responder {
    ok(
        expenses_service::update_expense(id.into_inner(), form, &user, repo.get_ref()),
        "update expense",
    )
}

#[delete("/expenses/{id}")]
pub async fn delete_expense(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    no_content(
        expenses_service::delete_expense(id.into_inner(), &user, repo.get_ref()),
        "delete expense",
    )
}

#[put("/expenses/{id}/status")]
pub async fn review_expense(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ReviewExpenseForm>,
) -> impl Responder {
    ok(
        expenses_service::review_expense(id.into_inner(), form, &user, repo.get_ref()),
        "review expense",
    )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_expenses)
        .service(expense_summary)
        .service(create_expense)
        .service(get_expense)
        .service(update_expense)
        .service(delete_expense)
        .service(review_expense);
}
