//! Quotations, invoices, payments and the public invoice view.

use actix_web::{Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::dto::billing::{InvoiceListParams, QuotationListParams};
use crate::forms::invoices::{InvoiceForm, PaymentForm};
use crate::forms::quotations::{ConvertQuotationForm, QuotationForm};
use crate::repository::DieselRepository;
use crate::routes::{created, no_content, ok};
use crate::services::{invoices as invoices_service, quotations as quotations_service};

#[get("/quotations")]
pub async fn list_quotations(
    params: web::Query<QuotationListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        quotations_service::list_quotations(&params, &user, repo.get_ref()),
        "list quotations",
    )
}

#[get("/quotations/{id}")]
pub async fn get_quotation(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        quotations_service::get_quotation(id.into_inner(), &user, repo.get_ref()),
        "load quotation",
    )
}

#[post("/quotations")]
pub async fn create_quotation(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<QuotationForm>,
) -> impl Responder {
    created(
        quotations_service::create_quotation(form, &user, repo.get_ref()),
        "create quotation",
    )
}

#[put("/quotations/{id}")]
pub async fn update_quotation(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<QuotationForm>,
) -> impl Responder {
    ok(
        quotations_service::update_quotation(id.into_inner(), form, &user, repo.get_ref()),
        "update quotation",
    )
}

#[delete("/quotations/{id}")]
pub async fn delete_quotation(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    no_content(
        quotations_service::delete_quotation(id.into_inner(), &user, repo.get_ref()),
        "delete quotation",
    )
}

#[post("/quotations/{id}/send")]
pub async fn send_quotation(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        quotations_service::send_quotation(id.into_inner(), &user, repo.get_ref()),
        "send quotation",
    )
}

#[post("/quotations/{id}/accept")]
pub async fn accept_quotation(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        quotations_service::decide_quotation(id.into_inner(), true, &user, repo.get_ref()),
        "accept quotation",
    )
}

#[post("/quotations/{id}/reject")]
pub async fn reject_quotation(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        quotations_service::decide_quotation(id.into_inner(), false, &user, repo.get_ref()),
        "reject quotation",
    )
}

#[post("/quotations/{id}/convert")]
pub async fn convert_quotation(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: Option<web::Json<ConvertQuotationForm>>,
) -> impl Responder {
    let form = form.map(web::Json::into_inner).unwrap_or_default();
    created(
        quotations_service::convert_quotation(id.into_inner(), form, &user, repo.get_ref()),
        "convert quotation",
    )
}

#[get("/invoices")]
pub async fn list_invoices(
    params: web::Query<InvoiceListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        invoices_service::list_invoices(&params, &user, repo.get_ref()),
        "list invoices",
    )
}

#[get("/invoices/summary")]
pub async fn invoice_summary(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        invoices_service::invoice_summary(&user, repo.get_ref()),
        "summarize invoices",
    )
}

#[get("/invoices/{id}")]
pub async fn get_invoice(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        invoices_service::get_invoice(id.into_inner(), &user, repo.get_ref()),
        "load invoice",
    )
}

#[post("/invoices")]
pub async fn create_invoice(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<InvoiceForm>,
) -> impl Responder {
    created(
        invoices_service::create_invoice(form, &user, repo.get_ref()),
        "create invoice",
    )
}

#[put("/invoices/{id}")]
pub async fn update_invoice(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<InvoiceForm>,
) -> impl Responder {
    ok(
        invoices_service::update_invoice(id.into_inner(), form, &user, repo.get_ref()),
        "update invoice",
    )
}

#[delete("/invoices/{id}")]
pub async fn delete_invoice(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    no_content(
        invoices_service::delete_invoice(id.into_inner(), &user, repo.get_ref()),
        "delete invoice",
    )
}

#[post("/invoices/{id}/issue")]
pub async fn issue_invoice(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        invoices_service::issue_invoice(id.into_inner(), &user, repo.get_ref()),
        "issue invoice",
    )
}

#[post("/invoices/{id}/cancel")]
pub async fn cancel_invoice(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        invoices_service::cancel_invoice(id.into_inner(), &user, repo.get_ref()),
        "cancel invoice",
    )
}

#[post("/invoices/{id}/payments")]
pub async fn record_payment(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<PaymentForm>,
) -> impl Responder {
    created(
        invoices_service::record_payment(id.into_inner(), form, &user, repo.get_ref()),
        "record payment",
    )
}

#[delete("/invoices/{id}/payments/{payment_id}")]
pub async fn delete_payment(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (id, payment_id) = path.into_inner();
    ok(
        invoices_service::delete_payment(id, payment_id, &user, repo.get_ref()),
        "delete payment",
    )
}

/// Customer-facing view; no credentials required.
#[get("/public/invoices/{public_id}")]
pub async fn public_invoice(
    public_id: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        invoices_service::public_invoice(&public_id, repo.get_ref()),
        "load public invoice",
    )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_quotations)
        .service(create_quotation)
        .service(get_quotation)
        .service(update_quotation)
        .service(delete_quotation)
        .service(send_quotation)
        .service(accept_quotation)
        .service(reject_quotation)
        .service(convert_quotation)
        .service(list_invoices)
        .service(invoice_summary)
        .service(create_invoice)
        .service(get_invoice)
        .service(update_invoice)
        .service(delete_invoice)
        .service(issue_invoice)
        .service(cancel_invoice)
        .service(record_payment)
        .service(delete_payment)
        .service(public_invoice);
}
