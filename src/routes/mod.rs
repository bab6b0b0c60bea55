//! JSON handlers mounted under `/api/v1`.
//!
//! Handlers stay thin: extract, call the service with the repository, map the
//! outcome to a response.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde_json::json;

use crate::services::{ServiceError, ServiceResult};

pub mod attendance;
pub mod billing;
pub mod campaigns;
pub mod employees;
pub mod expenses;
pub mod leads;
pub mod leave;
pub mod messenger;
pub mod policies;
pub mod recruitment;

/// Maps a service failure to its status code and `{"error": ...}` body.
pub fn error_response(err: ServiceError, action: &str) -> HttpResponse {
    let status = match &err {
        ServiceError::Unauthorized => StatusCode::FORBIDDEN,
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        ServiceError::Form(_) | ServiceError::TypeConstraint(_) => {
            log::info!("Rejected input to {action}: {err}");
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ServiceError::Conflict(_) => {
            log::warn!("Conflict in {action}: {err}");
            StatusCode::CONFLICT
        }
        ServiceError::Internal(_) => {
            log::error!("Failed to {action}: {err}");
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "internal server error" }));
        }
    };
    HttpResponse::build(status).json(json!({ "error": err.to_string() }))
}

pub(crate) fn ok<T: Serialize>(result: ServiceResult<T>, action: &str) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(err) => error_response(err, action),
    }
}

pub(crate) fn created<T: Serialize>(result: ServiceResult<T>, action: &str) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::Created().json(body),
        Err(err) => error_response(err, action),
    }
}

pub(crate) fn no_content(result: ServiceResult<()>, action: &str) -> HttpResponse {
    match result {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, action),
    }
}

/// Registers every authenticated endpoint on the `/api/v1` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(employees::configure)
        .configure(leads::configure)
        .configure(campaigns::configure)
        .configure(billing::configure)
        .configure(expenses::configure)
        .configure(attendance::configure)
        .configure(leave::configure)
        .configure(recruitment::configure)
        .configure(messenger::configure)
        .configure(policies::configure);
}
