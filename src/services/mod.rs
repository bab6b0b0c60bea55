//! Business workflows behind the HTTP routes.
//!
//! Services check roles, turn forms into domain values and drive the
//! repository traits. They never touch HTTP types, so they can be exercised
//! against [`crate::repository::mock::MockRepository`].

use chrono::{NaiveDate, Utc};
use thiserror::Error;

use crate::domain::types::{CampaignId, HubId, LeadId};
use crate::forms::{FormError, parse_variant};
use crate::repository::errors::RepositoryError;
use crate::repository::{CampaignReader, LeadReader};

pub mod attendance;
pub mod campaigns;
pub mod employees;
pub mod expenses;
pub mod invoices;
pub mod lead_assignment;
pub mod leads;
pub mod leave;
pub mod messenger;
pub mod policies;
pub mod quotations;
pub mod recruitment;
pub mod sweep;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("insufficient permissions")]
    Unauthorized,

    #[error("resource not found")]
    NotFound,

    #[error("{0}")]
    Form(String),

    #[error("{0}")]
    TypeConstraint(String),

    #[error("{0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ConstraintViolation(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

/// Current date used for status rules.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Rejects a campaign reference that is not a campaign of the hub.
pub(crate) fn ensure_hub_campaign<R>(
    hub_id: HubId,
    campaign_id: Option<CampaignId>,
    repo: &R,
) -> ServiceResult<()>
where
    R: CampaignReader + ?Sized,
{
    let Some(campaign_id) = campaign_id else {
        return Ok(());
    };
    if repo.get_campaign_by_id(campaign_id, hub_id)?.is_none() {
        log::info!("Campaign {campaign_id} is not part of hub {hub_id}");
        return Err(ServiceError::Form(format!(
            "campaign_id: campaign {campaign_id} does not exist"
        )));
    }
    Ok(())
}

/// Rejects a lead reference that is not a lead of the hub.
pub(crate) fn ensure_hub_lead<R>(
    hub_id: HubId,
    lead_id: Option<LeadId>,
    repo: &R,
) -> ServiceResult<()>
where
    R: LeadReader + ?Sized,
{
    let Some(lead_id) = lead_id else {
        return Ok(());
    };
    if repo.get_lead_by_id(lead_id, hub_id)?.is_none() {
        log::info!("Lead {lead_id} is not part of hub {hub_id}");
        return Err(ServiceError::Form(format!("lead_id: lead {lead_id} does not exist")));
    }
    Ok(())
}

/// Parses an optional enum filter from a query string; blank means no filter.
pub(crate) fn variant_filter<T>(field: &'static str, value: Option<&str>) -> ServiceResult<Option<T>>
where
    T: std::str::FromStr,
{
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => Ok(Some(parse_variant(field, value)?)),
        None => Ok(None),
    }
}

/// Blank query-string filters are ignored.
pub(crate) fn text_filter(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
