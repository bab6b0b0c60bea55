use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::campaign::{CampaignChannel, CampaignDetails, CampaignStatus};
use crate::domain::types::{CampaignName, Money, trimmed_opt};
use crate::forms::{FormError, invalid, parse_variant};

#[derive(Debug, Deserialize, Validate)]
/// Body of `POST /campaigns` and `PUT /campaigns/{id}`.
pub struct CampaignForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub channel: String,
    pub status: Option<String>,
    #[serde(default)]
    pub budget: i64,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}

impl TryFrom<CampaignForm> for CampaignDetails {
    type Error = FormError;

    fn try_from(form: CampaignForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let status = match trimmed_opt(form.status) {
            Some(status) => parse_variant::<CampaignStatus>("status", &status)?,
            None => CampaignStatus::Draft,
        };

        Ok(CampaignDetails::try_new(
            CampaignName::new(form.name).map_err(invalid("name"))?,
            CampaignChannel::from(form.channel.trim()),
            status,
            Money::new(form.budget).map_err(invalid("budget"))?,
            form.starts_on,
            form.ends_on,
        )?)
    }
}
