use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::campaign::{
    Campaign as DomainCampaign, CampaignChannel, CampaignDetails, NewCampaign as DomainNewCampaign,
};
use crate::domain::types::{CampaignId, CampaignName, HubId, Money, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::campaigns)]
pub struct Campaign {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub channel: String,
    pub status: String,
    pub budget: i64,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::campaigns)]
pub struct NewCampaign<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub channel: String,
    pub status: &'static str,
    pub budget: i64,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::campaigns)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateCampaign<'a> {
    pub name: &'a str,
    pub channel: String,
    pub status: &'static str,
    pub budget: i64,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Campaign> for DomainCampaign {
    type Error = TypeConstraintError;

    fn try_from(campaign: Campaign) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CampaignId::new(campaign.id)?,
            hub_id: HubId::new(campaign.hub_id)?,
            name: CampaignName::new(campaign.name)?,
            channel: CampaignChannel::from(campaign.channel),
            status: campaign.status.parse()?,
            budget: Money::new(campaign.budget)?,
            starts_on: campaign.starts_on,
            ends_on: campaign.ends_on,
            created_at: campaign.created_at,
            updated_at: campaign.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewCampaign> for NewCampaign<'a> {
    fn from(campaign: &'a DomainNewCampaign) -> Self {
        let details = &campaign.details;
        Self {
            hub_id: campaign.hub_id.get(),
            name: details.name.as_str(),
            channel: details.channel.to_string(),
            status: details.status.as_str(),
            budget: details.budget.get(),
            starts_on: details.starts_on,
            ends_on: details.ends_on,
        }
    }
}

impl<'a> From<&'a CampaignDetails> for UpdateCampaign<'a> {
    fn from(details: &'a CampaignDetails) -> Self {
        Self {
            name: details.name.as_str(),
            channel: details.channel.to_string(),
            status: details.status.as_str(),
            budget: details.budget.get(),
            starts_on: details.starts_on,
            ends_on: details.ends_on,
            updated_at: Utc::now().naive_utc(),
        }
    }
}
