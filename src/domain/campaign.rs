use std::fmt::Display;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::lead::LeadStatus;
use crate::domain::types::{CampaignId, CampaignName, HubId, Money, string_enum};

string_enum!(CampaignStatus {
    Draft,
    Active,
    Paused,
    Completed,
});

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(into = "String", from = "String")]
pub enum CampaignChannel {
    Email,
    Social,
    Ads,
    Event,
    Other(String),
}

impl Display for CampaignChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CampaignChannel::Email => write!(f, "Email"),
            CampaignChannel::Social => write!(f, "Social"),
            CampaignChannel::Ads => write!(f, "Ads"),
            CampaignChannel::Event => write!(f, "Event"),
            CampaignChannel::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for CampaignChannel {
    fn from(s: &str) -> Self {
        match s.trim() {
            "Email" => CampaignChannel::Email,
            "Social" => CampaignChannel::Social,
            "Ads" => CampaignChannel::Ads,
            "Event" => CampaignChannel::Event,
            other => CampaignChannel::Other(other.to_string()),
        }
    }
}

impl From<String> for CampaignChannel {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<CampaignChannel> for String {
    fn from(value: CampaignChannel) -> Self {
        value.to_string()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    pub id: CampaignId,
    pub hub_id: HubId,
    pub name: CampaignName,
    pub channel: CampaignChannel,
    pub status: CampaignStatus,
    pub budget: Money,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Editable campaign attributes shared by create and update.
#[derive(Clone, Debug)]
pub struct CampaignDetails {
    pub name: CampaignName,
    pub channel: CampaignChannel,
    pub status: CampaignStatus,
    pub budget: Money,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}

impl CampaignDetails {
    pub fn try_new(
        name: CampaignName,
        channel: CampaignChannel,
        status: CampaignStatus,
        budget: Money,
        starts_on: Option<NaiveDate>,
        ends_on: Option<NaiveDate>,
    ) -> Result<Self, DomainError> {
        if let (Some(start), Some(end)) = (starts_on, ends_on)
            && end < start
        {
            return Err(DomainError::InvalidDateRange);
        }
        Ok(Self {
            name,
            channel,
            status,
            budget,
            starts_on,
            ends_on,
        })
    }
}

#[derive(Clone, Debug)]
pub struct NewCampaign {
    pub hub_id: HubId,
    pub details: CampaignDetails,
}

/// Lead funnel numbers for one campaign.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CampaignStats {
    pub campaign_id: CampaignId,
    pub total_leads: usize,
    pub won_leads: usize,
    pub lost_leads: usize,
    pub won_value: Money,
    /// Share of won leads in percent, `0.0` for campaigns without leads.
    pub conversion_rate: f64,
}

impl CampaignStats {
    pub fn from_leads(campaign_id: CampaignId, leads: &[(LeadStatus, Money)]) -> Self {
        let total_leads = leads.len();
        let won: Vec<Money> = leads
            .iter()
            .filter(|(status, _)| *status == LeadStatus::Won)
            .map(|(_, value)| *value)
            .collect();
        let lost_leads = leads
            .iter()
            .filter(|(status, _)| *status == LeadStatus::Lost)
            .count();
        let won_value = won.iter().fold(Money::ZERO, |acc, v| acc.saturating_add(*v));
        let conversion_rate = if total_leads == 0 {
            0.0
        } else {
            won.len() as f64 * 100.0 / total_leads as f64
        };

        Self {
            campaign_id,
            total_leads,
            won_leads: won.len(),
            lost_leads,
            won_value,
            conversion_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_date_cannot_precede_start() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let result = CampaignDetails::try_new(
            CampaignName::new("Spring").unwrap(),
            CampaignChannel::Email,
            CampaignStatus::Draft,
            Money::ZERO,
            Some(start),
            Some(end),
        );
        assert_eq!(result.err(), Some(DomainError::InvalidDateRange));
    }

    #[test]
    fn stats_count_won_value_and_rate() {
        let id = CampaignId::new(1).unwrap();
        let m = |v| Money::new(v).unwrap();
        let stats = CampaignStats::from_leads(
            id,
            &[
                (LeadStatus::Won, m(500)),
                (LeadStatus::Won, m(250)),
                (LeadStatus::Lost, m(100)),
                (LeadStatus::New, m(900)),
            ],
        );
        assert_eq!(stats.total_leads, 4);
        assert_eq!(stats.won_leads, 2);
        assert_eq!(stats.lost_leads, 1);
        assert_eq!(stats.won_value, m(750));
        assert!((stats.conversion_rate - 50.0).abs() < f64::EPSILON);

        let empty = CampaignStats::from_leads(id, &[]);
        assert_eq!(empty.conversion_rate, 0.0);
    }
}
