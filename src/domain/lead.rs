//! Sales pipeline leads.

use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CampaignId, EmailAddress, EmployeeId, HubId, LeadId, LeadName, Money, PhoneNumber,
    string_enum,
};

string_enum!(
    /// Pipeline stage of a lead.
    LeadStatus {
        New,
        Contacted,
        Qualified,
        Proposal,
        Negotiation,
        Won,
        Lost,
    }
);

impl LeadStatus {
    /// Won and lost leads no longer count towards a sales rep's workload.
    pub fn is_closed(self) -> bool {
        matches!(self, LeadStatus::Won | LeadStatus::Lost)
    }
}

impl Default for LeadStatus {
    fn default() -> Self {
        LeadStatus::New
    }
}

/// Where a lead came from. Unknown labels are kept verbatim.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "String", from = "String")]
pub enum LeadSource {
    Website,
    Referral,
    Campaign,
    ColdCall,
    Social,
    Email,
    Other(String),
}

impl Display for LeadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadSource::Website => write!(f, "Website"),
            LeadSource::Referral => write!(f, "Referral"),
            LeadSource::Campaign => write!(f, "Campaign"),
            LeadSource::ColdCall => write!(f, "ColdCall"),
            LeadSource::Social => write!(f, "Social"),
            LeadSource::Email => write!(f, "Email"),
            LeadSource::Other(s) => write!(f, "{s}"),
        }
    }
}

const KNOWN_SOURCES: [LeadSource; 6] = [
    LeadSource::Website,
    LeadSource::Referral,
    LeadSource::Campaign,
    LeadSource::ColdCall,
    LeadSource::Social,
    LeadSource::Email,
];

/// Known labels match case-insensitively.
impl From<&str> for LeadSource {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return LeadSource::Other("Unknown".to_string());
        }
        KNOWN_SOURCES
            .into_iter()
            .find(|known| known.to_string().eq_ignore_ascii_case(s))
            .unwrap_or_else(|| LeadSource::Other(s.to_string()))
    }
}

impl From<String> for LeadSource {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<LeadSource> for String {
    fn from(value: LeadSource) -> Self {
        value.to_string()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    pub id: LeadId,
    pub hub_id: HubId,
    pub name: LeadName,
    pub email: Option<EmailAddress>,
    pub phone: Option<PhoneNumber>,
    pub company: Option<String>,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub value: Money,
    pub assigned_to: Option<EmployeeId>,
    pub campaign_id: Option<CampaignId>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Lead {
    pub fn is_assigned_to(&self, employee_id: EmployeeId) -> bool {
        self.assigned_to == Some(employee_id)
    }
}

#[derive(Clone, Debug)]
pub struct NewLead {
    pub hub_id: HubId,
    pub name: LeadName,
    pub email: Option<EmailAddress>,
    pub phone: Option<PhoneNumber>,
    pub company: Option<String>,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub value: Money,
    pub assigned_to: Option<EmployeeId>,
    pub campaign_id: Option<CampaignId>,
    pub notes: Option<String>,
}

impl NewLead {
    #[must_use]
    pub fn new(hub_id: HubId, name: LeadName, source: LeadSource) -> Self {
        Self {
            hub_id,
            name,
            email: None,
            phone: None,
            company: None,
            source,
            status: LeadStatus::New,
            value: Money::ZERO,
            assigned_to: None,
            campaign_id: None,
            notes: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct UpdateLead {
    pub name: LeadName,
    pub email: Option<EmailAddress>,
    pub phone: Option<PhoneNumber>,
    pub company: Option<String>,
    pub source: LeadSource,
    pub value: Money,
    pub campaign_id: Option<CampaignId>,
    pub notes: Option<String>,
}
