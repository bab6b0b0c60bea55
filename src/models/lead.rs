//! Diesel models for leads, their activity log and assignment settings.

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::lead::{
    Lead as DomainLead, LeadSource, NewLead as DomainNewLead, UpdateLead as DomainUpdateLead,
};
use crate::domain::lead_activity::{
    LeadActivity as DomainLeadActivity, NewLeadActivity as DomainNewLeadActivity,
};
use crate::domain::types::{
    CampaignId, EmailAddress, EmployeeId, HubId, LeadId, LeadName, Money, PhoneNumber,
    TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::leads)]
/// Diesel model for [`crate::domain::lead::Lead`].
pub struct Lead {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub source: String,
    pub status: String,
    pub value: i64,
    pub assigned_to: Option<i32>,
    pub campaign_id: Option<i32>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::leads)]
pub struct NewLead<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub company: Option<&'a str>,
    pub source: String,
    pub status: &'static str,
    pub value: i64,
    pub assigned_to: Option<i32>,
    pub campaign_id: Option<i32>,
    pub notes: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::leads)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateLead<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub company: Option<&'a str>,
    pub source: String,
    pub value: i64,
    pub campaign_id: Option<i32>,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Lead> for DomainLead {
    type Error = TypeConstraintError;

    fn try_from(lead: Lead) -> Result<Self, Self::Error> {
        Ok(Self {
            id: LeadId::new(lead.id)?,
            hub_id: HubId::new(lead.hub_id)?,
            name: LeadName::new(lead.name)?,
            email: lead.email.map(EmailAddress::new).transpose()?,
            phone: lead.phone.map(PhoneNumber::new).transpose()?,
            company: lead.company,
            source: LeadSource::from(lead.source),
            status: lead.status.parse()?,
            value: Money::new(lead.value)?,
            assigned_to: lead.assigned_to.map(EmployeeId::new).transpose()?,
            campaign_id: lead.campaign_id.map(CampaignId::new).transpose()?,
            notes: lead.notes,
            created_at: lead.created_at,
            updated_at: lead.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewLead> for NewLead<'a> {
    fn from(lead: &'a DomainNewLead) -> Self {
        Self {
            hub_id: lead.hub_id.get(),
            name: lead.name.as_str(),
            email: lead.email.as_ref().map(|e| e.as_str()),
            phone: lead.phone.as_ref().map(|p| p.as_str()),
            company: lead.company.as_deref(),
            source: lead.source.to_string(),
            status: lead.status.as_str(),
            value: lead.value.get(),
            assigned_to: lead.assigned_to.map(EmployeeId::get),
            campaign_id: lead.campaign_id.map(CampaignId::get),
            notes: lead.notes.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdateLead> for UpdateLead<'a> {
    fn from(lead: &'a DomainUpdateLead) -> Self {
        Self {
            name: lead.name.as_str(),
            email: lead.email.as_ref().map(|e| e.as_str()),
            phone: lead.phone.as_ref().map(|p| p.as_str()),
            company: lead.company.as_deref(),
            source: lead.source.to_string(),
            value: lead.value.get(),
            campaign_id: lead.campaign_id.map(CampaignId::get),
            notes: lead.notes.as_deref(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::lead_activities)]
pub struct LeadActivity {
    pub id: i32,
    pub lead_id: i32,
    pub employee_id: i32,
    pub activity_type: String,
    pub activity_data: String, // JSON text
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::lead_activities)]
pub struct NewLeadActivity {
    pub lead_id: i32,
    pub employee_id: i32,
    pub activity_type: String,
    pub activity_data: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<LeadActivity> for DomainLeadActivity {
    type Error = TypeConstraintError;

    fn try_from(activity: LeadActivity) -> Result<Self, Self::Error> {
        let activity_data = serde_json::from_str(&activity.activity_data).unwrap_or_default();

        DomainLeadActivity::try_new(
            activity.id,
            activity.lead_id,
            activity.employee_id,
            activity.activity_type,
            activity_data,
            activity.created_at,
        )
    }
}

impl<'a> From<&'a DomainNewLeadActivity> for NewLeadActivity {
    fn from(activity: &'a DomainNewLeadActivity) -> Self {
        Self {
            lead_id: activity.lead_id.get(),
            employee_id: activity.employee_id.get(),
            activity_type: activity.activity_type.to_string(),
            activity_data: activity.activity_data.to_string(),
            created_at: activity.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::lead_assignment_settings)]
pub struct LeadAssignmentSettings {
    pub hub_id: i32,
    pub mode: String,
    pub last_assigned: Option<i32>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::lead_assignment_pool)]
pub struct LeadAssignmentPoolMember {
    pub hub_id: i32,
    pub employee_id: i32,
}
