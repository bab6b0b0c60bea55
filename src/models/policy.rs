use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::policy::{
    CompanyPolicy as DomainCompanyPolicy, NewCompanyPolicy as DomainNewCompanyPolicy,
    PolicyDetails,
};
use crate::domain::types::{
    Category, HubId, PolicyId, PolicyTitle, SanitizedText, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::company_policies)]
pub struct CompanyPolicy {
    pub id: i32,
    pub hub_id: i32,
    pub title: String,
    pub category: String,
    pub content: String,
    pub effective_from: NaiveDate,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::company_policies)]
pub struct NewCompanyPolicy<'a> {
    pub hub_id: i32,
    pub title: &'a str,
    pub category: &'a str,
    pub content: &'a str,
    pub effective_from: NaiveDate,
    pub is_active: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::company_policies)]
pub struct UpdateCompanyPolicy<'a> {
    pub title: &'a str,
    pub category: &'a str,
    pub content: &'a str,
    pub effective_from: NaiveDate,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<CompanyPolicy> for DomainCompanyPolicy {
    type Error = TypeConstraintError;

    fn try_from(policy: CompanyPolicy) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PolicyId::new(policy.id)?,
            hub_id: HubId::new(policy.hub_id)?,
            title: PolicyTitle::new(policy.title)?,
            category: Category::new(policy.category)?,
            content: SanitizedText::new(policy.content)?,
            effective_from: policy.effective_from,
            is_active: policy.is_active,
            created_at: policy.created_at,
            updated_at: policy.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewCompanyPolicy> for NewCompanyPolicy<'a> {
    fn from(policy: &'a DomainNewCompanyPolicy) -> Self {
        let details = &policy.details;
        Self {
            hub_id: policy.hub_id.get(),
            title: details.title.as_str(),
            category: details.category.as_str(),
            content: details.content.as_str(),
            effective_from: details.effective_from,
            is_active: details.is_active,
        }
    }
}

impl<'a> From<&'a PolicyDetails> for UpdateCompanyPolicy<'a> {
    fn from(details: &'a PolicyDetails) -> Self {
        Self {
            title: details.title.as_str(),
            category: details.category.as_str(),
            content: details.content.as_str(),
            effective_from: details.effective_from,
            is_active: details.is_active,
            updated_at: Utc::now().naive_utc(),
        }
    }
}
