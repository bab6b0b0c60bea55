use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Category, HubId, PolicyId, PolicyTitle, SanitizedText};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompanyPolicy {
    pub id: PolicyId,
    pub hub_id: HubId,
    pub title: PolicyTitle,
    pub category: Category,
    pub content: SanitizedText,
    pub effective_from: NaiveDate,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl CompanyPolicy {
    /// Whether regular employees may read the policy on `today`.
    pub fn is_in_effect(&self, today: NaiveDate) -> bool {
        self.is_active && self.effective_from <= today
    }
}

#[derive(Clone, Debug)]
pub struct PolicyDetails {
    pub title: PolicyTitle,
    pub category: Category,
    pub content: SanitizedText,
    pub effective_from: NaiveDate,
    pub is_active: bool,
}

#[derive(Clone, Debug)]
pub struct NewCompanyPolicy {
    pub hub_id: HubId,
    pub details: PolicyDetails,
}
