use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadListParams {
    pub status: Option<String>,
    pub source: Option<String>,
    pub assigned_to: Option<i32>,
    pub campaign_id: Option<i32>,
    pub search: Option<String>,
    pub created_from: Option<NaiveDate>,
    pub created_to: Option<NaiveDate>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Outcome of a CSV upload.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImportResult {
    pub imported: usize,
    /// Leads that received an assignee from the hub's assignment settings.
    pub assigned: usize,
}
