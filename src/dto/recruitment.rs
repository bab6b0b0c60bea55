use serde::{Deserialize, Serialize};

use crate::domain::employee::Employee;
use crate::domain::recruitment::Candidate;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobOpeningListParams {
    pub status: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateListParams {
    pub job_opening_id: Option<i32>,
    pub stage: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Candidate after a stage move; hiring also returns the employee row.
#[derive(Debug, Clone, Serialize)]
pub struct StageChange {
    pub candidate: Candidate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<Employee>,
}
