use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::attendance::AttendanceSummary;
use crate::domain::types::EmployeeId;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceListParams {
    pub employee_id: Option<i32>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AttendanceMonth {
    pub employee_id: EmployeeId,
    pub year: i32,
    pub month: u32,
    #[serde(flatten)]
    pub summary: AttendanceSummary,
}
