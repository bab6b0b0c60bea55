use serde::{Deserialize, Serialize};

use crate::domain::leave::LeaveBalance;
use crate::domain::types::EmployeeId;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveRequestListParams {
    pub employee_id: Option<i32>,
    pub status: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveBalanceParams {
    pub employee_id: Option<i32>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LeaveBalances {
    pub employee_id: EmployeeId,
    pub year: i32,
    pub balances: Vec<LeaveBalance>,
}
