use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::expense::CategoryTotal;
use crate::domain::types::Money;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseListParams {
    pub employee_id: Option<i32>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseSummaryParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExpenseSummary {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub categories: Vec<CategoryTotal>,
    pub total: Money,
}

impl ExpenseSummary {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>, categories: Vec<CategoryTotal>) -> Self {
        let total = categories
            .iter()
            .fold(Money::ZERO, |acc, category| acc.saturating_add(category.total));
        Self {
            from,
            to,
            categories,
            total,
        }
    }
}
