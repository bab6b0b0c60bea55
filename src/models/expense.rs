use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::expense::{Expense as DomainExpense, ExpenseDetails, NewExpense as DomainNewExpense};
use crate::domain::types::{
    Category, EmployeeId, ExpenseId, HubId, LinkUrl, Money, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::expenses)]
pub struct Expense {
    pub id: i32,
    pub hub_id: i32,
    pub employee_id: i32,
    pub category: String,
    pub amount: i64,
    pub spent_on: NaiveDate,
    pub description: Option<String>,
    pub receipt_url: Option<String>,
    pub status: String,
    pub reviewed_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::expenses)]
pub struct NewExpense<'a> {
    pub hub_id: i32,
    pub employee_id: i32,
    pub category: &'a str,
    pub amount: i64,
    pub spent_on: NaiveDate,
    pub description: Option<&'a str>,
    pub receipt_url: Option<&'a str>,
    pub status: &'static str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::expenses)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateExpense<'a> {
    pub category: &'a str,
    pub amount: i64,
    pub spent_on: NaiveDate,
    pub description: Option<&'a str>,
    pub receipt_url: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Expense> for DomainExpense {
    type Error = TypeConstraintError;

    fn try_from(expense: Expense) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ExpenseId::new(expense.id)?,
            hub_id: HubId::new(expense.hub_id)?,
            employee_id: EmployeeId::new(expense.employee_id)?,
            category: Category::new(expense.category)?,
            amount: Money::new(expense.amount)?,
            spent_on: expense.spent_on,
            description: expense.description,
            receipt_url: expense.receipt_url.map(LinkUrl::new).transpose()?,
            status: expense.status.parse()?,
            reviewed_by: expense.reviewed_by.map(EmployeeId::new).transpose()?,
            created_at: expense.created_at,
            updated_at: expense.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewExpense> for NewExpense<'a> {
    fn from(expense: &'a DomainNewExpense) -> Self {
        let details = &expense.details;
        Self {
            hub_id: expense.hub_id.get(),
            employee_id: expense.employee_id.get(),
            category: details.category.as_str(),
            amount: details.amount.get(),
            spent_on: details.spent_on,
            description: details.description.as_deref(),
            receipt_url: details.receipt_url.as_ref().map(|u| u.as_str()),
            status: "Pending",
        }
    }
}

impl<'a> From<&'a ExpenseDetails> for UpdateExpense<'a> {
    fn from(details: &'a ExpenseDetails) -> Self {
        Self {
            category: details.category.as_str(),
            amount: details.amount.get(),
            spent_on: details.spent_on,
            description: details.description.as_deref(),
            receipt_url: details.receipt_url.as_ref().map(|u| u.as_str()),
            updated_at: Utc::now().naive_utc(),
        }
    }
}
