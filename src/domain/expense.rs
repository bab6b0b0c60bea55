use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::types::{Category, EmployeeId, ExpenseId, HubId, LinkUrl, Money, string_enum};

string_enum!(ExpenseStatus {
    Pending,
    Approved,
    Rejected,
    Reimbursed,
});

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub hub_id: HubId,
    pub employee_id: EmployeeId,
    pub category: Category,
    pub amount: Money,
    pub spent_on: NaiveDate,
    pub description: Option<String>,
    pub receipt_url: Option<LinkUrl>,
    pub status: ExpenseStatus,
    pub reviewed_by: Option<EmployeeId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Expense {
    pub fn ensure_editable(&self) -> Result<(), DomainError> {
        if self.status == ExpenseStatus::Pending {
            Ok(())
        } else {
            Err(DomainError::NotEditable("expense"))
        }
    }

    /// Validates a review decision taken by `reviewer`.
    pub fn review(&self, reviewer: EmployeeId, to: ExpenseStatus) -> Result<ExpenseStatus, DomainError> {
        if reviewer == self.employee_id {
            return Err(DomainError::SelfReview);
        }
        let allowed = matches!(
            (self.status, to),
            (ExpenseStatus::Pending, ExpenseStatus::Approved)
                | (ExpenseStatus::Pending, ExpenseStatus::Rejected)
                | (ExpenseStatus::Approved, ExpenseStatus::Reimbursed)
        );
        if allowed {
            Ok(to)
        } else {
            Err(DomainError::InvalidTransition {
                entity: "expense",
                from: self.status.to_string(),
                to: to.to_string(),
            })
        }
    }
}

/// Claim contents editable by the owner while pending.
#[derive(Clone, Debug)]
pub struct ExpenseDetails {
    pub category: Category,
    pub amount: Money,
    pub spent_on: NaiveDate,
    pub description: Option<String>,
    pub receipt_url: Option<LinkUrl>,
}

#[derive(Clone, Debug)]
pub struct NewExpense {
    pub hub_id: HubId,
    pub employee_id: EmployeeId,
    pub details: ExpenseDetails,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub count: usize,
    pub total: Money,
}

/// Totals per category, rejected claims excluded, ordered by category name.
pub fn summarize_by_category(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, (usize, Money)> = BTreeMap::new();
    for expense in expenses
        .iter()
        .filter(|expense| expense.status != ExpenseStatus::Rejected)
    {
        let entry = totals
            .entry(expense.category.as_str())
            .or_insert((0, Money::ZERO));
        entry.0 += 1;
        entry.1 = entry.1.saturating_add(expense.amount);
    }
    totals
        .into_iter()
        .map(|(category, (count, total))| CategoryTotal {
            category: category.to_string(),
            count,
            total,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn expense(owner: i32, category: &str, amount: i64, status: ExpenseStatus) -> Expense {
        let now = Utc::now().naive_utc();
        Expense {
            id: ExpenseId::new(1).unwrap(),
            hub_id: HubId::new(1).unwrap(),
            employee_id: EmployeeId::new(owner).unwrap(),
            category: Category::new(category).unwrap(),
            amount: Money::new(amount).unwrap(),
            spent_on: NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
            description: None,
            receipt_url: None,
            status,
            reviewed_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn review_flow() {
        let reviewer = EmployeeId::new(9).unwrap();
        let pending = expense(1, "Travel", 100, ExpenseStatus::Pending);
        assert_eq!(
            pending.review(reviewer, ExpenseStatus::Approved),
            Ok(ExpenseStatus::Approved)
        );
        assert!(pending.review(reviewer, ExpenseStatus::Reimbursed).is_err());

        let approved = expense(1, "Travel", 100, ExpenseStatus::Approved);
        assert_eq!(
            approved.review(reviewer, ExpenseStatus::Reimbursed),
            Ok(ExpenseStatus::Reimbursed)
        );
        assert!(approved.ensure_editable().is_err());
    }

    #[test]
    fn owners_cannot_review_their_claims() {
        let pending = expense(4, "Meals", 100, ExpenseStatus::Pending);
        assert_eq!(
            pending.review(EmployeeId::new(4).unwrap(), ExpenseStatus::Approved),
            Err(DomainError::SelfReview)
        );
    }

    #[test]
    fn summary_skips_rejected_claims() {
        let expenses = [
            expense(1, "Travel", 1_000, ExpenseStatus::Approved),
            expense(2, "Travel", 500, ExpenseStatus::Pending),
            expense(2, "Meals", 300, ExpenseStatus::Reimbursed),
            expense(3, "Meals", 9_999, ExpenseStatus::Rejected),
        ];
        let summary = summarize_by_category(&expenses);
        assert_eq!(
            summary,
            vec![
                CategoryTotal {
                    category: "Meals".to_string(),
                    count: 1,
                    total: Money::new(300).unwrap(),
                },
                CategoryTotal {
                    category: "Travel".to_string(),
                    count: 2,
                    total: Money::new(1_500).unwrap(),
                },
            ]
        );
    }
}
