use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::expense::{ExpenseDetails, ExpenseStatus};
use crate::domain::types::{Category, LinkUrl, Money, trimmed_opt};
use crate::forms::{FormError, invalid, optional, parse_variant};

#[derive(Debug, Deserialize, Validate)]
/// Body of `POST /expenses` and `PUT /expenses/{id}`.
pub struct ExpenseForm {
    #[validate(length(min = 1, max = 128))]
    pub category: String,
    /// Minor currency units.
    pub amount: i64,
    pub spent_on: NaiveDate,
    #[validate(length(max = 2_000))]
    pub description: Option<String>,
    pub receipt_url: Option<String>,
}

impl TryFrom<ExpenseForm> for ExpenseDetails {
    type Error = FormError;

    fn try_from(form: ExpenseForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let amount = Money::new(form.amount).map_err(invalid("amount"))?;
        if amount.is_zero() {
            return Err(FormError::InvalidField {
                field: "amount",
                source: crate::domain::types::TypeConstraintError::InvalidValue(
                    "amount must be greater than zero".to_string(),
                ),
            });
        }

        Ok(ExpenseDetails {
            category: Category::new(form.category).map_err(invalid("category"))?,
            amount,
            spent_on: form.spent_on,
            description: trimmed_opt(form.description),
            receipt_url: optional("receipt_url", form.receipt_url, LinkUrl::new)?,
        })
    }
}

#[derive(Debug, Deserialize)]
/// Body of `POST /expenses/{id}/review`.
pub struct ReviewExpenseForm {
    pub status: String,
}

impl ReviewExpenseForm {
    pub fn status(&self) -> Result<ExpenseStatus, FormError> {
        parse_variant("status", &self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ExpenseForm {
        ExpenseForm {
            category: " Travel ".into(),
            amount: 4_200,
            spent_on: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            description: None,
            receipt_url: Some("https://files.example.com/r/1.pdf".into()),
        }
    }

    #[test]
    fn converts_into_details() {
        let details = ExpenseDetails::try_from(form()).unwrap();
        assert_eq!(details.category.as_str(), "Travel");
        assert_eq!(details.amount.get(), 4_200);
        assert!(details.receipt_url.is_some());
    }

    #[test]
    fn zero_amount_and_bad_url_are_rejected() {
        let mut zero = form();
        zero.amount = 0;
        assert!(matches!(
            ExpenseDetails::try_from(zero),
            Err(FormError::InvalidField { field: "amount", .. })
        ));

        let mut bad_url = form();
        bad_url.receipt_url = Some("not a url".into());
        assert!(matches!(
            ExpenseDetails::try_from(bad_url),
            Err(FormError::InvalidField { field: "receipt_url", .. })
        ));
    }
}
