use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::invoice::{InvoiceDraft, NewPayment, PaymentMethod};
use crate::domain::types::{CustomerName, EmailAddress, InvoiceId, Money, TaxRate, trimmed_opt};
use crate::forms::quotations::{LineItemForm, lead_ref, line_items};
use crate::forms::{FormError, invalid, optional, parse_variant};

#[derive(Debug, Deserialize, Validate)]
/// Body of `POST /invoices` and `PUT /invoices/{id}`.
pub struct InvoiceForm {
    pub lead_id: Option<i32>,
    #[validate(length(min = 1, max = 255))]
    pub customer_name: String,
    pub customer_email: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub items: Vec<LineItemForm>,
    #[serde(default)]
    pub tax_rate: i32,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

impl TryFrom<InvoiceForm> for InvoiceDraft {
    type Error = FormError;

    fn try_from(form: InvoiceForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let draft = InvoiceDraft {
            lead_id: lead_ref(form.lead_id)?,
            customer_name: CustomerName::new(form.customer_name)
                .map_err(invalid("customer_name"))?,
            customer_email: optional("customer_email", form.customer_email, EmailAddress::new)?,
            items: line_items(form.items)?,
            tax_rate: TaxRate::new(form.tax_rate).map_err(invalid("tax_rate"))?,
            issue_date: form.issue_date,
            due_date: form.due_date,
            notes: trimmed_opt(form.notes),
        };
        draft.validate_dates()?;
        Ok(draft)
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Body of `POST /invoices/{id}/payments`.
pub struct PaymentForm {
    /// Minor currency units.
    pub amount: i64,
    pub paid_on: Option<NaiveDate>,
    pub method: String,
    #[validate(length(max = 255))]
    pub reference: Option<String>,
}

impl PaymentForm {
    /// `paid_on` defaults to `today`.
    pub fn into_domain(
        self,
        invoice_id: InvoiceId,
        today: NaiveDate,
    ) -> Result<NewPayment, FormError> {
        self.validate()?;

        Ok(NewPayment {
            invoice_id,
            amount: Money::new(self.amount).map_err(invalid("amount"))?,
            paid_on: self.paid_on.unwrap_or(today),
            method: parse_variant::<PaymentMethod>("method", &self.method)?,
            reference: trimmed_opt(self.reference),
        })
    }
}
