use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::billing::LineItem;
use crate::domain::quotation::QuotationDraft;
use crate::domain::types::{
    CustomerName, EmailAddress, LeadId, LineDescription, Money, TaxRate, trimmed_opt,
};
use crate::forms::{FormError, invalid, optional};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LineItemForm {
    pub description: String,
    pub quantity: u32,
    /// Minor currency units.
    pub unit_price: i64,
}

impl TryFrom<LineItemForm> for LineItem {
    type Error = FormError;

    fn try_from(form: LineItemForm) -> Result<Self, Self::Error> {
        if form.quantity == 0 {
            return Err(FormError::InvalidField {
                field: "items.quantity",
                source: crate::domain::types::TypeConstraintError::InvalidValue(
                    "quantity must be at least 1".to_string(),
                ),
            });
        }
        Ok(LineItem {
            description: LineDescription::new(form.description)
                .map_err(invalid("items.description"))?,
            quantity: form.quantity,
            unit_price: Money::new(form.unit_price).map_err(invalid("items.unit_price"))?,
        })
    }
}

pub(crate) fn line_items(items: Vec<LineItemForm>) -> Result<Vec<LineItem>, FormError> {
    items.into_iter().map(LineItem::try_from).collect()
}

pub(crate) fn lead_ref(lead_id: Option<i32>) -> Result<Option<LeadId>, FormError> {
    lead_id
        .map(LeadId::new)
        .transpose()
        .map_err(invalid("lead_id"))
}

#[derive(Debug, Deserialize, Validate)]
/// Body of `POST /quotations` and `PUT /quotations/{id}`.
pub struct QuotationForm {
    pub lead_id: Option<i32>,
    #[validate(length(min = 1, max = 255))]
    pub customer_name: String,
    pub customer_email: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub items: Vec<LineItemForm>,
    /// Basis points.
    #[serde(default)]
    pub tax_rate: i32,
    pub valid_until: NaiveDate,
    pub notes: Option<String>,
}

impl TryFrom<QuotationForm> for QuotationDraft {
    type Error = FormError;

    fn try_from(form: QuotationForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(QuotationDraft {
            lead_id: lead_ref(form.lead_id)?,
            customer_name: CustomerName::new(form.customer_name)
                .map_err(invalid("customer_name"))?,
            customer_email: optional("customer_email", form.customer_email, EmailAddress::new)?,
            items: line_items(form.items)?,
            tax_rate: TaxRate::new(form.tax_rate).map_err(invalid("tax_rate"))?,
            valid_until: form.valid_until,
            notes: trimmed_opt(form.notes),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
/// Body of `POST /quotations/{id}/convert`; dates default to today and
/// today plus thirty days.
pub struct ConvertQuotationForm {
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}
