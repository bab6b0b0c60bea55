//! Diesel models for quotations, invoices and invoice payments.
//!
//! Line items are kept as a JSON array in the `items` column of their parent
//! document; totals are denormalised next to them.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::billing::{DocumentTotals, LineItem};
use crate::domain::invoice::{
    Invoice as DomainInvoice, InvoiceDraft, NewPayment as DomainNewPayment,
    Payment as DomainPayment,
};
use crate::domain::quotation::{Quotation as DomainQuotation, QuotationDraft};
use crate::domain::types::{
    CustomerName, EmailAddress, HubId, InvoiceId, LeadId, Money, PaymentId, QuotationId,
    TaxRate, TypeConstraintError,
};

pub fn encode_items(items: &[LineItem]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

fn decode_items(raw: &str) -> Result<Vec<LineItem>, TypeConstraintError> {
    serde_json::from_str(raw)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("line items: {e}")))
}

fn decode_totals(subtotal: i64, tax_amount: i64, total: i64) -> Result<DocumentTotals, TypeConstraintError> {
    Ok(DocumentTotals {
        subtotal: Money::new(subtotal)?,
        tax_amount: Money::new(tax_amount)?,
        total: Money::new(total)?,
    })
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::quotations)]
pub struct Quotation {
    pub id: i32,
    pub hub_id: i32,
    pub number: String,
    pub lead_id: Option<i32>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub items: String,
    pub subtotal: i64,
    pub tax_rate: i32,
    pub tax_amount: i64,
    pub total: i64,
    pub status: String,
    pub valid_until: NaiveDate,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::quotations)]
pub struct NewQuotation<'a> {
    pub hub_id: i32,
    pub number: &'a str,
    pub lead_id: Option<i32>,
    pub customer_name: &'a str,
    pub customer_email: Option<&'a str>,
    pub items: String,
    pub subtotal: i64,
    pub tax_rate: i32,
    pub tax_amount: i64,
    pub total: i64,
    pub status: &'static str,
    pub valid_until: NaiveDate,
    pub notes: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::quotations)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateQuotation<'a> {
    pub lead_id: Option<i32>,
    pub customer_name: &'a str,
    pub customer_email: Option<&'a str>,
    pub items: String,
    pub subtotal: i64,
    pub tax_rate: i32,
    pub tax_amount: i64,
    pub total: i64,
    pub valid_until: NaiveDate,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl<'a> NewQuotation<'a> {
    pub fn new(hub_id: HubId, number: &'a str, draft: &'a QuotationDraft) -> Self {
        let totals = draft.totals();
        Self {
            hub_id: hub_id.get(),
            number,
            lead_id: draft.lead_id.map(LeadId::get),
            customer_name: draft.customer_name.as_str(),
            customer_email: draft.customer_email.as_ref().map(|e| e.as_str()),
            items: encode_items(&draft.items),
            subtotal: totals.subtotal.get(),
            tax_rate: draft.tax_rate.get(),
            tax_amount: totals.tax_amount.get(),
            total: totals.total.get(),
            status: "Draft",
            valid_until: draft.valid_until,
            notes: draft.notes.as_deref(),
        }
    }
}

impl<'a> From<&'a QuotationDraft> for UpdateQuotation<'a> {
    fn from(draft: &'a QuotationDraft) -> Self {
        let totals = draft.totals();
        Self {
            lead_id: draft.lead_id.map(LeadId::get),
            customer_name: draft.customer_name.as_str(),
            customer_email: draft.customer_email.as_ref().map(|e| e.as_str()),
            items: encode_items(&draft.items),
            subtotal: totals.subtotal.get(),
            tax_rate: draft.tax_rate.get(),
            tax_amount: totals.tax_amount.get(),
            total: totals.total.get(),
            valid_until: draft.valid_until,
            notes: draft.notes.as_deref(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl TryFrom<Quotation> for DomainQuotation {
    type Error = TypeConstraintError;

    fn try_from(quotation: Quotation) -> Result<Self, Self::Error> {
        Ok(Self {
            id: QuotationId::new(quotation.id)?,
            hub_id: HubId::new(quotation.hub_id)?,
            number: quotation.number,
            lead_id: quotation.lead_id.map(LeadId::new).transpose()?,
            customer_name: CustomerName::new(quotation.customer_name)?,
            customer_email: quotation.customer_email.map(EmailAddress::new).transpose()?,
            items: decode_items(&quotation.items)?,
            tax_rate: TaxRate::new(quotation.tax_rate)?,
            totals: decode_totals(quotation.subtotal, quotation.tax_amount, quotation.total)?,
            status: quotation.status.parse()?,
            valid_until: quotation.valid_until,
            notes: quotation.notes,
            created_at: quotation.created_at,
            updated_at: quotation.updated_at,
        })
    }
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::invoices)]
pub struct Invoice {
    pub id: i32,
    pub hub_id: i32,
    pub public_id: String,
    pub number: String,
    pub lead_id: Option<i32>,
    pub quotation_id: Option<i32>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub items: String,
    pub subtotal: i64,
    pub tax_rate: i32,
    pub tax_amount: i64,
    pub total: i64,
    pub amount_paid: i64,
    pub status: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::invoices)]
pub struct NewInvoice<'a> {
    pub hub_id: i32,
    pub public_id: String,
    pub number: &'a str,
    pub lead_id: Option<i32>,
    pub quotation_id: Option<i32>,
    pub customer_name: &'a str,
    pub customer_email: Option<&'a str>,
    pub items: String,
    pub subtotal: i64,
    pub tax_rate: i32,
    pub tax_amount: i64,
    pub total: i64,
    pub amount_paid: i64,
    pub status: &'static str,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::invoices)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateInvoice<'a> {
    pub lead_id: Option<i32>,
    pub customer_name: &'a str,
    pub customer_email: Option<&'a str>,
    pub items: String,
    pub subtotal: i64,
    pub tax_rate: i32,
    pub tax_amount: i64,
    pub total: i64,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl<'a> NewInvoice<'a> {
    pub fn new(
        invoice: &'a crate::domain::invoice::NewInvoice,
        number: &'a str,
        public_id: String,
    ) -> Self {
        let totals = invoice.totals();
        Self {
            hub_id: invoice.hub_id.get(),
            public_id,
            number,
            lead_id: invoice.lead_id.map(LeadId::get),
            quotation_id: invoice.quotation_id.map(QuotationId::get),
            customer_name: invoice.customer_name.as_str(),
            customer_email: invoice.customer_email.as_ref().map(|e| e.as_str()),
            items: encode_items(&invoice.items),
            subtotal: totals.subtotal.get(),
            tax_rate: invoice.tax_rate.get(),
            tax_amount: totals.tax_amount.get(),
            total: totals.total.get(),
            amount_paid: 0,
            status: "Draft",
            issue_date: invoice.issue_date,
            due_date: invoice.due_date,
            notes: invoice.notes.as_deref(),
        }
    }
}

impl<'a> From<&'a InvoiceDraft> for UpdateInvoice<'a> {
    fn from(draft: &'a InvoiceDraft) -> Self {
        let totals = draft.totals();
        Self {
            lead_id: draft.lead_id.map(LeadId::get),
            customer_name: draft.customer_name.as_str(),
            customer_email: draft.customer_email.as_ref().map(|e| e.as_str()),
            items: encode_items(&draft.items),
            subtotal: totals.subtotal.get(),
            tax_rate: draft.tax_rate.get(),
            tax_amount: totals.tax_amount.get(),
            total: totals.total.get(),
            issue_date: draft.issue_date,
            due_date: draft.due_date,
            notes: draft.notes.as_deref(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl TryFrom<Invoice> for DomainInvoice {
    type Error = TypeConstraintError;

    fn try_from(invoice: Invoice) -> Result<Self, Self::Error> {
        Ok(Self {
            id: InvoiceId::new(invoice.id)?,
            hub_id: HubId::new(invoice.hub_id)?,
            public_id: invoice.public_id.parse()?,
            number: invoice.number,
            lead_id: invoice.lead_id.map(LeadId::new).transpose()?,
            quotation_id: invoice.quotation_id.map(QuotationId::new).transpose()?,
            customer_name: CustomerName::new(invoice.customer_name)?,
            customer_email: invoice.customer_email.map(EmailAddress::new).transpose()?,
            items: decode_items(&invoice.items)?,
            tax_rate: TaxRate::new(invoice.tax_rate)?,
            totals: decode_totals(invoice.subtotal, invoice.tax_amount, invoice.total)?,
            amount_paid: Money::new(invoice.amount_paid)?,
            status: invoice.status.parse()?,
            issue_date: invoice.issue_date,
            due_date: invoice.due_date,
            notes: invoice.notes,
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
        })
    }
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::invoice_payments)]
pub struct Payment {
    pub id: i32,
    pub invoice_id: i32,
    pub amount: i64,
    pub paid_on: NaiveDate,
    pub method: String,
    pub reference: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::invoice_payments)]
pub struct NewPayment<'a> {
    pub invoice_id: i32,
    pub amount: i64,
    pub paid_on: NaiveDate,
    pub method: &'static str,
    pub reference: Option<&'a str>,
}

impl TryFrom<Payment> for DomainPayment {
    type Error = TypeConstraintError;

    fn try_from(payment: Payment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PaymentId::new(payment.id)?,
            invoice_id: InvoiceId::new(payment.invoice_id)?,
            amount: Money::new(payment.amount)?,
            paid_on: payment.paid_on,
            method: payment.method.parse()?,
            reference: payment.reference,
            created_at: payment.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewPayment> for NewPayment<'a> {
    fn from(payment: &'a DomainNewPayment) -> Self {
        Self {
            invoice_id: payment.invoice_id.get(),
            amount: payment.amount.get(),
            paid_on: payment.paid_on,
            method: payment.method.as_str(),
            reference: payment.reference.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invoice::InvoiceStatus;
    use crate::domain::types::{LineDescription, PublicId};

    fn items() -> Vec<LineItem> {
        vec![LineItem {
            description: LineDescription::new("Support").unwrap(),
            quantity: 2,
            unit_price: Money::new(2_500).unwrap(),
        }]
    }

    #[test]
    fn invoice_row_round_trips_items() {
        let now = Utc::now().naive_utc();
        let public_id = PublicId::new();
        let row = Invoice {
            id: 1,
            hub_id: 1,
            public_id: public_id.to_string(),
            number: "INV-000001".into(),
            lead_id: None,
            quotation_id: None,
            customer_name: "Acme".into(),
            customer_email: Some("billing@acme.test".into()),
            items: encode_items(&items()),
            subtotal: 5_000,
            tax_rate: 1_000,
            tax_amount: 500,
            total: 5_500,
            amount_paid: 0,
            status: "Unpaid".into(),
            issue_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            notes: None,
            created_at: now,
            updated_at: now,
        };
        let invoice = DomainInvoice::try_from(row).expect("valid invoice");
        assert_eq!(invoice.items, items());
        assert_eq!(invoice.public_id, public_id);
        assert_eq!(invoice.status, InvoiceStatus::Unpaid);
        assert_eq!(invoice.totals.total.get(), 5_500);
    }

    #[test]
    fn corrupt_items_are_reported() {
        assert!(decode_items("not json").is_err());
    }
}
