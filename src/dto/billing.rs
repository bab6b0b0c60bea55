use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::billing::LineItem;
use crate::domain::invoice::{Invoice, InvoiceStatus, Payment};
use crate::domain::types::Money;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotationListParams {
    pub status: Option<String>,
    pub lead_id: Option<i32>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceListParams {
    pub status: Option<String>,
    pub lead_id: Option<i32>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub balance_due: Money,
    pub payments: Vec<Payment>,
}

impl InvoiceDetail {
    pub fn new(invoice: Invoice, payments: Vec<Payment>) -> Self {
        Self {
            balance_due: invoice.balance_due(),
            invoice,
            payments,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub invoice: Invoice,
    pub payment: Payment,
}

/// Customer-facing view of an issued invoice.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PublicInvoice {
    pub number: String,
    pub customer_name: String,
    pub items: Vec<LineItem>,
    pub subtotal: Money,
    pub tax_rate: i32,
    pub tax_amount: Money,
    pub total: Money,
    pub amount_paid: Money,
    pub balance_due: Money,
    pub status: InvoiceStatus,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
}

impl From<&Invoice> for PublicInvoice {
    fn from(invoice: &Invoice) -> Self {
        Self {
            number: invoice.number.clone(),
            customer_name: invoice.customer_name.to_string(),
            items: invoice.items.clone(),
            subtotal: invoice.totals.subtotal,
            tax_rate: invoice.tax_rate.get(),
            tax_amount: invoice.totals.tax_amount,
            total: invoice.totals.total,
            amount_paid: invoice.amount_paid,
            balance_due: invoice.balance_due(),
            status: invoice.status,
            issue_date: invoice.issue_date,
            due_date: invoice.due_date,
        }
    }
}
