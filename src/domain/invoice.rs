//! Invoices, their payments and the settlement rules tying them together.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::billing::{DocumentTotals, LineItem};
use crate::domain::errors::DomainError;
use crate::domain::types::{
    CustomerName, EmailAddress, HubId, InvoiceId, LeadId, Money, PaymentId, PublicId,
    QuotationId, TaxRate, string_enum,
};

string_enum!(InvoiceStatus {
    Draft,
    Unpaid,
    PartiallyPaid,
    Paid,
    Overdue,
    Cancelled,
});

impl InvoiceStatus {
    /// Issued invoices are the ones a customer owes money on (or has paid).
    pub fn is_issued(self) -> bool {
        !matches!(self, InvoiceStatus::Draft | InvoiceStatus::Cancelled)
    }
}

string_enum!(PaymentMethod {
    Cash,
    BankTransfer,
    Card,
    Cheque,
    Other,
});

/// Status of an issued invoice given what has been paid so far.
pub fn settle_status(total: Money, paid: Money, due_date: NaiveDate, today: NaiveDate) -> InvoiceStatus {
    if paid >= total {
        InvoiceStatus::Paid
    } else if due_date < today {
        InvoiceStatus::Overdue
    } else if !paid.is_zero() {
        InvoiceStatus::PartiallyPaid
    } else {
        InvoiceStatus::Unpaid
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: InvoiceId,
    pub hub_id: HubId,
    pub public_id: PublicId,
    pub number: String,
    pub lead_id: Option<LeadId>,
    pub quotation_id: Option<QuotationId>,
    pub customer_name: CustomerName,
    pub customer_email: Option<EmailAddress>,
    pub items: Vec<LineItem>,
    pub tax_rate: TaxRate,
    pub totals: DocumentTotals,
    pub amount_paid: Money,
    pub status: InvoiceStatus,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Result of applying or reverting a payment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub amount_paid: Money,
    pub status: InvoiceStatus,
}

impl Invoice {
    pub fn balance_due(&self) -> Money {
        self.totals.total.saturating_sub(self.amount_paid)
    }

    fn transition(&self, to: InvoiceStatus) -> DomainError {
        DomainError::InvalidTransition {
            entity: "invoice",
            from: self.status.to_string(),
            to: to.to_string(),
        }
    }

    pub fn ensure_editable(&self) -> Result<(), DomainError> {
        if self.status == InvoiceStatus::Draft {
            Ok(())
        } else {
            Err(DomainError::NotEditable("invoice"))
        }
    }

    pub fn issue(&self, today: NaiveDate) -> Result<InvoiceStatus, DomainError> {
        if self.status != InvoiceStatus::Draft {
            return Err(self.transition(InvoiceStatus::Unpaid));
        }
        Ok(settle_status(
            self.totals.total,
            self.amount_paid,
            self.due_date,
            today,
        ))
    }

    pub fn apply_payment(&self, amount: Money, today: NaiveDate) -> Result<Settlement, DomainError> {
        if matches!(
            self.status,
            InvoiceStatus::Draft | InvoiceStatus::Cancelled | InvoiceStatus::Paid
        ) {
            return Err(DomainError::NotPayable(self.status.to_string()));
        }
        if amount.is_zero() {
            return Err(DomainError::NonPositivePayment);
        }
        let balance = self.balance_due();
        if amount > balance {
            return Err(DomainError::Overpayment { balance });
        }
        let amount_paid = self.amount_paid.saturating_add(amount);
        Ok(Settlement {
            amount_paid,
            status: settle_status(self.totals.total, amount_paid, self.due_date, today),
        })
    }

    /// Undoes a previously recorded payment of `amount`.
    pub fn revert_payment(&self, amount: Money, today: NaiveDate) -> Settlement {
        let amount_paid = self.amount_paid.saturating_sub(amount);
        let status = if self.status.is_issued() {
            settle_status(self.totals.total, amount_paid, self.due_date, today)
        } else {
            self.status
        };
        Settlement {
            amount_paid,
            status,
        }
    }

    pub fn cancel(&self) -> Result<InvoiceStatus, DomainError> {
        if self.status == InvoiceStatus::Cancelled {
            return Err(self.transition(InvoiceStatus::Cancelled));
        }
        if !self.amount_paid.is_zero() {
            return Err(DomainError::HasPayments);
        }
        Ok(InvoiceStatus::Cancelled)
    }

    pub fn ensure_deletable(&self) -> Result<(), DomainError> {
        if !self.amount_paid.is_zero() {
            return Err(DomainError::HasPayments);
        }
        match self.status {
            InvoiceStatus::Draft | InvoiceStatus::Cancelled => Ok(()),
            _ => Err(DomainError::NotEditable("invoice")),
        }
    }

    /// New status for the overdue sweep, if the invoice just became overdue.
    pub fn overdue_status(&self, today: NaiveDate) -> Option<InvoiceStatus> {
        let open = matches!(
            self.status,
            InvoiceStatus::Unpaid | InvoiceStatus::PartiallyPaid
        );
        (open && self.due_date < today).then_some(InvoiceStatus::Overdue)
    }
}

/// Editable contents of an invoice, shared by create and update.
#[derive(Clone, Debug)]
pub struct InvoiceDraft {
    pub lead_id: Option<LeadId>,
    pub customer_name: CustomerName,
    pub customer_email: Option<EmailAddress>,
    pub items: Vec<LineItem>,
    pub tax_rate: TaxRate,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

impl InvoiceDraft {
    pub fn validate_dates(&self) -> Result<(), DomainError> {
        if self.due_date < self.issue_date {
            Err(DomainError::InvalidDateRange)
        } else {
            Ok(())
        }
    }

    pub fn totals(&self) -> DocumentTotals {
        DocumentTotals::compute(&self.items, self.tax_rate)
    }
}

/// Invoice about to be stored. The number is assigned by the repository.
#[derive(Clone, Debug)]
pub struct NewInvoice {
    pub hub_id: HubId,
    pub lead_id: Option<LeadId>,
    pub quotation_id: Option<QuotationId>,
    pub customer_name: CustomerName,
    pub customer_email: Option<EmailAddress>,
    pub items: Vec<LineItem>,
    pub tax_rate: TaxRate,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

impl NewInvoice {
    #[must_use]
    pub fn from_draft(hub_id: HubId, draft: InvoiceDraft) -> Self {
        Self {
            hub_id,
            lead_id: draft.lead_id,
            quotation_id: None,
            customer_name: draft.customer_name,
            customer_email: draft.customer_email,
            items: draft.items,
            tax_rate: draft.tax_rate,
            issue_date: draft.issue_date,
            due_date: draft.due_date,
            notes: draft.notes,
        }
    }

    pub fn totals(&self) -> DocumentTotals {
        DocumentTotals::compute(&self.items, self.tax_rate)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: PaymentId,
    pub invoice_id: InvoiceId,
    pub amount: Money,
    pub paid_on: NaiveDate,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewPayment {
    pub invoice_id: InvoiceId,
    pub amount: Money,
    pub paid_on: NaiveDate,
    pub method: PaymentMethod,
    pub reference: Option<String>,
}

/// Receivables overview across the issued invoices of a hub.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct InvoiceSummary {
    pub invoice_count: usize,
    pub billed: Money,
    pub collected: Money,
    pub outstanding: Money,
    pub overdue_count: usize,
}

impl InvoiceSummary {
    pub fn from_invoices<'a>(invoices: impl IntoIterator<Item = &'a Invoice>) -> Self {
        invoices
            .into_iter()
            .filter(|invoice| invoice.status.is_issued())
            .fold(Self::default(), |mut acc, invoice| {
                acc.invoice_count += 1;
                acc.billed = acc.billed.saturating_add(invoice.totals.total);
                acc.collected = acc.collected.saturating_add(invoice.amount_paid);
                acc.outstanding = acc.outstanding.saturating_add(invoice.balance_due());
                if invoice.status == InvoiceStatus::Overdue {
                    acc.overdue_count += 1;
                }
                acc
            })
    }
}
