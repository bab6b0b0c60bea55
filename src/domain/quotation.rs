use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::billing::{DocumentTotals, LineItem};
use crate::domain::errors::DomainError;
use crate::domain::invoice::NewInvoice;
use crate::domain::types::{
    CustomerName, EmailAddress, HubId, LeadId, QuotationId, TaxRate, string_enum,
};

string_enum!(QuotationStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
});

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Quotation {
    pub id: QuotationId,
    pub hub_id: HubId,
    pub number: String,
    pub lead_id: Option<LeadId>,
    pub customer_name: CustomerName,
    pub customer_email: Option<EmailAddress>,
    pub items: Vec<LineItem>,
    pub tax_rate: TaxRate,
    pub totals: DocumentTotals,
    pub status: QuotationStatus,
    pub valid_until: NaiveDate,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Customer-facing contents of a quotation, shared by create and update.
#[derive(Clone, Debug)]
pub struct QuotationDraft {
    pub lead_id: Option<LeadId>,
    pub customer_name: CustomerName,
    pub customer_email: Option<EmailAddress>,
    pub items: Vec<LineItem>,
    pub tax_rate: TaxRate,
    pub valid_until: NaiveDate,
    pub notes: Option<String>,
}

impl QuotationDraft {
    pub fn totals(&self) -> DocumentTotals {
        DocumentTotals::compute(&self.items, self.tax_rate)
    }
}

#[derive(Clone, Debug)]
pub struct NewQuotation {
    pub hub_id: HubId,
    pub draft: QuotationDraft,
}

impl Quotation {
    fn transition(&self, to: QuotationStatus) -> DomainError {
        DomainError::InvalidTransition {
            entity: "quotation",
            from: self.status.to_string(),
            to: to.to_string(),
        }
    }

    pub fn ensure_editable(&self) -> Result<(), DomainError> {
        if self.status == QuotationStatus::Draft {
            Ok(())
        } else {
            Err(DomainError::NotEditable("quotation"))
        }
    }

    pub fn send(&self) -> Result<QuotationStatus, DomainError> {
        match self.status {
            QuotationStatus::Draft => Ok(QuotationStatus::Sent),
            _ => Err(self.transition(QuotationStatus::Sent)),
        }
    }

    /// Customer decision on a sent quotation. `accept` selects between
    /// [`QuotationStatus::Accepted`] and [`QuotationStatus::Rejected`].
    pub fn decide(&self, accept: bool, today: NaiveDate) -> Result<QuotationStatus, DomainError> {
        let to = if accept {
            QuotationStatus::Accepted
        } else {
            QuotationStatus::Rejected
        };
        if self.status != QuotationStatus::Sent {
            return Err(self.transition(to));
        }
        if accept && today > self.valid_until {
            return Err(DomainError::Expired);
        }
        Ok(to)
    }

    /// Open quotations lapse once their validity date has passed.
    pub fn should_expire(&self, today: NaiveDate) -> bool {
        matches!(self.status, QuotationStatus::Draft | QuotationStatus::Sent)
            && self.valid_until < today
    }

    /// Builds a draft invoice carrying the customer, items and tax of an
    /// accepted quotation.
    pub fn to_new_invoice(
        &self,
        issue_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<NewInvoice, DomainError> {
        if self.status != QuotationStatus::Accepted {
            return Err(DomainError::InvalidTransition {
                entity: "quotation",
                from: self.status.to_string(),
                to: "Invoice".to_string(),
            });
        }
        if due_date < issue_date {
            return Err(DomainError::InvalidDateRange);
        }
        Ok(NewInvoice {
            hub_id: self.hub_id,
            lead_id: self.lead_id,
            quotation_id: Some(self.id),
            customer_name: self.customer_name.clone(),
            customer_email: self.customer_email.clone(),
            items: self.items.clone(),
            tax_rate: self.tax_rate,
            issue_date,
            due_date,
            notes: self.notes.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::types::{LineDescription, Money};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn quotation(status: QuotationStatus) -> Quotation {
        let items = vec![LineItem {
            description: LineDescription::new("Audit").unwrap(),
            quantity: 2,
            unit_price: Money::new(10_000).unwrap(),
        }];
        let tax_rate = TaxRate::new(1_000).unwrap();
        let now = Utc::now().naive_utc();
        Quotation {
            id: QuotationId::new(7).unwrap(),
            hub_id: HubId::new(1).unwrap(),
            number: "QUO-000007".to_string(),
            lead_id: None,
            customer_name: CustomerName::new("Acme").unwrap(),
            customer_email: None,
            totals: DocumentTotals::compute(&items, tax_rate),
            items,
            tax_rate,
            status,
            valid_until: date(2025, 6, 30),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn only_drafts_are_sent_and_edited() {
        assert_eq!(
            quotation(QuotationStatus::Draft).send(),
            Ok(QuotationStatus::Sent)
        );
        assert!(quotation(QuotationStatus::Sent).send().is_err());
        assert!(quotation(QuotationStatus::Sent).ensure_editable().is_err());
    }

    #[test]
    fn acceptance_requires_sent_and_valid() {
        let sent = quotation(QuotationStatus::Sent);
        assert_eq!(
            sent.decide(true, date(2025, 6, 30)),
            Ok(QuotationStatus::Accepted)
        );
        assert_eq!(sent.decide(true, date(2025, 7, 1)), Err(DomainError::Expired));
        assert_eq!(
            sent.decide(false, date(2025, 7, 1)),
            Ok(QuotationStatus::Rejected)
        );
        assert!(quotation(QuotationStatus::Draft).decide(true, date(2025, 1, 1)).is_err());
    }

    #[test]
    fn expiry_applies_to_open_quotations_only() {
        let today = date(2025, 7, 1);
        assert!(quotation(QuotationStatus::Draft).should_expire(today));
        assert!(quotation(QuotationStatus::Sent).should_expire(today));
        assert!(!quotation(QuotationStatus::Accepted).should_expire(today));
        assert!(!quotation(QuotationStatus::Sent).should_expire(date(2025, 6, 30)));
    }

    #[test]
    fn conversion_copies_items_and_tax() {
        let accepted = quotation(QuotationStatus::Accepted);
        let invoice = accepted
            .to_new_invoice(date(2025, 6, 1), date(2025, 6, 15))
            .unwrap();
        assert_eq!(invoice.quotation_id, Some(accepted.id));
        assert_eq!(invoice.items, accepted.items);
        assert_eq!(invoice.tax_rate, accepted.tax_rate);

        assert!(
            quotation(QuotationStatus::Sent)
                .to_new_invoice(date(2025, 6, 1), date(2025, 6, 15))
                .is_err()
        );
    }
}
