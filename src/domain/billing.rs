//! Line items, totals and numbering shared by quotations and invoices.

use serde::{Deserialize, Serialize};

use crate::domain::types::{LineDescription, Money, TaxRate};

pub const INVOICE_PREFIX: &str = "INV";
pub const QUOTATION_PREFIX: &str = "QUO";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    pub description: LineDescription,
    pub quantity: u32,
    pub unit_price: Money,
}

impl LineItem {
    pub fn amount(&self) -> Money {
        self.unit_price.saturating_mul(self.quantity)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentTotals {
    pub subtotal: Money,
    pub tax_amount: Money,
    pub total: Money,
}

impl DocumentTotals {
    pub fn compute(items: &[LineItem], tax_rate: TaxRate) -> Self {
        let subtotal = items
            .iter()
            .fold(Money::ZERO, |acc, item| acc.saturating_add(item.amount()));
        let tax_amount = tax_rate.apply(subtotal);
        Self {
            subtotal,
            tax_amount,
            total: subtotal.saturating_add(tax_amount),
        }
    }
}

/// Next sequential document number after `last`, e.g. `INV-000042`.
///
/// Numbers that do not carry the expected prefix are ignored so a hub always
/// starts at `000001`.
pub fn next_document_number(prefix: &str, last: Option<&str>) -> String {
    let last_seq = last
        .and_then(|number| number.strip_prefix(prefix))
        .and_then(|rest| rest.strip_prefix('-'))
        .and_then(|digits| digits.parse::<u64>().ok())
        .unwrap_or(0);
    format!("{prefix}-{:06}", last_seq + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(description: &str, quantity: u32, unit_price: i64) -> LineItem {
        LineItem {
            description: LineDescription::new(description).unwrap(),
            quantity,
            unit_price: Money::new(unit_price).unwrap(),
        }
    }

    #[test]
    fn totals_apply_tax_on_subtotal() {
        let items = [item("Design", 3, 1_999), item("Hosting", 1, 5_000)];
        let totals = DocumentTotals::compute(&items, TaxRate::new(1_800).unwrap());
        assert_eq!(totals.subtotal.get(), 10_997);
        // 10997 * 0.18 = 1979.46
        assert_eq!(totals.tax_amount.get(), 1_979);
        assert_eq!(totals.total.get(), 12_976);
    }

    #[test]
    fn totals_of_empty_document_are_zero() {
        let totals = DocumentTotals::compute(&[], TaxRate::new(500).unwrap());
        assert_eq!(totals.total, Money::ZERO);
    }

    #[test]
    fn numbering_continues_from_last() {
        assert_eq!(next_document_number(INVOICE_PREFIX, None), "INV-000001");
        assert_eq!(
            next_document_number(INVOICE_PREFIX, Some("INV-000041")),
            "INV-000042"
        );
        assert_eq!(
            next_document_number(QUOTATION_PREFIX, Some("INV-000041")),
            "QUO-000001"
        );
        assert_eq!(
            next_document_number(QUOTATION_PREFIX, Some("QUO-999999")),
            "QUO-1000000"
        );
    }
}
