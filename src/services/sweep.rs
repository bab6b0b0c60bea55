//! Periodic status maintenance across every hub.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::quotation::QuotationStatus;
use crate::repository::errors::RepositoryError;
use crate::repository::{InvoiceReader, InvoiceWriter, QuotationReader, QuotationWriter};
use crate::services::ServiceResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub expired_quotations: usize,
    pub overdue_invoices: usize,
    pub failures: usize,
}

/// Expires lapsed quotations and flags past-due invoices as overdue.
///
/// A failing row is logged and counted; the sweep carries on with the rest.
/// Rows changed by a concurrent writer since they were listed are skipped.
pub fn run_sweep<R>(repo: &R, today: NaiveDate) -> ServiceResult<SweepReport>
where
    R: QuotationReader + QuotationWriter + InvoiceReader + InvoiceWriter + ?Sized,
{
    let mut report = SweepReport::default();

    for quotation in repo.list_lapsed_quotations(today)? {
        if !quotation.should_expire(today) {
            continue;
        }
        match repo.set_quotation_status(&quotation, QuotationStatus::Expired) {
            Ok(_) => report.expired_quotations += 1,
            Err(RepositoryError::ConstraintViolation(reason)) => {
                log::warn!("Skipping quotation {}: {reason}", quotation.number);
            }
            Err(err) => {
                log::error!("Failed to expire quotation {}: {err}", quotation.number);
                report.failures += 1;
            }
        }
    }

    for invoice in repo.list_invoices_due_before(today)? {
        let Some(status) = invoice.overdue_status(today) else {
            continue;
        };
        match repo.set_invoice_status(&invoice, status) {
            Ok(_) => report.overdue_invoices += 1,
            Err(RepositoryError::ConstraintViolation(reason)) => {
                log::warn!("Skipping invoice {}: {reason}", invoice.number);
            }
            Err(err) => {
                log::error!("Failed to mark invoice {} overdue: {err}", invoice.number);
                report.failures += 1;
            }
        }
    }

    log::info!(
        "Sweep for {today}: {} quotation(s) expired, {} invoice(s) overdue, {} failure(s)",
        report.expired_quotations,
        report.overdue_invoices,
        report.failures
    );
    Ok(report)
}
