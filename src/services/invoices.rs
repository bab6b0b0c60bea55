//! Invoice lifecycle, payments and the public customer view.

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::invoice::{Invoice, InvoiceDraft, InvoiceStatus, InvoiceSummary, NewInvoice};
use crate::domain::types::{HubId, InvoiceId, LeadId, PaymentId, PublicId};
use crate::dto::billing::{InvoiceDetail, InvoiceListParams, PaymentReceipt, PublicInvoice};
use crate::forms::invoices::{InvoiceForm, PaymentForm};
use crate::pagination::{PageRequest, Paginated};
use crate::repository::{InvoiceListQuery, InvoiceReader, InvoiceWriter, LeadReader};
use crate::services::{
    ServiceError, ServiceResult, ensure_hub_lead, text_filter, today, variant_filter,
};
use crate::{SERVICE_ADMIN_ROLE, SERVICE_SALES_ROLE};

fn load<R>(
    id: i32,
    role: &str,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<(HubId, Invoice)>
where
    R: InvoiceReader + ?Sized,
{
    ensure_role(user, role)?;

    let hub_id = HubId::new(user.hub_id)?;
    let invoice = repo
        .get_invoice_by_id(InvoiceId::new(id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    Ok((hub_id, invoice))
}

pub fn list_invoices<R>(
    params: &InvoiceListParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<Invoice>>
where
    R: InvoiceReader + ?Sized,
{
    ensure_role(user, SERVICE_SALES_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let page = PageRequest::new(params.page, params.per_page);

    let mut query = InvoiceListQuery::new(hub_id).paginate(page.page, page.per_page);
    if let Some(status) = variant_filter::<InvoiceStatus>("status", params.status.as_deref())? {
        query = query.status(status);
    }
    if let Some(lead_id) = params.lead_id {
        query = query.lead(LeadId::new(lead_id)?);
    }
    if let Some(search) = text_filter(params.search.as_deref()) {
        query = query.search(search);
    }

    let (total, invoices) = repo.list_invoices(query)?;
    Ok(Paginated::new(invoices, total, page))
}

/// Receivables over every issued invoice of the hub.
pub fn invoice_summary<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<InvoiceSummary>
where
    R: InvoiceReader + ?Sized,
{
    ensure_role(user, SERVICE_SALES_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let (_, invoices) = repo.list_invoices(InvoiceListQuery::new(hub_id))?;
    Ok(InvoiceSummary::from_invoices(&invoices))
}

pub fn get_invoice<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<InvoiceDetail>
where
    R: InvoiceReader + ?Sized,
{
    let (_, invoice) = load(id, SERVICE_SALES_ROLE, user, repo)?;
    let payments = repo.list_payments(invoice.id)?;
    Ok(InvoiceDetail::new(invoice, payments))
}

/// Customer-facing view; drafts stay hidden.
pub fn public_invoice<R>(public_id: &str, repo: &R) -> ServiceResult<PublicInvoice>
where
    R: InvoiceReader + ?Sized,
{
    let public_id: PublicId = public_id.parse().map_err(|_| ServiceError::NotFound)?;

    match repo.get_invoice_by_public_id(&public_id)? {
        Some(invoice) if invoice.status != InvoiceStatus::Draft => {
            Ok(PublicInvoice::from(&invoice))
        }
        _ => Err(ServiceError::NotFound),
    }
}

pub fn create_invoice<R>(
    form: InvoiceForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Invoice>
where
    R: InvoiceWriter + LeadReader + ?Sized,
{
    ensure_role(user, SERVICE_SALES_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let draft = InvoiceDraft::try_from(form)?;
    ensure_hub_lead(hub_id, draft.lead_id, repo)?;

    let invoice = repo
        .create_invoice(&NewInvoice::from_draft(hub_id, draft))
        .map_err(|err| {
            log::error!("Failed to create invoice in hub {hub_id}: {err}");
            err
        })?;
    log::info!("Created invoice {} in hub {hub_id}", invoice.number);
    Ok(invoice)
}

pub fn update_invoice<R>(
    id: i32,
    form: InvoiceForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Invoice>
where
    R: InvoiceReader + InvoiceWriter + LeadReader + ?Sized,
{
    let (hub_id, invoice) = load(id, SERVICE_SALES_ROLE, user, repo)?;
    invoice.ensure_editable()?;
    let draft = InvoiceDraft::try_from(form)?;
    ensure_hub_lead(hub_id, draft.lead_id, repo)?;

    Ok(repo.update_invoice(invoice.id, hub_id, &draft)?)
}

pub fn delete_invoice<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: InvoiceReader + InvoiceWriter + ?Sized,
{
    let (hub_id, invoice) = load(id, SERVICE_ADMIN_ROLE, user, repo)?;
    invoice.ensure_deletable()?;

    repo.delete_invoice(invoice.id, hub_id)?;
    log::info!("Deleted invoice {} of hub {hub_id}", invoice.number);
    Ok(())
}

/// Issues a draft; the status follows from payments and due date.
pub fn issue_invoice<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Invoice>
where
    R: InvoiceReader + InvoiceWriter + ?Sized,
{
    let (_, invoice) = load(id, SERVICE_SALES_ROLE, user, repo)?;
    let status = invoice.issue(today())?;

    Ok(repo.set_invoice_status(&invoice, status)?)
}

pub fn cancel_invoice<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Invoice>
where
    R: InvoiceReader + InvoiceWriter + ?Sized,
{
    let (_, invoice) = load(id, SERVICE_SALES_ROLE, user, repo)?;
    let status = invoice.cancel()?;

    let invoice = repo.set_invoice_status(&invoice, status)?;
    log::info!("Cancelled invoice {}", invoice.number);
    Ok(invoice)
}

pub fn record_payment<R>(
    id: i32,
    form: PaymentForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<PaymentReceipt>
where
    R: InvoiceReader + InvoiceWriter + ?Sized,
{
    let (_, invoice) = load(id, SERVICE_SALES_ROLE, user, repo)?;
    let today = today();
    let payment = form.into_domain(invoice.id, today)?;
    let settlement = invoice.apply_payment(payment.amount, today).map_err(|err| {
        log::info!("Rejected payment on invoice {}: {err}", invoice.number);
        err
    })?;

    let (invoice, payment) = repo.record_payment(&invoice, &payment, &settlement)?;
    log::info!(
        "Recorded payment {} of {} on invoice {}, now {}",
        payment.id,
        payment.amount,
        invoice.number,
        invoice.status
    );
    Ok(PaymentReceipt { invoice, payment })
}

pub fn delete_payment<R>(
    id: i32,
    payment_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Invoice>
where
    R: InvoiceReader + InvoiceWriter + ?Sized,
{
    let (_, invoice) = load(id, SERVICE_ADMIN_ROLE, user, repo)?;
    let payment = repo
        .get_payment_by_id(PaymentId::new(payment_id)?, invoice.id)?
        .ok_or(ServiceError::NotFound)?;

    let settlement = invoice.revert_payment(payment.amount, today());
    let invoice = repo.delete_payment(&invoice, payment.id, &settlement)?;
    log::info!("Reverted payment {} on invoice {}", payment.id, invoice.number);
    Ok(invoice)
}

#[cfg(all(test, feature = "test-mocks"))]
pub(crate) mod tests {
    use chrono::{Days, NaiveDate, Utc};

    use super::*;
    use crate::SERVICE_ACCESS_ROLE;
    use crate::domain::billing::DocumentTotals;
    use crate::domain::invoice::{Payment, PaymentMethod, Settlement};
    use crate::domain::types::{CustomerName, Money, TaxRate};
    use crate::forms::quotations::LineItemForm;
    use crate::repository::mock::MockRepository;
    use crate::services::employees::tests::user_with;
    use crate::services::quotations::tests::items;

    fn sales() -> AuthenticatedUser {
        user_with(&[SERVICE_ACCESS_ROLE, SERVICE_SALES_ROLE])
    }

    fn money(value: i64) -> Money {
        Money::new(value).expect("valid amount")
    }

    /// Invoice over 10_000 minor units without tax.
    pub(crate) fn invoice(status: InvoiceStatus, paid: i64) -> Invoice {
        let now = Utc::now().naive_utc();
        let tax_rate = TaxRate::new(0).expect("valid rate");
        let today = Utc::now().date_naive();
        Invoice {
            id: InvoiceId::new(9).expect("valid id"),
            hub_id: HubId::new(42).expect("valid hub"),
            public_id: PublicId::new(),
            number: "INV-000009".to_string(),
            lead_id: None,
            quotation_id: None,
            customer_name: CustomerName::new("Acme").expect("valid name"),
            customer_email: None,
            totals: DocumentTotals::compute(&items(), tax_rate),
            items: items(),
            tax_rate,
            amount_paid: money(paid),
            status,
            issue_date: today,
            due_date: today.checked_add_days(Days::new(14)).expect("valid date"),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn payment(amount: i64) -> Payment {
        Payment {
            id: PaymentId::new(1).expect("valid id"),
            invoice_id: InvoiceId::new(9).expect("valid id"),
            amount: money(amount),
            paid_on: NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date"),
            method: PaymentMethod::Cash,
            reference: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn payment_form(amount: i64) -> PaymentForm {
        PaymentForm {
            amount,
            paid_on: None,
            method: "Cash".into(),
            reference: None,
        }
    }

    #[test]
    fn partial_payment_settles_as_partially_paid() {
        let mut repo = MockRepository::new();
        repo.expect_get_invoice_by_id()
            .returning(|_, _| Ok(Some(invoice(InvoiceStatus::Unpaid, 0))));
        repo.expect_record_payment()
            .withf(|_, new_payment, settlement| {
                new_payment.amount.get() == 4_000
                    && *settlement
                        == Settlement {
                            amount_paid: Money::new(4_000).expect("valid amount"),
                            status: InvoiceStatus::PartiallyPaid,
                        }
            })
            .times(1)
            .returning(|_, _, settlement| {
                Ok((
                    invoice(settlement.status, settlement.amount_paid.get()),
                    payment(4_000),
                ))
            });

        let receipt = record_payment(9, payment_form(4_000), &sales(), &repo).expect("recorded");
        assert_eq!(receipt.invoice.status, InvoiceStatus::PartiallyPaid);
    }

    #[test]
    fn overpayment_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_invoice_by_id()
            .returning(|_, _| Ok(Some(invoice(InvoiceStatus::PartiallyPaid, 8_000))));
        repo.expect_record_payment().times(0);

        let result = record_payment(9, payment_form(2_001), &sales(), &repo);
        assert!(matches!(result, Err(ServiceError::Conflict(msg)) if msg.contains("balance due")));
    }

    #[test]
    fn draft_does_not_accept_payments() {
        let mut repo = MockRepository::new();
        repo.expect_get_invoice_by_id()
            .returning(|_, _| Ok(Some(invoice(InvoiceStatus::Draft, 0))));
        repo.expect_record_payment().times(0);

        assert!(matches!(
            record_payment(9, payment_form(100), &sales(), &repo),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn zero_payment_is_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_get_invoice_by_id()
            .returning(|_, _| Ok(Some(invoice(InvoiceStatus::Unpaid, 0))));

        assert!(matches!(
            record_payment(9, payment_form(0), &sales(), &repo),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn deleting_a_payment_reopens_the_invoice() {
        let mut repo = MockRepository::new();
        repo.expect_get_invoice_by_id()
            .returning(|_, _| Ok(Some(invoice(InvoiceStatus::Paid, 10_000))));
        repo.expect_get_payment_by_id()
            .returning(|_, _| Ok(Some(payment(10_000))));
        repo.expect_delete_payment()
            .withf(|_, _, settlement| {
                settlement.amount_paid.is_zero() && settlement.status == InvoiceStatus::Unpaid
            })
            .times(1)
            .returning(|_, _, settlement| {
                Ok(invoice(settlement.status, settlement.amount_paid.get()))
            });

        let admin = user_with(&[SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE]);
        let reopened = delete_payment(9, 1, &admin, &repo).expect("payment removed");
        assert_eq!(reopened.status, InvoiceStatus::Unpaid);
    }

    #[test]
    fn invoices_with_payments_cannot_be_cancelled() {
        let mut repo = MockRepository::new();
        repo.expect_get_invoice_by_id()
            .returning(|_, _| Ok(Some(invoice(InvoiceStatus::PartiallyPaid, 100))));
        repo.expect_set_invoice_status().times(0);

        assert!(matches!(
            cancel_invoice(9, &sales(), &repo),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn public_view_hides_drafts_and_bad_ids() {
        let mut repo = MockRepository::new();
        repo.expect_get_invoice_by_public_id()
            .returning(|_| Ok(Some(invoice(InvoiceStatus::Draft, 0))));

        assert!(matches!(
            public_invoice(&PublicId::new().to_string(), &repo),
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            public_invoice("not-a-uuid", &repo),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn summary_counts_issued_invoices() {
        let mut repo = MockRepository::new();
        repo.expect_list_invoices()
            .withf(|query| query.pagination.is_none())
            .returning(|_| {
                Ok((
                    3,
                    vec![
                        invoice(InvoiceStatus::Draft, 0),
                        invoice(InvoiceStatus::PartiallyPaid, 4_000),
                        invoice(InvoiceStatus::Paid, 10_000),
                    ],
                ))
            });

        let summary = invoice_summary(&sales(), &repo).expect("summary");
        assert_eq!(summary.invoice_count, 2);
        assert_eq!(summary.collected, money(14_000));
        assert_eq!(summary.outstanding, money(6_000));
    }

    #[test]
    fn invoice_for_a_lead_of_another_hub_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_lead_by_id()
            .withf(|id, hub_id| id.get() == 3 && hub_id.get() == 42)
            .times(1)
            .returning(|_, _| Ok(None));
        repo.expect_create_invoice().times(0);

        let today = Utc::now().date_naive();
        let form = InvoiceForm {
            lead_id: Some(3),
            customer_name: "Acme".into(),
            customer_email: None,
            items: vec![LineItemForm {
                description: "Consulting".into(),
                quantity: 1,
                unit_price: 10_000,
            }],
            tax_rate: 0,
            issue_date: today,
            due_date: today,
            notes: None,
        };
        assert!(matches!(
            create_invoice(form, &sales(), &repo),
            Err(ServiceError::Form(msg)) if msg.contains("lead_id")
        ));
    }
}
