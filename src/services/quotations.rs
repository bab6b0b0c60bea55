//! Quotation lifecycle and conversion into invoices.

use chrono::Days;

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::errors::DomainError;
use crate::domain::invoice::Invoice;
use crate::domain::quotation::{NewQuotation, Quotation, QuotationDraft, QuotationStatus};
use crate::domain::types::{HubId, LeadId, QuotationId};
use crate::dto::billing::QuotationListParams;
use crate::forms::quotations::{ConvertQuotationForm, QuotationForm};
use crate::pagination::{PageRequest, Paginated};
use crate::repository::{
    InvoiceReader, InvoiceWriter, LeadReader, QuotationListQuery, QuotationReader, QuotationWriter,
};
use crate::services::{
    ServiceError, ServiceResult, ensure_hub_lead, text_filter, today, variant_filter,
};
use crate::SERVICE_SALES_ROLE;

/// Payment term applied when a conversion does not name a due date.
const DEFAULT_PAYMENT_TERM_DAYS: u64 = 30;

fn load<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<(HubId, Quotation)>
where
    R: QuotationReader + ?Sized,
{
    ensure_role(user, SERVICE_SALES_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let quotation = repo
        .get_quotation_by_id(QuotationId::new(id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    Ok((hub_id, quotation))
}

pub fn list_quotations<R>(
    params: &QuotationListParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<Quotation>>
where
    R: QuotationReader + ?Sized,
{
    ensure_role(user, SERVICE_SALES_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let page = PageRequest::new(params.page, params.per_page);

    let mut query = QuotationListQuery::new(hub_id).paginate(page.page, page.per_page);
    if let Some(status) = variant_filter::<QuotationStatus>("status", params.status.as_deref())? {
        query = query.status(status);
    }
    if let Some(lead_id) = params.lead_id {
        query = query.lead(LeadId::new(lead_id)?);
    }
    if let Some(search) = text_filter(params.search.as_deref()) {
        query = query.search(search);
    }

    let (total, quotations) = repo.list_quotations(query)?;
    Ok(Paginated::new(quotations, total, page))
}

pub fn get_quotation<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Quotation>
where
    R: QuotationReader + ?Sized,
{
    load(id, user, repo).map(|(_, quotation)| quotation)
}

pub fn create_quotation<R>(
    form: QuotationForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Quotation>
where
    R: QuotationWriter + LeadReader + ?Sized,
{
    ensure_role(user, SERVICE_SALES_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let draft = QuotationDraft::try_from(form)?;
    ensure_hub_lead(hub_id, draft.lead_id, repo)?;

    let quotation = repo
        .create_quotation(&NewQuotation { hub_id, draft })
        .map_err(|err| {
            log::error!("Failed to create quotation in hub {hub_id}: {err}");
            err
        })?;
    log::info!("Created quotation {} in hub {hub_id}", quotation.number);
    Ok(quotation)
}

pub fn update_quotation<R>(
    id: i32,
    form: QuotationForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Quotation>
where
    R: QuotationReader + QuotationWriter + LeadReader + ?Sized,
{
    let (hub_id, quotation) = load(id, user, repo)?;
    quotation.ensure_editable()?;
    let draft = QuotationDraft::try_from(form)?;
    ensure_hub_lead(hub_id, draft.lead_id, repo)?;

    Ok(repo.update_quotation(quotation.id, hub_id, &draft)?)
}

pub fn delete_quotation<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: QuotationReader + QuotationWriter + ?Sized,
{
    let (hub_id, quotation) = load(id, user, repo)?;
    quotation.ensure_editable()?;

    repo.delete_quotation(quotation.id, hub_id)?;
    Ok(())
}

pub fn send_quotation<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Quotation>
where
    R: QuotationReader + QuotationWriter + ?Sized,
{
    let (_, quotation) = load(id, user, repo)?;
    let status = quotation.send()?;

    Ok(repo.set_quotation_status(&quotation, status)?)
}

/// Records the customer's answer to a sent quotation.
pub fn decide_quotation<R>(
    id: i32,
    accept: bool,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Quotation>
where
    R: QuotationReader + QuotationWriter + ?Sized,
{
    let (_, quotation) = load(id, user, repo)?;
    let status = quotation.decide(accept, today())?;

    let quotation = repo.set_quotation_status(&quotation, status)?;
    log::info!("Quotation {} is now {status}", quotation.number);
    Ok(quotation)
}

/// Turns an accepted quotation into a draft invoice. Each quotation converts
/// at most once.
pub fn convert_quotation<R>(
    id: i32,
    form: ConvertQuotationForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Invoice>
where
    R: QuotationReader + InvoiceReader + InvoiceWriter + ?Sized,
{
    let (hub_id, quotation) = load(id, user, repo)?;

    if repo.invoice_exists_for_quotation(quotation.id)? {
        return Err(DomainError::AlreadyConverted.into());
    }

    let issue_date = form.issue_date.unwrap_or_else(today);
    let due_date = match form.due_date {
        Some(due_date) => due_date,
        None => issue_date
            .checked_add_days(Days::new(DEFAULT_PAYMENT_TERM_DAYS))
            .ok_or_else(|| ServiceError::Form("issue date is out of range".to_string()))?,
    };
    let new_invoice = quotation.to_new_invoice(issue_date, due_date)?;

    let invoice = repo.create_invoice(&new_invoice).map_err(|err| {
        log::error!("Failed to convert quotation {} in hub {hub_id}: {err}", quotation.number);
        err
    })?;
    log::info!("Quotation {} converted into {}", quotation.number, invoice.number);
    Ok(invoice)
}

#[cfg(all(test, feature = "test-mocks"))]
pub(crate) mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::SERVICE_ACCESS_ROLE;
    use crate::domain::billing::{DocumentTotals, LineItem};
    use crate::domain::invoice::InvoiceStatus;
    use crate::domain::types::{CustomerName, LineDescription, Money, TaxRate};
    use crate::forms::quotations::LineItemForm;
    use crate::repository::mock::MockRepository;
    use crate::services::employees::tests::user_with;
    use crate::services::invoices::tests::invoice;

    fn draft_invoice() -> Invoice {
        invoice(InvoiceStatus::Draft, 0)
    }

    fn sales() -> AuthenticatedUser {
        user_with(&[SERVICE_ACCESS_ROLE, SERVICE_SALES_ROLE])
    }

    pub(crate) fn items() -> Vec<LineItem> {
        vec![LineItem {
            description: LineDescription::new("Consulting").expect("valid description"),
            quantity: 2,
            unit_price: Money::new(5_000).expect("valid amount"),
        }]
    }

    fn quotation(status: QuotationStatus) -> Quotation {
        let now = Utc::now().naive_utc();
        let tax_rate = TaxRate::new(1_000).expect("valid rate");
        Quotation {
            id: QuotationId::new(4).expect("valid id"),
            hub_id: HubId::new(42).expect("valid hub"),
            number: "QUO-000004".to_string(),
            lead_id: None,
            customer_name: CustomerName::new("Acme").expect("valid name"),
            customer_email: None,
            totals: DocumentTotals::compute(&items(), tax_rate),
            items: items(),
            tax_rate,
            status,
            valid_until: NaiveDate::from_ymd_opt(2999, 1, 1).expect("valid date"),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn sent_quotation_cannot_be_edited() {
        let mut repo = MockRepository::new();
        repo.expect_get_quotation_by_id()
            .returning(|_, _| Ok(Some(quotation(QuotationStatus::Sent))));
        repo.expect_delete_quotation().times(0);

        assert!(matches!(
            delete_quotation(4, &sales(), &repo),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn accept_moves_sent_quotation() {
        let mut repo = MockRepository::new();
        repo.expect_get_quotation_by_id()
            .returning(|_, _| Ok(Some(quotation(QuotationStatus::Sent))));
        repo.expect_set_quotation_status()
            .withf(|current, status| {
                current.status == QuotationStatus::Sent && *status == QuotationStatus::Accepted
            })
            .times(1)
            .returning(|_, status| Ok(quotation(status)));

        let accepted = decide_quotation(4, true, &sales(), &repo).expect("accepted");
        assert_eq!(accepted.status, QuotationStatus::Accepted);
    }

    #[test]
    fn second_conversion_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_get_quotation_by_id()
            .returning(|_, _| Ok(Some(quotation(QuotationStatus::Accepted))));
        repo.expect_invoice_exists_for_quotation()
            .returning(|_| Ok(true));
        repo.expect_create_invoice().times(0);

        let form = ConvertQuotationForm {
            issue_date: None,
            due_date: None,
        };
        assert!(matches!(
            convert_quotation(4, form, &sales(), &repo),
            Err(ServiceError::Conflict(msg)) if msg.contains("already been converted")
        ));
    }

    #[test]
    fn conversion_copies_items_and_defaults_due_date() {
        let mut repo = MockRepository::new();
        repo.expect_get_quotation_by_id()
            .returning(|_, _| Ok(Some(quotation(QuotationStatus::Accepted))));
        repo.expect_invoice_exists_for_quotation()
            .returning(|_| Ok(false));
        repo.expect_create_invoice()
            .withf(|new| {
                new.quotation_id == QuotationId::new(4).ok()
                    && new.items == items()
                    && new.tax_rate.get() == 1_000
                    && (new.due_date - new.issue_date).num_days() == 30
            })
            .times(1)
            .returning(|_| Ok(draft_invoice()));

        let form = ConvertQuotationForm {
            issue_date: NaiveDate::from_ymd_opt(2026, 1, 10),
            due_date: None,
        };
        let invoice = convert_quotation(4, form, &sales(), &repo).expect("converted");
        assert_eq!(invoice.status, InvoiceStatus::Draft);
    }

    #[test]
    fn quotations_need_sales_role() {
        let repo = MockRepository::new();
        assert!(matches!(
            get_quotation(4, &user_with(&[SERVICE_ACCESS_ROLE]), &repo),
            Err(ServiceError::Unauthorized)
        ));
    }

    fn quotation_form(lead_id: Option<i32>) -> QuotationForm {
        QuotationForm {
            lead_id,
            customer_name: "Acme".into(),
            customer_email: None,
            items: vec![LineItemForm {
                description: "Consulting".into(),
                quantity: 2,
                unit_price: 5_000,
            }],
            tax_rate: 1_000,
            valid_until: NaiveDate::from_ymd_opt(2999, 1, 1).expect("valid date"),
            notes: None,
        }
    }

    #[test]
    fn quotation_for_a_lead_of_another_hub_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_lead_by_id()
            .withf(|id, hub_id| id.get() == 3 && hub_id.get() == 42)
            .times(1)
            .returning(|_, _| Ok(None));
        repo.expect_create_quotation().times(0);

        assert!(matches!(
            create_quotation(quotation_form(Some(3)), &sales(), &repo),
            Err(ServiceError::Form(msg)) if msg.contains("lead_id")
        ));
    }

    #[test]
    fn quotation_update_checks_the_lead_hub() {
        let mut repo = MockRepository::new();
        repo.expect_get_quotation_by_id()
            .returning(|_, _| Ok(Some(quotation(QuotationStatus::Draft))));
        repo.expect_get_lead_by_id().times(1).returning(|_, _| Ok(None));
        repo.expect_update_quotation().times(0);

        assert!(matches!(
            update_quotation(4, quotation_form(Some(3)), &sales(), &repo),
            Err(ServiceError::Form(_))
        ));
    }
}
