use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use hubcrm::domain::attendance::AttendanceStatus;
use hubcrm::domain::billing::LineItem;
use hubcrm::domain::campaign::{CampaignChannel, CampaignDetails, CampaignStatus, NewCampaign};
use hubcrm::domain::employee::{Employee, NewEmployee};
use hubcrm::domain::invoice::{InvoiceDraft, InvoiceStatus, NewInvoice, NewPayment, PaymentMethod};
use hubcrm::domain::lead::{Lead, LeadSource, LeadStatus, NewLead};
use hubcrm::domain::leave::{LeaveRange, LeaveStatus, NewLeaveRequest, NewLeaveType};
use hubcrm::domain::messenger::{NewConversation, NewMessage};
use hubcrm::domain::quotation::{NewQuotation, QuotationDraft, QuotationStatus};
use hubcrm::domain::recruitment::{
    CandidateDetails, CandidateStage, JobOpeningDetails, JobStatus, NewCandidate,
};
use hubcrm::domain::types::{
    CampaignName, CandidateName, CustomerName, EmailAddress, EmployeeName, HubId, JobTitle,
    LeadName, LeaveTypeName, LineDescription, Money, SanitizedText, TaxRate,
};
use hubcrm::repository::errors::RepositoryError;
use hubcrm::repository::{
    AttendanceListQuery, AttendanceReader, CampaignWriter, DieselRepository, EmployeeListQuery,
    EmployeeReader, EmployeeWriter, InvoiceReader, InvoiceWriter, LeadListQuery, LeadReader,
    LeadWriter, LeaveWriter, MessageListQuery, MessengerReader, MessengerWriter, QuotationWriter,
    RecruitmentWriter,
};
use hubcrm::schema::leads;

mod common;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn hub(id: i32) -> HubId {
    HubId::new(id).unwrap()
}

fn hire(repo: &DieselRepository, hub_id: i32, name: &str, email: &str) -> Employee {
    repo.create_employee(&NewEmployee::new(
        hub(hub_id),
        EmployeeName::new(name).unwrap(),
        EmailAddress::new(email).unwrap(),
    ))
    .unwrap()
}

fn items() -> Vec<LineItem> {
    vec![LineItem {
        description: LineDescription::new("Consulting").unwrap(),
        quantity: 2,
        unit_price: Money::new(5_000).unwrap(),
    }]
}

fn quotation(hub_id: i32) -> NewQuotation {
    NewQuotation {
        hub_id: hub(hub_id),
        draft: QuotationDraft {
            lead_id: None,
            customer_name: CustomerName::new("Acme").unwrap(),
            customer_email: None,
            items: items(),
            tax_rate: TaxRate::new(1_000).unwrap(),
            valid_until: date(2030, 1, 31),
            notes: None,
        },
    }
}

fn invoice(hub_id: i32) -> NewInvoice {
    NewInvoice::from_draft(
        hub(hub_id),
        InvoiceDraft {
            lead_id: None,
            customer_name: CustomerName::new("Acme").unwrap(),
            customer_email: None,
            items: items(),
            tax_rate: TaxRate::new(0).unwrap(),
            issue_date: date(2030, 1, 1),
            due_date: date(2030, 1, 31),
            notes: None,
        },
    )
}

#[test]
fn test_connection_pool_opens_migrated_database() {
    let test_db = common::TestDb::new("test_connection_pool.db");
    assert!(test_db.pool().get().is_ok());
}

#[test]
fn test_employee_repository_crud() {
    let test_db = common::TestDb::new("test_employee_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let jane = hire(&repo, 1, "Jane", "jane@example.com");
    let john = hire(&repo, 1, "John", "john@example.com");
    hire(&repo, 2, "Jane elsewhere", "jane@example.com");

    let duplicate = repo.create_employee(&NewEmployee::new(
        hub(1),
        EmployeeName::new("Jane again").unwrap(),
        EmailAddress::new("jane@example.com").unwrap(),
    ));
    assert!(matches!(
        duplicate,
        Err(RepositoryError::ConstraintViolation(_))
    ));

    let (total, listed) = repo.list_employees(EmployeeListQuery::new(hub(1))).unwrap();
    assert_eq!(total, 2);
    assert_eq!(listed.len(), 2);

    let found = repo
        .get_employee_by_email(&EmailAddress::new("JANE@example.com").unwrap(), hub(1))
        .unwrap()
        .unwrap();
    assert_eq!(found.id, jane.id);

    repo.deactivate_employee(john.id, hub(1)).unwrap();
    let active = repo
        .filter_active_employees(hub(1), &[jane.id, john.id])
        .unwrap();
    assert_eq!(active, vec![jane.id]);

    let restored = repo
        .upsert_employee(&NewEmployee::new(
            hub(1),
            EmployeeName::new("John Smith").unwrap(),
            EmailAddress::new("john@example.com").unwrap(),
        ))
        .unwrap();
    assert_eq!(restored.id, john.id);
    assert!(restored.is_active);
    assert_eq!(restored.name.as_str(), "John Smith");

    assert!(repo.get_employee_by_id(jane.id, hub(2)).unwrap().is_none());
}

fn at(day: NaiveDate, h: u32, m: u32, sec: u32) -> NaiveDateTime {
    day.and_hms_opt(h, m, sec).unwrap()
}

/// Stores a lead and backdates it to `created_at`.
fn add_lead(
    test_db: &common::TestDb,
    repo: &DieselRepository,
    new_lead: NewLead,
    created_at: NaiveDateTime,
) -> Lead {
    let lead = repo.create_lead(&new_lead).unwrap();
    let mut conn = test_db.pool().get().unwrap();
    diesel::update(leads::table.find(lead.id.get()))
        .set(leads::created_at.eq(created_at))
        .execute(&mut conn)
        .unwrap();
    lead
}

fn names(leads: &[Lead]) -> Vec<&str> {
    leads.iter().map(|lead| lead.name.as_str()).collect()
}

#[test]
fn test_lead_list_filters_and_pagination() {
    let test_db = common::TestDb::new("test_lead_list.db");
    let repo = DieselRepository::new(test_db.pool());
    let jane = hire(&repo, 1, "Jane", "jane@example.com");
    let spring = repo
        .create_campaign(&NewCampaign {
            hub_id: hub(1),
            details: CampaignDetails::try_new(
                CampaignName::new("Spring").unwrap(),
                CampaignChannel::Email,
                CampaignStatus::Active,
                Money::ZERO,
                None,
                None,
            )
            .unwrap(),
        })
        .unwrap();
    let lead = |hub_id: i32, name: &str, source: LeadSource| {
        NewLead::new(hub(hub_id), LeadName::new(name).unwrap(), source)
    };

    add_lead(
        &test_db,
        &repo,
        lead(1, "Acme", LeadSource::Website),
        at(date(2030, 1, 1), 10, 0, 0),
    );
    let mut globex = lead(1, "Globex", LeadSource::Referral);
    globex.assigned_to = Some(jane.id);
    globex.campaign_id = Some(spring.id);
    add_lead(&test_db, &repo, globex, at(date(2030, 1, 2), 23, 59, 59));
    let mut initech = lead(1, "Initech 100% Corp", LeadSource::Website);
    initech.status = LeadStatus::Won;
    add_lead(&test_db, &repo, initech, at(date(2030, 1, 3), 8, 0, 0));
    add_lead(
        &test_db,
        &repo,
        lead(1, "Umbrella", LeadSource::Website),
        at(date(2030, 1, 2), 9, 0, 0),
    );
    // Same timestamp as Acme; the newer row sorts first.
    add_lead(
        &test_db,
        &repo,
        lead(1, "Hooli", LeadSource::ColdCall),
        at(date(2030, 1, 1), 10, 0, 0),
    );
    add_lead(
        &test_db,
        &repo,
        lead(2, "Acme elsewhere", LeadSource::Website),
        at(date(2030, 1, 1), 10, 0, 0),
    );

    let (total, all) = repo.list_leads(LeadListQuery::new(hub(1))).unwrap();
    assert_eq!(total, 5);
    assert_eq!(
        names(&all),
        ["Initech 100% Corp", "Globex", "Umbrella", "Hooli", "Acme"]
    );

    let (total, won) = repo
        .list_leads(LeadListQuery::new(hub(1)).status(LeadStatus::Won))
        .unwrap();
    assert_eq!((total, names(&won)), (1, vec!["Initech 100% Corp"]));

    let (total, website) = repo
        .list_leads(LeadListQuery::new(hub(1)).source("website"))
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(names(&website), ["Initech 100% Corp", "Umbrella", "Acme"]);

    let (_, assigned) = repo
        .list_leads(LeadListQuery::new(hub(1)).assigned_to(jane.id))
        .unwrap();
    assert_eq!(names(&assigned), ["Globex"]);

    let (_, from_campaign) = repo
        .list_leads(LeadListQuery::new(hub(1)).campaign(spring.id))
        .unwrap();
    assert_eq!(names(&from_campaign), ["Globex"]);

    let (total, found) = repo
        .list_leads(LeadListQuery::new(hub(1)).search("acme"))
        .unwrap();
    assert_eq!((total, names(&found)), (1, vec!["Acme"]));

    // Wildcards in the search text match literally.
    let (total, found) = repo
        .list_leads(LeadListQuery::new(hub(1)).search("%"))
        .unwrap();
    assert_eq!((total, names(&found)), (1, vec!["Initech 100% Corp"]));
    let (total, _) = repo
        .list_leads(LeadListQuery::new(hub(1)).search("_"))
        .unwrap();
    assert_eq!(total, 0);

    // The end date includes its whole day.
    let day = date(2030, 1, 2);
    let (total, on_day) = repo
        .list_leads(LeadListQuery::new(hub(1)).created_between(Some(day), Some(day)))
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(names(&on_day), ["Globex", "Umbrella"]);

    let (total, page) = repo
        .list_leads(LeadListQuery::new(hub(1)).paginate(2, 2))
        .unwrap();
    assert_eq!(total, 5);
    assert_eq!(names(&page), ["Umbrella", "Hooli"]);
    let (_, last) = repo
        .list_leads(LeadListQuery::new(hub(1)).paginate(3, 2))
        .unwrap();
    assert_eq!(names(&last), ["Acme"]);
}

#[test]
fn test_document_numbers_are_sequential_per_hub() {
    let test_db = common::TestDb::new("test_document_numbers.db");
    let repo = DieselRepository::new(test_db.pool());

    let first = repo.create_quotation(&quotation(1)).unwrap();
    let second = repo.create_quotation(&quotation(1)).unwrap();
    let other_hub = repo.create_quotation(&quotation(2)).unwrap();

    assert_eq!(first.number, "QUO-000001");
    assert_eq!(second.number, "QUO-000002");
    assert_eq!(other_hub.number, "QUO-000001");
    assert_eq!(first.totals.total.get(), 11_000);

    let invoice = repo.create_invoice(&invoice(1)).unwrap();
    assert_eq!(invoice.number, "INV-000001");
    assert_eq!(invoice.status, InvoiceStatus::Draft);
}

#[test]
fn test_invoice_payments_settle_balance() {
    let test_db = common::TestDb::new("test_invoice_payments.db");
    let repo = DieselRepository::new(test_db.pool());
    let today = date(2030, 1, 10);

    let draft = repo.create_invoice(&invoice(1)).unwrap();
    let issued = repo
        .set_invoice_status(&draft, draft.issue(today).unwrap())
        .unwrap();
    assert_eq!(issued.status, InvoiceStatus::Unpaid);

    let public = repo
        .get_invoice_by_public_id(&issued.public_id)
        .unwrap()
        .unwrap();
    assert_eq!(public.id, issued.id);

    let amount = Money::new(4_000).unwrap();
    let settlement = issued.apply_payment(amount, today).unwrap();
    let payment = NewPayment {
        invoice_id: issued.id,
        amount,
        paid_on: today,
        method: PaymentMethod::BankTransfer,
        reference: Some("TX-1".into()),
    };
    let (partial, recorded) = repo.record_payment(&issued, &payment, &settlement).unwrap();
    assert_eq!(partial.status, InvoiceStatus::PartiallyPaid);
    assert_eq!(partial.amount_paid.get(), 4_000);

    // The stale snapshot no longer matches the stored row.
    let stale = repo.record_payment(&issued, &payment, &settlement);
    assert!(matches!(stale, Err(RepositoryError::ConstraintViolation(_))));
    assert_eq!(repo.list_payments(issued.id).unwrap().len(), 1);

    let reverted = partial.revert_payment(recorded.amount, today);
    let restored = repo
        .delete_payment(&partial, recorded.id, &reverted)
        .unwrap();
    assert_eq!(restored.status, InvoiceStatus::Unpaid);
    assert!(restored.amount_paid.is_zero());
    assert!(repo.list_payments(issued.id).unwrap().is_empty());
}

#[test]
fn test_sweep_after_payment_leaves_invoice_paid() {
    let test_db = common::TestDb::new("test_sweep_after_payment.db");
    let repo = DieselRepository::new(test_db.pool());

    let draft = repo.create_invoice(&invoice(1)).unwrap();
    let issued = repo
        .set_invoice_status(&draft, draft.issue(date(2030, 1, 10)).unwrap())
        .unwrap();

    // The sweep lists the invoice while it is still open.
    let sweep_day = date(2030, 2, 5);
    let due = repo.list_invoices_due_before(sweep_day).unwrap();
    assert_eq!(due.len(), 1);
    let snapshot = due[0].clone();
    let overdue = snapshot.overdue_status(sweep_day).unwrap();

    // The customer pays in full before the sweep writes.
    let amount = issued.balance_due();
    let settlement = issued.apply_payment(amount, sweep_day).unwrap();
    let payment = NewPayment {
        invoice_id: issued.id,
        amount,
        paid_on: sweep_day,
        method: PaymentMethod::Cash,
        reference: None,
    };
    let (paid, _) = repo.record_payment(&issued, &payment, &settlement).unwrap();
    assert_eq!(paid.status, InvoiceStatus::Paid);

    assert!(matches!(
        repo.set_invoice_status(&snapshot, overdue),
        Err(RepositoryError::ConstraintViolation(_))
    ));
    let stored = repo.get_invoice_by_id(issued.id, hub(1)).unwrap().unwrap();
    assert_eq!(stored.status, InvoiceStatus::Paid);
    assert_eq!(stored.amount_paid, paid.amount_paid);
}

#[test]
fn test_cancel_after_payment_is_refused() {
    let test_db = common::TestDb::new("test_cancel_after_payment.db");
    let repo = DieselRepository::new(test_db.pool());
    let today = date(2030, 1, 10);

    let draft = repo.create_invoice(&invoice(1)).unwrap();
    let issued = repo
        .set_invoice_status(&draft, draft.issue(today).unwrap())
        .unwrap();

    // Cancellation was validated against an unpaid snapshot.
    let cancelled = issued.cancel().unwrap();

    let amount = Money::new(4_000).unwrap();
    let settlement = issued.apply_payment(amount, today).unwrap();
    let payment = NewPayment {
        invoice_id: issued.id,
        amount,
        paid_on: today,
        method: PaymentMethod::Card,
        reference: None,
    };
    let (partial, recorded) = repo.record_payment(&issued, &payment, &settlement).unwrap();

    assert!(matches!(
        repo.set_invoice_status(&issued, cancelled),
        Err(RepositoryError::ConstraintViolation(_))
    ));
    let stored = repo.get_invoice_by_id(issued.id, hub(1)).unwrap().unwrap();
    assert_eq!(stored.status, InvoiceStatus::PartiallyPaid);

    // Removing a payment against a stale snapshot is refused as well.
    let reverted = issued.revert_payment(recorded.amount, today);
    assert!(matches!(
        repo.delete_payment(&issued, recorded.id, &reverted),
        Err(RepositoryError::ConstraintViolation(_))
    ));
    assert_eq!(repo.list_payments(partial.id).unwrap().len(), 1);
}

#[test]
fn test_quotation_status_write_checks_current_status() {
    let test_db = common::TestDb::new("test_quotation_status.db");
    let repo = DieselRepository::new(test_db.pool());

    let draft = repo.create_quotation(&quotation(1)).unwrap();
    let sent = repo
        .set_quotation_status(&draft, draft.send().unwrap())
        .unwrap();
    assert_eq!(sent.status, QuotationStatus::Sent);

    assert!(matches!(
        repo.set_quotation_status(&draft, QuotationStatus::Expired),
        Err(RepositoryError::ConstraintViolation(_))
    ));
    let accepted = repo
        .set_quotation_status(&sent, QuotationStatus::Accepted)
        .unwrap();
    assert_eq!(accepted.status, QuotationStatus::Accepted);
}

#[test]
fn test_quotation_converts_to_one_invoice_only() {
    let test_db = common::TestDb::new("test_quotation_conversion.db");
    let repo = DieselRepository::new(test_db.pool());

    let quotation = repo.create_quotation(&quotation(1)).unwrap();
    let mut new_invoice = invoice(1);
    new_invoice.quotation_id = Some(quotation.id);

    repo.create_invoice(&new_invoice).unwrap();
    assert!(repo.invoice_exists_for_quotation(quotation.id).unwrap());
    assert!(matches!(
        repo.create_invoice(&new_invoice),
        Err(RepositoryError::ConstraintViolation(_))
    ));
}

#[test]
fn test_leave_approval_marks_attendance() {
    let test_db = common::TestDb::new("test_leave_approval.db");
    let repo = DieselRepository::new(test_db.pool());
    let employee = hire(&repo, 1, "Jane", "jane@example.com");
    let manager = hire(&repo, 1, "Maria", "maria@example.com");

    let annual = repo
        .create_leave_type(
            &NewLeaveType::try_new(hub(1), LeaveTypeName::new("Annual").unwrap(), 20, true)
                .unwrap(),
        )
        .unwrap();

    // Monday to the following Monday: six weekdays.
    let range = LeaveRange::new(date(2030, 3, 4), date(2030, 3, 11)).unwrap();
    let new_request =
        NewLeaveRequest::try_new(hub(1), employee.id, &annual, range, None, &[]).unwrap();
    let request = repo.create_leave_request(&new_request).unwrap();
    assert_eq!(request.days, 6);
    assert_eq!(request.status, LeaveStatus::Pending);

    let approved = repo
        .review_leave_request(&request, LeaveStatus::Approved, manager.id)
        .unwrap();
    assert_eq!(approved.reviewed_by, Some(manager.id));

    let query = AttendanceListQuery::new(hub(1)).employee(employee.id);
    let (marked, records) = repo.list_attendance(query.clone()).unwrap();
    assert_eq!(marked, 6);
    assert!(records
        .iter()
        .all(|record| record.status == AttendanceStatus::OnLeave));

    // A second decision on the stale pending snapshot is refused.
    assert!(matches!(
        repo.review_leave_request(&request, LeaveStatus::Rejected, manager.id),
        Err(RepositoryError::ConstraintViolation(_))
    ));

    let cancelled = repo.cancel_leave_request(&approved).unwrap();
    assert_eq!(cancelled.status, LeaveStatus::Cancelled);
    assert_eq!(repo.list_attendance(query).unwrap().0, 0);

    assert!(matches!(
        repo.delete_leave_type(annual.id, hub(1)),
        Err(RepositoryError::ConstraintViolation(_))
    ));
}

#[test]
fn test_hiring_candidate_creates_employee() {
    let test_db = common::TestDb::new("test_hire_candidate.db");
    let repo = DieselRepository::new(test_db.pool());

    let job = repo
        .create_job_opening(
            hub(1),
            &JobOpeningDetails {
                title: JobTitle::new("Backend engineer").unwrap(),
                department: Some("Engineering".into()),
                description: None,
                status: JobStatus::Open,
            },
        )
        .unwrap();
    let candidate = repo
        .create_candidate(&NewCandidate {
            hub_id: hub(1),
            job_opening_id: job.id,
            details: CandidateDetails {
                name: CandidateName::new("Sam Lee").unwrap(),
                email: EmailAddress::new("sam@example.com").unwrap(),
                phone: None,
                resume_url: None,
                notes: None,
            },
        })
        .unwrap();
    assert_eq!(candidate.stage, CandidateStage::Applied);

    let new_employee = candidate.to_new_employee(&job, date(2030, 5, 1)).unwrap();
    let (hired, employee) = repo
        .hire_candidate(candidate.id, hub(1), &new_employee)
        .unwrap();

    assert_eq!(hired.stage, CandidateStage::Hired);
    assert_eq!(employee.email.as_str(), "sam@example.com");
    assert_eq!(employee.designation.as_deref(), Some("Backend engineer"));
    assert_eq!(employee.department.as_deref(), Some("Engineering"));
    assert_eq!(employee.joined_on, Some(date(2030, 5, 1)));
}

#[test]
fn test_messenger_previews_latest_message() {
    let test_db = common::TestDb::new("test_messenger.db");
    let repo = DieselRepository::new(test_db.pool());
    let jane = hire(&repo, 1, "Jane", "jane@example.com");
    let john = hire(&repo, 1, "John", "john@example.com");
    let outsider = hire(&repo, 1, "Olga", "olga@example.com");

    let conversation = repo
        .create_conversation(
            &NewConversation::try_new(hub(1), Some("Launch".into()), jane.id, &[john.id])
                .unwrap(),
        )
        .unwrap();
    assert!(conversation.has_participant(jane.id));
    assert!(conversation.has_participant(john.id));

    for body in ["first", "second"] {
        repo.create_message(&NewMessage {
            conversation_id: conversation.id,
            sender_id: john.id,
            body: SanitizedText::new(body).unwrap(),
        })
        .unwrap();
    }

    let previews = repo.list_conversations(jane.id, hub(1)).unwrap();
    assert_eq!(previews.len(), 1);
    let last = previews[0].last_message.as_ref().unwrap();
    assert_eq!(last.body.as_str(), "second");

    assert!(repo.list_conversations(outsider.id, hub(1)).unwrap().is_empty());

    let (total, messages) = repo
        .list_messages(MessageListQuery::new(conversation.id).paginate(1, 1))
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(messages[0].body.as_str(), "second");
}
