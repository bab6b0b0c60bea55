//! Persistence ports and their Diesel implementation.
//!
//! Every reader/writer trait is implemented by [`DieselRepository`]; services
//! depend on the traits only so they can be exercised against
//! [`mock::MockRepository`] in tests.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};

use crate::db::{DbConnection, DbPool};
use crate::domain::attendance::{Attendance, AttendanceStatus, NewAttendance};
use crate::domain::campaign::{Campaign, CampaignDetails, CampaignStatus, NewCampaign};
use crate::domain::employee::{Employee, NewEmployee, UpdateEmployee};
use crate::domain::expense::{Expense, ExpenseDetails, ExpenseStatus, NewExpense};
use crate::domain::invoice::{
    Invoice, InvoiceDraft, InvoiceStatus, NewInvoice, NewPayment, Payment, Settlement,
};
use crate::domain::lead::{Lead, LeadSource, LeadStatus, NewLead, UpdateLead};
use crate::domain::lead_activity::{LeadActivity, NewLeadActivity};
use crate::domain::lead_assignment::AssignmentSettings;
use crate::domain::leave::{LeaveRequest, LeaveStatus, LeaveType, NewLeaveRequest, NewLeaveType};
use crate::domain::messenger::{Conversation, ConversationPreview, Message, NewConversation, NewMessage};
use crate::domain::policy::{CompanyPolicy, NewCompanyPolicy, PolicyDetails};
use crate::domain::quotation::{NewQuotation, Quotation, QuotationDraft, QuotationStatus};
use crate::domain::recruitment::{
    Candidate, CandidateDetails, CandidateStage, JobOpening, JobOpeningDetails, JobStatus,
    NewCandidate,
};
use crate::domain::types::{
    AttendanceId, CampaignId, CandidateId, ConversationId, EmailAddress, EmployeeId, ExpenseId,
    HubId, InvoiceId, JobOpeningId, LeadId, LeaveRequestId, LeaveTypeId, Money, PaymentId,
    PolicyId, PublicId, QuotationId,
};
use crate::repository::errors::RepositoryResult;

pub mod attendance;
pub mod billing;
pub mod campaign;
pub mod employee;
pub mod errors;
pub mod expense;
pub mod lead;
pub mod messenger;
pub mod policy;
pub mod recruitment;

#[cfg(feature = "test-mocks")]
pub mod mock;

/// Diesel-backed repository shared by all request handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Escape character used by every `LIKE` search.
const LIKE_ESCAPE: char = '\\';

/// Substring pattern for `LIKE ... ESCAPE '\\'` matching `search` literally.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    fn offset(&self) -> i64 {
        ((self.page.max(1) - 1) * self.per_page) as i64
    }

    fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// Adds a `paginate` setter to a query builder struct.
macro_rules! paginated_query {
    ($name:ident) => {
        impl $name {
            pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
                self.pagination = Some(Pagination { page, per_page });
                self
            }
        }
    };
}

#[derive(Debug, Clone)]
pub struct EmployeeListQuery {
    pub hub_id: HubId,
    pub active: Option<bool>,
    pub department: Option<String>,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl EmployeeListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            active: None,
            department: None,
            search: None,
            pagination: None,
        }
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

paginated_query!(EmployeeListQuery);

#[derive(Debug, Clone)]
pub struct LeadListQuery {
    pub hub_id: HubId,
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
    pub assigned_to: Option<EmployeeId>,
    pub campaign_id: Option<CampaignId>,
    pub search: Option<String>,
    pub created_from: Option<NaiveDate>,
    pub created_to: Option<NaiveDate>,
    pub pagination: Option<Pagination>,
}

impl LeadListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            status: None,
            source: None,
            assigned_to: None,
            campaign_id: None,
            search: None,
            created_from: None,
            created_to: None,
            pagination: None,
        }
    }

    pub fn status(mut self, status: LeadStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn source(mut self, source: impl Into<LeadSource>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn assigned_to(mut self, employee_id: EmployeeId) -> Self {
        self.assigned_to = Some(employee_id);
        self
    }

    pub fn campaign(mut self, campaign_id: CampaignId) -> Self {
        self.campaign_id = Some(campaign_id);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Inclusive creation date range; either end may be open.
    pub fn created_between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.created_from = from;
        self.created_to = to;
        self
    }
}

paginated_query!(LeadListQuery);

#[derive(Debug, Clone)]
pub struct LeadActivityListQuery {
    pub lead_id: LeadId,
    pub pagination: Option<Pagination>,
}

impl LeadActivityListQuery {
    pub fn new(lead_id: LeadId) -> Self {
        Self {
            lead_id,
            pagination: None,
        }
    }
}

paginated_query!(LeadActivityListQuery);

#[derive(Debug, Clone)]
pub struct CampaignListQuery {
    pub hub_id: HubId,
    pub status: Option<CampaignStatus>,
    pub pagination: Option<Pagination>,
}

impl CampaignListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            status: None,
            pagination: None,
        }
    }

    pub fn status(mut self, status: CampaignStatus) -> Self {
        self.status = Some(status);
        self
    }
}

paginated_query!(CampaignListQuery);

#[derive(Debug, Clone)]
pub struct QuotationListQuery {
    pub hub_id: HubId,
    pub status: Option<QuotationStatus>,
    pub lead_id: Option<LeadId>,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl QuotationListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            status: None,
            lead_id: None,
            search: None,
            pagination: None,
        }
    }

    pub fn status(mut self, status: QuotationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn lead(mut self, lead_id: LeadId) -> Self {
        self.lead_id = Some(lead_id);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

paginated_query!(QuotationListQuery);

#[derive(Debug, Clone)]
pub struct InvoiceListQuery {
    pub hub_id: HubId,
    pub status: Option<InvoiceStatus>,
    pub lead_id: Option<LeadId>,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl InvoiceListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            status: None,
            lead_id: None,
            search: None,
            pagination: None,
        }
    }

    pub fn status(mut self, status: InvoiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn lead(mut self, lead_id: LeadId) -> Self {
        self.lead_id = Some(lead_id);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

paginated_query!(InvoiceListQuery);

#[derive(Debug, Clone)]
pub struct ExpenseListQuery {
    pub hub_id: HubId,
    pub employee_id: Option<EmployeeId>,
    pub status: Option<ExpenseStatus>,
    pub category: Option<String>,
    pub spent_from: Option<NaiveDate>,
    pub spent_to: Option<NaiveDate>,
    pub pagination: Option<Pagination>,
}

impl ExpenseListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            employee_id: None,
            status: None,
            category: None,
            spent_from: None,
            spent_to: None,
            pagination: None,
        }
    }

    pub fn employee(mut self, employee_id: EmployeeId) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    pub fn status(mut self, status: ExpenseStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn spent_between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.spent_from = from;
        self.spent_to = to;
        self
    }
}

paginated_query!(ExpenseListQuery);

#[derive(Debug, Clone)]
pub struct AttendanceListQuery {
    pub hub_id: HubId,
    pub employee_id: Option<EmployeeId>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub pagination: Option<Pagination>,
}

impl AttendanceListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            employee_id: None,
            from: None,
            to: None,
            pagination: None,
        }
    }

    pub fn employee(mut self, employee_id: EmployeeId) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }
}

paginated_query!(AttendanceListQuery);

#[derive(Debug, Clone)]
pub struct LeaveRequestListQuery {
    pub hub_id: HubId,
    pub employee_id: Option<EmployeeId>,
    pub status: Option<LeaveStatus>,
    pub pagination: Option<Pagination>,
}

impl LeaveRequestListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            employee_id: None,
            status: None,
            pagination: None,
        }
    }

    pub fn employee(mut self, employee_id: EmployeeId) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    pub fn status(mut self, status: LeaveStatus) -> Self {
        self.status = Some(status);
        self
    }
}

paginated_query!(LeaveRequestListQuery);

#[derive(Debug, Clone)]
pub struct JobOpeningListQuery {
    pub hub_id: HubId,
    pub status: Option<JobStatus>,
    pub pagination: Option<Pagination>,
}

impl JobOpeningListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            status: None,
            pagination: None,
        }
    }

    pub fn status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }
}

paginated_query!(JobOpeningListQuery);

#[derive(Debug, Clone)]
pub struct CandidateListQuery {
    pub hub_id: HubId,
    pub job_opening_id: Option<JobOpeningId>,
    pub stage: Option<CandidateStage>,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl CandidateListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            job_opening_id: None,
            stage: None,
            search: None,
            pagination: None,
        }
    }

    pub fn job_opening(mut self, job_opening_id: JobOpeningId) -> Self {
        self.job_opening_id = Some(job_opening_id);
        self
    }

    pub fn stage(mut self, stage: CandidateStage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

paginated_query!(CandidateListQuery);

#[derive(Debug, Clone)]
pub struct MessageListQuery {
    pub conversation_id: ConversationId,
    pub pagination: Option<Pagination>,
}

impl MessageListQuery {
    pub fn new(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id,
            pagination: None,
        }
    }
}

paginated_query!(MessageListQuery);

#[derive(Debug, Clone)]
pub struct PolicyListQuery {
    pub hub_id: HubId,
    pub category: Option<String>,
    pub active: Option<bool>,
    /// Only policies whose `effective_from` is on or before this date.
    pub effective_on: Option<NaiveDate>,
    pub pagination: Option<Pagination>,
}

impl PolicyListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            category: None,
            active: None,
            effective_on: None,
            pagination: None,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn effective_on(mut self, date: NaiveDate) -> Self {
        self.effective_on = Some(date);
        self
    }
}

paginated_query!(PolicyListQuery);

pub trait EmployeeReader {
    fn get_employee_by_id(&self, id: EmployeeId, hub_id: HubId)
    -> RepositoryResult<Option<Employee>>;
    fn get_employee_by_email(
        &self,
        email: &EmailAddress,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Employee>>;
    fn list_employees(&self, query: EmployeeListQuery) -> RepositoryResult<(usize, Vec<Employee>)>;
    /// Subset of `ids` that are active employees of the hub.
    fn filter_active_employees(
        &self,
        hub_id: HubId,
        ids: &[EmployeeId],
    ) -> RepositoryResult<Vec<EmployeeId>>;
}

pub trait EmployeeWriter {
    fn create_employee(&self, new_employee: &NewEmployee) -> RepositoryResult<Employee>;
    /// Inserts the employee or refreshes the existing `(hub_id, email)` row.
    fn upsert_employee(&self, new_employee: &NewEmployee) -> RepositoryResult<Employee>;
    fn update_employee(
        &self,
        id: EmployeeId,
        hub_id: HubId,
        updates: &UpdateEmployee,
    ) -> RepositoryResult<Employee>;
    fn deactivate_employee(&self, id: EmployeeId, hub_id: HubId) -> RepositoryResult<Employee>;
}

pub trait LeadReader {
    fn get_lead_by_id(&self, id: LeadId, hub_id: HubId) -> RepositoryResult<Option<Lead>>;
    fn list_leads(&self, query: LeadListQuery) -> RepositoryResult<(usize, Vec<Lead>)>;
    /// Number of open (not won or lost) leads per employee.
    fn count_open_leads(
        &self,
        hub_id: HubId,
        employee_ids: &[EmployeeId],
    ) -> RepositoryResult<HashMap<EmployeeId, usize>>;
    fn list_lead_activities(
        &self,
        query: LeadActivityListQuery,
    ) -> RepositoryResult<(usize, Vec<LeadActivity>)>;
}

pub trait LeadWriter {
    fn create_lead(&self, new_lead: &NewLead) -> RepositoryResult<Lead>;
    /// Inserts all leads in one transaction.
    fn create_leads(&self, new_leads: &[NewLead]) -> RepositoryResult<usize>;
    fn update_lead(&self, id: LeadId, hub_id: HubId, updates: &UpdateLead)
    -> RepositoryResult<Lead>;
    fn delete_lead(&self, id: LeadId, hub_id: HubId) -> RepositoryResult<()>;
    fn update_lead_status(
        &self,
        id: LeadId,
        hub_id: HubId,
        status: LeadStatus,
        activity: &NewLeadActivity,
    ) -> RepositoryResult<Lead>;
    fn assign_lead(
        &self,
        id: LeadId,
        hub_id: HubId,
        assignee: Option<EmployeeId>,
        activity: &NewLeadActivity,
    ) -> RepositoryResult<Lead>;
    fn create_lead_activity(&self, activity: &NewLeadActivity) -> RepositoryResult<LeadActivity>;
}

pub trait AssignmentReader {
    /// Stored settings, or [`AssignmentSettings::manual`] for new hubs.
    fn get_assignment_settings(&self, hub_id: HubId) -> RepositoryResult<AssignmentSettings>;
}

pub trait AssignmentWriter {
    /// Replaces mode and pool of the hub.
    fn save_assignment_settings(
        &self,
        settings: &AssignmentSettings,
    ) -> RepositoryResult<AssignmentSettings>;
    fn record_last_assigned(&self, hub_id: HubId, employee_id: EmployeeId)
    -> RepositoryResult<()>;
}

pub trait CampaignReader {
    fn get_campaign_by_id(&self, id: CampaignId, hub_id: HubId)
    -> RepositoryResult<Option<Campaign>>;
    fn list_campaigns(&self, query: CampaignListQuery) -> RepositoryResult<(usize, Vec<Campaign>)>;
    /// Status and value of every lead attributed to the campaign.
    fn list_campaign_lead_outcomes(
        &self,
        id: CampaignId,
        hub_id: HubId,
    ) -> RepositoryResult<Vec<(LeadStatus, Money)>>;
}

pub trait CampaignWriter {
    fn create_campaign(&self, new_campaign: &NewCampaign) -> RepositoryResult<Campaign>;
    fn update_campaign(
        &self,
        id: CampaignId,
        hub_id: HubId,
        details: &CampaignDetails,
    ) -> RepositoryResult<Campaign>;
    fn delete_campaign(&self, id: CampaignId, hub_id: HubId) -> RepositoryResult<()>;
}

pub trait QuotationReader {
    fn get_quotation_by_id(
        &self,
        id: QuotationId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Quotation>>;
    fn list_quotations(&self, query: QuotationListQuery)
    -> RepositoryResult<(usize, Vec<Quotation>)>;
    /// Draft or sent quotations of every hub whose validity ended before `today`.
    fn list_lapsed_quotations(&self, today: NaiveDate) -> RepositoryResult<Vec<Quotation>>;
}

pub trait QuotationWriter {
    /// Stores the quotation under the next `QUO-` number of its hub.
    fn create_quotation(&self, new_quotation: &NewQuotation) -> RepositoryResult<Quotation>;
    fn update_quotation(
        &self,
        id: QuotationId,
        hub_id: HubId,
        draft: &QuotationDraft,
    ) -> RepositoryResult<Quotation>;
    fn delete_quotation(&self, id: QuotationId, hub_id: HubId) -> RepositoryResult<()>;
    /// Moves `quotation` out of its stored status. Fails with a constraint
    /// violation when the row no longer carries that status.
    fn set_quotation_status(
        &self,
        quotation: &Quotation,
        status: QuotationStatus,
    ) -> RepositoryResult<Quotation>;
}

pub trait InvoiceReader {
    fn get_invoice_by_id(&self, id: InvoiceId, hub_id: HubId) -> RepositoryResult<Option<Invoice>>;
    fn get_invoice_by_public_id(&self, public_id: &PublicId) -> RepositoryResult<Option<Invoice>>;
    fn list_invoices(&self, query: InvoiceListQuery) -> RepositoryResult<(usize, Vec<Invoice>)>;
    fn invoice_exists_for_quotation(&self, quotation_id: QuotationId) -> RepositoryResult<bool>;
    fn list_payments(&self, invoice_id: InvoiceId) -> RepositoryResult<Vec<Payment>>;
    fn get_payment_by_id(
        &self,
        id: PaymentId,
        invoice_id: InvoiceId,
    ) -> RepositoryResult<Option<Payment>>;
    /// Unpaid or partially paid invoices of every hub due before `today`.
    fn list_invoices_due_before(&self, today: NaiveDate) -> RepositoryResult<Vec<Invoice>>;
}

pub trait InvoiceWriter {
    /// Stores the invoice as a draft under the next `INV-` number of its hub.
    fn create_invoice(&self, new_invoice: &NewInvoice) -> RepositoryResult<Invoice>;
    fn update_invoice(
        &self,
        id: InvoiceId,
        hub_id: HubId,
        draft: &InvoiceDraft,
    ) -> RepositoryResult<Invoice>;
    fn delete_invoice(&self, id: InvoiceId, hub_id: HubId) -> RepositoryResult<()>;
    /// Moves `invoice` out of its stored status. Fails with a constraint
    /// violation when the status or the paid amount changed meanwhile.
    fn set_invoice_status(
        &self,
        invoice: &Invoice,
        status: InvoiceStatus,
    ) -> RepositoryResult<Invoice>;
    /// Inserts the payment and applies `settlement` to `invoice` atomically.
    /// Fails with a constraint violation when the invoice changed meanwhile.
    fn record_payment(
        &self,
        invoice: &Invoice,
        payment: &NewPayment,
        settlement: &Settlement,
    ) -> RepositoryResult<(Invoice, Payment)>;
    /// Removes the payment and applies `settlement` to `invoice` atomically.
    /// Fails with a constraint violation when the invoice changed meanwhile.
    fn delete_payment(
        &self,
        invoice: &Invoice,
        payment_id: PaymentId,
        settlement: &Settlement,
    ) -> RepositoryResult<Invoice>;
}

pub trait ExpenseReader {
    fn get_expense_by_id(&self, id: ExpenseId, hub_id: HubId) -> RepositoryResult<Option<Expense>>;
    fn list_expenses(&self, query: ExpenseListQuery) -> RepositoryResult<(usize, Vec<Expense>)>;
}

pub trait ExpenseWriter {
    fn create_expense(&self, new_expense: &NewExpense) -> RepositoryResult<Expense>;
    fn update_expense(
        &self,
        id: ExpenseId,
        hub_id: HubId,
        details: &ExpenseDetails,
    ) -> RepositoryResult<Expense>;
    fn delete_expense(&self, id: ExpenseId, hub_id: HubId) -> RepositoryResult<()>;
    fn set_expense_status(
        &self,
        id: ExpenseId,
        hub_id: HubId,
        status: ExpenseStatus,
        reviewer: EmployeeId,
    ) -> RepositoryResult<Expense>;
}

pub trait AttendanceReader {
    fn get_attendance_for_day(
        &self,
        employee_id: EmployeeId,
        hub_id: HubId,
        work_date: NaiveDate,
    ) -> RepositoryResult<Option<Attendance>>;
    fn list_attendance(
        &self,
        query: AttendanceListQuery,
    ) -> RepositoryResult<(usize, Vec<Attendance>)>;
}

pub trait AttendanceWriter {
    /// Inserts the record or replaces the one stored for the same day.
    fn upsert_attendance(&self, record: &NewAttendance) -> RepositoryResult<Attendance>;
    fn record_check_out(
        &self,
        id: AttendanceId,
        check_out: NaiveTime,
        status: AttendanceStatus,
    ) -> RepositoryResult<Attendance>;
}

pub trait LeaveReader {
    fn get_leave_type_by_id(
        &self,
        id: LeaveTypeId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<LeaveType>>;
    fn list_leave_types(&self, hub_id: HubId) -> RepositoryResult<Vec<LeaveType>>;
    fn get_leave_request_by_id(
        &self,
        id: LeaveRequestId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<LeaveRequest>>;
    fn list_leave_requests(
        &self,
        query: LeaveRequestListQuery,
    ) -> RepositoryResult<(usize, Vec<LeaveRequest>)>;
}

pub trait LeaveWriter {
    fn create_leave_type(&self, new_type: &NewLeaveType) -> RepositoryResult<LeaveType>;
    fn update_leave_type(
        &self,
        id: LeaveTypeId,
        updates: &NewLeaveType,
    ) -> RepositoryResult<LeaveType>;
    fn delete_leave_type(&self, id: LeaveTypeId, hub_id: HubId) -> RepositoryResult<()>;
    fn create_leave_request(&self, request: &NewLeaveRequest) -> RepositoryResult<LeaveRequest>;
    /// Stores the decision; approval marks the covered weekdays as leave in
    /// attendance within the same transaction.
    fn review_leave_request(
        &self,
        request: &LeaveRequest,
        status: LeaveStatus,
        reviewer: EmployeeId,
    ) -> RepositoryResult<LeaveRequest>;
    /// Cancels the request and clears attendance marks it created.
    fn cancel_leave_request(&self, request: &LeaveRequest) -> RepositoryResult<LeaveRequest>;
}

pub trait RecruitmentReader {
    fn get_job_opening_by_id(
        &self,
        id: JobOpeningId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<JobOpening>>;
    fn list_job_openings(
        &self,
        query: JobOpeningListQuery,
    ) -> RepositoryResult<(usize, Vec<JobOpening>)>;
    fn get_candidate_by_id(
        &self,
        id: CandidateId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Candidate>>;
    fn list_candidates(&self, query: CandidateListQuery)
    -> RepositoryResult<(usize, Vec<Candidate>)>;
}

pub trait RecruitmentWriter {
    fn create_job_opening(
        &self,
        hub_id: HubId,
        details: &JobOpeningDetails,
    ) -> RepositoryResult<JobOpening>;
    fn update_job_opening(
        &self,
        id: JobOpeningId,
        hub_id: HubId,
        details: &JobOpeningDetails,
    ) -> RepositoryResult<JobOpening>;
    fn delete_job_opening(&self, id: JobOpeningId, hub_id: HubId) -> RepositoryResult<()>;
    fn create_candidate(&self, new_candidate: &NewCandidate) -> RepositoryResult<Candidate>;
    fn update_candidate(
        &self,
        id: CandidateId,
        hub_id: HubId,
        details: &CandidateDetails,
    ) -> RepositoryResult<Candidate>;
    fn delete_candidate(&self, id: CandidateId, hub_id: HubId) -> RepositoryResult<()>;
    fn set_candidate_stage(
        &self,
        id: CandidateId,
        hub_id: HubId,
        stage: CandidateStage,
    ) -> RepositoryResult<Candidate>;
    /// Marks the candidate hired and upserts their employee row atomically.
    fn hire_candidate(
        &self,
        id: CandidateId,
        hub_id: HubId,
        employee: &NewEmployee,
    ) -> RepositoryResult<(Candidate, Employee)>;
}

pub trait MessengerReader {
    fn get_conversation_by_id(
        &self,
        id: ConversationId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Conversation>>;
    /// Conversations of the employee, most recently active first.
    fn list_conversations(
        &self,
        employee_id: EmployeeId,
        hub_id: HubId,
    ) -> RepositoryResult<Vec<ConversationPreview>>;
    fn list_messages(&self, query: MessageListQuery) -> RepositoryResult<(usize, Vec<Message>)>;
}

pub trait MessengerWriter {
    fn create_conversation(
        &self,
        new_conversation: &NewConversation,
    ) -> RepositoryResult<Conversation>;
    /// Stores the message and bumps the conversation's `updated_at`.
    fn create_message(&self, new_message: &NewMessage) -> RepositoryResult<Message>;
}

pub trait PolicyReader {
    fn get_policy_by_id(&self, id: PolicyId, hub_id: HubId)
    -> RepositoryResult<Option<CompanyPolicy>>;
    fn list_policies(&self, query: PolicyListQuery)
    -> RepositoryResult<(usize, Vec<CompanyPolicy>)>;
}

pub trait PolicyWriter {
    fn create_policy(&self, new_policy: &NewCompanyPolicy) -> RepositoryResult<CompanyPolicy>;
    fn update_policy(
        &self,
        id: PolicyId,
        hub_id: HubId,
        details: &PolicyDetails,
    ) -> RepositoryResult<CompanyPolicy>;
    fn delete_policy(&self, id: PolicyId, hub_id: HubId) -> RepositoryResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("acme"), "%acme%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
