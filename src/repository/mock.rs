//! Mock repository implementations for isolating services in tests.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use mockall::mock;

use crate::domain::attendance::{Attendance, AttendanceStatus, NewAttendance};
use crate::domain::campaign::{Campaign, CampaignDetails, NewCampaign};
use crate::domain::employee::{Employee, NewEmployee, UpdateEmployee};
use crate::domain::expense::{Expense, ExpenseDetails, ExpenseStatus, NewExpense};
use crate::domain::invoice::{
    Invoice, InvoiceDraft, InvoiceStatus, NewInvoice, NewPayment, Payment, Settlement,
};
use crate::domain::lead::{Lead, LeadStatus, NewLead, UpdateLead};
use crate::domain::lead_activity::{LeadActivity, NewLeadActivity};
use crate::domain::lead_assignment::AssignmentSettings;
use crate::domain::leave::{LeaveRequest, LeaveStatus, LeaveType, NewLeaveRequest, NewLeaveType};
use crate::domain::messenger::{
    Conversation, ConversationPreview, Message, NewConversation, NewMessage,
};
use crate::domain::policy::{CompanyPolicy, NewCompanyPolicy, PolicyDetails};
use crate::domain::quotation::{NewQuotation, Quotation, QuotationDraft, QuotationStatus};
use crate::domain::recruitment::{
    Candidate, CandidateDetails, CandidateStage, JobOpening, JobOpeningDetails, NewCandidate,
};
use crate::domain::types::{
    AttendanceId, CampaignId, CandidateId, ConversationId, EmailAddress, EmployeeId, ExpenseId,
    HubId, InvoiceId, JobOpeningId, LeadId, LeaveRequestId, LeaveTypeId, Money, PaymentId,
    PolicyId, PublicId, QuotationId,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AssignmentReader, AssignmentWriter, AttendanceListQuery, AttendanceReader, AttendanceWriter,
    CampaignListQuery, CampaignReader, CampaignWriter, CandidateListQuery, EmployeeListQuery,
    EmployeeReader, EmployeeWriter, ExpenseListQuery, ExpenseReader, ExpenseWriter,
    InvoiceListQuery, InvoiceReader, InvoiceWriter, JobOpeningListQuery, LeadActivityListQuery,
    LeadListQuery, LeadReader, LeadWriter, LeaveReader, LeaveRequestListQuery, LeaveWriter,
    MessageListQuery, MessengerReader, MessengerWriter, PolicyListQuery, PolicyReader,
    PolicyWriter, QuotationListQuery, QuotationReader, QuotationWriter, RecruitmentReader,
    RecruitmentWriter,
};

mock! {
    pub Repository {}

    impl EmployeeReader for Repository {
        fn get_employee_by_id(&self, id: EmployeeId, hub_id: HubId)
        -> RepositoryResult<Option<Employee>>;
        fn get_employee_by_email(
            &self,
            email: &EmailAddress,
            hub_id: HubId,
        ) -> RepositoryResult<Option<Employee>>;
        fn list_employees(&self, query: EmployeeListQuery) -> RepositoryResult<(usize, Vec<Employee>)>;
        fn filter_active_employees(
            &self,
            hub_id: HubId,
            ids: &[EmployeeId],
        ) -> RepositoryResult<Vec<EmployeeId>>;
    }

    impl EmployeeWriter for Repository {
        fn create_employee(&self, new_employee: &NewEmployee) -> RepositoryResult<Employee>;
        fn upsert_employee(&self, new_employee: &NewEmployee) -> RepositoryResult<Employee>;
        fn update_employee(
            &self,
            id: EmployeeId,
            hub_id: HubId,
            updates: &UpdateEmployee,
        ) -> RepositoryResult<Employee>;
        fn deactivate_employee(&self, id: EmployeeId, hub_id: HubId) -> RepositoryResult<Employee>;
    }

    impl LeadReader for Repository {
        fn get_lead_by_id(&self, id: LeadId, hub_id: HubId) -> RepositoryResult<Option<Lead>>;
        fn list_leads(&self, query: LeadListQuery) -> RepositoryResult<(usize, Vec<Lead>)>;
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

    impl LeadWriter for Repository {
        fn create_lead(&self, new_lead: &NewLead) -> RepositoryResult<Lead>;
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

    impl AssignmentReader for Repository {
        fn get_assignment_settings(&self, hub_id: HubId) -> RepositoryResult<AssignmentSettings>;
    }

    impl AssignmentWriter for Repository {
        fn save_assignment_settings(
            &self,
            settings: &AssignmentSettings,
        ) -> RepositoryResult<AssignmentSettings>;
        fn record_last_assigned(&self, hub_id: HubId, employee_id: EmployeeId)
        -> RepositoryResult<()>;
    }

    impl CampaignReader for Repository {
        fn get_campaign_by_id(&self, id: CampaignId, hub_id: HubId)
        -> RepositoryResult<Option<Campaign>>;
        fn list_campaigns(&self, query: CampaignListQuery) -> RepositoryResult<(usize, Vec<Campaign>)>;
        fn list_campaign_lead_outcomes(
            &self,
            id: CampaignId,
            hub_id: HubId,
        ) -> RepositoryResult<Vec<(LeadStatus, Money)>>;
    }

    impl CampaignWriter for Repository {
        fn create_campaign(&self, new_campaign: &NewCampaign) -> RepositoryResult<Campaign>;
        fn update_campaign(
            &self,
            id: CampaignId,
            hub_id: HubId,
            details: &CampaignDetails,
        ) -> RepositoryResult<Campaign>;
        fn delete_campaign(&self, id: CampaignId, hub_id: HubId) -> RepositoryResult<()>;
    }

    impl QuotationReader for Repository {
        fn get_quotation_by_id(
            &self,
            id: QuotationId,
            hub_id: HubId,
        ) -> RepositoryResult<Option<Quotation>>;
        fn list_quotations(&self, query: QuotationListQuery)
        -> RepositoryResult<(usize, Vec<Quotation>)>;
        fn list_lapsed_quotations(&self, today: NaiveDate) -> RepositoryResult<Vec<Quotation>>;
    }

    impl QuotationWriter for Repository {
        fn create_quotation(&self, new_quotation: &NewQuotation) -> RepositoryResult<Quotation>;
        fn update_quotation(
            &self,
            id: QuotationId,
            hub_id: HubId,
            draft: &QuotationDraft,
        ) -> RepositoryResult<Quotation>;
        fn delete_quotation(&self, id: QuotationId, hub_id: HubId) -> RepositoryResult<()>;
        fn set_quotation_status(
            &self,
            quotation: &Quotation,
            status: QuotationStatus,
        ) -> RepositoryResult<Quotation>;
    }

    impl InvoiceReader for Repository {
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
        fn list_invoices_due_before(&self, today: NaiveDate) -> RepositoryResult<Vec<Invoice>>;
    }

    impl InvoiceWriter for Repository {
        fn create_invoice(&self, new_invoice: &NewInvoice) -> RepositoryResult<Invoice>;
        fn update_invoice(
            &self,
            id: InvoiceId,
            hub_id: HubId,
            draft: &InvoiceDraft,
        ) -> RepositoryResult<Invoice>;
        fn delete_invoice(&self, id: InvoiceId, hub_id: HubId) -> RepositoryResult<()>;
        fn set_invoice_status(
            &self,
            invoice: &Invoice,
            status: InvoiceStatus,
        ) -> RepositoryResult<Invoice>;
        fn record_payment(
            &self,
            invoice: &Invoice,
            payment: &NewPayment,
            settlement: &Settlement,
        ) -> RepositoryResult<(Invoice, Payment)>;
        fn delete_payment(
            &self,
            invoice: &Invoice,
            payment_id: PaymentId,
            settlement: &Settlement,
        ) -> RepositoryResult<Invoice>;
    }

    impl ExpenseReader for Repository {
        fn get_expense_by_id(&self, id: ExpenseId, hub_id: HubId) -> RepositoryResult<Option<Expense>>;
        fn list_expenses(&self, query: ExpenseListQuery) -> RepositoryResult<(usize, Vec<Expense>)>;
    }

    impl ExpenseWriter for Repository {
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

    impl AttendanceReader for Repository {
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

    impl AttendanceWriter for Repository {
        fn upsert_attendance(&self, record: &NewAttendance) -> RepositoryResult<Attendance>;
        fn record_check_out(
            &self,
            id: AttendanceId,
            check_out: NaiveTime,
            status: AttendanceStatus,
        ) -> RepositoryResult<Attendance>;
    }

    impl LeaveReader for Repository {
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

    impl LeaveWriter for Repository {
        fn create_leave_type(&self, new_type: &NewLeaveType) -> RepositoryResult<LeaveType>;
        fn update_leave_type(
            &self,
            id: LeaveTypeId,
            updates: &NewLeaveType,
        ) -> RepositoryResult<LeaveType>;
        fn delete_leave_type(&self, id: LeaveTypeId, hub_id: HubId) -> RepositoryResult<()>;
        fn create_leave_request(&self, request: &NewLeaveRequest) -> RepositoryResult<LeaveRequest>;
        fn review_leave_request(
            &self,
            request: &LeaveRequest,
            status: LeaveStatus,
            reviewer: EmployeeId,
        ) -> RepositoryResult<LeaveRequest>;
        fn cancel_leave_request(&self, request: &LeaveRequest) -> RepositoryResult<LeaveRequest>;
    }

    impl RecruitmentReader for Repository {
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

    impl RecruitmentWriter for Repository {
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
        fn hire_candidate(
            &self,
            id: CandidateId,
            hub_id: HubId,
            employee: &NewEmployee,
        ) -> RepositoryResult<(Candidate, Employee)>;
    }

    impl MessengerReader for Repository {
        fn get_conversation_by_id(
            &self,
            id: ConversationId,
            hub_id: HubId,
        ) -> RepositoryResult<Option<Conversation>>;
        fn list_conversations(
            &self,
            employee_id: EmployeeId,
            hub_id: HubId,
        ) -> RepositoryResult<Vec<ConversationPreview>>;
        fn list_messages(&self, query: MessageListQuery) -> RepositoryResult<(usize, Vec<Message>)>;
    }

    impl MessengerWriter for Repository {
        fn create_conversation(
            &self,
            new_conversation: &NewConversation,
        ) -> RepositoryResult<Conversation>;
        fn create_message(&self, new_message: &NewMessage) -> RepositoryResult<Message>;
    }

    impl PolicyReader for Repository {
        fn get_policy_by_id(&self, id: PolicyId, hub_id: HubId)
        -> RepositoryResult<Option<CompanyPolicy>>;
        fn list_policies(&self, query: PolicyListQuery)
        -> RepositoryResult<(usize, Vec<CompanyPolicy>)>;
    }

    impl PolicyWriter for Repository {
        fn create_policy(&self, new_policy: &NewCompanyPolicy) -> RepositoryResult<CompanyPolicy>;
        fn update_policy(
            &self,
            id: PolicyId,
            hub_id: HubId,
            details: &PolicyDetails,
        ) -> RepositoryResult<CompanyPolicy>;
        fn delete_policy(&self, id: PolicyId, hub_id: HubId) -> RepositoryResult<()>;
    }
}
