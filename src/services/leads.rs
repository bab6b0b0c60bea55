//! Lead pipeline: filtering, ownership, status changes and imports.

use crate::auth::{AuthenticatedUser, check_role, ensure_role};
use crate::domain::employee::Employee;
use crate::domain::lead::{Lead, LeadStatus, UpdateLead};
use crate::domain::lead_activity::{LeadActivity, NewLeadActivity};
use crate::domain::types::{CampaignId, EmployeeId, HubId, LeadId};
use crate::dto::PageParams;
use crate::dto::leads::{ImportResult, LeadListParams};
use crate::forms::leads::{
    ActivityInput, AddActivityForm, AddLeadForm, AssignLeadForm, ChangeLeadStatusForm,
    UpdateLeadForm, UploadLeadsForm,
};
use crate::pagination::{PageRequest, Paginated};
use crate::repository::{
    AssignmentReader, AssignmentWriter, CampaignReader, EmployeeReader, EmployeeWriter,
    LeadActivityListQuery, LeadListQuery, LeadReader, LeadWriter,
};
use crate::services::employees::current_employee;
use crate::services::lead_assignment::Assigner;
use crate::services::{
    ServiceError, ServiceResult, ensure_hub_campaign, text_filter, variant_filter,
};
use crate::{SERVICE_ADMIN_ROLE, SERVICE_SALES_ROLE};

fn is_admin(user: &AuthenticatedUser) -> bool {
    check_role(SERVICE_ADMIN_ROLE, &user.roles)
}

/// Loads a lead the user may work on. Sales users without admin rights only
/// reach leads assigned to them.
fn accessible_lead<R>(
    id: LeadId,
    hub_id: HubId,
    me: &Employee,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Lead>
where
    R: LeadReader + ?Sized,
{
    let lead = repo
        .get_lead_by_id(id, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    if is_admin(user) || lead.is_assigned_to(me.id) {
        Ok(lead)
    } else {
        log::info!("Employee {} denied access to lead {id}", me.id);
        Err(ServiceError::Unauthorized)
    }
}

/// Rejects assignees that are unknown or deactivated in the hub.
fn ensure_active_assignee<R>(hub_id: HubId, assignee: EmployeeId, repo: &R) -> ServiceResult<()>
where
    R: EmployeeReader + ?Sized,
{
    if repo.filter_active_employees(hub_id, &[assignee])?.is_empty() {
        return Err(ServiceError::Form(format!(
            "employee {assignee} is not an active employee of the hub"
        )));
    }
    Ok(())
}

pub fn list_leads<R>(
    params: &LeadListParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<Lead>>
where
    R: LeadReader + EmployeeReader + EmployeeWriter + ?Sized,
{
    ensure_role(user, SERVICE_SALES_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let page = PageRequest::new(params.page, params.per_page);

    let mut query = LeadListQuery::new(hub_id)
        .created_between(params.created_from, params.created_to)
        .paginate(page.page, page.per_page);
    if let Some(status) = variant_filter::<LeadStatus>("status", params.status.as_deref())? {
        query = query.status(status);
    }
    if let Some(source) = text_filter(params.source.as_deref()) {
        query = query.source(source);
    }
    if let Some(campaign_id) = params.campaign_id {
        query = query.campaign(CampaignId::new(campaign_id)?);
    }
    if let Some(search) = text_filter(params.search.as_deref()) {
        query = query.search(search);
    }
    if is_admin(user) {
        if let Some(assigned_to) = params.assigned_to {
            query = query.assigned_to(EmployeeId::new(assigned_to)?);
        }
    } else {
        let me = current_employee(user, repo)?;
        query = query.assigned_to(me.id);
    }

    let (total, leads) = repo.list_leads(query)?;
    Ok(Paginated::new(leads, total, page))
}

pub fn get_lead<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Lead>
where
    R: LeadReader + EmployeeReader + EmployeeWriter + ?Sized,
{
    ensure_role(user, SERVICE_SALES_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let me = current_employee(user, repo)?;
    accessible_lead(LeadId::new(id)?, hub_id, &me, user, repo)
}

/// Creates a lead. Without an explicit assignee the hub's assignment
/// settings pick one; any assignment is recorded as an activity.
pub fn create_lead<R>(form: AddLeadForm, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Lead>
where
    R: LeadReader
        + LeadWriter
        + CampaignReader
        + EmployeeReader
        + EmployeeWriter
        + AssignmentReader
        + AssignmentWriter
        + ?Sized,
{
    ensure_role(user, SERVICE_SALES_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let me = current_employee(user, repo)?;
    let mut new_lead = form.into_domain(hub_id)?;
    ensure_hub_campaign(hub_id, new_lead.campaign_id, repo)?;

    let mut assigner = None;
    match new_lead.assigned_to {
        Some(assignee) => ensure_active_assignee(hub_id, assignee, repo)?,
        None => {
            let mut round_robin = Assigner::load(hub_id, repo)?;
            new_lead.assigned_to = round_robin.next();
            assigner = Some(round_robin);
        }
    }

    let lead = repo.create_lead(&new_lead).map_err(|err| {
        log::warn!("Failed to create lead in hub {hub_id}: {err}");
        err
    })?;
    if let Some(assigner) = assigner {
        assigner.finish(repo)?;
    }

    if lead.assigned_to.is_some() {
        let activity = NewLeadActivity::assignment(lead.id, me.id, None, lead.assigned_to);
        repo.create_lead_activity(&activity)?;
    }
    Ok(lead)
}

pub fn update_lead<R>(
    id: i32,
    form: UpdateLeadForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Lead>
where
    R: LeadReader + LeadWriter + CampaignReader + EmployeeReader + EmployeeWriter + ?Sized,
{
    ensure_role(user, SERVICE_SALES_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let me = current_employee(user, repo)?;
    let lead = accessible_lead(LeadId::new(id)?, hub_id, &me, user, repo)?;
    let updates = UpdateLead::try_from(form)?;
    ensure_hub_campaign(hub_id, updates.campaign_id, repo)?;

    Ok(repo.update_lead(lead.id, hub_id, &updates)?)
}

pub fn delete_lead<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: LeadWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let id = LeadId::new(id)?;

    repo.delete_lead(id, hub_id)?;
    log::info!("Deleted lead {id} of hub {hub_id}");
    Ok(())
}

/// Moves the lead to another pipeline stage and logs the move. Setting the
/// current status again is a no-op.
pub fn change_status<R>(
    id: i32,
    form: ChangeLeadStatusForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Lead>
where
    R: LeadReader + LeadWriter + EmployeeReader + EmployeeWriter + ?Sized,
{
    ensure_role(user, SERVICE_SALES_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let me = current_employee(user, repo)?;
    let lead = accessible_lead(LeadId::new(id)?, hub_id, &me, user, repo)?;
    let status = form.status()?;

    if lead.status == status {
        return Ok(lead);
    }

    let activity = NewLeadActivity::status_change(lead.id, me.id, lead.status, status);
    Ok(repo.update_lead_status(lead.id, hub_id, status, &activity)?)
}

pub fn assign_lead<R>(
    id: i32,
    form: AssignLeadForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Lead>
where
    R: LeadReader + LeadWriter + EmployeeReader + EmployeeWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let me = current_employee(user, repo)?;
    let lead = repo
        .get_lead_by_id(LeadId::new(id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    let assignee = form.assignee()?;

    if let Some(assignee) = assignee {
        ensure_active_assignee(hub_id, assignee, repo)?;
    }
    if lead.assigned_to == assignee {
        return Ok(lead);
    }

    let activity = NewLeadActivity::assignment(lead.id, me.id, lead.assigned_to, assignee);
    Ok(repo.assign_lead(lead.id, hub_id, assignee, &activity)?)
}

/// Imports every row of the uploaded CSV or none of them.
pub fn import_leads<R>(
    form: &UploadLeadsForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ImportResult>
where
    R: LeadReader + LeadWriter + EmployeeReader + AssignmentReader + AssignmentWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let mut leads = form.parse(hub_id).map_err(|err| {
        log::info!("Rejected lead upload for hub {hub_id}: {err}");
        err
    })?;

    let mut assigner = Assigner::load(hub_id, repo)?;
    let mut assigned = 0;
    for lead in &mut leads {
        lead.assigned_to = assigner.next();
        if lead.assigned_to.is_some() {
            assigned += 1;
        }
    }

    let imported = repo.create_leads(&leads).map_err(|err| {
        log::error!("Failed to import {} leads into hub {hub_id}: {err}", leads.len());
        err
    })?;
    assigner.finish(repo)?;

    log::info!("Imported {imported} leads into hub {hub_id}, {assigned} assigned");
    Ok(ImportResult { imported, assigned })
}

pub fn list_activities<R>(
    id: i32,
    params: &PageParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<LeadActivity>>
where
    R: LeadReader + EmployeeReader + EmployeeWriter + ?Sized,
{
    ensure_role(user, SERVICE_SALES_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let me = current_employee(user, repo)?;
    let lead = accessible_lead(LeadId::new(id)?, hub_id, &me, user, repo)?;
    let page = params.request();

    let query = LeadActivityListQuery::new(lead.id).paginate(page.page, page.per_page);
    let (total, activities) = repo.list_lead_activities(query)?;
    Ok(Paginated::new(activities, total, page))
}

pub fn add_activity<R>(
    id: i32,
    form: AddActivityForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<LeadActivity>
where
    R: LeadReader + LeadWriter + EmployeeReader + EmployeeWriter + ?Sized,
{
    ensure_role(user, SERVICE_SALES_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let me = current_employee(user, repo)?;
    let lead = accessible_lead(LeadId::new(id)?, hub_id, &me, user, repo)?;
    let input = ActivityInput::try_from(form)?;

    let activity = NewLeadActivity::new(lead.id, me.id, input.activity_type, input.data);
    Ok(repo.create_lead_activity(&activity)?)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::SERVICE_ACCESS_ROLE;
    use crate::domain::lead::LeadSource;
    use crate::domain::lead_activity::ActivityType;
    use crate::domain::lead_assignment::{AssignmentMode, AssignmentSettings};
    use crate::domain::types::{LeadName, Money};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::employees::tests::{employee, user_with};

    fn sales() -> AuthenticatedUser {
        user_with(&[SERVICE_ACCESS_ROLE, SERVICE_SALES_ROLE])
    }

    fn admin() -> AuthenticatedUser {
        user_with(&[SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE])
    }

    fn lead(id: i32, assigned_to: Option<i32>) -> Lead {
        let now = Utc::now().naive_utc();
        Lead {
            id: LeadId::new(id).expect("valid id"),
            hub_id: HubId::new(42).expect("valid hub"),
            name: LeadName::new("Acme").expect("valid name"),
            email: None,
            phone: None,
            company: None,
            source: LeadSource::Website,
            status: LeadStatus::New,
            value: Money::ZERO,
            assigned_to: assigned_to.map(|id| EmployeeId::new(id).expect("valid id")),
            campaign_id: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn me_is(repo: &mut MockRepository, id: i32) {
        repo.expect_get_employee_by_email()
            .returning(move |_, _| Ok(Some(employee(id, "jane@example.com"))));
    }

    fn add_form() -> AddLeadForm {
        AddLeadForm {
            name: "Acme".into(),
            email: None,
            phone: None,
            company: None,
            source: "Website".into(),
            status: None,
            value: 0,
            assigned_to: None,
            campaign_id: None,
            notes: None,
        }
    }

    #[test]
    fn sales_users_only_list_their_own_leads() {
        let mut repo = MockRepository::new();
        me_is(&mut repo, 7);
        repo.expect_list_leads()
            .withf(|query| {
                query.assigned_to == Some(EmployeeId::new(7).expect("valid id"))
                    && query.status == Some(LeadStatus::Won)
            })
            .times(1)
            .returning(|_| Ok((0, vec![])));

        let params = LeadListParams {
            status: Some("Won".into()),
            assigned_to: Some(99),
            ..Default::default()
        };
        let page = list_leads(&params, &sales(), &repo).expect("list succeeds");
        assert_eq!(page.total, 0);
    }

    #[test]
    fn unknown_status_filter_is_a_form_error() {
        let repo = MockRepository::new();
        let params = LeadListParams {
            status: Some("Dormant".into()),
            ..Default::default()
        };
        let result = list_leads(&params, &admin(), &repo);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn foreign_lead_is_forbidden_for_sales() {
        let mut repo = MockRepository::new();
        me_is(&mut repo, 7);
        repo.expect_get_lead_by_id()
            .returning(|_, _| Ok(Some(lead(1, Some(8)))));

        assert!(matches!(
            get_lead(1, &sales(), &repo),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn status_change_records_activity() {
        let mut repo = MockRepository::new();
        me_is(&mut repo, 7);
        repo.expect_get_lead_by_id()
            .returning(|_, _| Ok(Some(lead(1, Some(7)))));
        repo.expect_update_lead_status()
            .withf(|_, _, status, activity| {
                *status == LeadStatus::Qualified
                    && activity.activity_type == ActivityType::StatusChange
                    && activity.activity_data["from"] == "New"
                    && activity.activity_data["to"] == "Qualified"
            })
            .times(1)
            .returning(|_, _, status, _| {
                let mut updated = lead(1, Some(7));
                updated.status = status;
                Ok(updated)
            });

        let form = ChangeLeadStatusForm {
            status: "Qualified".into(),
        };
        let updated = change_status(1, form, &sales(), &repo).expect("status changes");
        assert_eq!(updated.status, LeadStatus::Qualified);
    }

    #[test]
    fn unassigned_lead_goes_through_round_robin() {
        let mut repo = MockRepository::new();
        me_is(&mut repo, 7);
        repo.expect_get_assignment_settings().returning(|hub_id| {
            Ok(AssignmentSettings {
                hub_id,
                mode: AssignmentMode::RoundRobin,
                pool: vec![EmployeeId::new(3).expect("valid id")],
                last_assigned: None,
            })
        });
        repo.expect_filter_active_employees()
            .returning(|_, ids| Ok(ids.to_vec()));
        repo.expect_record_last_assigned()
            .times(1)
            .returning(|_, _| Ok(()));
        repo.expect_create_lead()
            .withf(|new| new.assigned_to == Some(EmployeeId::new(3).expect("valid id")))
            .times(1)
            .returning(|_| Ok(lead(10, Some(3))));
        repo.expect_create_lead_activity()
            .withf(|activity| activity.activity_type == ActivityType::Assignment)
            .times(1)
            .returning(|activity| {
                Ok(LeadActivity {
                    id: crate::domain::types::LeadActivityId::new(1).expect("valid id"),
                    lead_id: activity.lead_id,
                    employee_id: activity.employee_id,
                    activity_type: activity.activity_type.clone(),
                    activity_data: activity.activity_data.clone(),
                    created_at: activity.created_at,
                })
            });

        let created = create_lead(add_form(), &sales(), &repo).expect("lead is created");
        assert_eq!(created.assigned_to.map(|id| id.get()), Some(3));
    }

    #[test]
    fn explicit_inactive_assignee_is_rejected() {
        let mut repo = MockRepository::new();
        me_is(&mut repo, 7);
        repo.expect_filter_active_employees()
            .returning(|_, _| Ok(vec![]));
        repo.expect_create_lead().times(0);

        let mut form = add_form();
        form.assigned_to = Some(12);
        assert!(matches!(
            create_lead(form, &sales(), &repo),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn failed_insert_keeps_round_robin_cursor() {
        let mut repo = MockRepository::new();
        me_is(&mut repo, 7);
        repo.expect_get_assignment_settings().returning(|hub_id| {
            Ok(AssignmentSettings {
                hub_id,
                mode: AssignmentMode::RoundRobin,
                pool: vec![EmployeeId::new(3).expect("valid id")],
                last_assigned: None,
            })
        });
        repo.expect_filter_active_employees()
            .returning(|_, ids| Ok(ids.to_vec()));
        repo.expect_create_lead()
            .times(1)
            .returning(|_| Err(RepositoryError::ConnectionError("locked".into())));
        repo.expect_record_last_assigned().times(0);

        assert!(matches!(
            create_lead(add_form(), &sales(), &repo),
            Err(ServiceError::Internal(_))
        ));
    }

    #[test]
    fn campaign_of_another_hub_is_rejected_on_create() {
        let mut repo = MockRepository::new();
        me_is(&mut repo, 7);
        repo.expect_get_campaign_by_id()
            .withf(|id, hub_id| id.get() == 5 && hub_id.get() == 42)
            .times(1)
            .returning(|_, _| Ok(None));
        repo.expect_create_lead().times(0);

        let mut form = add_form();
        form.campaign_id = Some(5);
        assert!(matches!(
            create_lead(form, &admin(), &repo),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn campaign_of_another_hub_is_rejected_on_update() {
        let mut repo = MockRepository::new();
        me_is(&mut repo, 7);
        repo.expect_get_lead_by_id()
            .returning(|_, _| Ok(Some(lead(1, Some(7)))));
        repo.expect_get_campaign_by_id()
            .withf(|_, hub_id| hub_id.get() == 42)
            .times(1)
            .returning(|_, _| Ok(None));
        repo.expect_update_lead().times(0);

        let form = UpdateLeadForm {
            name: "Acme".into(),
            email: None,
            phone: None,
            company: None,
            source: "Website".into(),
            value: 0,
            campaign_id: Some(5),
            notes: None,
        };
        assert!(matches!(
            update_lead(1, form, &sales(), &repo),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn delete_is_admin_only() {
        let mut repo = MockRepository::new();
        repo.expect_delete_lead().times(0);
        assert!(matches!(
            delete_lead(1, &sales(), &repo),
            Err(ServiceError::Unauthorized)
        ));
    }
}
