//! Leave types, requests and yearly balances.

use chrono::Datelike;

use crate::auth::{AuthenticatedUser, ensure_any_role, ensure_role};
use crate::domain::leave::{LeaveBalance, LeaveRequest, LeaveStatus, LeaveType, NewLeaveRequest};
use crate::domain::types::{EmployeeId, HubId, LeaveRequestId, LeaveTypeId};
use crate::dto::leave::{LeaveBalanceParams, LeaveBalances, LeaveRequestListParams};
use crate::forms::leave::{LeaveRequestForm, LeaveRequestInput, LeaveTypeForm, ReviewLeaveForm};
use crate::pagination::{PageRequest, Paginated};
use crate::repository::{
    EmployeeReader, EmployeeWriter, LeaveReader, LeaveRequestListQuery, LeaveWriter,
};
use crate::services::employees::current_employee;
use crate::services::{ServiceError, ServiceResult, today, variant_filter};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_HR_ROLE};

fn is_hr(user: &AuthenticatedUser) -> bool {
    ensure_any_role(user, &[SERVICE_HR_ROLE]).is_ok()
}

/// Every request of the employee, all statuses.
fn requests_of<R>(hub_id: HubId, employee_id: EmployeeId, repo: &R) -> ServiceResult<Vec<LeaveRequest>>
where
    R: LeaveReader + ?Sized,
{
    let query = LeaveRequestListQuery::new(hub_id).employee(employee_id);
    let (_, requests) = repo.list_leave_requests(query)?;
    Ok(requests)
}

pub fn list_leave_types<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<LeaveType>>
where
    R: LeaveReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    Ok(repo.list_leave_types(hub_id)?)
}

pub fn create_leave_type<R>(
    form: LeaveTypeForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<LeaveType>
where
    R: LeaveWriter + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let new_type = form.into_domain(hub_id)?;
    Ok(repo.create_leave_type(&new_type)?)
}

pub fn update_leave_type<R>(
    id: i32,
    form: LeaveTypeForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<LeaveType>
where
    R: LeaveReader + LeaveWriter + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let id = LeaveTypeId::new(id)?;
    repo.get_leave_type_by_id(id, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    let updates = form.into_domain(hub_id)?;

    Ok(repo.update_leave_type(id, &updates)?)
}

/// Types that already have requests cannot be removed.
pub fn delete_leave_type<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: LeaveWriter + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let id = LeaveTypeId::new(id)?;
    repo.delete_leave_type(id, hub_id).map_err(|err| {
        log::warn!("Failed to delete leave type {id} of hub {hub_id}: {err}");
        err
    })?;
    Ok(())
}

pub fn list_leave_requests<R>(
    params: &LeaveRequestListParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<LeaveRequest>>
where
    R: LeaveReader + EmployeeReader + EmployeeWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let page = PageRequest::new(params.page, params.per_page);

    let mut query = LeaveRequestListQuery::new(hub_id).paginate(page.page, page.per_page);
    if let Some(status) = variant_filter::<LeaveStatus>("status", params.status.as_deref())? {
        query = query.status(status);
    }
    if is_hr(user) {
        if let Some(employee_id) = params.employee_id {
            query = query.employee(EmployeeId::new(employee_id)?);
        }
    } else {
        query = query.employee(current_employee(user, repo)?.id);
    }

    let (total, requests) = repo.list_leave_requests(query)?;
    Ok(Paginated::new(requests, total, page))
}

/// Files a request for the authenticated employee.
pub fn request_leave<R>(
    form: LeaveRequestForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<LeaveRequest>
where
    R: LeaveReader + LeaveWriter + EmployeeReader + EmployeeWriter + ?Sized,
{
    let me = current_employee(user, repo)?;
    let input = LeaveRequestInput::try_from(form)?;

    let leave_type = repo
        .get_leave_type_by_id(input.leave_type_id, me.hub_id)?
        .ok_or(ServiceError::NotFound)?;
    let existing = requests_of(me.hub_id, me.id, repo)?;

    let request = NewLeaveRequest::try_new(
        me.hub_id,
        me.id,
        &leave_type,
        input.range,
        input.reason,
        &existing,
    )?;
    let created = repo.create_leave_request(&request)?;
    log::info!(
        "Employee {} requested {} day(s) of {}",
        me.id,
        created.days,
        leave_type.name
    );
    Ok(created)
}

pub fn review_leave<R>(
    id: i32,
    form: ReviewLeaveForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<LeaveRequest>
where
    R: LeaveReader + LeaveWriter + EmployeeReader + EmployeeWriter + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let me = current_employee(user, repo)?;
    let request = repo
        .get_leave_request_by_id(LeaveRequestId::new(id)?, me.hub_id)?
        .ok_or(ServiceError::NotFound)?;
    let status = request.review(form.approve)?;

    let reviewed = repo
        .review_leave_request(&request, status, me.id)
        .map_err(|err| {
            log::error!("Failed to review leave request {}: {err}", request.id);
            err
        })?;
    log::info!("Leave request {} is now {status}", reviewed.id);
    Ok(reviewed)
}

/// Owners withdraw pending requests or approved ones that have not started.
pub fn cancel_leave<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<LeaveRequest>
where
    R: LeaveReader + LeaveWriter + EmployeeReader + EmployeeWriter + ?Sized,
{
    let me = current_employee(user, repo)?;
    let request = repo
        .get_leave_request_by_id(LeaveRequestId::new(id)?, me.hub_id)?
        .ok_or(ServiceError::NotFound)?;
    if request.employee_id != me.id {
        return Err(ServiceError::Unauthorized);
    }
    request.cancel(today())?;

    Ok(repo.cancel_leave_request(&request)?)
}

pub fn leave_balances<R>(
    params: &LeaveBalanceParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<LeaveBalances>
where
    R: LeaveReader + EmployeeReader + EmployeeWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let employee_id = match params.employee_id {
        Some(id) if is_hr(user) => EmployeeId::new(id)?,
        _ => current_employee(user, repo)?.id,
    };
    let year = params.year.unwrap_or_else(|| today().year());

    let requests = requests_of(hub_id, employee_id, repo)?;
    let balances = repo
        .list_leave_types(hub_id)?
        .iter()
        .map(|leave_type| LeaveBalance::compute(leave_type, year, &requests))
        .collect();

    Ok(LeaveBalances {
        employee_id,
        year,
        balances,
    })
}
