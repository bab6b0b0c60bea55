//! Employee directory and the mapping from tokens to employee rows.

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::employee::{Employee, NewEmployee, UpdateEmployee};
use crate::domain::types::{EmailAddress, EmployeeId, EmployeeName, HubId};
use crate::dto::employees::EmployeeListParams;
use crate::forms::employees::{AddEmployeeForm, UpdateEmployeeForm};
use crate::pagination::{PageRequest, Paginated};
use crate::repository::{EmployeeListQuery, EmployeeReader, EmployeeWriter};
use crate::services::{ServiceError, ServiceResult, text_filter};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_HR_ROLE};

/// Employee row of the authenticated user, created from the token claims on
/// first use. Deactivated employees lose access.
pub fn current_employee<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Employee>
where
    R: EmployeeReader + EmployeeWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let email = EmailAddress::new(user.email.as_str())?;

    match repo.get_employee_by_email(&email, hub_id)? {
        Some(employee) if employee.is_active => Ok(employee),
        Some(employee) => {
            log::info!("Inactive employee {} rejected", employee.id);
            Err(ServiceError::Unauthorized)
        }
        None => {
            let name = if user.name.trim().is_empty() {
                EmployeeName::new(email.as_str())?
            } else {
                EmployeeName::new(user.name.as_str())?
            };
            let employee = repo
                .upsert_employee(&NewEmployee::new(hub_id, name, email))
                .map_err(|err| {
                    log::error!("Failed to register employee for {}: {err}", user.email);
                    err
                })?;
            log::info!("Registered employee {} for hub {hub_id}", employee.id);
            Ok(employee)
        }
    }
}

pub fn me<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Employee>
where
    R: EmployeeReader + EmployeeWriter + ?Sized,
{
    current_employee(user, repo)
}

pub fn list_employees<R>(
    params: &EmployeeListParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<Employee>>
where
    R: EmployeeReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let page = PageRequest::new(params.page, params.per_page);

    let mut query = EmployeeListQuery::new(hub_id).paginate(page.page, page.per_page);
    if let Some(active) = params.active {
        query = query.active(active);
    }
    if let Some(department) = text_filter(params.department.as_deref()) {
        query = query.department(department);
    }
    if let Some(search) = text_filter(params.search.as_deref()) {
        query = query.search(search);
    }

    let (total, employees) = repo.list_employees(query)?;
    Ok(Paginated::new(employees, total, page))
}

pub fn get_employee<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Employee>
where
    R: EmployeeReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let id = EmployeeId::new(id)?;

    repo.get_employee_by_id(id, hub_id)?
        .ok_or(ServiceError::NotFound)
}

pub fn create_employee<R>(
    form: AddEmployeeForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Employee>
where
    R: EmployeeWriter + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let new_employee = form.into_domain(hub_id)?;

    let employee = repo.create_employee(&new_employee).map_err(|err| {
        log::warn!("Failed to create employee {}: {err}", new_employee.email);
        err
    })?;
    Ok(employee)
}

pub fn update_employee<R>(
    id: i32,
    form: UpdateEmployeeForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Employee>
where
    R: EmployeeWriter + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let id = EmployeeId::new(id)?;
    let updates = UpdateEmployee::try_from(form)?;

    Ok(repo.update_employee(id, hub_id, &updates)?)
}

/// Soft delete: the row stays for history, the person loses access.
pub fn deactivate_employee<R>(
    id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Employee>
where
    R: EmployeeWriter + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let id = EmployeeId::new(id)?;

    let employee = repo.deactivate_employee(id, hub_id)?;
    log::info!("Deactivated employee {id} of hub {hub_id}");
    Ok(employee)
}
