use crate::auth::{AuthenticatedUser, ensure_any_role, ensure_role};
use crate::domain::policy::{CompanyPolicy, NewCompanyPolicy, PolicyDetails};
use crate::domain::types::{HubId, PolicyId};
use crate::dto::policies::PolicyListParams;
use crate::forms::policies::PolicyForm;
use crate::pagination::{PageRequest, Paginated};
use crate::repository::{PolicyListQuery, PolicyReader, PolicyWriter};
use crate::services::{ServiceError, ServiceResult, text_filter, today};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_HR_ROLE};

fn manages_policies(user: &AuthenticatedUser) -> bool {
    ensure_any_role(user, &[SERVICE_HR_ROLE]).is_ok()
}

/// HR sees every policy; everybody else only active ones already in effect.
pub fn list_policies<R>(
    params: &PolicyListParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<CompanyPolicy>>
where
    R: PolicyReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let page = PageRequest::new(params.page, params.per_page);

    let mut query = PolicyListQuery::new(hub_id).paginate(page.page, page.per_page);
    if let Some(category) = text_filter(params.category.as_deref()) {
        query = query.category(category);
    }
    if manages_policies(user) {
        if let Some(active) = params.active {
            query = query.active(active);
        }
    } else {
        query = query.active(true).effective_on(today());
    }

    let (total, policies) = repo.list_policies(query)?;
    Ok(Paginated::new(policies, total, page))
}

pub fn get_policy<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<CompanyPolicy>
where
    R: PolicyReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let policy = repo
        .get_policy_by_id(PolicyId::new(id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    if manages_policies(user) || policy.is_in_effect(today()) {
        Ok(policy)
    } else {
        Err(ServiceError::NotFound)
    }
}

pub fn create_policy<R>(
    form: PolicyForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CompanyPolicy>
where
    R: PolicyWriter + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let details = PolicyDetails::try_from(form)?;
    let policy = repo.create_policy(&NewCompanyPolicy { hub_id, details })?;
    log::info!("Published policy {} in hub {hub_id}", policy.id);
    Ok(policy)
}

pub fn update_policy<R>(
    id: i32,
    form: PolicyForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CompanyPolicy>
where
    R: PolicyWriter + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let details = PolicyDetails::try_from(form)?;
    Ok(repo.update_policy(PolicyId::new(id)?, hub_id, &details)?)
}

pub fn delete_policy<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: PolicyWriter + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    repo.delete_policy(PolicyId::new(id)?, hub_id)?;
    Ok(())
}
