use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::campaign::{Campaign, CampaignDetails, CampaignStats, CampaignStatus, NewCampaign};
use crate::domain::types::{CampaignId, HubId};
use crate::dto::campaigns::{CampaignDetail, CampaignListParams};
use crate::forms::campaigns::CampaignForm;
use crate::pagination::{PageRequest, Paginated};
use crate::repository::{CampaignListQuery, CampaignReader, CampaignWriter};
use crate::services::{ServiceError, ServiceResult, variant_filter};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

pub fn list_campaigns<R>(
    params: &CampaignListParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<Campaign>>
where
    R: CampaignReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let page = PageRequest::new(params.page, params.per_page);

    let mut query = CampaignListQuery::new(hub_id).paginate(page.page, page.per_page);
    if let Some(status) = variant_filter::<CampaignStatus>("status", params.status.as_deref())? {
        query = query.status(status);
    }

    let (total, campaigns) = repo.list_campaigns(query)?;
    Ok(Paginated::new(campaigns, total, page))
}

/// Campaign with its lead funnel numbers.
pub fn get_campaign<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<CampaignDetail>
where
    R: CampaignReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let id = CampaignId::new(id)?;

    let campaign = repo
        .get_campaign_by_id(id, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    let outcomes = repo.list_campaign_lead_outcomes(id, hub_id)?;

    Ok(CampaignDetail {
        campaign,
        stats: CampaignStats::from_leads(id, &outcomes),
    })
}

pub fn create_campaign<R>(
    form: CampaignForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Campaign>
where
    R: CampaignWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let details = CampaignDetails::try_from(form)?;

    Ok(repo.create_campaign(&NewCampaign { hub_id, details })?)
}

pub fn update_campaign<R>(
    id: i32,
    form: CampaignForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Campaign>
where
    R: CampaignWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let id = CampaignId::new(id)?;
    let details = CampaignDetails::try_from(form)?;

    Ok(repo.update_campaign(id, hub_id, &details)?)
}

/// Leads keep existing; their campaign reference is cleared by the database.
pub fn delete_campaign<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: CampaignWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let id = CampaignId::new(id)?;

    repo.delete_campaign(id, hub_id)?;
    log::info!("Deleted campaign {id} of hub {hub_id}");
    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::campaign::CampaignChannel;
    use crate::domain::lead::LeadStatus;
    use crate::domain::types::{CampaignName, Money};
    use crate::repository::mock::MockRepository;
    use crate::services::employees::tests::user_with;

    fn campaign(id: i32) -> Campaign {
        let now = Utc::now().naive_utc();
        Campaign {
            id: CampaignId::new(id).expect("valid id"),
            hub_id: HubId::new(42).expect("valid hub"),
            name: CampaignName::new("Launch").expect("valid name"),
            channel: CampaignChannel::Email,
            status: CampaignStatus::Active,
            budget: Money::ZERO,
            starts_on: None,
            ends_on: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn money(value: i64) -> Money {
        Money::new(value).expect("valid amount")
    }

    #[test]
    fn detail_carries_stats() {
        let mut repo = MockRepository::new();
        repo.expect_get_campaign_by_id()
            .returning(|id, _| Ok(Some(campaign(id.get()))));
        repo.expect_list_campaign_lead_outcomes().returning(|_, _| {
            Ok(vec![
                (LeadStatus::Won, money(1_000)),
                (LeadStatus::Won, money(500)),
                (LeadStatus::Lost, money(700)),
                (LeadStatus::New, money(0)),
            ])
        });

        let detail =
            get_campaign(3, &user_with(&[SERVICE_ACCESS_ROLE]), &repo).expect("campaign loads");
        assert_eq!(detail.stats.total_leads, 4);
        assert_eq!(detail.stats.won_leads, 2);
        assert_eq!(detail.stats.won_value, money(1_500));
    }

    #[test]
    fn missing_campaign_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_campaign_by_id().returning(|_, _| Ok(None));
        repo.expect_list_campaign_lead_outcomes().times(0);

        assert!(matches!(
            get_campaign(3, &user_with(&[SERVICE_ACCESS_ROLE]), &repo),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn writes_require_admin() {
        let mut repo = MockRepository::new();
        repo.expect_delete_campaign().times(0);
        assert!(matches!(
            delete_campaign(3, &user_with(&[SERVICE_ACCESS_ROLE]), &repo),
            Err(ServiceError::Unauthorized)
        ));
    }
}
