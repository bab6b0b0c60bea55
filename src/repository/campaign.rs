use diesel::prelude::*;

use crate::{
    domain::{
        campaign::{Campaign, CampaignDetails, NewCampaign},
        lead::LeadStatus,
        types::{CampaignId, HubId, Money},
    },
    models::campaign::{
        Campaign as DbCampaign, NewCampaign as DbNewCampaign, UpdateCampaign as DbUpdateCampaign,
    },
    repository::{
        CampaignListQuery, CampaignReader, CampaignWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl CampaignReader for DieselRepository {
    fn get_campaign_by_id(
        &self,
        id: CampaignId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Campaign>> {
        use crate::schema::campaigns;

        let mut conn = self.conn()?;
        let db_campaign = campaigns::table
            .filter(campaigns::id.eq(id.get()))
            .filter(campaigns::hub_id.eq(hub_id.get()))
            .first::<DbCampaign>(&mut conn)
            .optional()?;

        db_campaign
            .map(Campaign::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_campaigns(&self, query: CampaignListQuery) -> RepositoryResult<(usize, Vec<Campaign>)> {
        use crate::schema::campaigns;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = campaigns::table
                .filter(campaigns::hub_id.eq(query.hub_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(status) = query.status {
                items = items.filter(campaigns::status.eq(status.as_str()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(campaigns::id.desc());
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let campaigns = items
            .load::<DbCampaign>(&mut conn)?
            .into_iter()
            .map(Campaign::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, campaigns))
    }

    fn list_campaign_lead_outcomes(
        &self,
        id: CampaignId,
        hub_id: HubId,
    ) -> RepositoryResult<Vec<(LeadStatus, Money)>> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let rows = leads::table
            .filter(leads::campaign_id.eq(id.get()))
            .filter(leads::hub_id.eq(hub_id.get()))
            .select((leads::status, leads::value))
            .load::<(String, i64)>(&mut conn)?;

        rows.into_iter()
            .map(|(status, value)| -> RepositoryResult<(LeadStatus, Money)> {
                Ok((status.parse()?, Money::new(value)?))
            })
            .collect()
    }
}

impl CampaignWriter for DieselRepository {
    fn create_campaign(&self, new_campaign: &NewCampaign) -> RepositoryResult<Campaign> {
        use crate::schema::campaigns;

        let mut conn = self.conn()?;
        let db_new_campaign: DbNewCampaign = new_campaign.into();

        let db_campaign = diesel::insert_into(campaigns::table)
            .values(&db_new_campaign)
            .get_result::<DbCampaign>(&mut conn)?;

        Campaign::try_from(db_campaign).map_err(RepositoryError::from)
    }

    fn update_campaign(
        &self,
        id: CampaignId,
        hub_id: HubId,
        details: &CampaignDetails,
    ) -> RepositoryResult<Campaign> {
        use crate::schema::campaigns;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateCampaign = details.into();

        let db_campaign = diesel::update(
            campaigns::table
                .filter(campaigns::id.eq(id.get()))
                .filter(campaigns::hub_id.eq(hub_id.get())),
        )
        .set(&db_updates)
        .get_result::<DbCampaign>(&mut conn)?;

        Campaign::try_from(db_campaign).map_err(RepositoryError::from)
    }

    fn delete_campaign(&self, id: CampaignId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::campaigns;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            campaigns::table
                .filter(campaigns::id.eq(id.get()))
                .filter(campaigns::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
