use diesel::prelude::*;

use crate::{
    domain::{
        policy::{CompanyPolicy, NewCompanyPolicy, PolicyDetails},
        types::{HubId, PolicyId},
    },
    models::policy::{
        CompanyPolicy as DbCompanyPolicy, NewCompanyPolicy as DbNewCompanyPolicy,
        UpdateCompanyPolicy as DbUpdateCompanyPolicy,
    },
    repository::{
        DieselRepository, PolicyListQuery, PolicyReader, PolicyWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl PolicyReader for DieselRepository {
    fn get_policy_by_id(
        &self,
        id: PolicyId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<CompanyPolicy>> {
        use crate::schema::company_policies;

        let mut conn = self.conn()?;
        let db_policy = company_policies::table
            .filter(company_policies::id.eq(id.get()))
            .filter(company_policies::hub_id.eq(hub_id.get()))
            .first::<DbCompanyPolicy>(&mut conn)
            .optional()?;

        db_policy
            .map(CompanyPolicy::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_policies(
        &self,
        query: PolicyListQuery,
    ) -> RepositoryResult<(usize, Vec<CompanyPolicy>)> {
        use crate::schema::company_policies;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = company_policies::table
                .filter(company_policies::hub_id.eq(query.hub_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(category) = &query.category {
                items = items.filter(company_policies::category.eq(category));
            }
            if let Some(active) = query.active {
                items = items.filter(company_policies::is_active.eq(active));
            }
            if let Some(date) = query.effective_on {
                items = items.filter(company_policies::effective_from.le(date));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order((
            company_policies::category.asc(),
            company_policies::title.asc(),
        ));
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let policies = items
            .load::<DbCompanyPolicy>(&mut conn)?
            .into_iter()
            .map(CompanyPolicy::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, policies))
    }
}

impl PolicyWriter for DieselRepository {
    fn create_policy(&self, new_policy: &NewCompanyPolicy) -> RepositoryResult<CompanyPolicy> {
        use crate::schema::company_policies;

        let mut conn = self.conn()?;
        let db_new_policy: DbNewCompanyPolicy = new_policy.into();

        let db_policy = diesel::insert_into(company_policies::table)
            .values(&db_new_policy)
            .get_result::<DbCompanyPolicy>(&mut conn)?;

        CompanyPolicy::try_from(db_policy).map_err(RepositoryError::from)
    }

    fn update_policy(
        &self,
        id: PolicyId,
        hub_id: HubId,
        details: &PolicyDetails,
    ) -> RepositoryResult<CompanyPolicy> {
        use crate::schema::company_policies;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateCompanyPolicy = details.into();

        let db_policy = diesel::update(
            company_policies::table
                .filter(company_policies::id.eq(id.get()))
                .filter(company_policies::hub_id.eq(hub_id.get())),
        )
        .set(&db_updates)
        .get_result::<DbCompanyPolicy>(&mut conn)?;

        CompanyPolicy::try_from(db_policy).map_err(RepositoryError::from)
    }

    fn delete_policy(&self, id: PolicyId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::company_policies;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            company_policies::table
                .filter(company_policies::id.eq(id.get()))
                .filter(company_policies::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
