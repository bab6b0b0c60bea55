//! Repository implementation for leads, their activity log and the per-hub
//! assignment settings.

use std::collections::HashMap;

use chrono::Utc;
use diesel::{dsl::count_star, prelude::*, upsert::excluded};

use crate::{
    domain::{
        lead::{Lead, LeadStatus, NewLead, UpdateLead},
        lead_activity::{LeadActivity, NewLeadActivity},
        lead_assignment::AssignmentSettings,
        types::{EmployeeId, HubId, LeadId},
    },
    models::lead::{
        Lead as DbLead, LeadActivity as DbLeadActivity,
        LeadAssignmentPoolMember as DbPoolMember, LeadAssignmentSettings as DbSettings,
        NewLead as DbNewLead, NewLeadActivity as DbNewLeadActivity, UpdateLead as DbUpdateLead,
    },
    repository::{
        AssignmentReader, AssignmentWriter, DieselRepository, LIKE_ESCAPE, LeadActivityListQuery,
        LeadListQuery, LeadReader, LeadWriter,
        errors::{RepositoryError, RepositoryResult},
        like_pattern,
    },
};

fn closed_statuses() -> Vec<&'static str> {
    LeadStatus::ALL
        .iter()
        .filter(|status| status.is_closed())
        .map(|status| status.as_str())
        .collect()
}

impl LeadReader for DieselRepository {
    fn get_lead_by_id(&self, id: LeadId, hub_id: HubId) -> RepositoryResult<Option<Lead>> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let db_lead = leads::table
            .filter(leads::id.eq(id.get()))
            .filter(leads::hub_id.eq(hub_id.get()))
            .first::<DbLead>(&mut conn)
            .optional()?;

        db_lead
            .map(Lead::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_leads(&self, query: LeadListQuery) -> RepositoryResult<(usize, Vec<Lead>)> {
        use crate::schema::leads;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = leads::table
                .filter(leads::hub_id.eq(query.hub_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(status) = query.status {
                items = items.filter(leads::status.eq(status.as_str()));
            }
            if let Some(source) = &query.source {
                items = items.filter(leads::source.eq(source.to_string()));
            }
            if let Some(assigned_to) = query.assigned_to {
                items = items.filter(leads::assigned_to.eq(assigned_to.get()));
            }
            if let Some(campaign_id) = query.campaign_id {
                items = items.filter(leads::campaign_id.eq(campaign_id.get()));
            }
            if let Some(from) = query.created_from.and_then(|d| d.and_hms_opt(0, 0, 0)) {
                items = items.filter(leads::created_at.ge(from));
            }
            if let Some(until) = query
                .created_to
                .and_then(|d| d.succ_opt())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
            {
                items = items.filter(leads::created_at.lt(until));
            }
            if let Some(search) = &query.search {
                let pattern = like_pattern(search);
                items = items.filter(
                    leads::name
                        .like(pattern.clone())
                        .escape(LIKE_ESCAPE)
                        .or(leads::email.like(pattern.clone()).escape(LIKE_ESCAPE))
                        .or(leads::phone.like(pattern.clone()).escape(LIKE_ESCAPE))
                        .or(leads::company.like(pattern).escape(LIKE_ESCAPE)),
                );
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order((leads::created_at.desc(), leads::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let leads = items
            .load::<DbLead>(&mut conn)?
            .into_iter()
            .map(Lead::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, leads))
    }

    fn count_open_leads(
        &self,
        hub_id: HubId,
        employee_ids: &[EmployeeId],
    ) -> RepositoryResult<HashMap<EmployeeId, usize>> {
        use crate::schema::leads;

        if employee_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = self.conn()?;
        let raw_ids: Vec<i32> = employee_ids.iter().map(|id| id.get()).collect();

        let counts = leads::table
            .filter(leads::hub_id.eq(hub_id.get()))
            .filter(leads::status.ne_all(closed_statuses()))
            .filter(leads::assigned_to.eq_any(raw_ids))
            .group_by(leads::assigned_to)
            .select((leads::assigned_to, count_star()))
            .load::<(Option<i32>, i64)>(&mut conn)?;

        let mut open = HashMap::new();
        for (employee_id, count) in counts {
            if let Some(employee_id) = employee_id {
                open.insert(EmployeeId::new(employee_id)?, count as usize);
            }
        }
        Ok(open)
    }

    fn list_lead_activities(
        &self,
        query: LeadActivityListQuery,
    ) -> RepositoryResult<(usize, Vec<LeadActivity>)> {
        use crate::schema::lead_activities;

        let mut conn = self.conn()?;

        let total = lead_activities::table
            .filter(lead_activities::lead_id.eq(query.lead_id.get()))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = lead_activities::table
            .filter(lead_activities::lead_id.eq(query.lead_id.get()))
            .order((
                lead_activities::created_at.desc(),
                lead_activities::id.desc(),
            ))
            .into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let activities = items
            .load::<DbLeadActivity>(&mut conn)?
            .into_iter()
            .map(LeadActivity::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, activities))
    }
}

impl LeadWriter for DieselRepository {
    fn create_lead(&self, new_lead: &NewLead) -> RepositoryResult<Lead> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let db_new_lead: DbNewLead = new_lead.into();

        let db_lead = diesel::insert_into(leads::table)
            .values(&db_new_lead)
            .get_result::<DbLead>(&mut conn)?;

        Lead::try_from(db_lead).map_err(RepositoryError::from)
    }

    fn create_leads(&self, new_leads: &[NewLead]) -> RepositoryResult<usize> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let insertables: Vec<DbNewLead> = new_leads.iter().map(Into::into).collect();

        conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            diesel::insert_into(leads::table)
                .values(&insertables)
                .execute(conn)
        })
        .map_err(RepositoryError::from)
    }

    fn update_lead(
        &self,
        id: LeadId,
        hub_id: HubId,
        updates: &UpdateLead,
    ) -> RepositoryResult<Lead> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateLead = updates.into();

        let db_lead = diesel::update(
            leads::table
                .filter(leads::id.eq(id.get()))
                .filter(leads::hub_id.eq(hub_id.get())),
        )
        .set(&db_updates)
        .get_result::<DbLead>(&mut conn)?;

        Lead::try_from(db_lead).map_err(RepositoryError::from)
    }

    fn delete_lead(&self, id: LeadId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            leads::table
                .filter(leads::id.eq(id.get()))
                .filter(leads::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn update_lead_status(
        &self,
        id: LeadId,
        hub_id: HubId,
        status: LeadStatus,
        activity: &NewLeadActivity,
    ) -> RepositoryResult<Lead> {
        use crate::schema::{lead_activities, leads};

        let mut conn = self.conn()?;
        let db_activity: DbNewLeadActivity = activity.into();

        let db_lead = conn.transaction::<DbLead, diesel::result::Error, _>(|conn| {
            let db_lead = diesel::update(
                leads::table
                    .filter(leads::id.eq(id.get()))
                    .filter(leads::hub_id.eq(hub_id.get())),
            )
            .set((
                leads::status.eq(status.as_str()),
                leads::updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result::<DbLead>(conn)?;

            diesel::insert_into(lead_activities::table)
                .values(&db_activity)
                .execute(conn)?;

            Ok(db_lead)
        })?;

        Lead::try_from(db_lead).map_err(RepositoryError::from)
    }

    fn assign_lead(
        &self,
        id: LeadId,
        hub_id: HubId,
        assignee: Option<EmployeeId>,
        activity: &NewLeadActivity,
    ) -> RepositoryResult<Lead> {
        use crate::schema::{lead_activities, leads};

        let mut conn = self.conn()?;
        let db_activity: DbNewLeadActivity = activity.into();

        let db_lead = conn.transaction::<DbLead, diesel::result::Error, _>(|conn| {
            let db_lead = diesel::update(
                leads::table
                    .filter(leads::id.eq(id.get()))
                    .filter(leads::hub_id.eq(hub_id.get())),
            )
            .set((
                leads::assigned_to.eq(assignee.map(EmployeeId::get)),
                leads::updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result::<DbLead>(conn)?;

            diesel::insert_into(lead_activities::table)
                .values(&db_activity)
                .execute(conn)?;

            Ok(db_lead)
        })?;

        Lead::try_from(db_lead).map_err(RepositoryError::from)
    }

    fn create_lead_activity(&self, activity: &NewLeadActivity) -> RepositoryResult<LeadActivity> {
        use crate::schema::lead_activities;

        let mut conn = self.conn()?;
        let db_activity: DbNewLeadActivity = activity.into();

        let created = diesel::insert_into(lead_activities::table)
            .values(&db_activity)
            .get_result::<DbLeadActivity>(&mut conn)?;

        LeadActivity::try_from(created).map_err(RepositoryError::from)
    }
}

fn load_assignment_settings(
    conn: &mut SqliteConnection,
    hub_id: HubId,
) -> RepositoryResult<AssignmentSettings> {
    use crate::schema::{lead_assignment_pool, lead_assignment_settings};

    let settings = lead_assignment_settings::table
        .find(hub_id.get())
        .first::<DbSettings>(conn)
        .optional()?;

    let Some(settings) = settings else {
        return Ok(AssignmentSettings::manual(hub_id));
    };

    let pool = lead_assignment_pool::table
        .filter(lead_assignment_pool::hub_id.eq(hub_id.get()))
        .select(lead_assignment_pool::employee_id)
        .order(lead_assignment_pool::employee_id.asc())
        .load::<i32>(conn)?
        .into_iter()
        .map(EmployeeId::new)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AssignmentSettings {
        hub_id,
        mode: settings.mode.parse()?,
        pool,
        last_assigned: settings.last_assigned.map(EmployeeId::new).transpose()?,
    })
}

impl AssignmentReader for DieselRepository {
    fn get_assignment_settings(&self, hub_id: HubId) -> RepositoryResult<AssignmentSettings> {
        let mut conn = self.conn()?;
        load_assignment_settings(&mut conn, hub_id)
    }
}

impl AssignmentWriter for DieselRepository {
    fn save_assignment_settings(
        &self,
        settings: &AssignmentSettings,
    ) -> RepositoryResult<AssignmentSettings> {
        use crate::schema::{lead_assignment_pool, lead_assignment_settings};

        let mut conn = self.conn()?;
        let hub_id = settings.hub_id;

        let db_settings = DbSettings {
            hub_id: hub_id.get(),
            mode: settings.mode.to_string(),
            last_assigned: settings.last_assigned.map(EmployeeId::get),
            updated_at: Utc::now().naive_utc(),
        };
        let members = settings
            .pool
            .iter()
            .map(|employee_id| DbPoolMember {
                hub_id: hub_id.get(),
                employee_id: employee_id.get(),
            })
            .collect::<Vec<_>>();

        conn.transaction::<_, RepositoryError, _>(|conn| {
            diesel::insert_into(lead_assignment_settings::table)
                .values(&db_settings)
                .on_conflict(lead_assignment_settings::hub_id)
                .do_update()
                .set((
                    lead_assignment_settings::mode.eq(excluded(lead_assignment_settings::mode)),
                    lead_assignment_settings::updated_at
                        .eq(excluded(lead_assignment_settings::updated_at)),
                ))
                .execute(conn)?;

            diesel::delete(
                lead_assignment_pool::table.filter(lead_assignment_pool::hub_id.eq(hub_id.get())),
            )
            .execute(conn)?;

            if !members.is_empty() {
                diesel::insert_into(lead_assignment_pool::table)
                    .values(&members)
                    .execute(conn)?;
            }

            load_assignment_settings(conn, hub_id)
        })
    }

    fn record_last_assigned(
        &self,
        hub_id: HubId,
        employee_id: EmployeeId,
    ) -> RepositoryResult<()> {
        use crate::schema::lead_assignment_settings;

        let mut conn = self.conn()?;
        diesel::update(lead_assignment_settings::table.find(hub_id.get()))
            .set(lead_assignment_settings::last_assigned.eq(Some(employee_id.get())))
            .execute(&mut conn)?;
        Ok(())
    }
}
