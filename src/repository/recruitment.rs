use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::{
        employee::{Employee, NewEmployee},
        recruitment::{
            Candidate, CandidateDetails, CandidateStage, JobOpening, JobOpeningDetails,
            NewCandidate,
        },
        types::{CandidateId, HubId, JobOpeningId},
    },
    models::{
        employee::NewEmployee as DbNewEmployee,
        recruitment::{
            Candidate as DbCandidate, JobOpening as DbJobOpening, NewCandidate as DbNewCandidate,
            NewJobOpening as DbNewJobOpening, UpdateCandidate as DbUpdateCandidate,
            UpdateJobOpening as DbUpdateJobOpening,
        },
    },
    repository::{
        CandidateListQuery, DieselRepository, JobOpeningListQuery, LIKE_ESCAPE, RecruitmentReader,
        RecruitmentWriter,
        employee::upsert_employee_row,
        errors::{RepositoryError, RepositoryResult},
        like_pattern,
    },
};

impl RecruitmentReader for DieselRepository {
    fn get_job_opening_by_id(
        &self,
        id: JobOpeningId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<JobOpening>> {
        use crate::schema::job_openings;

        let mut conn = self.conn()?;
        let db_job = job_openings::table
            .filter(job_openings::id.eq(id.get()))
            .filter(job_openings::hub_id.eq(hub_id.get()))
            .first::<DbJobOpening>(&mut conn)
            .optional()?;

        db_job
            .map(JobOpening::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_job_openings(
        &self,
        query: JobOpeningListQuery,
    ) -> RepositoryResult<(usize, Vec<JobOpening>)> {
        use crate::schema::job_openings;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = job_openings::table
                .filter(job_openings::hub_id.eq(query.hub_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(status) = query.status {
                items = items.filter(job_openings::status.eq(status.as_str()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(job_openings::id.desc());
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let jobs = items
            .load::<DbJobOpening>(&mut conn)?
            .into_iter()
            .map(JobOpening::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, jobs))
    }

    fn get_candidate_by_id(
        &self,
        id: CandidateId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Candidate>> {
        use crate::schema::candidates;

        let mut conn = self.conn()?;
        let db_candidate = candidates::table
            .filter(candidates::id.eq(id.get()))
            .filter(candidates::hub_id.eq(hub_id.get()))
            .first::<DbCandidate>(&mut conn)
            .optional()?;

        db_candidate
            .map(Candidate::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_candidates(
        &self,
        query: CandidateListQuery,
    ) -> RepositoryResult<(usize, Vec<Candidate>)> {
        use crate::schema::candidates;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = candidates::table
                .filter(candidates::hub_id.eq(query.hub_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(job_opening_id) = query.job_opening_id {
                items = items.filter(candidates::job_opening_id.eq(job_opening_id.get()));
            }
            if let Some(stage) = query.stage {
                items = items.filter(candidates::stage.eq(stage.as_str()));
            }
            if let Some(search) = &query.search {
                let pattern = like_pattern(search);
                items = items.filter(
                    candidates::name
                        .like(pattern.clone())
                        .escape(LIKE_ESCAPE)
                        .or(candidates::email.like(pattern).escape(LIKE_ESCAPE)),
                );
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(candidates::id.desc());
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let candidates = items
            .load::<DbCandidate>(&mut conn)?
            .into_iter()
            .map(Candidate::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, candidates))
    }
}

impl RecruitmentWriter for DieselRepository {
    fn create_job_opening(
        &self,
        hub_id: HubId,
        details: &JobOpeningDetails,
    ) -> RepositoryResult<JobOpening> {
        use crate::schema::job_openings;

        let mut conn = self.conn()?;
        let db_new_job = DbNewJobOpening::new(hub_id, details);

        let db_job = diesel::insert_into(job_openings::table)
            .values(&db_new_job)
            .get_result::<DbJobOpening>(&mut conn)?;

        JobOpening::try_from(db_job).map_err(RepositoryError::from)
    }

    fn update_job_opening(
        &self,
        id: JobOpeningId,
        hub_id: HubId,
        details: &JobOpeningDetails,
    ) -> RepositoryResult<JobOpening> {
        use crate::schema::job_openings;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateJobOpening = details.into();

        let db_job = diesel::update(
            job_openings::table
                .filter(job_openings::id.eq(id.get()))
                .filter(job_openings::hub_id.eq(hub_id.get())),
        )
        .set(&db_updates)
        .get_result::<DbJobOpening>(&mut conn)?;

        JobOpening::try_from(db_job).map_err(RepositoryError::from)
    }

    fn delete_job_opening(&self, id: JobOpeningId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::job_openings;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            job_openings::table
                .filter(job_openings::id.eq(id.get()))
                .filter(job_openings::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn create_candidate(&self, new_candidate: &NewCandidate) -> RepositoryResult<Candidate> {
        use crate::schema::candidates;

        let mut conn = self.conn()?;
        let db_new_candidate: DbNewCandidate = new_candidate.into();

        let db_candidate = diesel::insert_into(candidates::table)
            .values(&db_new_candidate)
            .get_result::<DbCandidate>(&mut conn)?;

        Candidate::try_from(db_candidate).map_err(RepositoryError::from)
    }

    fn update_candidate(
        &self,
        id: CandidateId,
        hub_id: HubId,
        details: &CandidateDetails,
    ) -> RepositoryResult<Candidate> {
        use crate::schema::candidates;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateCandidate = details.into();

        let db_candidate = diesel::update(
            candidates::table
                .filter(candidates::id.eq(id.get()))
                .filter(candidates::hub_id.eq(hub_id.get())),
        )
        .set(&db_updates)
        .get_result::<DbCandidate>(&mut conn)?;

        Candidate::try_from(db_candidate).map_err(RepositoryError::from)
    }

    fn delete_candidate(&self, id: CandidateId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::candidates;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            candidates::table
                .filter(candidates::id.eq(id.get()))
                .filter(candidates::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn set_candidate_stage(
        &self,
        id: CandidateId,
        hub_id: HubId,
        stage: CandidateStage,
    ) -> RepositoryResult<Candidate> {
        use crate::schema::candidates;

        let mut conn = self.conn()?;
        let db_candidate = diesel::update(
            candidates::table
                .filter(candidates::id.eq(id.get()))
                .filter(candidates::hub_id.eq(hub_id.get())),
        )
        .set((
            candidates::stage.eq(stage.as_str()),
            candidates::updated_at.eq(Utc::now().naive_utc()),
        ))
        .get_result::<DbCandidate>(&mut conn)?;

        Candidate::try_from(db_candidate).map_err(RepositoryError::from)
    }

    fn hire_candidate(
        &self,
        id: CandidateId,
        hub_id: HubId,
        employee: &NewEmployee,
    ) -> RepositoryResult<(Candidate, Employee)> {
        use crate::schema::candidates;

        let mut conn = self.conn()?;
        let db_new_employee: DbNewEmployee = employee.into();

        let (db_candidate, db_employee) =
            conn.transaction::<_, RepositoryError, _>(|conn| {
                let candidate = diesel::update(
                    candidates::table
                        .filter(candidates::id.eq(id.get()))
                        .filter(candidates::hub_id.eq(hub_id.get())),
                )
                .set((
                    candidates::stage.eq(CandidateStage::Hired.as_str()),
                    candidates::updated_at.eq(Utc::now().naive_utc()),
                ))
                .get_result::<DbCandidate>(conn)?;

                let employee = upsert_employee_row(conn, &db_new_employee)?;

                Ok((candidate, employee))
            })?;

        Ok((
            Candidate::try_from(db_candidate)?,
            Employee::try_from(db_employee)?,
        ))
    }
}
