//! Job openings, candidates and the hiring pipeline.

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::recruitment::{
    Candidate, CandidateDetails, CandidateStage, JobOpening, JobOpeningDetails, JobStatus,
    NewCandidate,
};
use crate::domain::types::{CandidateId, HubId, JobOpeningId};
use crate::dto::recruitment::{CandidateListParams, JobOpeningListParams, StageChange};
use crate::forms::recruitment::{CandidateForm, CandidateStageForm, JobOpeningForm};
use crate::pagination::{PageRequest, Paginated};
use crate::repository::{
    CandidateListQuery, JobOpeningListQuery, RecruitmentReader, RecruitmentWriter,
};
use crate::services::{ServiceError, ServiceResult, text_filter, today, variant_filter};
use crate::SERVICE_HR_ROLE;

fn load_job<R>(id: JobOpeningId, hub_id: HubId, repo: &R) -> ServiceResult<JobOpening>
where
    R: RecruitmentReader + ?Sized,
{
    repo.get_job_opening_by_id(id, hub_id)?
        .ok_or(ServiceError::NotFound)
}

fn load_candidate<R>(id: i32, hub_id: HubId, repo: &R) -> ServiceResult<Candidate>
where
    R: RecruitmentReader + ?Sized,
{
    repo.get_candidate_by_id(CandidateId::new(id)?, hub_id)?
        .ok_or(ServiceError::NotFound)
}

pub fn list_job_openings<R>(
    params: &JobOpeningListParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<JobOpening>>
where
    R: RecruitmentReader + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let page = PageRequest::new(params.page, params.per_page);

    let mut query = JobOpeningListQuery::new(hub_id).paginate(page.page, page.per_page);
    if let Some(status) = variant_filter::<JobStatus>("status", params.status.as_deref())? {
        query = query.status(status);
    }

    let (total, jobs) = repo.list_job_openings(query)?;
    Ok(Paginated::new(jobs, total, page))
}

pub fn get_job_opening<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<JobOpening>
where
    R: RecruitmentReader + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    load_job(JobOpeningId::new(id)?, hub_id, repo)
}

pub fn create_job_opening<R>(
    form: JobOpeningForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<JobOpening>
where
    R: RecruitmentWriter + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let details = JobOpeningDetails::try_from(form)?;
    Ok(repo.create_job_opening(hub_id, &details)?)
}

pub fn update_job_opening<R>(
    id: i32,
    form: JobOpeningForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<JobOpening>
where
    R: RecruitmentWriter + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let details = JobOpeningDetails::try_from(form)?;
    Ok(repo.update_job_opening(JobOpeningId::new(id)?, hub_id, &details)?)
}

/// Openings with candidates cannot be removed.
pub fn delete_job_opening<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: RecruitmentWriter + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    repo.delete_job_opening(JobOpeningId::new(id)?, hub_id)?;
    Ok(())
}

pub fn list_candidates<R>(
    params: &CandidateListParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<Candidate>>
where
    R: RecruitmentReader + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let page = PageRequest::new(params.page, params.per_page);

    let mut query = CandidateListQuery::new(hub_id).paginate(page.page, page.per_page);
    if let Some(job_opening_id) = params.job_opening_id {
        query = query.job_opening(JobOpeningId::new(job_opening_id)?);
    }
    if let Some(stage) = variant_filter::<CandidateStage>("stage", params.stage.as_deref())? {
        query = query.stage(stage);
    }
    if let Some(search) = text_filter(params.search.as_deref()) {
        query = query.search(search);
    }

    let (total, candidates) = repo.list_candidates(query)?;
    Ok(Paginated::new(candidates, total, page))
}

pub fn get_candidate<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Candidate>
where
    R: RecruitmentReader + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    load_candidate(id, hub_id, repo)
}

/// Adds a candidate to an open job.
pub fn create_candidate<R>(
    form: CandidateForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Candidate>
where
    R: RecruitmentReader + RecruitmentWriter + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let job = load_job(form.job_opening_id()?, hub_id, repo)?;
    job.ensure_open()?;
    let details = CandidateDetails::try_from(form)?;

    let candidate = repo.create_candidate(&NewCandidate {
        hub_id,
        job_opening_id: job.id,
        details,
    })?;
    log::info!("Candidate {} applied for {}", candidate.id, job.title);
    Ok(candidate)
}

pub fn update_candidate<R>(
    id: i32,
    form: CandidateForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Candidate>
where
    R: RecruitmentReader + RecruitmentWriter + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let candidate = load_candidate(id, hub_id, repo)?;
    let details = CandidateDetails::try_from(form)?;
    Ok(repo.update_candidate(candidate.id, hub_id, &details)?)
}

pub fn delete_candidate<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: RecruitmentWriter + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    repo.delete_candidate(CandidateId::new(id)?, hub_id)?;
    Ok(())
}

/// Moves the candidate forward. Hiring also creates their employee row.
pub fn move_candidate<R>(
    id: i32,
    form: CandidateStageForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<StageChange>
where
    R: RecruitmentReader + RecruitmentWriter + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let candidate = load_candidate(id, hub_id, repo)?;
    let stage = candidate.move_to(form.stage()?)?;

    if stage != CandidateStage::Hired {
        let candidate = repo.set_candidate_stage(candidate.id, hub_id, stage)?;
        return Ok(StageChange {
            candidate,
            employee: None,
        });
    }

    let job = load_job(candidate.job_opening_id, hub_id, repo)?;
    let new_employee = candidate.to_new_employee(&job, today())?;
    let (candidate, employee) = repo
        .hire_candidate(candidate.id, hub_id, &new_employee)
        .map_err(|err| {
            log::error!("Failed to hire candidate {}: {err}", candidate.id);
            err
        })?;
    log::info!("Candidate {} hired as employee {}", candidate.id, employee.id);

    Ok(StageChange {
        candidate,
        employee: Some(employee),
    })
}
