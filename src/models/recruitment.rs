use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::recruitment::{
    Candidate as DomainCandidate, CandidateDetails, JobOpening as DomainJobOpening,
    JobOpeningDetails, NewCandidate as DomainNewCandidate,
};
use crate::domain::types::{
    CandidateId, CandidateName, EmailAddress, HubId, JobOpeningId, JobTitle, LinkUrl,
    PhoneNumber, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::job_openings)]
pub struct JobOpening {
    pub id: i32,
    pub hub_id: i32,
    pub title: String,
    pub department: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::job_openings)]
pub struct NewJobOpening<'a> {
    pub hub_id: i32,
    pub title: &'a str,
    pub department: Option<&'a str>,
    pub description: Option<&'a str>,
    pub status: &'static str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::job_openings)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateJobOpening<'a> {
    pub title: &'a str,
    pub department: Option<&'a str>,
    pub description: Option<&'a str>,
    pub status: &'static str,
    pub updated_at: NaiveDateTime,
}

impl<'a> NewJobOpening<'a> {
    pub fn new(hub_id: HubId, details: &'a JobOpeningDetails) -> Self {
        Self {
            hub_id: hub_id.get(),
            title: details.title.as_str(),
            department: details.department.as_deref(),
            description: details.description.as_deref(),
            status: details.status.as_str(),
        }
    }
}

impl<'a> From<&'a JobOpeningDetails> for UpdateJobOpening<'a> {
    fn from(details: &'a JobOpeningDetails) -> Self {
        Self {
            title: details.title.as_str(),
            department: details.department.as_deref(),
            description: details.description.as_deref(),
            status: details.status.as_str(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl TryFrom<JobOpening> for DomainJobOpening {
    type Error = TypeConstraintError;

    fn try_from(job: JobOpening) -> Result<Self, Self::Error> {
        Ok(Self {
            id: JobOpeningId::new(job.id)?,
            hub_id: HubId::new(job.hub_id)?,
            title: JobTitle::new(job.title)?,
            department: job.department,
            description: job.description,
            status: job.status.parse()?,
            created_at: job.created_at,
            updated_at: job.updated_at,
        })
    }
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::candidates)]
pub struct Candidate {
    pub id: i32,
    pub hub_id: i32,
    pub job_opening_id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub resume_url: Option<String>,
    pub stage: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::candidates)]
pub struct NewCandidate<'a> {
    pub hub_id: i32,
    pub job_opening_id: i32,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub resume_url: Option<&'a str>,
    pub stage: &'static str,
    pub notes: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::candidates)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateCandidate<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub resume_url: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Candidate> for DomainCandidate {
    type Error = TypeConstraintError;

    fn try_from(candidate: Candidate) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CandidateId::new(candidate.id)?,
            hub_id: HubId::new(candidate.hub_id)?,
            job_opening_id: JobOpeningId::new(candidate.job_opening_id)?,
            name: CandidateName::new(candidate.name)?,
            email: EmailAddress::new(candidate.email)?,
            phone: candidate.phone.map(PhoneNumber::new).transpose()?,
            resume_url: candidate.resume_url.map(LinkUrl::new).transpose()?,
            stage: candidate.stage.parse()?,
            notes: candidate.notes,
            created_at: candidate.created_at,
            updated_at: candidate.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewCandidate> for NewCandidate<'a> {
    fn from(candidate: &'a DomainNewCandidate) -> Self {
        let details = &candidate.details;
        Self {
            hub_id: candidate.hub_id.get(),
            job_opening_id: candidate.job_opening_id.get(),
            name: details.name.as_str(),
            email: details.email.as_str(),
            phone: details.phone.as_ref().map(|p| p.as_str()),
            resume_url: details.resume_url.as_ref().map(|u| u.as_str()),
            stage: "Applied",
            notes: details.notes.as_deref(),
        }
    }
}

impl<'a> From<&'a CandidateDetails> for UpdateCandidate<'a> {
    fn from(details: &'a CandidateDetails) -> Self {
        Self {
            name: details.name.as_str(),
            email: details.email.as_str(),
            phone: details.phone.as_ref().map(|p| p.as_str()),
            resume_url: details.resume_url.as_ref().map(|u| u.as_str()),
            notes: details.notes.as_deref(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}
