use serde::Deserialize;
use validator::Validate;

use crate::domain::recruitment::{CandidateDetails, CandidateStage, JobOpeningDetails, JobStatus};
use crate::domain::types::{
    CandidateName, EmailAddress, JobOpeningId, JobTitle, LinkUrl, PhoneNumber, trimmed_opt,
};
use crate::forms::{FormError, invalid, optional, parse_variant};

#[derive(Debug, Deserialize, Validate)]
/// Body of `POST /jobs` and `PUT /jobs/{id}`.
pub struct JobOpeningForm {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(max = 128))]
    pub department: Option<String>,
    #[validate(length(max = 10_000))]
    pub description: Option<String>,
    pub status: Option<String>,
}

impl TryFrom<JobOpeningForm> for JobOpeningDetails {
    type Error = FormError;

    fn try_from(form: JobOpeningForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let status = match trimmed_opt(form.status) {
            Some(status) => parse_variant::<JobStatus>("status", &status)?,
            None => JobStatus::Open,
        };
        Ok(JobOpeningDetails {
            title: JobTitle::new(form.title).map_err(invalid("title"))?,
            department: trimmed_opt(form.department),
            description: trimmed_opt(form.description),
            status,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Body of `POST /candidates` and `PUT /candidates/{id}`. The job is fixed
/// once the candidate exists, so updates ignore `job_opening_id`.
pub struct CandidateForm {
    pub job_opening_id: Option<i32>,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub resume_url: Option<String>,
    #[validate(length(max = 10_000))]
    pub notes: Option<String>,
}

impl CandidateForm {
    pub fn job_opening_id(&self) -> Result<JobOpeningId, FormError> {
        let id = self.job_opening_id.ok_or_else(|| FormError::InvalidField {
            field: "job_opening_id",
            source: crate::domain::types::TypeConstraintError::InvalidValue(
                "job opening is required".to_string(),
            ),
        })?;
        JobOpeningId::new(id).map_err(invalid("job_opening_id"))
    }
}

impl TryFrom<CandidateForm> for CandidateDetails {
    type Error = FormError;

    fn try_from(form: CandidateForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(CandidateDetails {
            name: CandidateName::new(form.name).map_err(invalid("name"))?,
            email: EmailAddress::new(form.email).map_err(invalid("email"))?,
            phone: optional("phone", form.phone, PhoneNumber::new)?,
            resume_url: optional("resume_url", form.resume_url, LinkUrl::new)?,
            notes: trimmed_opt(form.notes),
        })
    }
}

#[derive(Debug, Deserialize)]
/// Body of `POST /candidates/{id}/stage`.
pub struct CandidateStageForm {
    pub stage: String,
}

impl CandidateStageForm {
    pub fn stage(&self) -> Result<CandidateStage, FormError> {
        parse_variant("stage", &self.stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_defaults_to_open() {
        let form = JobOpeningForm {
            title: "Account executive".into(),
            department: Some("Sales".into()),
            description: None,
            status: None,
        };
        let details = JobOpeningDetails::try_from(form).unwrap();
        assert_eq!(details.status, JobStatus::Open);
        assert_eq!(details.title.as_str(), "Account executive");
    }

    #[test]
    fn candidate_requires_job_and_valid_email() {
        let form = CandidateForm {
            job_opening_id: None,
            name: "Sam".into(),
            email: "sam@".into(),
            phone: None,
            resume_url: None,
            notes: None,
        };
        assert!(form.job_opening_id().is_err());
        assert!(matches!(
            CandidateDetails::try_from(form),
            Err(FormError::InvalidField { field: "email", .. })
        ));
    }
}
