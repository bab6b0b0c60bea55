use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::employee::NewEmployee;
use crate::domain::errors::DomainError;
use crate::domain::types::{
    CandidateId, CandidateName, EmailAddress, EmployeeName, HubId, JobOpeningId, JobTitle,
    LinkUrl, PhoneNumber, TypeConstraintError, string_enum,
};

string_enum!(JobStatus {
    Open,
    OnHold,
    Closed,
});

string_enum!(
    /// Hiring funnel stage, in pipeline order.
    CandidateStage {
        Applied,
        Screening,
        Interview,
        Offer,
        Hired,
        Rejected,
    }
);

impl CandidateStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, CandidateStage::Hired | CandidateStage::Rejected)
    }

    fn rank(self) -> u8 {
        match self {
            CandidateStage::Applied => 0,
            CandidateStage::Screening => 1,
            CandidateStage::Interview => 2,
            CandidateStage::Offer => 3,
            CandidateStage::Hired => 4,
            CandidateStage::Rejected => 5,
        }
    }

    /// Stages only move forward; rejection is possible from any open stage.
    pub fn can_move_to(self, to: CandidateStage) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == CandidateStage::Rejected || to.rank() > self.rank()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct JobOpening {
    pub id: JobOpeningId,
    pub hub_id: HubId,
    pub title: JobTitle,
    pub department: Option<String>,
    pub description: Option<String>,
    pub status: JobStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl JobOpening {
    pub fn ensure_open(&self) -> Result<(), DomainError> {
        if self.status == JobStatus::Open {
            Ok(())
        } else {
            Err(DomainError::JobNotOpen)
        }
    }
}

#[derive(Clone, Debug)]
pub struct JobOpeningDetails {
    pub title: JobTitle,
    pub department: Option<String>,
    pub description: Option<String>,
    pub status: JobStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub id: CandidateId,
    pub hub_id: HubId,
    pub job_opening_id: JobOpeningId,
    pub name: CandidateName,
    pub email: EmailAddress,
    pub phone: Option<PhoneNumber>,
    pub resume_url: Option<LinkUrl>,
    pub stage: CandidateStage,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Candidate {
    pub fn move_to(&self, to: CandidateStage) -> Result<CandidateStage, DomainError> {
        if self.stage.can_move_to(to) {
            Ok(to)
        } else {
            Err(DomainError::InvalidTransition {
                entity: "candidate",
                from: self.stage.to_string(),
                to: to.to_string(),
            })
        }
    }

    /// Employee row created when the candidate is hired for `job`.
    pub fn to_new_employee(
        &self,
        job: &JobOpening,
        joined_on: NaiveDate,
    ) -> Result<NewEmployee, TypeConstraintError> {
        let name = EmployeeName::new(self.name.as_str())?;
        Ok(NewEmployee::new(self.hub_id, name, self.email.clone())
            .with_phone(self.phone.clone())
            .with_position(job.department.clone(), Some(job.title.to_string()))
            .with_joined_on(Some(joined_on)))
    }
}

/// Candidate contents shared by create and update.
#[derive(Clone, Debug)]
pub struct CandidateDetails {
    pub name: CandidateName,
    pub email: EmailAddress,
    pub phone: Option<PhoneNumber>,
    pub resume_url: Option<LinkUrl>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug)]
pub struct NewCandidate {
    pub hub_id: HubId,
    pub job_opening_id: JobOpeningId,
    pub details: CandidateDetails,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn candidate(stage: CandidateStage) -> Candidate {
        let now = Utc::now().naive_utc();
        Candidate {
            id: CandidateId::new(1).unwrap(),
            hub_id: HubId::new(1).unwrap(),
            job_opening_id: JobOpeningId::new(1).unwrap(),
            name: CandidateName::new("Grace Hopper").unwrap(),
            email: EmailAddress::new("grace@example.com").unwrap(),
            phone: None,
            resume_url: None,
            stage,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn stages_move_forward_only() {
        let screening = candidate(CandidateStage::Screening);
        assert_eq!(
            screening.move_to(CandidateStage::Offer),
            Ok(CandidateStage::Offer)
        );
        assert!(screening.move_to(CandidateStage::Applied).is_err());
        assert!(screening.move_to(CandidateStage::Screening).is_err());
        assert_eq!(
            screening.move_to(CandidateStage::Rejected),
            Ok(CandidateStage::Rejected)
        );
    }

    #[test]
    fn terminal_stages_are_final() {
        assert!(candidate(CandidateStage::Hired).move_to(CandidateStage::Rejected).is_err());
        assert!(candidate(CandidateStage::Rejected).move_to(CandidateStage::Offer).is_err());
    }

    #[test]
    fn hired_candidate_becomes_employee_with_job_position() {
        let now = Utc::now().naive_utc();
        let job = JobOpening {
            id: JobOpeningId::new(1).unwrap(),
            hub_id: HubId::new(1).unwrap(),
            title: JobTitle::new("Backend Engineer").unwrap(),
            department: Some("Engineering".to_string()),
            description: None,
            status: JobStatus::Open,
            created_at: now,
            updated_at: now,
        };
        let joined = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let employee = candidate(CandidateStage::Offer)
            .to_new_employee(&job, joined)
            .unwrap();
        assert_eq!(employee.name.as_str(), "Grace Hopper");
        assert_eq!(employee.department.as_deref(), Some("Engineering"));
        assert_eq!(employee.designation.as_deref(), Some("Backend Engineer"));
        assert_eq!(employee.joined_on, Some(joined));
    }
}
