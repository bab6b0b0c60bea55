use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use validator::Validate;

use crate::domain::attendance::{AttendanceStatus, NewAttendance};
use crate::domain::errors::DomainError;
use crate::domain::types::{EmployeeId, HubId, trimmed_opt};
use crate::forms::{FormError, invalid, parse_variant};

#[derive(Debug, Default, Deserialize, Validate)]
/// Body of `POST /attendance/check-in`.
pub struct CheckInForm {
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
/// Body of `PUT /attendance`: an administrator marking any employee's day.
pub struct MarkAttendanceForm {
    pub employee_id: i32,
    pub work_date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub status: String,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

impl MarkAttendanceForm {
    pub fn into_domain(self, hub_id: HubId) -> Result<NewAttendance, FormError> {
        self.validate()?;

        if let (Some(check_in), Some(check_out)) = (self.check_in, self.check_out)
            && check_out < check_in
        {
            return Err(DomainError::CheckOutBeforeCheckIn.into());
        }

        Ok(NewAttendance {
            hub_id,
            employee_id: EmployeeId::new(self.employee_id).map_err(invalid("employee_id"))?,
            work_date: self.work_date,
            check_in: self.check_in,
            check_out: self.check_out,
            status: parse_variant::<AttendanceStatus>("status", &self.status)?,
            note: trimmed_opt(self.note),
        })
    }
}

#[derive(Debug, Deserialize)]
/// Query of `GET /attendance/summary`.
pub struct MonthQuery {
    pub employee_id: Option<i32>,
    pub year: i32,
    pub month: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> MarkAttendanceForm {
        MarkAttendanceForm {
            employee_id: 3,
            work_date: NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
            check_in: NaiveTime::from_hms_opt(9, 0, 0),
            check_out: NaiveTime::from_hms_opt(17, 0, 0),
            status: "Present".into(),
            note: None,
        }
    }

    #[test]
    fn marks_any_status() {
        let mut absent = form();
        absent.status = "Absent".into();
        absent.check_in = None;
        absent.check_out = None;
        let record = absent.into_domain(HubId::new(1).unwrap()).unwrap();
        assert_eq!(record.status, AttendanceStatus::Absent);
    }

    #[test]
    fn check_out_before_check_in_is_rejected() {
        let mut bad = form();
        bad.check_out = NaiveTime::from_hms_opt(8, 0, 0);
        assert!(matches!(
            bad.into_domain(HubId::new(1).unwrap()),
            Err(FormError::Rule(DomainError::CheckOutBeforeCheckIn))
        ));
    }
}
