use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::types::{AttendanceId, EmployeeId, HubId, string_enum};

string_enum!(AttendanceStatus {
    Present,
    Late,
    HalfDay,
    Absent,
    OnLeave,
});

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Attendance {
    pub id: AttendanceId,
    pub hub_id: HubId,
    pub employee_id: EmployeeId,
    pub work_date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

/// Row written by check-in or by an administrator marking a day.
#[derive(Clone, Debug)]
pub struct NewAttendance {
    pub hub_id: HubId,
    pub employee_id: EmployeeId,
    pub work_date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

/// Working-hours rules of a hub.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttendancePolicy {
    pub late_after: NaiveTime,
    pub half_day_minutes: i64,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            late_after: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default(),
            half_day_minutes: 240,
        }
    }
}

impl AttendancePolicy {
    /// Status of a day started at `at`.
    pub fn check_in_status(&self, at: NaiveTime) -> AttendanceStatus {
        if at > self.late_after {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        }
    }

    /// Rejects a second check-in for a day that already has one.
    pub fn ensure_can_check_in(&self, existing: Option<&Attendance>) -> Result<(), DomainError> {
        match existing {
            Some(record) if record.check_in.is_some() => Err(DomainError::AlreadyCheckedIn),
            _ => Ok(()),
        }
    }

    /// Status of the day once checked out at `at`.
    pub fn check_out(
        &self,
        record: Option<&Attendance>,
        at: NaiveTime,
    ) -> Result<AttendanceStatus, DomainError> {
        let record = record.ok_or(DomainError::NotCheckedIn)?;
        let check_in = record.check_in.ok_or(DomainError::NotCheckedIn)?;
        if record.check_out.is_some() {
            return Err(DomainError::AlreadyCheckedOut);
        }
        if at < check_in {
            return Err(DomainError::CheckOutBeforeCheckIn);
        }
        let worked = (at - check_in).num_minutes();
        if worked < self.half_day_minutes {
            Ok(AttendanceStatus::HalfDay)
        } else {
            Ok(record.status)
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct AttendanceSummary {
    pub present: usize,
    pub late: usize,
    pub half_day: usize,
    pub absent: usize,
    pub on_leave: usize,
}

impl AttendanceSummary {
    pub fn from_records(records: &[Attendance]) -> Self {
        records.iter().fold(Self::default(), |mut acc, record| {
            match record.status {
                AttendanceStatus::Present => acc.present += 1,
                AttendanceStatus::Late => acc.late += 1,
                AttendanceStatus::HalfDay => acc.half_day += 1,
                AttendanceStatus::Absent => acc.absent += 1,
                AttendanceStatus::OnLeave => acc.on_leave += 1,
            }
            acc
        })
    }
}

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next.pred_opt()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn record(check_in: Option<NaiveTime>, check_out: Option<NaiveTime>) -> Attendance {
        Attendance {
            id: AttendanceId::new(1).unwrap(),
            hub_id: HubId::new(1).unwrap(),
            employee_id: EmployeeId::new(1).unwrap(),
            work_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            check_in,
            check_out,
            status: AttendanceStatus::Present,
            note: None,
        }
    }

    #[test]
    fn late_after_threshold() {
        let policy = AttendancePolicy::default();
        assert_eq!(policy.check_in_status(time(9, 30)), AttendanceStatus::Present);
        assert_eq!(policy.check_in_status(time(9, 31)), AttendanceStatus::Late);
    }

    #[test]
    fn single_check_in_per_day() {
        let policy = AttendancePolicy::default();
        assert!(policy.ensure_can_check_in(None).is_ok());
        assert_eq!(
            policy.ensure_can_check_in(Some(&record(Some(time(9, 0)), None))),
            Err(DomainError::AlreadyCheckedIn)
        );
    }

    #[test]
    fn check_out_rules() {
        let policy = AttendancePolicy::default();
        assert_eq!(policy.check_out(None, time(17, 0)), Err(DomainError::NotCheckedIn));
        assert_eq!(
            policy.check_out(Some(&record(Some(time(9, 0)), Some(time(17, 0)))), time(18, 0)),
            Err(DomainError::AlreadyCheckedOut)
        );
        assert_eq!(
            policy.check_out(Some(&record(Some(time(9, 0)), None)), time(8, 0)),
            Err(DomainError::CheckOutBeforeCheckIn)
        );
        assert_eq!(
            policy.check_out(Some(&record(Some(time(9, 0)), None)), time(12, 0)),
            Ok(AttendanceStatus::HalfDay)
        );
        assert_eq!(
            policy.check_out(Some(&record(Some(time(9, 0)), None)), time(17, 0)),
            Ok(AttendanceStatus::Present)
        );
    }

    #[test]
    fn summary_counts_each_status() {
        let mut late = record(Some(time(10, 0)), None);
        late.status = AttendanceStatus::Late;
        let mut leave = record(None, None);
        leave.status = AttendanceStatus::OnLeave;
        let summary = AttendanceSummary::from_records(&[record(None, None), late, leave]);
        assert_eq!(summary.present, 1);
        assert_eq!(summary.late, 1);
        assert_eq!(summary.on_leave, 1);
        assert_eq!(summary.absent, 0);
    }

    #[test]
    fn month_bounds_handle_december_and_leap_years() {
        let (first, last) = month_bounds(2024, 2).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        let (_, last) = month_bounds(2025, 12).unwrap();
        assert_eq!(last, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert!(month_bounds(2025, 13).is_none());
    }
}
