//! Leave types, leave requests and the entitlement arithmetic behind them.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::types::{
    EmployeeId, HubId, LeaveRequestId, LeaveTypeId, LeaveTypeName, TypeConstraintError,
    string_enum,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LeaveType {
    pub id: LeaveTypeId,
    pub hub_id: HubId,
    pub name: LeaveTypeName,
    pub days_per_year: i32,
    pub is_paid: bool,
}

#[derive(Clone, Debug)]
pub struct NewLeaveType {
    pub hub_id: HubId,
    pub name: LeaveTypeName,
    pub days_per_year: i32,
    pub is_paid: bool,
}

impl NewLeaveType {
    pub fn try_new(
        hub_id: HubId,
        name: LeaveTypeName,
        days_per_year: i32,
        is_paid: bool,
    ) -> Result<Self, TypeConstraintError> {
        if !(0..=366).contains(&days_per_year) {
            return Err(TypeConstraintError::InvalidValue(
                "days_per_year must be between 0 and 366".to_string(),
            ));
        }
        Ok(Self {
            hub_id,
            name,
            days_per_year,
            is_paid,
        })
    }
}

string_enum!(LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
});

impl LeaveStatus {
    /// Requests that hold days against the entitlement.
    pub fn is_active(self) -> bool {
        matches!(self, LeaveStatus::Pending | LeaveStatus::Approved)
    }
}

/// Inclusive date range of a leave request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeaveRange {
    starts_on: NaiveDate,
    ends_on: NaiveDate,
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

impl LeaveRange {
    pub fn new(starts_on: NaiveDate, ends_on: NaiveDate) -> Result<Self, DomainError> {
        if ends_on < starts_on {
            return Err(DomainError::InvalidDateRange);
        }
        if starts_on.year() != ends_on.year() {
            return Err(DomainError::SpansYears);
        }
        let range = Self { starts_on, ends_on };
        if range.days() == 0 {
            return Err(DomainError::NoWorkingDays);
        }
        Ok(range)
    }

    pub fn starts_on(&self) -> NaiveDate {
        self.starts_on
    }

    pub fn ends_on(&self) -> NaiveDate {
        self.ends_on
    }

    pub fn year(&self) -> i32 {
        self.starts_on.year()
    }

    /// Weekdays within the range.
    pub fn weekdays(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.starts_on
            .iter_days()
            .take_while(|day| *day <= self.ends_on)
            .filter(|day| is_weekday(*day))
    }

    pub fn days(&self) -> i32 {
        i32::try_from(self.weekdays().count()).unwrap_or(i32::MAX)
    }

    pub fn overlaps(&self, starts_on: NaiveDate, ends_on: NaiveDate) -> bool {
        self.starts_on <= ends_on && starts_on <= self.ends_on
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LeaveRequest {
    pub id: LeaveRequestId,
    pub hub_id: HubId,
    pub employee_id: EmployeeId,
    pub leave_type_id: LeaveTypeId,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub days: i32,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub reviewed_by: Option<EmployeeId>,
    pub created_at: NaiveDateTime,
}

impl LeaveRequest {
    fn transition(&self, to: LeaveStatus) -> DomainError {
        DomainError::InvalidTransition {
            entity: "leave request",
            from: self.status.to_string(),
            to: to.to_string(),
        }
    }

    pub fn review(&self, approve: bool) -> Result<LeaveStatus, DomainError> {
        let to = if approve {
            LeaveStatus::Approved
        } else {
            LeaveStatus::Rejected
        };
        if self.status == LeaveStatus::Pending {
            Ok(to)
        } else {
            Err(self.transition(to))
        }
    }

    pub fn cancel(&self, today: NaiveDate) -> Result<LeaveStatus, DomainError> {
        match self.status {
            LeaveStatus::Pending => Ok(LeaveStatus::Cancelled),
            LeaveStatus::Approved if self.starts_on > today => Ok(LeaveStatus::Cancelled),
            LeaveStatus::Approved => Err(DomainError::LeaveAlreadyStarted),
            _ => Err(self.transition(LeaveStatus::Cancelled)),
        }
    }

    /// Weekdays covered by the request, used to mark attendance.
    pub fn weekdays(&self) -> Vec<NaiveDate> {
        self.starts_on
            .iter_days()
            .take_while(|day| *day <= self.ends_on)
            .filter(|day| is_weekday(*day))
            .collect()
    }
}

#[derive(Clone, Debug)]
pub struct NewLeaveRequest {
    pub hub_id: HubId,
    pub employee_id: EmployeeId,
    pub leave_type_id: LeaveTypeId,
    pub range: LeaveRange,
    pub days: i32,
    pub reason: Option<String>,
}

impl NewLeaveRequest {
    /// Validates a request against the employee's existing requests.
    ///
    /// `existing` holds every request of the employee; only active ones count
    /// towards overlap and only those of the same type and year towards the
    /// balance.
    pub fn try_new(
        hub_id: HubId,
        employee_id: EmployeeId,
        leave_type: &LeaveType,
        range: LeaveRange,
        reason: Option<String>,
        existing: &[LeaveRequest],
    ) -> Result<Self, DomainError> {
        let active = existing.iter().filter(|request| request.status.is_active());

        if active
            .clone()
            .any(|request| range.overlaps(request.starts_on, request.ends_on))
        {
            return Err(DomainError::OverlappingLeave);
        }

        let held: i32 = active
            .filter(|request| {
                request.leave_type_id == leave_type.id && request.starts_on.year() == range.year()
            })
            .map(|request| request.days)
            .sum();
        let remaining = (leave_type.days_per_year - held).max(0);
        let requested = range.days();
        if requested > remaining {
            return Err(DomainError::InsufficientLeave {
                requested,
                remaining,
            });
        }

        Ok(Self {
            hub_id,
            employee_id,
            leave_type_id: leave_type.id,
            range,
            days: requested,
            reason,
        })
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct LeaveBalance {
    pub leave_type_id: LeaveTypeId,
    pub name: String,
    pub entitled: i32,
    pub used: i32,
    pub pending: i32,
    pub remaining: i32,
}

impl LeaveBalance {
    /// Balance of `leave_type` for `year` given all requests of one employee.
    pub fn compute(leave_type: &LeaveType, year: i32, requests: &[LeaveRequest]) -> Self {
        let of_type = requests.iter().filter(|request| {
            request.leave_type_id == leave_type.id && request.starts_on.year() == year
        });
        let (used, pending) = of_type.fold((0, 0), |(used, pending), request| match request.status {
            LeaveStatus::Approved => (used + request.days, pending),
            LeaveStatus::Pending => (used, pending + request.days),
            _ => (used, pending),
        });
        Self {
            leave_type_id: leave_type.id,
            name: leave_type.name.to_string(),
            entitled: leave_type.days_per_year,
            used,
            pending,
            remaining: (leave_type.days_per_year - used - pending).max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn annual() -> LeaveType {
        LeaveType {
            id: LeaveTypeId::new(1).unwrap(),
            hub_id: HubId::new(1).unwrap(),
            name: LeaveTypeName::new("Annual").unwrap(),
            days_per_year: 10,
            is_paid: true,
        }
    }

    fn request(starts: NaiveDate, ends: NaiveDate, days: i32, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            id: LeaveRequestId::new(1).unwrap(),
            hub_id: HubId::new(1).unwrap(),
            employee_id: EmployeeId::new(1).unwrap(),
            leave_type_id: LeaveTypeId::new(1).unwrap(),
            starts_on: starts,
            ends_on: ends,
            days,
            reason: None,
            status,
            reviewed_by: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn range_counts_weekdays_only() {
        // Friday 2025-03-07 to Tuesday 2025-03-11
        let range = LeaveRange::new(date(2025, 3, 7), date(2025, 3, 11)).unwrap();
        assert_eq!(range.days(), 3);
    }

    #[test]
    fn range_validation() {
        assert_eq!(
            LeaveRange::new(date(2025, 3, 11), date(2025, 3, 7)),
            Err(DomainError::InvalidDateRange)
        );
        assert_eq!(
            LeaveRange::new(date(2025, 12, 30), date(2026, 1, 2)),
            Err(DomainError::SpansYears)
        );
        // Saturday and Sunday
        assert_eq!(
            LeaveRange::new(date(2025, 3, 8), date(2025, 3, 9)),
            Err(DomainError::NoWorkingDays)
        );
    }

    #[test]
    fn overlapping_active_requests_conflict() {
        let employee = EmployeeId::new(1).unwrap();
        let hub = HubId::new(1).unwrap();
        let existing = [request(date(2025, 3, 10), date(2025, 3, 12), 3, LeaveStatus::Approved)];
        let range = LeaveRange::new(date(2025, 3, 12), date(2025, 3, 14)).unwrap();
        assert_eq!(
            NewLeaveRequest::try_new(hub, employee, &annual(), range, None, &existing).err(),
            Some(DomainError::OverlappingLeave)
        );

        let rejected = [request(date(2025, 3, 10), date(2025, 3, 12), 3, LeaveStatus::Rejected)];
        assert!(NewLeaveRequest::try_new(hub, employee, &annual(), range, None, &rejected).is_ok());
    }

    #[test]
    fn balance_counts_pending_and_approved() {
        let employee = EmployeeId::new(1).unwrap();
        let hub = HubId::new(1).unwrap();
        let existing = [
            request(date(2025, 1, 6), date(2025, 1, 10), 5, LeaveStatus::Approved),
            request(date(2025, 2, 3), date(2025, 2, 6), 4, LeaveStatus::Pending),
            request(date(2024, 2, 3), date(2024, 2, 6), 4, LeaveStatus::Approved),
        ];
        let range = LeaveRange::new(date(2025, 3, 3), date(2025, 3, 4)).unwrap();
        assert_eq!(
            NewLeaveRequest::try_new(hub, employee, &annual(), range, None, &existing).err(),
            Some(DomainError::InsufficientLeave {
                requested: 2,
                remaining: 1
            })
        );

        let balance = LeaveBalance::compute(&annual(), 2025, &existing);
        assert_eq!(balance.used, 5);
        assert_eq!(balance.pending, 4);
        assert_eq!(balance.remaining, 1);
    }

    #[test]
    fn cancellation_rules() {
        let today = date(2025, 3, 5);
        let pending = request(date(2025, 3, 3), date(2025, 3, 4), 2, LeaveStatus::Pending);
        assert_eq!(pending.cancel(today), Ok(LeaveStatus::Cancelled));

        let upcoming = request(date(2025, 3, 10), date(2025, 3, 11), 2, LeaveStatus::Approved);
        assert_eq!(upcoming.cancel(today), Ok(LeaveStatus::Cancelled));

        let started = request(date(2025, 3, 5), date(2025, 3, 6), 2, LeaveStatus::Approved);
        assert_eq!(started.cancel(today), Err(DomainError::LeaveAlreadyStarted));

        let rejected = request(date(2025, 3, 10), date(2025, 3, 11), 2, LeaveStatus::Rejected);
        assert!(rejected.cancel(today).is_err());
    }

    #[test]
    fn approval_only_from_pending() {
        let pending = request(date(2025, 3, 3), date(2025, 3, 4), 2, LeaveStatus::Pending);
        assert_eq!(pending.review(true), Ok(LeaveStatus::Approved));
        let approved = request(date(2025, 3, 3), date(2025, 3, 4), 2, LeaveStatus::Approved);
        assert!(approved.review(false).is_err());
        assert_eq!(approved.weekdays().len(), 2);
    }
}
