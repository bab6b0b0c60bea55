//! Diesel models for attendance records, leave types and leave requests.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;

use crate::domain::attendance::{Attendance as DomainAttendance, NewAttendance as DomainNewAttendance};
use crate::domain::leave::{
    LeaveRequest as DomainLeaveRequest, LeaveType as DomainLeaveType,
    NewLeaveRequest as DomainNewLeaveRequest, NewLeaveType as DomainNewLeaveType,
};
use crate::domain::types::{
    AttendanceId, EmployeeId, HubId, LeaveRequestId, LeaveTypeId, LeaveTypeName,
    TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::attendance)]
pub struct Attendance {
    pub id: i32,
    pub hub_id: i32,
    pub employee_id: i32,
    pub work_date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub status: String,
    pub note: Option<String>,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::attendance)]
#[diesel(treat_none_as_null = true)]
pub struct NewAttendance<'a> {
    pub hub_id: i32,
    pub employee_id: i32,
    pub work_date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub status: &'static str,
    pub note: Option<&'a str>,
}

impl TryFrom<Attendance> for DomainAttendance {
    type Error = TypeConstraintError;

    fn try_from(record: Attendance) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AttendanceId::new(record.id)?,
            hub_id: HubId::new(record.hub_id)?,
            employee_id: EmployeeId::new(record.employee_id)?,
            work_date: record.work_date,
            check_in: record.check_in,
            check_out: record.check_out,
            status: record.status.parse()?,
            note: record.note,
        })
    }
}

impl<'a> From<&'a DomainNewAttendance> for NewAttendance<'a> {
    fn from(record: &'a DomainNewAttendance) -> Self {
        Self {
            hub_id: record.hub_id.get(),
            employee_id: record.employee_id.get(),
            work_date: record.work_date,
            check_in: record.check_in,
            check_out: record.check_out,
            status: record.status.as_str(),
            note: record.note.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::leave_types)]
pub struct LeaveType {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub days_per_year: i32,
    pub is_paid: bool,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::leave_types)]
pub struct NewLeaveType<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub days_per_year: i32,
    pub is_paid: bool,
}

impl TryFrom<LeaveType> for DomainLeaveType {
    type Error = TypeConstraintError;

    fn try_from(leave_type: LeaveType) -> Result<Self, Self::Error> {
        Ok(Self {
            id: LeaveTypeId::new(leave_type.id)?,
            hub_id: HubId::new(leave_type.hub_id)?,
            name: LeaveTypeName::new(leave_type.name)?,
            days_per_year: leave_type.days_per_year,
            is_paid: leave_type.is_paid,
        })
    }
}

impl<'a> From<&'a DomainNewLeaveType> for NewLeaveType<'a> {
    fn from(leave_type: &'a DomainNewLeaveType) -> Self {
        Self {
            hub_id: leave_type.hub_id.get(),
            name: leave_type.name.as_str(),
            days_per_year: leave_type.days_per_year,
            is_paid: leave_type.is_paid,
        }
    }
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::leave_requests)]
pub struct LeaveRequest {
    pub id: i32,
    pub hub_id: i32,
    pub employee_id: i32,
    pub leave_type_id: i32,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub days: i32,
    pub reason: Option<String>,
    pub status: String,
    pub reviewed_by: Option<i32>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::leave_requests)]
pub struct NewLeaveRequest<'a> {
    pub hub_id: i32,
    pub employee_id: i32,
    pub leave_type_id: i32,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub days: i32,
    pub reason: Option<&'a str>,
    pub status: &'static str,
}

impl TryFrom<LeaveRequest> for DomainLeaveRequest {
    type Error = TypeConstraintError;

    fn try_from(request: LeaveRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            id: LeaveRequestId::new(request.id)?,
            hub_id: HubId::new(request.hub_id)?,
            employee_id: EmployeeId::new(request.employee_id)?,
            leave_type_id: LeaveTypeId::new(request.leave_type_id)?,
            starts_on: request.starts_on,
            ends_on: request.ends_on,
            days: request.days,
            reason: request.reason,
            status: request.status.parse()?,
            reviewed_by: request.reviewed_by.map(EmployeeId::new).transpose()?,
            created_at: request.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewLeaveRequest> for NewLeaveRequest<'a> {
    fn from(request: &'a DomainNewLeaveRequest) -> Self {
        Self {
            hub_id: request.hub_id.get(),
            employee_id: request.employee_id.get(),
            leave_type_id: request.leave_type_id.get(),
            starts_on: request.range.starts_on(),
            ends_on: request.range.ends_on(),
            days: request.days,
            reason: request.reason.as_deref(),
            status: "Pending",
        }
    }
}
