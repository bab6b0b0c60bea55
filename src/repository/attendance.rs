//! Repository implementation for attendance, leave types and leave requests.
//!
//! Leave decisions touch attendance too, so both live in one module and
//! share the same transactional upsert.

use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::{
    domain::{
        attendance::{Attendance, AttendanceStatus, NewAttendance},
        leave::{LeaveRequest, LeaveStatus, LeaveType, NewLeaveRequest, NewLeaveType},
        types::{AttendanceId, EmployeeId, HubId, LeaveRequestId, LeaveTypeId},
    },
    models::attendance::{
        Attendance as DbAttendance, LeaveRequest as DbLeaveRequest, LeaveType as DbLeaveType,
        NewAttendance as DbNewAttendance, NewLeaveRequest as DbNewLeaveRequest,
        NewLeaveType as DbNewLeaveType,
    },
    repository::{
        AttendanceListQuery, AttendanceReader, AttendanceWriter, DieselRepository,
        LeaveReader, LeaveRequestListQuery, LeaveWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

fn upsert_attendance_row(
    conn: &mut SqliteConnection,
    record: &DbNewAttendance,
) -> QueryResult<DbAttendance> {
    use crate::schema::attendance;

    diesel::insert_into(attendance::table)
        .values(record)
        .on_conflict((attendance::employee_id, attendance::work_date))
        .do_update()
        .set(record)
        .get_result::<DbAttendance>(conn)
}

impl AttendanceReader for DieselRepository {
    fn get_attendance_for_day(
        &self,
        employee_id: EmployeeId,
        hub_id: HubId,
        work_date: NaiveDate,
    ) -> RepositoryResult<Option<Attendance>> {
        use crate::schema::attendance;

        let mut conn = self.conn()?;
        let db_record = attendance::table
            .filter(attendance::employee_id.eq(employee_id.get()))
            .filter(attendance::hub_id.eq(hub_id.get()))
            .filter(attendance::work_date.eq(work_date))
            .first::<DbAttendance>(&mut conn)
            .optional()?;

        db_record
            .map(Attendance::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_attendance(
        &self,
        query: AttendanceListQuery,
    ) -> RepositoryResult<(usize, Vec<Attendance>)> {
        use crate::schema::attendance;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = attendance::table
                .filter(attendance::hub_id.eq(query.hub_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(employee_id) = query.employee_id {
                items = items.filter(attendance::employee_id.eq(employee_id.get()));
            }
            if let Some(from) = query.from {
                items = items.filter(attendance::work_date.ge(from));
            }
            if let Some(to) = query.to {
                items = items.filter(attendance::work_date.le(to));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items =
            query_builder().order((attendance::work_date.desc(), attendance::employee_id.asc()));
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let records = items
            .load::<DbAttendance>(&mut conn)?
            .into_iter()
            .map(Attendance::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, records))
    }
}

impl AttendanceWriter for DieselRepository {
    fn upsert_attendance(&self, record: &NewAttendance) -> RepositoryResult<Attendance> {
        let mut conn = self.conn()?;
        let db_record: DbNewAttendance = record.into();

        let stored = upsert_attendance_row(&mut conn, &db_record)?;

        Attendance::try_from(stored).map_err(RepositoryError::from)
    }

    fn record_check_out(
        &self,
        id: AttendanceId,
        check_out: NaiveTime,
        status: AttendanceStatus,
    ) -> RepositoryResult<Attendance> {
        use crate::schema::attendance;

        let mut conn = self.conn()?;
        let db_record = diesel::update(
            attendance::table
                .filter(attendance::id.eq(id.get()))
                .filter(attendance::check_out.is_null()),
        )
        .set((
            attendance::check_out.eq(Some(check_out)),
            attendance::status.eq(status.as_str()),
        ))
        .get_result::<DbAttendance>(&mut conn)
        .optional()?
        .ok_or_else(|| {
            RepositoryError::ConstraintViolation(format!("attendance {id} is already closed"))
        })?;

        Attendance::try_from(db_record).map_err(RepositoryError::from)
    }
}

impl LeaveReader for DieselRepository {
    fn get_leave_type_by_id(
        &self,
        id: LeaveTypeId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<LeaveType>> {
        use crate::schema::leave_types;

        let mut conn = self.conn()?;
        let db_type = leave_types::table
            .filter(leave_types::id.eq(id.get()))
            .filter(leave_types::hub_id.eq(hub_id.get()))
            .first::<DbLeaveType>(&mut conn)
            .optional()?;

        db_type
            .map(LeaveType::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_leave_types(&self, hub_id: HubId) -> RepositoryResult<Vec<LeaveType>> {
        use crate::schema::leave_types;

        let mut conn = self.conn()?;
        leave_types::table
            .filter(leave_types::hub_id.eq(hub_id.get()))
            .order(leave_types::name.asc())
            .load::<DbLeaveType>(&mut conn)?
            .into_iter()
            .map(|t| LeaveType::try_from(t).map_err(RepositoryError::from))
            .collect()
    }

    fn get_leave_request_by_id(
        &self,
        id: LeaveRequestId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<LeaveRequest>> {
        use crate::schema::leave_requests;

        let mut conn = self.conn()?;
        let db_request = leave_requests::table
            .filter(leave_requests::id.eq(id.get()))
            .filter(leave_requests::hub_id.eq(hub_id.get()))
            .first::<DbLeaveRequest>(&mut conn)
            .optional()?;

        db_request
            .map(LeaveRequest::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_leave_requests(
        &self,
        query: LeaveRequestListQuery,
    ) -> RepositoryResult<(usize, Vec<LeaveRequest>)> {
        use crate::schema::leave_requests;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = leave_requests::table
                .filter(leave_requests::hub_id.eq(query.hub_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(employee_id) = query.employee_id {
                items = items.filter(leave_requests::employee_id.eq(employee_id.get()));
            }
            if let Some(status) = query.status {
                items = items.filter(leave_requests::status.eq(status.as_str()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items =
            query_builder().order((leave_requests::starts_on.desc(), leave_requests::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let requests = items
            .load::<DbLeaveRequest>(&mut conn)?
            .into_iter()
            .map(LeaveRequest::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, requests))
    }
}

impl LeaveWriter for DieselRepository {
    fn create_leave_type(&self, new_type: &NewLeaveType) -> RepositoryResult<LeaveType> {
        use crate::schema::leave_types;

        let mut conn = self.conn()?;
        let db_new_type: DbNewLeaveType = new_type.into();

        let db_type = diesel::insert_into(leave_types::table)
            .values(&db_new_type)
            .get_result::<DbLeaveType>(&mut conn)?;

        LeaveType::try_from(db_type).map_err(RepositoryError::from)
    }

    fn update_leave_type(
        &self,
        id: LeaveTypeId,
        updates: &NewLeaveType,
    ) -> RepositoryResult<LeaveType> {
        use crate::schema::leave_types;

        let mut conn = self.conn()?;
        let db_updates: DbNewLeaveType = updates.into();

        let db_type = diesel::update(
            leave_types::table
                .filter(leave_types::id.eq(id.get()))
                .filter(leave_types::hub_id.eq(updates.hub_id.get())),
        )
        .set(&db_updates)
        .get_result::<DbLeaveType>(&mut conn)?;

        LeaveType::try_from(db_type).map_err(RepositoryError::from)
    }

    fn delete_leave_type(&self, id: LeaveTypeId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::{leave_requests, leave_types};

        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let in_use = diesel::select(diesel::dsl::exists(
                leave_requests::table.filter(leave_requests::leave_type_id.eq(id.get())),
            ))
            .get_result::<bool>(conn)?;
            if in_use {
                return Err(RepositoryError::ConstraintViolation(format!(
                    "leave type {id} has leave requests"
                )));
            }

            let deleted = diesel::delete(
                leave_types::table
                    .filter(leave_types::id.eq(id.get()))
                    .filter(leave_types::hub_id.eq(hub_id.get())),
            )
            .execute(conn)?;

            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
    }

    fn create_leave_request(&self, request: &NewLeaveRequest) -> RepositoryResult<LeaveRequest> {
        use crate::schema::leave_requests;

        let mut conn = self.conn()?;
        let db_new_request: DbNewLeaveRequest = request.into();

        let db_request = diesel::insert_into(leave_requests::table)
            .values(&db_new_request)
            .get_result::<DbLeaveRequest>(&mut conn)?;

        LeaveRequest::try_from(db_request).map_err(RepositoryError::from)
    }

    fn review_leave_request(
        &self,
        request: &LeaveRequest,
        status: LeaveStatus,
        reviewer: EmployeeId,
    ) -> RepositoryResult<LeaveRequest> {
        use crate::schema::leave_requests;

        let mut conn = self.conn()?;

        let db_request = conn.transaction::<_, RepositoryError, _>(|conn| {
            let updated = diesel::update(
                leave_requests::table
                    .filter(leave_requests::id.eq(request.id.get()))
                    .filter(leave_requests::hub_id.eq(request.hub_id.get()))
                    .filter(leave_requests::status.eq(request.status.as_str())),
            )
            .set((
                leave_requests::status.eq(status.as_str()),
                leave_requests::reviewed_by.eq(Some(reviewer.get())),
            ))
            .get_result::<DbLeaveRequest>(conn)
            .optional()?;

            let Some(updated) = updated else {
                return Err(RepositoryError::ConstraintViolation(format!(
                    "leave request {} was reviewed concurrently",
                    request.id
                )));
            };

            if status == LeaveStatus::Approved {
                for day in request.weekdays() {
                    let mark = DbNewAttendance {
                        hub_id: request.hub_id.get(),
                        employee_id: request.employee_id.get(),
                        work_date: day,
                        check_in: None,
                        check_out: None,
                        status: AttendanceStatus::OnLeave.as_str(),
                        note: request.reason.as_deref(),
                    };
                    upsert_attendance_row(conn, &mark)?;
                }
            }

            Ok(updated)
        })?;

        LeaveRequest::try_from(db_request).map_err(RepositoryError::from)
    }

    fn cancel_leave_request(&self, request: &LeaveRequest) -> RepositoryResult<LeaveRequest> {
        use crate::schema::{attendance, leave_requests};

        let mut conn = self.conn()?;

        let db_request = conn.transaction::<_, RepositoryError, _>(|conn| {
            let updated = diesel::update(
                leave_requests::table
                    .filter(leave_requests::id.eq(request.id.get()))
                    .filter(leave_requests::hub_id.eq(request.hub_id.get()))
                    .filter(leave_requests::status.eq(request.status.as_str())),
            )
            .set(leave_requests::status.eq(LeaveStatus::Cancelled.as_str()))
            .get_result::<DbLeaveRequest>(conn)
            .optional()?;

            let Some(updated) = updated else {
                return Err(RepositoryError::ConstraintViolation(format!(
                    "leave request {} changed concurrently",
                    request.id
                )));
            };

            if request.status == LeaveStatus::Approved {
                diesel::delete(
                    attendance::table
                        .filter(attendance::employee_id.eq(request.employee_id.get()))
                        .filter(attendance::work_date.between(request.starts_on, request.ends_on))
                        .filter(attendance::status.eq(AttendanceStatus::OnLeave.as_str())),
                )
                .execute(conn)?;
            }

            Ok(updated)
        })?;

        LeaveRequest::try_from(db_request).map_err(RepositoryError::from)
    }
}
