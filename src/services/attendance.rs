//! Daily check-ins, administrator marks and monthly summaries.

use chrono::NaiveDateTime;

use crate::auth::{AuthenticatedUser, ensure_any_role, ensure_role};
use crate::domain::attendance::{
    Attendance, AttendancePolicy, AttendanceSummary, NewAttendance, month_bounds,
};
use crate::domain::types::{EmployeeId, HubId, trimmed_opt};
use crate::dto::attendance::{AttendanceListParams, AttendanceMonth};
use crate::forms::attendance::{CheckInForm, MarkAttendanceForm, MonthQuery};
use crate::pagination::{PageRequest, Paginated};
use crate::repository::{
    AttendanceListQuery, AttendanceReader, AttendanceWriter, EmployeeReader, EmployeeWriter,
};
use crate::services::employees::current_employee;
use crate::services::{ServiceError, ServiceResult};
use crate::SERVICE_HR_ROLE;

/// Employee whose records the request may read: HR picks anyone, everybody
/// else only themselves.
fn subject<R>(
    requested: Option<i32>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<EmployeeId>
where
    R: EmployeeReader + EmployeeWriter + ?Sized,
{
    match requested {
        Some(id) if ensure_any_role(user, &[SERVICE_HR_ROLE]).is_ok() => {
            Ok(EmployeeId::new(id)?)
        }
        _ => Ok(current_employee(user, repo)?.id),
    }
}

pub fn check_in<R>(
    form: CheckInForm,
    policy: &AttendancePolicy,
    now: NaiveDateTime,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Attendance>
where
    R: AttendanceReader + AttendanceWriter + EmployeeReader + EmployeeWriter + ?Sized,
{
    let me = current_employee(user, repo)?;
    let work_date = now.date();
    let at = now.time();

    let existing = repo.get_attendance_for_day(me.id, me.hub_id, work_date)?;
    policy.ensure_can_check_in(existing.as_ref())?;

    let record = repo.upsert_attendance(&NewAttendance {
        hub_id: me.hub_id,
        employee_id: me.id,
        work_date,
        check_in: Some(at),
        check_out: None,
        status: policy.check_in_status(at),
        note: trimmed_opt(form.note),
    })?;
    log::info!("Employee {} checked in at {at} ({})", me.id, record.status);
    Ok(record)
}

pub fn check_out<R>(
    policy: &AttendancePolicy,
    now: NaiveDateTime,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Attendance>
where
    R: AttendanceReader + AttendanceWriter + EmployeeReader + EmployeeWriter + ?Sized,
{
    let me = current_employee(user, repo)?;
    let at = now.time();

    let existing = repo.get_attendance_for_day(me.id, me.hub_id, now.date())?;
    let status = policy.check_out(existing.as_ref(), at)?;
    let record = existing.ok_or(ServiceError::NotFound)?;

    Ok(repo.record_check_out(record.id, at, status)?)
}

/// Sets the record of any employee and day.
pub fn mark_attendance<R>(
    form: MarkAttendanceForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Attendance>
where
    R: AttendanceWriter + EmployeeReader + ?Sized,
{
    ensure_role(user, SERVICE_HR_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let record = form.into_domain(hub_id)?;
    if repo
        .get_employee_by_id(record.employee_id, hub_id)?
        .is_none()
    {
        return Err(ServiceError::NotFound);
    }

    Ok(repo.upsert_attendance(&record)?)
}

pub fn list_attendance<R>(
    params: &AttendanceListParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<Attendance>>
where
    R: AttendanceReader + EmployeeReader + EmployeeWriter + ?Sized,
{
    let hub_id = HubId::new(user.hub_id)?;
    let page = PageRequest::new(params.page, params.per_page);

    let mut query = AttendanceListQuery::new(hub_id)
        .between(params.from, params.to)
        .paginate(page.page, page.per_page);
    let sees_all = ensure_any_role(user, &[SERVICE_HR_ROLE]).is_ok();
    if !sees_all || params.employee_id.is_some() {
        query = query.employee(subject(params.employee_id, user, repo)?);
    }

    let (total, records) = repo.list_attendance(query)?;
    Ok(Paginated::new(records, total, page))
}

pub fn monthly_summary<R>(
    params: &MonthQuery,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<AttendanceMonth>
where
    R: AttendanceReader + EmployeeReader + EmployeeWriter + ?Sized,
{
    let hub_id = HubId::new(user.hub_id)?;
    let employee_id = subject(params.employee_id, user, repo)?;
    let (first, last) = month_bounds(params.year, params.month)
        .ok_or_else(|| ServiceError::Form(format!("invalid month {}", params.month)))?;

    let query = AttendanceListQuery::new(hub_id)
        .employee(employee_id)
        .between(Some(first), Some(last));
    let (_, records) = repo.list_attendance(query)?;

    Ok(AttendanceMonth {
        employee_id,
        year: params.year,
        month: params.month,
        summary: AttendanceSummary::from_records(&records),
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;
    use crate::SERVICE_ACCESS_ROLE;
    use crate::domain::attendance::AttendanceStatus;
    use crate::domain::types::AttendanceId;
    use crate::repository::mock::MockRepository;
    use crate::services::employees::tests::{employee, user_with};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, 4)
            .and_then(|day| day.and_hms_opt(h, m, 0))
            .expect("valid timestamp")
    }

    fn record(check_in: Option<NaiveTime>, status: AttendanceStatus) -> Attendance {
        Attendance {
            id: AttendanceId::new(1).expect("valid id"),
            hub_id: HubId::new(42).expect("valid hub"),
            employee_id: EmployeeId::new(3).expect("valid id"),
            work_date: at(0, 0).date(),
            check_in,
            check_out: None,
            status,
            note: None,
        }
    }

    fn staff(repo: &mut MockRepository) -> AuthenticatedUser {
        repo.expect_get_employee_by_email()
            .returning(|_, _| Ok(Some(employee(3, "jane@example.com"))));
        user_with(&[SERVICE_ACCESS_ROLE])
    }

    #[test]
    fn late_check_in_is_marked_late() {
        let mut repo = MockRepository::new();
        let user = staff(&mut repo);
        repo.expect_get_attendance_for_day().returning(|_, _, _| Ok(None));
        repo.expect_upsert_attendance()
            .withf(|new| new.status == AttendanceStatus::Late && new.check_out.is_none())
            .times(1)
            .returning(|new| Ok(record(new.check_in, new.status)));

        let policy = AttendancePolicy::default();
        let saved = check_in(CheckInForm::default(), &policy, at(10, 5), &user, &repo)
            .expect("checked in");
        assert_eq!(saved.status, AttendanceStatus::Late);
    }

    #[test]
    fn second_check_in_is_a_conflict() {
        let mut repo = MockRepository::new();
        let user = staff(&mut repo);
        repo.expect_get_attendance_for_day().returning(|_, _, _| {
            Ok(Some(record(NaiveTime::from_hms_opt(9, 0, 0), AttendanceStatus::Present)))
        });
        repo.expect_upsert_attendance().times(0);

        let policy = AttendancePolicy::default();
        assert!(matches!(
            check_in(CheckInForm::default(), &policy, at(9, 10), &user, &repo),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn short_day_becomes_half_day() {
        let mut repo = MockRepository::new();
        let user = staff(&mut repo);
        repo.expect_get_attendance_for_day().returning(|_, _, _| {
            Ok(Some(record(NaiveTime::from_hms_opt(9, 0, 0), AttendanceStatus::Present)))
        });
        repo.expect_record_check_out()
            .withf(|_, _, status| *status == AttendanceStatus::HalfDay)
            .times(1)
            .returning(|_, _, status| Ok(record(NaiveTime::from_hms_opt(9, 0, 0), status)));

        let policy = AttendancePolicy::default();
        check_out(&policy, at(11, 0), &user, &repo).expect("checked out");
    }

    #[test]
    fn staff_cannot_read_other_employees() {
        let mut repo = MockRepository::new();
        let user = staff(&mut repo);
        repo.expect_list_attendance()
            .withf(|query| {
                query.employee_id == EmployeeId::new(3).ok()
                    && query.from == NaiveDate::from_ymd_opt(2026, 2, 1)
                    && query.to == NaiveDate::from_ymd_opt(2026, 2, 28)
            })
            .times(1)
            .returning(|_| Ok((1, vec![record(None, AttendanceStatus::Absent)])));

        let params = MonthQuery {
            employee_id: Some(8),
            year: 2026,
            month: 2,
        };
        let month = monthly_summary(&params, &user, &repo).expect("summary");
        assert_eq!(month.summary.absent, 1);
    }

    #[test]
    fn marking_needs_hr() {
        let repo = MockRepository::new();
        let form = MarkAttendanceForm {
            employee_id: 3,
            work_date: at(0, 0).date(),
            check_in: None,
            check_out: None,
            status: "Absent".into(),
            note: None,
        };
        assert!(matches!(
            mark_attendance(form, &user_with(&[SERVICE_ACCESS_ROLE]), &repo),
            Err(ServiceError::Unauthorized)
        ));
    }
}
