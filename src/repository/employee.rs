//! Repository implementation for hub employees.

use chrono::Utc;
use diesel::{prelude::*, sqlite::SqliteConnection, upsert::excluded};

use crate::{
    domain::{
        employee::{Employee, NewEmployee, UpdateEmployee},
        types::{EmailAddress, EmployeeId, HubId},
    },
    models::employee::{
        Employee as DbEmployee, NewEmployee as DbNewEmployee, UpdateEmployee as DbUpdateEmployee,
    },
    repository::{
        DieselRepository, EmployeeListQuery, EmployeeReader, EmployeeWriter, LIKE_ESCAPE,
        errors::{RepositoryError, RepositoryResult},
        like_pattern,
    },
};

/// Inserts the employee or reactivates and refreshes the `(hub_id, email)` row.
pub(crate) fn upsert_employee_row(
    conn: &mut SqliteConnection,
    new_employee: &DbNewEmployee,
) -> QueryResult<DbEmployee> {
    use crate::schema::employees;

    diesel::insert_into(employees::table)
        .values(new_employee)
        .on_conflict((employees::hub_id, employees::email))
        .do_update()
        .set((
            employees::name.eq(excluded(employees::name)),
            employees::phone.eq(excluded(employees::phone)),
            employees::department.eq(excluded(employees::department)),
            employees::designation.eq(excluded(employees::designation)),
            employees::joined_on.eq(excluded(employees::joined_on)),
            employees::is_active.eq(true),
            employees::updated_at.eq(Utc::now().naive_utc()),
        ))
        .get_result::<DbEmployee>(conn)
}

impl EmployeeReader for DieselRepository {
    fn get_employee_by_id(
        &self,
        id: EmployeeId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Employee>> {
        use crate::schema::employees;

        let mut conn = self.conn()?;
        let db_employee = employees::table
            .filter(employees::id.eq(id.get()))
            .filter(employees::hub_id.eq(hub_id.get()))
            .first::<DbEmployee>(&mut conn)
            .optional()?;

        db_employee
            .map(Employee::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn get_employee_by_email(
        &self,
        email: &EmailAddress,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Employee>> {
        use crate::schema::employees;

        let mut conn = self.conn()?;
        let db_employee = employees::table
            .filter(employees::email.eq(email.as_str()))
            .filter(employees::hub_id.eq(hub_id.get()))
            .first::<DbEmployee>(&mut conn)
            .optional()?;

        db_employee
            .map(Employee::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_employees(&self, query: EmployeeListQuery) -> RepositoryResult<(usize, Vec<Employee>)> {
        use crate::schema::employees;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = employees::table
                .filter(employees::hub_id.eq(query.hub_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(active) = query.active {
                items = items.filter(employees::is_active.eq(active));
            }
            if let Some(department) = &query.department {
                items = items.filter(employees::department.eq(department));
            }
            if let Some(search) = &query.search {
                let pattern = like_pattern(search);
                items = items.filter(
                    employees::name
                        .like(pattern.clone())
                        .escape(LIKE_ESCAPE)
                        .or(employees::email.like(pattern).escape(LIKE_ESCAPE)),
                );
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(employees::name.asc());
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let employees = items
            .load::<DbEmployee>(&mut conn)?
            .into_iter()
            .map(Employee::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, employees))
    }

    fn filter_active_employees(
        &self,
        hub_id: HubId,
        ids: &[EmployeeId],
    ) -> RepositoryResult<Vec<EmployeeId>> {
        use crate::schema::employees;

        if ids.is_empty() {
            return Ok(vec![]);
        }

        let mut conn = self.conn()?;
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();
        let active = employees::table
            .filter(employees::hub_id.eq(hub_id.get()))
            .filter(employees::is_active.eq(true))
            .filter(employees::id.eq_any(raw_ids))
            .select(employees::id)
            .order(employees::id.asc())
            .load::<i32>(&mut conn)?;

        active
            .into_iter()
            .map(EmployeeId::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepositoryError::from)
    }
}

impl EmployeeWriter for DieselRepository {
    fn create_employee(&self, new_employee: &NewEmployee) -> RepositoryResult<Employee> {
        use crate::schema::employees;

        let mut conn = self.conn()?;
        let db_new_employee: DbNewEmployee = new_employee.into();

        let db_employee = diesel::insert_into(employees::table)
            .values(&db_new_employee)
            .get_result::<DbEmployee>(&mut conn)?;

        Employee::try_from(db_employee).map_err(RepositoryError::from)
    }

    fn upsert_employee(&self, new_employee: &NewEmployee) -> RepositoryResult<Employee> {
        let mut conn = self.conn()?;
        let db_new_employee: DbNewEmployee = new_employee.into();

        let db_employee = upsert_employee_row(&mut conn, &db_new_employee)?;

        Employee::try_from(db_employee).map_err(RepositoryError::from)
    }

    fn update_employee(
        &self,
        id: EmployeeId,
        hub_id: HubId,
        updates: &UpdateEmployee,
    ) -> RepositoryResult<Employee> {
        use crate::schema::employees;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateEmployee = updates.into();

        let db_employee = diesel::update(
            employees::table
                .filter(employees::id.eq(id.get()))
                .filter(employees::hub_id.eq(hub_id.get())),
        )
        .set(&db_updates)
        .get_result::<DbEmployee>(&mut conn)?;

        Employee::try_from(db_employee).map_err(RepositoryError::from)
    }

    fn deactivate_employee(&self, id: EmployeeId, hub_id: HubId) -> RepositoryResult<Employee> {
        use crate::schema::employees;

        let mut conn = self.conn()?;
        let db_employee = diesel::update(
            employees::table
                .filter(employees::id.eq(id.get()))
                .filter(employees::hub_id.eq(hub_id.get())),
        )
        .set((
            employees::is_active.eq(false),
            employees::updated_at.eq(Utc::now().naive_utc()),
        ))
        .get_result::<DbEmployee>(&mut conn)?;

        Employee::try_from(db_employee).map_err(RepositoryError::from)
    }
}
