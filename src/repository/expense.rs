use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::{
        expense::{Expense, ExpenseDetails, ExpenseStatus, NewExpense},
        types::{EmployeeId, ExpenseId, HubId},
    },
    models::expense::{
        Expense as DbExpense, NewExpense as DbNewExpense, UpdateExpense as DbUpdateExpense,
    },
    repository::{
        DieselRepository, ExpenseListQuery, ExpenseReader, ExpenseWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl ExpenseReader for DieselRepository {
    fn get_expense_by_id(&self, id: ExpenseId, hub_id: HubId) -> RepositoryResult<Option<Expense>> {
        use crate::schema::expenses;

        let mut conn = self.conn()?;
        let db_expense = expenses::table
            .filter(expenses::id.eq(id.get()))
            .filter(expenses::hub_id.eq(hub_id.get()))
            .first::<DbExpense>(&mut conn)
            .optional()?;

        db_expense
            .map(Expense::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_expenses(&self, query: ExpenseListQuery) -> RepositoryResult<(usize, Vec<Expense>)> {
        use crate::schema::expenses;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = expenses::table
                .filter(expenses::hub_id.eq(query.hub_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(employee_id) = query.employee_id {
                items = items.filter(expenses::employee_id.eq(employee_id.get()));
            }
            if let Some(status) = query.status {
                items = items.filter(expenses::status.eq(status.as_str()));
            }
            if let Some(category) = &query.category {
                items = items.filter(expenses::category.eq(category));
            }
            if let Some(from) = query.spent_from {
                items = items.filter(expenses::spent_on.ge(from));
            }
            if let Some(to) = query.spent_to {
                items = items.filter(expenses::spent_on.le(to));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order((expenses::spent_on.desc(), expenses::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let expenses = items
            .load::<DbExpense>(&mut conn)?
            .into_iter()
            .map(Expense::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, expenses))
    }
}

impl ExpenseWriter for DieselRepository {
    fn create_expense(&self, new_expense: &NewExpense) -> RepositoryResult<Expense> {
        use crate::schema::expenses;

        let mut conn = self.conn()?;
        let db_new_expense: DbNewExpense = new_expense.into();

        let db_expense = diesel::insert_into(expenses::table)
            .values(&db_new_expense)
            .get_result::<DbExpense>(&mut conn)?;

        Expense::try_from(db_expense).map_err(RepositoryError::from)
    }

    fn update_expense(
        &self,
        id: ExpenseId,
        hub_id: HubId,
        details: &ExpenseDetails,
    ) -> RepositoryResult<Expense> {
        use crate::schema::expenses;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateExpense = details.into();

        let db_expense = diesel::update(
            expenses::table
                .filter(expenses::id.eq(id.get()))
                .filter(expenses::hub_id.eq(hub_id.get())),
        )
        .set(&db_updates)
        .get_result::<DbExpense>(&mut conn)?;

        Expense::try_from(db_expense).map_err(RepositoryError::from)
    }

    fn delete_expense(&self, id: ExpenseId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::expenses;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            expenses::table
                .filter(expenses::id.eq(id.get()))
                .filter(expenses::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn set_expense_status(
        &self,
        id: ExpenseId,
        hub_id: HubId,
        status: ExpenseStatus,
        reviewer: EmployeeId,
    ) -> RepositoryResult<Expense> {
        use crate::schema::expenses;

        let mut conn = self.conn()?;
        let db_expense = diesel::update(
            expenses::table
                .filter(expenses::id.eq(id.get()))
                .filter(expenses::hub_id.eq(hub_id.get())),
        )
        .set((
            expenses::status.eq(status.as_str()),
            expenses::reviewed_by.eq(Some(reviewer.get())),
            expenses::updated_at.eq(Utc::now().naive_utc()),
        ))
        .get_result::<DbExpense>(&mut conn)?;

        Expense::try_from(db_expense).map_err(RepositoryError::from)
    }
}
