//! Expense claims and their review.

use crate::auth::{AuthenticatedUser, check_role, ensure_any_role, ensure_role};
use crate::domain::employee::Employee;
use crate::domain::errors::DomainError;
use crate::domain::expense::{Expense, ExpenseDetails, ExpenseStatus, NewExpense, summarize_by_category};
use crate::domain::types::{EmployeeId, ExpenseId, HubId};
use crate::dto::expenses::{ExpenseListParams, ExpenseSummary, ExpenseSummaryParams};
use crate::forms::expenses::{ExpenseForm, ReviewExpenseForm};
use crate::pagination::{PageRequest, Paginated};
use crate::repository::{EmployeeReader, EmployeeWriter, ExpenseListQuery, ExpenseReader, ExpenseWriter};
use crate::services::employees::current_employee;
use crate::services::{ServiceError, ServiceResult, text_filter, variant_filter};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE, SERVICE_HR_ROLE};

/// Admins and HR see every expense of the hub.
fn sees_all(user: &AuthenticatedUser) -> bool {
    ensure_any_role(user, &[SERVICE_HR_ROLE]).is_ok()
}

fn load_owned<R>(
    id: i32,
    hub_id: HubId,
    me: &Employee,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Expense>
where
    R: ExpenseReader + ?Sized,
{
    let expense = repo
        .get_expense_by_id(ExpenseId::new(id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    if expense.employee_id == me.id || check_role(SERVICE_ADMIN_ROLE, &user.roles) {
        Ok(expense)
    } else {
        Err(ServiceError::Unauthorized)
    }
}

pub fn list_expenses<R>(
    params: &ExpenseListParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<Expense>>
where
    R: ExpenseReader + EmployeeReader + EmployeeWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let page = PageRequest::new(params.page, params.per_page);

    let mut query = ExpenseListQuery::new(hub_id)
        .spent_between(params.from, params.to)
        .paginate(page.page, page.per_page);
    if let Some(status) = variant_filter::<ExpenseStatus>("status", params.status.as_deref())? {
        query = query.status(status);
    }
    if let Some(category) = text_filter(params.category.as_deref()) {
        query = query.category(category);
    }
    if sees_all(user) {
        if let Some(employee_id) = params.employee_id {
            query = query.employee(EmployeeId::new(employee_id)?);
        }
    } else {
        query = query.employee(current_employee(user, repo)?.id);
    }

    let (total, expenses) = repo.list_expenses(query)?;
    Ok(Paginated::new(expenses, total, page))
}

pub fn get_expense<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Expense>
where
    R: ExpenseReader + EmployeeReader + EmployeeWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let expense = repo
        .get_expense_by_id(ExpenseId::new(id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    if sees_all(user) || expense.employee_id == current_employee(user, repo)?.id {
        Ok(expense)
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Files a claim for the authenticated employee.
pub fn create_expense<R>(
    form: ExpenseForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Expense>
where
    R: ExpenseWriter + EmployeeReader + EmployeeWriter + ?Sized,
{
    let me = current_employee(user, repo)?;
    let details = ExpenseDetails::try_from(form)?;

    let expense = repo.create_expense(&NewExpense {
        hub_id: me.hub_id,
        employee_id: me.id,
        details,
    })?;
    log::info!("Employee {} filed expense {}", me.id, expense.id);
    Ok(expense)
}

pub fn update_expense<R>(
    id: i32,
    form: ExpenseForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Expense>
where
    R: ExpenseReader + ExpenseWriter + EmployeeReader + EmployeeWriter + ?Sized,
{
    let me = current_employee(user, repo)?;
    let expense = load_owned(id, me.hub_id, &me, user, repo)?;
    expense.ensure_editable()?;
    let details = ExpenseDetails::try_from(form)?;

    Ok(repo.update_expense(expense.id, me.hub_id, &details)?)
}

pub fn delete_expense<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: ExpenseReader + ExpenseWriter + EmployeeReader + EmployeeWriter + ?Sized,
{
    let me = current_employee(user, repo)?;
    let expense = load_owned(id, me.hub_id, &me, user, repo)?;
    expense.ensure_editable()?;

    repo.delete_expense(expense.id, me.hub_id)?;
    Ok(())
}

pub fn review_expense<R>(
    id: i32,
    form: ReviewExpenseForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Expense>
where
    R: ExpenseReader + ExpenseWriter + EmployeeReader + EmployeeWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let me = current_employee(user, repo)?;
    let expense = repo
        .get_expense_by_id(ExpenseId::new(id)?, me.hub_id)?
        .ok_or(ServiceError::NotFound)?;
    let status = expense.review(me.id, form.status()?).map_err(|err| {
        if err == DomainError::SelfReview {
            log::warn!("Employee {} tried to review their own expense {}", me.id, expense.id);
        }
        err
    })?;

    Ok(repo.set_expense_status(expense.id, me.hub_id, status, me.id)?)
}

/// Totals per category, rejected claims excluded.
pub fn expense_summary<R>(
    params: &ExpenseSummaryParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ExpenseSummary>
where
    R: ExpenseReader + EmployeeReader + EmployeeWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let mut query = ExpenseListQuery::new(hub_id).spent_between(params.from, params.to);
    if !sees_all(user) {
        query = query.employee(current_employee(user, repo)?.id);
    }

    let (_, expenses) = repo.list_expenses(query)?;
    Ok(ExpenseSummary::new(
        params.from,
        params.to,
        summarize_by_category(&expenses),
    ))
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::domain::types::{Category, Money};
    use crate::repository::mock::MockRepository;
    use crate::services::employees::tests::{employee, user_with};

    fn expense(id: i32, owner: i32, status: ExpenseStatus, category: &str, amount: i64) -> Expense {
        let now = Utc::now().naive_utc();
        Expense {
            id: ExpenseId::new(id).expect("valid id"),
            hub_id: HubId::new(42).expect("valid hub"),
            employee_id: EmployeeId::new(owner).expect("valid id"),
            category: Category::new(category).expect("valid category"),
            amount: Money::new(amount).expect("valid amount"),
            spent_on: NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date"),
            description: None,
            receipt_url: None,
            status,
            reviewed_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn me_is(repo: &mut MockRepository, id: i32) {
        repo.expect_get_employee_by_email()
            .returning(move |_, _| Ok(Some(employee(id, "jane@example.com"))));
    }

    #[test]
    fn regular_users_list_only_their_expenses() {
        let mut repo = MockRepository::new();
        me_is(&mut repo, 3);
        repo.expect_list_expenses()
            .withf(|query| query.employee_id == EmployeeId::new(3).ok())
            .times(1)
            .returning(|_| Ok((0, vec![])));

        let params = ExpenseListParams {
            employee_id: Some(8),
            ..Default::default()
        };
        list_expenses(&params, &user_with(&[SERVICE_ACCESS_ROLE]), &repo).expect("listed");
    }

    #[test]
    fn admins_cannot_review_their_own_expense() {
        let mut repo = MockRepository::new();
        me_is(&mut repo, 3);
        repo.expect_get_expense_by_id()
            .returning(|_, _| Ok(Some(expense(1, 3, ExpenseStatus::Pending, "Travel", 100))));
        repo.expect_set_expense_status().times(0);

        let admin = user_with(&[SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE]);
        let form = ReviewExpenseForm {
            status: "Approved".into(),
        };
        assert!(matches!(
            review_expense(1, form, &admin, &repo),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn approved_expense_is_reimbursed() {
        let mut repo = MockRepository::new();
        me_is(&mut repo, 3);
        repo.expect_get_expense_by_id()
            .returning(|_, _| Ok(Some(expense(1, 5, ExpenseStatus::Approved, "Travel", 100))));
        repo.expect_set_expense_status()
            .withf(|_, _, status, reviewer| {
                *status == ExpenseStatus::Reimbursed && reviewer.get() == 3
            })
            .times(1)
            .returning(|_, _, status, _| Ok(expense(1, 5, status, "Travel", 100)));

        let admin = user_with(&[SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE]);
        let form = ReviewExpenseForm {
            status: "Reimbursed".into(),
        };
        let reviewed = review_expense(1, form, &admin, &repo).expect("reviewed");
        assert_eq!(reviewed.status, ExpenseStatus::Reimbursed);
    }

    #[test]
    fn reviewed_expense_is_locked_for_owner() {
        let mut repo = MockRepository::new();
        me_is(&mut repo, 3);
        repo.expect_get_expense_by_id()
            .returning(|_, _| Ok(Some(expense(1, 3, ExpenseStatus::Approved, "Travel", 100))));
        repo.expect_delete_expense().times(0);

        assert!(matches!(
            delete_expense(1, &user_with(&[SERVICE_ACCESS_ROLE]), &repo),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn summary_skips_rejected_claims() {
        let mut repo = MockRepository::new();
        repo.expect_list_expenses()
            .withf(|query| query.employee_id.is_none() && query.pagination.is_none())
            .returning(|_| {
                Ok((
                    3,
                    vec![
                        expense(1, 3, ExpenseStatus::Approved, "Travel", 100),
                        expense(2, 4, ExpenseStatus::Rejected, "Travel", 900),
                        expense(3, 4, ExpenseStatus::Pending, "Meals", 50),
                    ],
                ))
            });

        let hr = user_with(&[SERVICE_ACCESS_ROLE, SERVICE_HR_ROLE]);
        let summary =
            expense_summary(&ExpenseSummaryParams::default(), &hr, &repo).expect("summary");
        assert_eq!(summary.categories.len(), 2);
        assert_eq!(summary.total, Money::new(150).expect("valid amount"));
    }
}
