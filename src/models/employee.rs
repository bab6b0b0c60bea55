//! Diesel models representing hub employees.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::employee::{
    Employee as DomainEmployee, NewEmployee as DomainNewEmployee,
    UpdateEmployee as DomainUpdateEmployee,
};
use crate::domain::types::{
    EmailAddress, EmployeeId, EmployeeName, HubId, PhoneNumber, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::employees)]
/// Diesel model for [`crate::domain::employee::Employee`].
pub struct Employee {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub joined_on: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::employees)]
/// Insertable form of [`Employee`].
pub struct NewEmployee<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub department: Option<&'a str>,
    pub designation: Option<&'a str>,
    pub joined_on: Option<NaiveDate>,
    pub is_active: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::employees)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating an [`Employee`] record.
pub struct UpdateEmployee<'a> {
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub department: Option<&'a str>,
    pub designation: Option<&'a str>,
    pub joined_on: Option<NaiveDate>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Employee> for DomainEmployee {
    type Error = TypeConstraintError;

    fn try_from(employee: Employee) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EmployeeId::new(employee.id)?,
            hub_id: HubId::new(employee.hub_id)?,
            name: EmployeeName::new(employee.name)?,
            email: EmailAddress::new(employee.email)?,
            phone: employee.phone.map(PhoneNumber::new).transpose()?,
            department: employee.department,
            designation: employee.designation,
            joined_on: employee.joined_on,
            is_active: employee.is_active,
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewEmployee> for NewEmployee<'a> {
    fn from(employee: &'a DomainNewEmployee) -> Self {
        Self {
            hub_id: employee.hub_id.get(),
            name: employee.name.as_str(),
            email: employee.email.as_str(),
            phone: employee.phone.as_ref().map(|p| p.as_str()),
            department: employee.department.as_deref(),
            designation: employee.designation.as_deref(),
            joined_on: employee.joined_on,
            is_active: true,
        }
    }
}

impl<'a> From<&'a DomainUpdateEmployee> for UpdateEmployee<'a> {
    fn from(employee: &'a DomainUpdateEmployee) -> Self {
        Self {
            name: employee.name.as_str(),
            phone: employee.phone.as_ref().map(|p| p.as_str()),
            department: employee.department.as_deref(),
            designation: employee.designation.as_deref(),
            joined_on: employee.joined_on,
            is_active: employee.is_active,
            updated_at: Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_row_into_domain() {
        let now = Utc::now().naive_utc();
        let row = Employee {
            id: 3,
            hub_id: 1,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: Some("+12025550143".into()),
            department: Some("Sales".into()),
            designation: None,
            joined_on: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let domain = DomainEmployee::try_from(row).expect("valid employee");
        assert_eq!(domain.id.get(), 3);
        assert_eq!(domain.email.as_str(), "ada@example.com");
        assert_eq!(domain.department.as_deref(), Some("Sales"));
    }

    #[test]
    fn invalid_email_is_rejected() {
        let now = Utc::now().naive_utc();
        let row = Employee {
            id: 3,
            hub_id: 1,
            name: "Ada".into(),
            email: "nope".into(),
            phone: None,
            department: None,
            designation: None,
            joined_on: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(
            DomainEmployee::try_from(row).err(),
            Some(TypeConstraintError::InvalidEmail)
        );
    }
}
