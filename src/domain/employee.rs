use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{EmailAddress, EmployeeId, EmployeeName, HubId, PhoneNumber};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    pub id: EmployeeId,
    pub hub_id: HubId,
    pub name: EmployeeName,
    pub email: EmailAddress,
    pub phone: Option<PhoneNumber>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub joined_on: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewEmployee {
    pub hub_id: HubId,
    pub name: EmployeeName,
    pub email: EmailAddress,
    pub phone: Option<PhoneNumber>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub joined_on: Option<NaiveDate>,
}

impl NewEmployee {
    #[must_use]
    pub fn new(hub_id: HubId, name: EmployeeName, email: EmailAddress) -> Self {
        Self {
            hub_id,
            name,
            email,
            phone: None,
            department: None,
            designation: None,
            joined_on: None,
        }
    }

    #[must_use]
    pub fn with_phone(mut self, phone: Option<PhoneNumber>) -> Self {
        self.phone = phone;
        self
    }

    #[must_use]
    pub fn with_position(mut self, department: Option<String>, designation: Option<String>) -> Self {
        self.department = department;
        self.designation = designation;
        self
    }

    #[must_use]
    pub fn with_joined_on(mut self, joined_on: Option<NaiveDate>) -> Self {
        self.joined_on = joined_on;
        self
    }
}

#[derive(Clone, Debug)]
pub struct UpdateEmployee {
    pub name: EmployeeName,
    pub phone: Option<PhoneNumber>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub joined_on: Option<NaiveDate>,
    pub is_active: bool,
}
