use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::employee::{NewEmployee, UpdateEmployee};
use crate::domain::types::{EmailAddress, EmployeeName, HubId, PhoneNumber, trimmed_opt};
use crate::forms::{FormError, invalid, optional};

#[derive(Debug, Deserialize, Validate)]
/// Body of `POST /employees`.
pub struct AddEmployeeForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    #[validate(length(max = 128))]
    pub department: Option<String>,
    #[validate(length(max = 128))]
    pub designation: Option<String>,
    pub joined_on: Option<NaiveDate>,
}

impl AddEmployeeForm {
    pub fn into_domain(self, hub_id: HubId) -> Result<NewEmployee, FormError> {
        self.validate()?;

        let name = EmployeeName::new(self.name).map_err(invalid("name"))?;
        let email = EmailAddress::new(self.email).map_err(invalid("email"))?;
        let phone = optional("phone", self.phone, PhoneNumber::new)?;

        Ok(NewEmployee::new(hub_id, name, email)
            .with_phone(phone)
            .with_position(trimmed_opt(self.department), trimmed_opt(self.designation))
            .with_joined_on(self.joined_on))
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Body of `PUT /employees/{id}`. The email is the identity and cannot change.
pub struct UpdateEmployeeForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub phone: Option<String>,
    #[validate(length(max = 128))]
    pub department: Option<String>,
    #[validate(length(max = 128))]
    pub designation: Option<String>,
    pub joined_on: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl TryFrom<UpdateEmployeeForm> for UpdateEmployee {
    type Error = FormError;

    fn try_from(form: UpdateEmployeeForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(UpdateEmployee {
            name: EmployeeName::new(form.name).map_err(invalid("name"))?,
            phone: optional("phone", form.phone, PhoneNumber::new)?,
            department: trimmed_opt(form.department),
            designation: trimmed_opt(form.designation),
            joined_on: form.joined_on,
            is_active: form.is_active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> AddEmployeeForm {
        AddEmployeeForm {
            name: "  Jane Doe ".into(),
            email: "Jane@Example.com".into(),
            phone: Some("".into()),
            department: Some(" Sales ".into()),
            designation: None,
            joined_on: None,
        }
    }

    #[test]
    fn add_form_normalises_fields() {
        let employee = form().into_domain(HubId::new(1).unwrap()).unwrap();

        assert_eq!(employee.name.as_str(), "Jane Doe");
        assert_eq!(employee.email.as_str(), "jane@example.com");
        assert!(employee.phone.is_none());
        assert_eq!(employee.department.as_deref(), Some("Sales"));
    }

    #[test]
    fn add_form_rejects_bad_email() {
        let mut bad = form();
        bad.email = "jane".into();
        assert!(matches!(
            bad.into_domain(HubId::new(1).unwrap()),
            Err(FormError::Validation(_))
        ));
    }
}
