use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::leave::{LeaveRange, NewLeaveType};
use crate::domain::types::{HubId, LeaveTypeId, LeaveTypeName, trimmed_opt};
use crate::forms::{FormError, invalid};

#[derive(Debug, Deserialize, Validate)]
/// Body of `POST /leave/types` and `PUT /leave/types/{id}`.
pub struct LeaveTypeForm {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub days_per_year: i32,
    #[serde(default = "default_paid")]
    pub is_paid: bool,
}

fn default_paid() -> bool {
    true
}

impl LeaveTypeForm {
    pub fn into_domain(self, hub_id: HubId) -> Result<NewLeaveType, FormError> {
        self.validate()?;

        let name = LeaveTypeName::new(self.name).map_err(invalid("name"))?;
        NewLeaveType::try_new(hub_id, name, self.days_per_year, self.is_paid)
            .map_err(invalid("days_per_year"))
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Body of `POST /leave/requests`.
pub struct LeaveRequestForm {
    pub leave_type_id: i32,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    #[validate(length(max = 1_000))]
    pub reason: Option<String>,
}

/// Parsed request, still to be checked against existing requests.
#[derive(Debug)]
pub struct LeaveRequestInput {
    pub leave_type_id: LeaveTypeId,
    pub range: LeaveRange,
    pub reason: Option<String>,
}

impl TryFrom<LeaveRequestForm> for LeaveRequestInput {
    type Error = FormError;

    fn try_from(form: LeaveRequestForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(LeaveRequestInput {
            leave_type_id: LeaveTypeId::new(form.leave_type_id)
                .map_err(invalid("leave_type_id"))?,
            range: LeaveRange::new(form.starts_on, form.ends_on)?,
            reason: trimmed_opt(form.reason),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ReviewLeaveForm {
    pub approve: bool,
}
