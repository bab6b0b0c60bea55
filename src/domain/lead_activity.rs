use std::fmt::Display;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::lead::LeadStatus;
use crate::domain::types::{EmployeeId, LeadActivityId, LeadId, TypeConstraintError};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LeadActivity {
    pub id: LeadActivityId,
    pub lead_id: LeadId,
    pub employee_id: EmployeeId,
    pub activity_type: ActivityType,
    pub activity_data: Value,
    pub created_at: NaiveDateTime,
}

impl LeadActivity {
    pub fn try_new(
        id: i32,
        lead_id: i32,
        employee_id: i32,
        activity_type: impl Into<ActivityType>,
        activity_data: Value,
        created_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: LeadActivityId::new(id)?,
            lead_id: LeadId::new(lead_id)?,
            employee_id: EmployeeId::new(employee_id)?,
            activity_type: activity_type.into(),
            activity_data,
            created_at,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(into = "String", from = "String")]
pub enum ActivityType {
    Comment,
    Call,
    Email,
    Meeting,
    StatusChange,
    Assignment,
    Other(String),
}

impl Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityType::Comment => write!(f, "Comment"),
            ActivityType::Call => write!(f, "Call"),
            ActivityType::Email => write!(f, "Email"),
            ActivityType::Meeting => write!(f, "Meeting"),
            ActivityType::StatusChange => write!(f, "StatusChange"),
            ActivityType::Assignment => write!(f, "Assignment"),
            ActivityType::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for ActivityType {
    fn from(s: &str) -> Self {
        match s {
            "Comment" => ActivityType::Comment,
            "Call" => ActivityType::Call,
            "Email" => ActivityType::Email,
            "Meeting" => ActivityType::Meeting,
            "StatusChange" => ActivityType::StatusChange,
            "Assignment" => ActivityType::Assignment,
            _ => ActivityType::Other(s.to_string()),
        }
    }
}

impl From<String> for ActivityType {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<ActivityType> for String {
    fn from(value: ActivityType) -> Self {
        value.to_string()
    }
}

impl ActivityType {
    /// Activity kinds written by the system rather than typed by a user.
    pub fn is_system(&self) -> bool {
        matches!(self, ActivityType::StatusChange | ActivityType::Assignment)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewLeadActivity {
    pub lead_id: LeadId,
    pub employee_id: EmployeeId,
    pub activity_type: ActivityType,
    pub activity_data: Value,
    pub created_at: NaiveDateTime,
}

impl NewLeadActivity {
    #[must_use]
    pub fn new(
        lead_id: LeadId,
        employee_id: EmployeeId,
        activity_type: ActivityType,
        activity_data: Value,
    ) -> Self {
        Self {
            lead_id,
            employee_id,
            activity_type,
            activity_data,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[must_use]
    pub fn status_change(
        lead_id: LeadId,
        employee_id: EmployeeId,
        from: LeadStatus,
        to: LeadStatus,
    ) -> Self {
        Self::new(
            lead_id,
            employee_id,
            ActivityType::StatusChange,
            json!({ "from": from, "to": to }),
        )
    }

    #[must_use]
    pub fn assignment(
        lead_id: LeadId,
        employee_id: EmployeeId,
        from: Option<EmployeeId>,
        to: Option<EmployeeId>,
    ) -> Self {
        Self::new(
            lead_id,
            employee_id,
            ActivityType::Assignment,
            json!({ "from": from, "to": to }),
        )
    }
}
