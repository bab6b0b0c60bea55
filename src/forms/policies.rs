use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::policy::PolicyDetails;
use crate::domain::types::{Category, PolicyTitle, SanitizedText};
use crate::forms::{FormError, invalid};

#[derive(Debug, Deserialize, Validate)]
/// Body of `POST /policies` and `PUT /policies/{id}`.
pub struct PolicyForm {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 128))]
    pub category: String,
    #[validate(length(min = 1, max = 100_000))]
    pub content: String,
    pub effective_from: NaiveDate,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl TryFrom<PolicyForm> for PolicyDetails {
    type Error = FormError;

    fn try_from(form: PolicyForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(PolicyDetails {
            title: PolicyTitle::new(form.title).map_err(invalid("title"))?,
            category: Category::new(form.category).map_err(invalid("category"))?,
            content: SanitizedText::new(form.content).map_err(invalid("content"))?,
            effective_from: form.effective_from,
            is_active: form.is_active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_is_sanitized() {
        let form = PolicyForm {
            title: "Remote work".into(),
            category: "HR".into(),
            content: "<p onclick=\"x()\">Two days a week</p>".into(),
            effective_from: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            is_active: true,
        };
        let details = PolicyDetails::try_from(form).unwrap();
        assert_eq!(details.content.as_str(), "<p>Two days a week</p>");
    }
}
