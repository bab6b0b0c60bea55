use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{EmployeeId, SanitizedText, trimmed_opt};
use crate::forms::{FormError, invalid};

#[derive(Debug, Deserialize, Validate)]
/// Body of `POST /conversations`. The creator is added by the service.
pub struct ConversationForm {
    #[validate(length(max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub participants: Vec<i32>,
}

impl ConversationForm {
    pub fn into_parts(self) -> Result<(Option<String>, Vec<EmployeeId>), FormError> {
        self.validate()?;

        let participants = self
            .participants
            .into_iter()
            .map(EmployeeId::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid("participants"))?;
        Ok((trimmed_opt(self.title), participants))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct MessageForm {
    #[validate(length(min = 1, max = 10_000))]
    pub body: String,
}

impl TryFrom<MessageForm> for SanitizedText {
    type Error = FormError;

    fn try_from(form: MessageForm) -> Result<Self, Self::Error> {
        form.validate()?;
        SanitizedText::new(form.body).map_err(invalid("body"))
    }
}
