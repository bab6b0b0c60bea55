use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::types::{ConversationId, EmployeeId, HubId, MessageId, SanitizedText};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    pub id: ConversationId,
    pub hub_id: HubId,
    pub title: Option<String>,
    pub created_by: EmployeeId,
    pub participants: Vec<EmployeeId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Conversation {
    pub fn has_participant(&self, employee_id: EmployeeId) -> bool {
        self.participants.contains(&employee_id)
    }
}

#[derive(Clone, Debug)]
pub struct NewConversation {
    pub hub_id: HubId,
    pub title: Option<String>,
    pub created_by: EmployeeId,
    participants: Vec<EmployeeId>,
}

impl NewConversation {
    /// Adds the creator to the participants and deduplicates them.
    pub fn try_new(
        hub_id: HubId,
        title: Option<String>,
        created_by: EmployeeId,
        participants: &[EmployeeId],
    ) -> Result<Self, DomainError> {
        let mut unique: BTreeSet<EmployeeId> = participants.iter().copied().collect();
        unique.insert(created_by);
        if unique.len() < 2 {
            return Err(DomainError::NotEnoughParticipants);
        }
        Ok(Self {
            hub_id,
            title,
            created_by,
            participants: unique.into_iter().collect(),
        })
    }

    pub fn participants(&self) -> &[EmployeeId] {
        &self.participants
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: EmployeeId,
    pub body: SanitizedText,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewMessage {
    pub conversation_id: ConversationId,
    pub sender_id: EmployeeId,
    pub body: SanitizedText,
}

/// Conversation with its latest message, as listed in an inbox.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ConversationPreview {
    pub conversation: Conversation,
    pub last_message: Option<Message>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(v: i32) -> EmployeeId {
        EmployeeId::new(v).unwrap()
    }

    #[test]
    fn creator_joins_and_duplicates_collapse() {
        let hub = HubId::new(1).unwrap();
        let conversation =
            NewConversation::try_new(hub, None, id(3), &[id(5), id(5), id(3)]).unwrap();
        assert_eq!(conversation.participants(), &[id(3), id(5)]);
    }

    #[test]
    fn talking_to_yourself_is_rejected() {
        let hub = HubId::new(1).unwrap();
        assert_eq!(
            NewConversation::try_new(hub, None, id(3), &[id(3)]).err(),
            Some(DomainError::NotEnoughParticipants)
        );
    }
}
