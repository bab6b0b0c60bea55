use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::messenger::{
    Conversation as DomainConversation, Message as DomainMessage, NewMessage as DomainNewMessage,
};
use crate::domain::types::{
    ConversationId, EmployeeId, HubId, MessageId, SanitizedText, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::conversations)]
pub struct Conversation {
    pub id: i32,
    pub hub_id: i32,
    pub title: Option<String>,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::conversations)]
pub struct NewConversation<'a> {
    pub hub_id: i32,
    pub title: Option<&'a str>,
    pub created_by: i32,
}

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::conversation_participants)]
pub struct ConversationParticipant {
    pub conversation_id: i32,
    pub employee_id: i32,
}

impl Conversation {
    /// Builds the domain conversation from the row and its participant ids.
    pub fn into_domain(self, participants: &[i32]) -> Result<DomainConversation, TypeConstraintError> {
        Ok(DomainConversation {
            id: ConversationId::new(self.id)?,
            hub_id: HubId::new(self.hub_id)?,
            title: self.title,
            created_by: EmployeeId::new(self.created_by)?,
            participants: participants
                .iter()
                .map(|id| EmployeeId::new(*id))
                .collect::<Result<Vec<_>, _>>()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::messages)]
pub struct Message {
    pub id: i32,
    pub conversation_id: i32,
    pub sender_id: i32,
    pub body: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::messages)]
pub struct NewMessage<'a> {
    pub conversation_id: i32,
    pub sender_id: i32,
    pub body: &'a str,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Message> for DomainMessage {
    type Error = TypeConstraintError;

    fn try_from(message: Message) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MessageId::new(message.id)?,
            conversation_id: ConversationId::new(message.conversation_id)?,
            sender_id: EmployeeId::new(message.sender_id)?,
            body: SanitizedText::new(message.body)?,
            created_at: message.created_at,
        })
    }
}

impl<'a> NewMessage<'a> {
    pub fn new(message: &'a DomainNewMessage, created_at: NaiveDateTime) -> Self {
        Self {
            conversation_id: message.conversation_id.get(),
            sender_id: message.sender_id.get(),
            body: message.body.as_str(),
            created_at,
        }
    }
}
