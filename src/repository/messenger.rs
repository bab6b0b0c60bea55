use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::{
    domain::{
        messenger::{Conversation, ConversationPreview, Message, NewConversation, NewMessage},
        types::{ConversationId, EmployeeId, HubId},
    },
    models::messenger::{
        Conversation as DbConversation, ConversationParticipant, Message as DbMessage,
        NewConversation as DbNewConversation, NewMessage as DbNewMessage,
    },
    repository::{
        DieselRepository, MessageListQuery, MessengerReader, MessengerWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

/// Participant ids of each conversation, in ascending order.
fn load_participants(
    conn: &mut SqliteConnection,
    conversation_ids: &[i32],
) -> QueryResult<HashMap<i32, Vec<i32>>> {
    use crate::schema::conversation_participants;

    let rows = conversation_participants::table
        .filter(conversation_participants::conversation_id.eq_any(conversation_ids.to_vec()))
        .order((
            conversation_participants::conversation_id.asc(),
            conversation_participants::employee_id.asc(),
        ))
        .load::<ConversationParticipant>(conn)?;

    let mut grouped: HashMap<i32, Vec<i32>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.conversation_id)
            .or_default()
            .push(row.employee_id);
    }
    Ok(grouped)
}

impl MessengerReader for DieselRepository {
    fn get_conversation_by_id(
        &self,
        id: ConversationId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Conversation>> {
        use crate::schema::conversations;

        let mut conn = self.conn()?;
        let Some(db_conversation) = conversations::table
            .filter(conversations::id.eq(id.get()))
            .filter(conversations::hub_id.eq(hub_id.get()))
            .first::<DbConversation>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let participants = load_participants(&mut conn, &[db_conversation.id])?;
        let ids = participants
            .get(&db_conversation.id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        Ok(Some(db_conversation.into_domain(ids)?))
    }

    fn list_conversations(
        &self,
        employee_id: EmployeeId,
        hub_id: HubId,
    ) -> RepositoryResult<Vec<ConversationPreview>> {
        use crate::schema::{conversation_participants, conversations, messages};

        let mut conn = self.conn()?;

        let db_conversations = conversations::table
            .inner_join(conversation_participants::table)
            .filter(conversations::hub_id.eq(hub_id.get()))
            .filter(conversation_participants::employee_id.eq(employee_id.get()))
            .order((conversations::updated_at.desc(), conversations::id.desc()))
            .select(conversations::all_columns)
            .load::<DbConversation>(&mut conn)?;

        let ids: Vec<i32> = db_conversations.iter().map(|c| c.id).collect();
        let participants = load_participants(&mut conn, &ids)?;

        db_conversations
            .into_iter()
            .map(|db_conversation| -> RepositoryResult<ConversationPreview> {
                let last_message = messages::table
                    .filter(messages::conversation_id.eq(db_conversation.id))
                    .order((messages::created_at.desc(), messages::id.desc()))
                    .first::<DbMessage>(&mut conn)
                    .optional()?
                    .map(Message::try_from)
                    .transpose()?;

                let ids = participants
                    .get(&db_conversation.id)
                    .map(Vec::as_slice)
                    .unwrap_or_default();

                Ok(ConversationPreview {
                    conversation: db_conversation.into_domain(ids)?,
                    last_message,
                })
            })
            .collect()
    }

    fn list_messages(&self, query: MessageListQuery) -> RepositoryResult<(usize, Vec<Message>)> {
        use crate::schema::messages;

        let mut conn = self.conn()?;

        let query_builder = || {
            messages::table
                .filter(messages::conversation_id.eq(query.conversation_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>()
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order((messages::created_at.desc(), messages::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let messages = items
            .load::<DbMessage>(&mut conn)?
            .into_iter()
            .map(Message::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, messages))
    }
}

impl MessengerWriter for DieselRepository {
    fn create_conversation(
        &self,
        new_conversation: &NewConversation,
    ) -> RepositoryResult<Conversation> {
        use crate::schema::{conversation_participants, conversations};

        let mut conn = self.conn()?;
        let db_new_conversation = DbNewConversation {
            hub_id: new_conversation.hub_id.get(),
            title: new_conversation.title.as_deref(),
            created_by: new_conversation.created_by.get(),
        };

        let (db_conversation, participant_ids) =
            conn.transaction::<_, RepositoryError, _>(|conn| {
                let conversation = diesel::insert_into(conversations::table)
                    .values(&db_new_conversation)
                    .get_result::<DbConversation>(conn)?;

                let members: Vec<ConversationParticipant> = new_conversation
                    .participants()
                    .iter()
                    .map(|employee_id| ConversationParticipant {
                        conversation_id: conversation.id,
                        employee_id: employee_id.get(),
                    })
                    .collect();

                diesel::insert_into(conversation_participants::table)
                    .values(&members)
                    .execute(conn)?;

                let ids = members.iter().map(|m| m.employee_id).collect::<Vec<_>>();
                Ok((conversation, ids))
            })?;

        Ok(db_conversation.into_domain(&participant_ids)?)
    }

    fn create_message(&self, new_message: &NewMessage) -> RepositoryResult<Message> {
        use crate::schema::{conversations, messages};

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let db_new_message = DbNewMessage::new(new_message, now);

        let db_message = conn.transaction::<_, RepositoryError, _>(|conn| {
            let message = diesel::insert_into(messages::table)
                .values(&db_new_message)
                .get_result::<DbMessage>(conn)?;

            diesel::update(
                conversations::table.filter(conversations::id.eq(new_message.conversation_id.get())),
            )
            .set(conversations::updated_at.eq(now))
            .execute(conn)?;

            Ok(message)
        })?;

        Message::try_from(db_message).map_err(RepositoryError::from)
    }
}
