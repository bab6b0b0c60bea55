//! Internal conversations between employees of a hub.

use crate::auth::AuthenticatedUser;
use crate::domain::employee::Employee;
use crate::domain::messenger::{
    Conversation, ConversationPreview, Message, NewConversation, NewMessage,
};
use crate::domain::types::{ConversationId, SanitizedText};
use crate::dto::PageParams;
use crate::forms::messenger::{ConversationForm, MessageForm};
use crate::pagination::Paginated;
use crate::repository::{
    EmployeeReader, EmployeeWriter, MessageListQuery, MessengerReader, MessengerWriter,
};
use crate::services::employees::current_employee;
use crate::services::{ServiceError, ServiceResult};

/// Conversation the employee takes part in. Others look like missing ones.
fn joined<R>(id: i32, me: &Employee, repo: &R) -> ServiceResult<Conversation>
where
    R: MessengerReader + ?Sized,
{
    let conversation = repo
        .get_conversation_by_id(ConversationId::new(id)?, me.hub_id)?
        .ok_or(ServiceError::NotFound)?;
    if conversation.has_participant(me.id) {
        Ok(conversation)
    } else {
        log::info!("Employee {} is not part of conversation {id}", me.id);
        Err(ServiceError::NotFound)
    }
}

pub fn list_conversations<R>(
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<ConversationPreview>>
where
    R: MessengerReader + EmployeeReader + EmployeeWriter + ?Sized,
{
    let me = current_employee(user, repo)?;
    Ok(repo.list_conversations(me.id, me.hub_id)?)
}

pub fn get_conversation<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Conversation>
where
    R: MessengerReader + EmployeeReader + EmployeeWriter + ?Sized,
{
    let me = current_employee(user, repo)?;
    joined(id, &me, repo)
}

/// Opens a conversation with active colleagues; the creator always joins.
pub fn create_conversation<R>(
    form: ConversationForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Conversation>
where
    R: MessengerWriter + EmployeeReader + EmployeeWriter + ?Sized,
{
    let me = current_employee(user, repo)?;
    let (title, participants) = form.into_parts()?;

    let active = repo.filter_active_employees(me.hub_id, &participants)?;
    if let Some(unknown) = participants.iter().find(|id| !active.contains(id)) {
        return Err(ServiceError::Form(format!(
            "employee {unknown} is not an active member of this hub"
        )));
    }

    let new_conversation = NewConversation::try_new(me.hub_id, title, me.id, &participants)?;
    let conversation = repo.create_conversation(&new_conversation)?;
    log::info!(
        "Employee {} opened conversation {} with {} participants",
        me.id,
        conversation.id,
        conversation.participants.len()
    );
    Ok(conversation)
}

/// Newest first.
pub fn list_messages<R>(
    id: i32,
    params: &PageParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<Message>>
where
    R: MessengerReader + EmployeeReader + EmployeeWriter + ?Sized,
{
    let me = current_employee(user, repo)?;
    let conversation = joined(id, &me, repo)?;
    let page = params.request();

    let query = MessageListQuery::new(conversation.id).paginate(page.page, page.per_page);
    let (total, messages) = repo.list_messages(query)?;
    Ok(Paginated::new(messages, total, page))
}

pub fn post_message<R>(
    id: i32,
    form: MessageForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Message>
where
    R: MessengerReader + MessengerWriter + EmployeeReader + EmployeeWriter + ?Sized,
{
    let me = current_employee(user, repo)?;
    let conversation = joined(id, &me, repo)?;
    let body = SanitizedText::try_from(form)?;

    Ok(repo.create_message(&NewMessage {
        conversation_id: conversation.id,
        sender_id: me.id,
        body,
    })?)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::SERVICE_ACCESS_ROLE;
    use crate::domain::types::{EmployeeId, HubId, MessageId};
    use crate::repository::mock::MockRepository;
    use crate::services::employees::tests::{employee, user_with};

    fn ids(values: &[i32]) -> Vec<EmployeeId> {
        values
            .iter()
            .map(|id| EmployeeId::new(*id).expect("valid id"))
            .collect()
    }

    fn conversation(participants: &[i32]) -> Conversation {
        let now = Utc::now().naive_utc();
        Conversation {
            id: ConversationId::new(6).expect("valid id"),
            hub_id: HubId::new(42).expect("valid hub"),
            title: None,
            created_by: EmployeeId::new(participants[0]).expect("valid id"),
            participants: ids(participants),
            created_at: now,
            updated_at: now,
        }
    }

    fn staff(repo: &mut MockRepository) -> AuthenticatedUser {
        repo.expect_get_employee_by_email()
            .returning(|_, _| Ok(Some(employee(3, "jane@example.com"))));
        user_with(&[SERVICE_ACCESS_ROLE])
    }

    #[test]
    fn creator_joins_the_conversation() {
        let mut repo = MockRepository::new();
        let user = staff(&mut repo);
        repo.expect_filter_active_employees()
            .returning(|_, wanted| Ok(wanted.to_vec()));
        repo.expect_create_conversation()
            .withf(|new| new.participants() == ids(&[3, 4]).as_slice())
            .times(1)
            .returning(|_| Ok(conversation(&[3, 4])));

        let form = ConversationForm {
            title: None,
            participants: vec![4],
        };
        create_conversation(form, &user, &repo).expect("created");
    }

    #[test]
    fn inactive_participants_are_rejected() {
        let mut repo = MockRepository::new();
        let user = staff(&mut repo);
        repo.expect_filter_active_employees()
            .returning(|_, _| Ok(ids(&[4])));
        repo.expect_create_conversation().times(0);

        let form = ConversationForm {
            title: Some("Launch".into()),
            participants: vec![4, 9],
        };
        assert!(matches!(
            create_conversation(form, &user, &repo),
            Err(ServiceError::Form(msg)) if msg.contains('9')
        ));
    }

    #[test]
    fn outsiders_cannot_post() {
        let mut repo = MockRepository::new();
        let user = staff(&mut repo);
        repo.expect_get_conversation_by_id()
            .returning(|_, _| Ok(Some(conversation(&[4, 5]))));
        repo.expect_create_message().times(0);

        let form = MessageForm {
            body: "hello".into(),
        };
        assert!(matches!(
            post_message(6, form, &user, &repo),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn participants_post_sanitised_messages() {
        let mut repo = MockRepository::new();
        let user = staff(&mut repo);
        repo.expect_get_conversation_by_id()
            .returning(|_, _| Ok(Some(conversation(&[3, 5]))));
        repo.expect_create_message()
            .withf(|new| !new.body.as_str().contains("<script"))
            .times(1)
            .returning(|new| {
                Ok(Message {
                    id: MessageId::new(1).expect("valid id"),
                    conversation_id: new.conversation_id,
                    sender_id: new.sender_id,
                    body: new.body.clone(),
                    created_at: Utc::now().naive_utc(),
                })
            });

        let form = MessageForm {
            body: "hi <script>alert(1)</script>".into(),
        };
        let message = post_message(6, form, &user, &repo).expect("posted");
        assert_eq!(message.sender_id.get(), 3);
    }
}
