use actix_web::{Responder, get, post, web};

use crate::auth::AuthenticatedUser;
use crate::dto::PageParams;
use crate::forms::messenger::{ConversationForm, MessageForm};
use crate::repository::DieselRepository;
use crate::routes::{created, ok};
use crate::services::messenger as messenger_service;

#[get("/conversations")]
pub async fn list_conversations(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        messenger_service::list_conversations(&user, repo.get_ref()),
        "list conversations",
    )
}

#[post("/conversations")]
pub async fn create_conversation(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ConversationForm>,
) -> impl Responder {
    created(
        messenger_service::create_conversation(form, &user, repo.get_ref()),
        "create conversation",
    )
}

#[get("/conversations/{id}")]
pub async fn get_conversation(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        messenger_service::get_conversation(id.into_inner(), &user, repo.get_ref()),
        "load conversation",
    )
}

#[get("/conversations/{id}/messages")]
pub async fn list_messages(
    id: web::Path<i32>,
    params: web::Query<PageParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        messenger_service::list_messages(id.into_inner(), &params, &user, repo.get_ref()),
        "list messages",
    )
}

#[post("/conversations/{id}/messages")]
pub async fn post_message(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<MessageForm>,
) -> impl Responder {
    created(
        messenger_service::post_message(id.into_inner(), form, &user, repo.get_ref()),
        "post message",
    )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_conversations)
        .service(create_conversation)
        .service(get_conversation)
        .service(list_messages)
        .service(post_message);
}
