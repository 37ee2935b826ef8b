//! REST API of the chat service.

pub mod session;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use service::{
    command::{post_message, start_chat, PostMessage, StartChat},
    domain::{chat, message, user, Message},
    infra::{auth::Grpc, Postgres},
    query::{chats, messages},
    Command as _,
};

use crate::{define_error, AsError, Error};

pub use self::session::Session;

/// [`service::Service`] of the chat service.
pub type Service = service::Service<Postgres, Grpc>;

/// Builds the [`Router`] serving the `/chat/*` routes.
///
/// Every route requires a resolvable [`Session`].
pub fn router(service: Service) -> Router {
    Router::new()
        .route("/chat/", get(list_chats))
        .route("/chat/create", post(create_chat))
        .route("/chat/:chat_id", post(post_message))
        .route("/chat/:chat_id/messages", get(list_messages))
        .layer(middleware::from_fn(session::authenticate))
        .layer(middleware::from_fn(crate::middleware::seed))
        .layer(Extension(service))
}

define_error! {
    enum ChatError {
        #[code = "SELF_CHAT"]
        #[status = BAD_REQUEST]
        #[message = "Cannot start a chat with yourself"]
        SelfChat,

        #[code = "INVALID_USER_ID"]
        #[status = BAD_REQUEST]
        #[message = "User ID must be positive"]
        InvalidUserId,

        #[code = "INVALID_CHAT_ID"]
        #[status = BAD_REQUEST]
        #[message = "Chat ID must be positive"]
        InvalidChatId,

        #[code = "EMPTY_TEXT"]
        #[status = BAD_REQUEST]
        #[message = "Message text must not be empty"]
        EmptyText,
    }
}

#[derive(Debug, Serialize)]
struct ChatsResponse {
    chats: Vec<chat::Id>,
}

#[derive(Debug, Deserialize)]
struct CreateChatRequest {
    user_id_2: user::Id,
}

#[derive(Debug, Serialize)]
struct CreateChatResponse {
    chat_id: chat::Id,
}

#[derive(Debug, Deserialize)]
struct PostMessageRequest {
    text: String,
}

#[derive(Debug, Serialize)]
struct PostMessageResponse {
    message_id: message::Id,
}

/// Query parameters of `GET /chat/{chat_id}/messages`.
///
/// Unparsable values are treated as `0`, so they fall back to the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Pagination {
    limit: Option<String>,
    offset: Option<String>,
}

impl Pagination {
    fn parse(value: Option<&str>) -> i64 {
        value.and_then(|v| v.parse().ok()).unwrap_or(0)
    }
}

/// [`Message`] as exposed to the clients.
#[derive(Debug, Serialize)]
struct MessageView {
    sender_id: user::Id,
    text: String,
    /// RFC 3339 formatted.
    created_at: String,
    is_read: bool,
}

impl From<Message> for MessageView {
    fn from(msg: Message) -> Self {
        Self {
            sender_id: msg.sender_id,
            text: msg.text.into(),
            created_at: msg.created_at.to_rfc3339(),
            is_read: msg.is_read,
        }
    }
}

/// Parses the `{chat_id}` path segment.
fn chat_id(path: Result<Path<i32>, PathRejection>) -> Result<chat::Id, Error> {
    let Path(id) = path.map_err(AsError::into_error)?;
    if id <= 0 {
        return Err(ChatError::InvalidChatId.into());
    }
    Ok(id.into())
}

async fn list_chats(
    Extension(service): Extension<Service>,
    Extension(session): Extension<Session>,
) -> Result<Json<ChatsResponse>, Error> {
    let chats = service
        .execute(chats::ByUser(session.user_id))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(ChatsResponse { chats }))
}

async fn create_chat(
    Extension(service): Extension<Service>,
    Extension(session): Extension<Session>,
    body: Result<Json<CreateChatRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateChatResponse>), Error> {
    let Json(CreateChatRequest { user_id_2 }) =
        body.map_err(AsError::into_error)?;

    let chat_id = service
        .execute(StartChat {
            initiator: session.user_id,
            interlocutor: user_id_2,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((StatusCode::CREATED, Json(CreateChatResponse { chat_id })))
}

/// Posts a message on behalf of the [`Session`] user.
///
/// Membership of the user in the chat is not checked.
async fn post_message(
    Extension(service): Extension<Service>,
    Extension(session): Extension<Session>,
    path: Result<Path<i32>, PathRejection>,
    body: Result<Json<PostMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PostMessageResponse>), Error> {
    let chat_id = chat_id(path)?;
    let Json(PostMessageRequest { text }) =
        body.map_err(AsError::into_error)?;
    if text.is_empty() {
        return Err(ChatError::EmptyText.into());
    }

    let message_id = service
        .execute(PostMessage {
            chat_id,
            sender_id: session.user_id,
            text: text.into(),
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((StatusCode::CREATED, Json(PostMessageResponse { message_id })))
}

async fn list_messages(
    Extension(service): Extension<Service>,
    path: Result<Path<i32>, PathRejection>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<MessageView>>, Error> {
    let chat_id = chat_id(path)?;
    let Query(Pagination { limit, offset }) =
        query.map_err(AsError::into_error)?;

    let page = service
        .execute(messages::List {
            chat_id,
            limit: Pagination::parse(limit.as_deref()),
            offset: Pagination::parse(offset.as_deref()),
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(page.into_iter().map(MessageView::from).collect()))
}

impl AsError for start_chat::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::SelfChat(_) => Some(ChatError::SelfChat.into()),
        }
    }
}

impl AsError for post_message::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for chats::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidUserId(_) => Some(ChatError::InvalidUserId.into()),
        }
    }
}
