//! [`Command`] definition.

pub mod authorize_user_session;
pub mod create_user;
pub mod create_user_session;
pub mod delete_user;
pub mod post_message;
pub mod resolve_user_session;
pub mod start_chat;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession, create_user::CreateUser,
    create_user_session::CreateUserSession, delete_user::DeleteUser,
    post_message::PostMessage, resolve_user_session::ResolveUserSession,
    start_chat::StartChat,
};
