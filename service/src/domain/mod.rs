//! Domain definitions.

pub mod chat;
pub mod message;
pub mod user;

pub use self::{chat::Chat, message::Message, user::User};
