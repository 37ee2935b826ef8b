//! [`Query`] definition.

pub mod chats;
pub mod messages;

/// [`Query`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Query;
