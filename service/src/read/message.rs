//! [`Message`] read model definition.

#[cfg(doc)]
use crate::domain::Message;

pub mod list {
    //! [`Message`]s list definitions.

    use common::pagination::Window;

    use crate::domain::{chat, Message};
    #[cfg(doc)]
    use crate::domain::Chat;

    /// Selector of a [`Page`] of [`Message`]s.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct Selector {
        /// ID of the [`Chat`] to list [`Message`]s of.
        pub chat_id: chat::Id,

        /// [`Window`] of the [`Page`], over [`Message`]s ordered by their
        /// creation time.
        pub window: Window,
    }

    /// Page of [`Message`]s in ascending creation order.
    pub type Page = Vec<Message>;
}
