//! [`Command`] for posting a [`Message`].

use common::operations::Insert;
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{Chat, Message, User};
use crate::{
    domain::{chat, message, user},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for posting a [`Message`] into a [`Chat`].
///
/// Neither the [`message::Text`] nor the sender's membership in the [`Chat`]
/// is checked.
#[derive(Clone, Debug)]
pub struct PostMessage {
    /// ID of the [`Chat`] to post into.
    pub chat_id: chat::Id,

    /// ID of the [`User`] posting the [`Message`].
    pub sender_id: user::Id,

    /// [`message::Text`] to post.
    pub text: message::Text,
}

impl<Db, A> Command<PostMessage> for Service<Db, A>
where
    Db: Database<
        Insert<message::Draft>,
        Ok = message::Id,
        Err = Traced<database::Error>,
    >,
{
    type Ok = message::Id;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: PostMessage) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let PostMessage {
            chat_id,
            sender_id,
            text,
        } = cmd;

        self.database()
            .execute(Insert(message::Draft {
                chat_id,
                sender_id,
                text,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`PostMessage`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use super::PostMessage;
    use crate::{domain::chat, infra::memory::Memory, Command as _, Service};

    #[tokio::test]
    async fn stores_text_as_is() {
        let service = Service::new(Memory::default(), ());

        let first = service
            .execute(PostMessage {
                chat_id: chat::Id::from(1),
                sender_id: 1.into(),
                text: "".into(),
            })
            .await
            .unwrap();
        let second = service
            .execute(PostMessage {
                chat_id: chat::Id::from(404),
                sender_id: 2.into(),
                text: "hi".into(),
            })
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(service.database().ops(), 2);
    }
}
