//! [`Command`] for starting a new [`Chat`].

use common::operations::Insert;
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{chat, user, Chat},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for starting a new [`Chat`] between two [`User`]s.
#[derive(Clone, Copy, Debug)]
pub struct StartChat {
    /// ID of the [`User`] starting the [`Chat`].
    pub initiator: user::Id,

    /// ID of the [`User`] the [`Chat`] is started with.
    pub interlocutor: user::Id,
}

impl<Db, A> Command<StartChat> for Service<Db, A>
where
    Db: Database<
        Insert<chat::Pair>,
        Ok = Chat,
        Err = Traced<database::Error>,
    >,
{
    type Ok = chat::Id;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: StartChat) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let StartChat {
            initiator,
            interlocutor,
        } = cmd;

        let pair = chat::Pair {
            first: initiator,
            second: interlocutor,
        };
        if pair.is_degenerate() {
            return Err(tracerr::new!(E::SelfChat(initiator)));
        }

        // Duplicate pairs are reported as plain `Database` errors.
        let chat = self
            .database()
            .execute(Insert(pair))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        log::debug!(
            "`User(id: {initiator})` started `Chat(id: {})` at {}",
            chat.id,
            chat.created_at.to_rfc3339(),
        );
        Ok(chat.id)
    }
}

/// Error of [`StartChat`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`User`] attempted to start a [`Chat`] with itself.
    #[display("`User(id: {_0})` cannot start a `Chat` with itself")]
    #[from(ignore)]
    SelfChat(#[error(not(source))] user::Id),
}
