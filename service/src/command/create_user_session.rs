//! [`Command`] for retrieving the [`Session`] of a [`User`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::{
    session::{self, Token},
    Credential, Password, Session,
};
use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for retrieving the [`Session`] of a [`User`].
///
/// The [`Token`] minted on the [`User`] creation is returned as is: no new
/// [`Session`] is issued and the stored one is never rotated.
#[derive(Clone, Debug)]
pub enum CreateUserSession {
    /// Retrieve the [`Session`] by [`User`] credentials.
    ByCredentials {
        /// [`Credential`] of a [`User`].
        credential: user::Credential,

        /// [`Password`] of a [`User`].
        password: SecretBox<user::Password>,
    },
}

impl<Db, A> Command<CreateUserSession> for Service<Db, A>
where
    Db: for<'c, 'h> Database<
        Select<
            By<Option<User>, (&'c user::Credential, &'h user::PasswordHash)>,
        >,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use CreateUserSession as Cmd;
        use ExecutionError as E;

        let Cmd::ByCredentials {
            credential,
            password,
        } = cmd;

        let hash = user::PasswordHash::new(password.expose_secret());
        self.database()
            .execute(Select(By::new((&credential, &hash))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::WrongCredentials)
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`CreateUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`CreateUserSession::ByCredentials`] contains wrong credentials.
    #[display("Wrong `User` credentials")]
    #[from(ignore)]
    WrongCredentials,
}
