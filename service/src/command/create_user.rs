//! [`Command`] for creating a new [`User`].

use common::{
    operations::{Insert, Sign},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{
    user::{Email, Login, Name, Password},
    User,
};
use crate::{
    domain::user::{self, session, Session},
    infra::{auth, database, Auth, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`User`] along with its only [`Session`].
#[derive(Clone, Debug)]
pub struct CreateUser {
    /// [`Login`] of a new [`User`].
    pub login: user::Login,

    /// [`Email`] of a new [`User`].
    pub email: user::Email,

    /// [`Password`] of a new [`User`].
    pub password: SecretBox<user::Password>,

    /// [`Name`] of a new [`User`].
    pub name: user::Name,
}

/// Output of [`CreateUser`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// ID of the created [`User`].
    pub user_id: user::Id,

    /// [`session::Token`] minted for the created [`User`].
    pub token: session::Token,
}

impl<Db, A> Command<CreateUser> for Service<Db, A>
where
    Db: Database<
        Insert<user::Draft>,
        Ok = user::Id,
        Err = Traced<database::Error>,
    >,
    A: for<'s> Auth<
        Sign<&'s Session>,
        Ok = session::Token,
        Err = Traced<auth::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUser {
            login,
            email,
            password,
            name,
        } = cmd;

        let session = Session::new(login.clone(), DateTime::now().coerce());
        let token = self
            .auth()
            .execute(Sign(&session))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let user_id = self
            .database()
            .execute(Insert(user::Draft {
                login,
                email,
                name,
                password_hash: user::PasswordHash::new(
                    password.expose_secret(),
                ),
                token: token.clone(),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(Output { user_id, token })
    }
}

/// Error of [`CreateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Auth`] error.
    #[display("`Auth` operation failed: {_0}")]
    Auth(auth::Error),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
