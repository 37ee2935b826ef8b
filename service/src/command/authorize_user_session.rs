//! [`Command`] for authorizing a [`User`] by its [`Session`].

use common::{
    operations::{By, Select, Verify},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        user::{session, Session},
        User,
    },
    infra::{auth, database, Auth, Database},
    Service,
};

use super::Command;

/// [`Command`] for authorizing a [`User`] by its [`Session`].
///
/// The [`session::Token`] must be correctly signed, not expired, and still
/// stored along with its [`User`].
#[derive(Clone, Debug, From)]
pub struct AuthorizeUserSession {
    /// [`Session`] token to authorize.
    pub token: session::Token,
}

impl<Db, A> Command<AuthorizeUserSession> for Service<Db, A>
where
    Db: for<'t> Database<
        Select<By<Option<User>, &'t session::Token>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
    A: for<'t> Auth<
        Verify<&'t session::Token>,
        Ok = Session,
        Err = Traced<auth::Error>,
    >,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeUserSession { token } = cmd;

        let session = match self.auth().execute(Verify(&token)).await {
            Ok(session) => session,
            Err(e) if e.as_ref().is_expired() => {
                return Err(tracerr::new!(E::Expired));
            }
            Err(e) => {
                return Err(tracerr::new!(E::InvalidToken(e.into_inner())));
            }
        };
        if session.is_expired_at(DateTime::now()) {
            return Err(tracerr::new!(E::Expired));
        }

        self.database()
            .execute(Select(By::new(&token)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists)
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`AuthorizeUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`session::Token`] is malformed or signed with a foreign key.
    #[display("Invalid `Session` token: {_0}")]
    #[from(ignore)]
    InvalidToken(auth::Error),

    /// [`Session`] has expired.
    #[display("`Session` has expired")]
    #[from(ignore)]
    Expired,

    /// No [`User`] owns the [`session::Token`].
    #[display("`User` of the `Session` does not exist")]
    #[from(ignore)]
    UserNotExists,
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{
        operations::{By, Delete, Insert, Sign},
        DateTime,
    };
    use secrecy::SecretBox;

    use super::{AuthorizeUserSession, ExecutionError};
    use crate::{
        command::CreateUser,
        domain::user::{self, session, Session},
        infra::{auth::Jwt, memory::Memory},
        Command as _, Service,
    };

    async fn service_with_alice() -> (Service<Memory, Jwt>, session::Token) {
        let service = Service::new(Memory::default(), Jwt::new(b"secret"));
        let out = service
            .execute(CreateUser {
                login: user::Login::new("alice").unwrap(),
                email: "a@x.com".into(),
                password: SecretBox::new(Box::new(
                    user::Password::new("p1").unwrap(),
                )),
                name: "Alice".into(),
            })
            .await
            .unwrap();
        (service, out.token)
    }

    #[tokio::test]
    async fn resolves_registered_user() {
        let (service, token) = service_with_alice().await;

        let user = service
            .execute(AuthorizeUserSession::from(token))
            .await
            .unwrap();

        assert!(user.id.is_valid());
        let name: &str = user.name.as_ref();
        assert_eq!(name, "Alice");
    }

    #[tokio::test]
    async fn rejects_deleted_user() {
        let (service, token) = service_with_alice().await;
        service
            .database()
            .execute(Delete(By::new(&token)))
            .await
            .unwrap();

        let err = service
            .execute(AuthorizeUserSession::from(token))
            .await
            .unwrap_err();

        assert!(matches!(err.into_inner(), ExecutionError::UserNotExists));
    }

    #[tokio::test]
    async fn rejects_unknown_but_valid_token() {
        let (service, _) = service_with_alice().await;
        let session = Session::new(
            user::Login::new("mallory").unwrap(),
            DateTime::now().coerce(),
        );
        let token = service.auth().execute(Sign(&session)).await.unwrap();

        let err = service
            .execute(AuthorizeUserSession::from(token))
            .await
            .unwrap_err();

        assert!(matches!(err.into_inner(), ExecutionError::UserNotExists));
    }

    #[tokio::test]
    async fn rejects_expired_token_without_lookup() {
        let service = Service::new(Memory::default(), Jwt::new(b"secret"));
        let session = Session::new(
            user::Login::new("alice").unwrap(),
            (DateTime::now() - Session::LIFETIME - Duration::from_secs(60))
                .coerce(),
        );
        let token = service.auth().execute(Sign(&session)).await.unwrap();
        service
            .database()
            .execute(Insert(user::Draft {
                login: session.login.clone(),
                email: user::Email::default(),
                name: user::Name::default(),
                password_hash: user::PasswordHash::new(
                    &user::Password::new("p1").unwrap(),
                ),
                token: token.clone(),
            }))
            .await
            .unwrap();
        let ops = service.database().ops();

        let err = service
            .execute(AuthorizeUserSession::from(token))
            .await
            .unwrap_err();

        assert!(matches!(err.into_inner(), ExecutionError::Expired));
        assert_eq!(service.database().ops(), ops);
    }

    #[tokio::test]
    async fn rejects_foreign_signature() {
        let (service, _) = service_with_alice().await;
        let session = Session::new(
            user::Login::new("alice").unwrap(),
            DateTime::now().coerce(),
        );
        let token = Jwt::new(b"other").execute(Sign(&session)).await.unwrap();

        let err = service
            .execute(AuthorizeUserSession::from(token))
            .await
            .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::InvalidToken(_),
        ));
    }
}
