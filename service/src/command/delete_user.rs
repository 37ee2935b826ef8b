//! [`Command`] for deleting a [`User`].

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{user::session, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting the [`User`] owning the provided
/// [`session::Token`].
///
/// Once deleted, the [`session::Token`] cannot be resolved anymore. Deleting
/// by a [`session::Token`] nobody owns is a no-op.
#[derive(Clone, Debug, From)]
pub struct DeleteUser {
    /// [`session::Token`] of the [`User`] to delete.
    pub token: session::Token,
}

impl<Db, A> Command<DeleteUser> for Service<Db, A>
where
    Db: for<'t> Database<
        Delete<By<User, &'t session::Token>>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteUser { token } = cmd;

        self.database()
            .execute(Delete(By::new(&token)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`DeleteUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};
    use secrecy::SecretBox;

    use super::DeleteUser;
    use crate::{
        command::CreateUser,
        domain::{user, User},
        infra::{auth::Jwt, memory::Memory},
        Command as _, Service,
    };

    #[tokio::test]
    async fn forgets_token_of_deleted_user() {
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

        service
            .execute(DeleteUser::from(out.token.clone()))
            .await
            .unwrap();

        let found = service
            .database()
            .execute(Select(By::<Option<User>, _>::new(&out.token)))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn ignores_unknown_token() {
        let service = Service::new(Memory::default(), ());
        let token = "unknown".parse().unwrap();

        service.execute(DeleteUser { token }).await.unwrap();

        assert_eq!(service.database().ops(), 1);
    }
}
