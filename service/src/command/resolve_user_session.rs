//! [`Command`] for resolving a [`User`] by its [`Session`] remotely.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{user::Session, User};
use crate::{
    domain::user::{self, session},
    infra::{auth, Auth},
    Service,
};

use super::Command;

/// [`Command`] for resolving the ID of a [`User`] owning the provided
/// [`session::Token`].
///
/// Every failure is reported as is, without retrying.
#[derive(Clone, Debug, From)]
pub struct ResolveUserSession {
    /// [`Session`] token to resolve.
    pub token: session::Token,
}

impl<Db, A> Command<ResolveUserSession> for Service<Db, A>
where
    A: for<'t> Auth<
        Select<By<user::Id, &'t session::Token>>,
        Ok = user::Id,
        Err = Traced<auth::Error>,
    >,
{
    type Ok = user::Id;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ResolveUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ResolveUserSession { token } = cmd;

        self.auth()
            .execute(Select(By::new(&token)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`ResolveUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Auth`] error.
    #[display("`Auth` operation failed: {_0}")]
    Auth(auth::Error),
}
