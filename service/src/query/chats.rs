//! [`Query`] collection related to multiple [`Chat`]s.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{Chat, User};
use crate::{
    domain::{chat, user},
    infra::{database, Database},
    Service,
};

use super::Query;

/// Queries IDs of all the [`Chat`]s the [`User`] participates in, ordered by
/// [`chat::Id`] ascending.
#[derive(Clone, Copy, Debug, From)]
pub struct ByUser(pub user::Id);

impl<Db, A> Query<ByUser> for Service<Db, A>
where
    Db: Database<
        Select<By<Vec<chat::Id>, user::Id>>,
        Ok = Vec<chat::Id>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<chat::Id>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        ByUser(user_id): ByUser,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        if !user_id.is_valid() {
            return Err(tracerr::new!(E::InvalidUserId(user_id)));
        }

        self.database()
            .execute(Select(By::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`ByUser`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`user::Id`] is not positive.
    #[display("`{_0}` is not a valid `User` ID")]
    #[from(ignore)]
    InvalidUserId(#[error(not(source))] user::Id),
}
