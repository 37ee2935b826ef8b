//! [`Chat`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{chat, user, Chat},
    infra::{
        database::{
            self,
            postgres::{self, Connection},
            Postgres,
        },
        Database,
    },
};

impl<C> Database<Insert<chat::Pair>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Chat;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(pair): Insert<chat::Pair>,
    ) -> Result<Self::Ok, Self::Err> {
        if pair.is_degenerate() {
            return Err(tracerr::new!(database::Error::from(
                postgres::Error::NoSuchOperation
            )));
        }
        let chat::Pair { first, second } = pair;

        const SQL: &str = "\
            INSERT INTO chats (user_1_id, user_2_id) \
            VALUES ($1::INT4, $2::INT4) \
            RETURNING id, created_at";
        self.query_one(SQL, &[&first, &second])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| Chat {
                id: row.get("id"),
                pair,
                created_at: row.get("created_at"),
            })
    }
}

impl<C> Database<Select<By<Vec<chat::Id>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<chat::Id>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<chat::Id>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM chats \
            WHERE user_1_id = $1::INT4 OR user_2_id = $1::INT4 \
            ORDER BY id ASC";
        Ok(self
            .query(SQL, &[&user_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect())
    }
}
