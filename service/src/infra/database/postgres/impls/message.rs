//! [`Message`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{message, Message},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C> Database<Insert<message::Draft>> for Postgres<C>
where
    C: Connection,
{
    type Ok = message::Id;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<message::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let message::Draft {
            chat_id,
            sender_id,
            text,
        } = draft;

        const SQL: &str = "\
            INSERT INTO messages (chat_id, sender_id, text) \
            VALUES ($1::INT4, $2::INT4, $3::TEXT) \
            RETURNING id";
        self.query_one(SQL, &[&chat_id, &sender_id, &text])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.get("id"))
    }
}

impl<C>
    Database<
        Select<By<read::message::list::Page, read::message::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::message::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::message::list::Page, read::message::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::message::list::Selector { chat_id, window } =
            by.into_inner();

        const SQL: &str = "\
            SELECT id, chat_id, sender_id, text, created_at, is_read \
            FROM messages \
            WHERE chat_id = $1::INT4 \
            ORDER BY created_at ASC, id ASC \
            LIMIT $2::INT8 OFFSET $3::INT8";
        Ok(self
            .query(SQL, &[&chat_id, &window.limit(), &window.offset()])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Message {
                id: row.get("id"),
                chat_id: row.get("chat_id"),
                sender_id: row.get("sender_id"),
                text: row.get("text"),
                created_at: row.get("created_at"),
                is_read: row.get("is_read"),
            })
            .collect())
    }
}
