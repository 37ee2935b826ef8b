//! [`User`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        user::{self, session},
        User,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Insert<user::Draft>> for Postgres<C>
where
    C: Connection,
{
    type Ok = user::Id;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<user::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let user::Draft {
            login,
            email,
            name,
            password_hash,
            token,
        } = draft;

        const SQL: &str = "\
            INSERT INTO users (token, login, email, pass, name) \
            VALUES (\
                $1::VARCHAR, $2::VARCHAR, $3::VARCHAR, \
                $4::VARCHAR, $5::VARCHAR\
            ) \
            RETURNING id";
        self.query_one(SQL, &[&token, &login, &email, &password_hash, &name])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.get("id"))
    }
}

impl<'t, C> Database<Select<By<Option<User>, &'t session::Token>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'t session::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        let token = by.into_inner();

        const SQL: &str = "\
            SELECT id, token, login, email, pass, name \
            FROM users \
            WHERE token = $1::VARCHAR \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[token])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(user_from_row))
    }
}

impl<'c, 'h, C>
    Database<
        Select<
            By<Option<User>, (&'c user::Credential, &'h user::PasswordHash)>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<User>, (&'c user::Credential, &'h user::PasswordHash)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (credential, hash) = by.into_inner();

        const SQL: &str = "\
            SELECT id, token, login, email, pass, name \
            FROM users \
            WHERE pass = $1::VARCHAR \
              AND (login = $2::VARCHAR OR email = $2::VARCHAR) \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[hash, credential])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(user_from_row))
    }
}

impl<'t, C> Database<Delete<By<User, &'t session::Token>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<User, &'t session::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        let token = by.into_inner();

        const SQL: &str = "\
            DELETE FROM users \
            WHERE token = $1::VARCHAR";
        self.exec(SQL, &[token])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

/// Builds a [`User`] out of the provided `users` table [`Row`].
fn user_from_row(row: &Row) -> User {
    User {
        id: row.get("id"),
        login: row.get("login"),
        email: row.get("email"),
        name: row.get("name"),
        password_hash: row.get("pass"),
        token: row.get("token"),
    }
}
