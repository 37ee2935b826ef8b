//! Postgres [`Database`] implementation.

pub mod client;
pub mod connection;
mod impls;

use deadpool_postgres::Runtime;
use derive_more::{Deref, Display, Error as StdError, From};
use futures::future;
use tokio_postgres::{error::SqlState, NoTls};
use tracerr::Traced;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use refinery::embed_migrations;

pub use self::{client::NonTx, connection::Connection};

pub use deadpool_postgres::{Config, PoolConfig};

/// Postgres [`Database`] client.
#[derive(Clone, Debug, Deref)]
pub struct Postgres<T = NonTx>(T);

impl Postgres {
    /// Creates a new [`Postgres`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to create a new [`Postgres`] client.
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let pool = conf
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self(NonTx::from_pool(pool)))
    }

    /// Establishes `min` live connections in the pool of this [`Postgres`]
    /// client, so they're ready before the first request arrives.
    ///
    /// Never establishes more connections than the pool may hold.
    ///
    /// # Errors
    ///
    /// If failed to establish any of the connections.
    pub async fn warm_up(
        &self,
        min: usize,
    ) -> Result<(), Traced<database::Error>> {
        let min = min.min(self.0.pool.status().max_size);
        let conns =
            future::try_join_all((0..min).map(|_| self.0.pool.get()))
                .await
                .map_err(tracerr::from_and_wrap!(=> Error))
                .map_err(tracerr::map_from)?;
        drop(conns);
        Ok(())
    }

    /// Closes the pool of this [`Postgres`] client.
    ///
    /// Checked out connections are dropped once returned.
    pub fn close(&self) {
        self.0.pool.close();
    }
}

/// Postgres database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// [`Connection`] error.
    #[display("`Connection` error: {_0}")]
    Connection(connection::Error),

    /// Error of creating a new [`connection::Pool`] client.
    #[display("Failed to create a new `connection::Pool`: {_0}")]
    PoolCreationError(connection::PoolCreationError),

    /// [`connection::Pool`] error.
    #[display("`connection::Pool` error: {_0}")]
    PoolError(connection::PoolError),

    /// Operation is not applicable to the provided arguments, so it has not
    /// been sent to the database.
    #[display("No such operation")]
    #[from(ignore)]
    NoSuchOperation,
}

impl Error {
    /// Checks if the error is a unique violation of the specified constraint.
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        match self {
            Self::Connection(e) => {
                e.code() == Some(&SqlState::UNIQUE_VIOLATION)
                    && constraint.map_or(true, |c| {
                        e.as_db_error().and_then(|e| e.constraint()) == Some(c)
                    })
            }
            Self::PoolError(..)
            | Self::PoolCreationError(..)
            | Self::NoSuchOperation => false,
        }
    }
}

impl database::Error {
    /// Checks if the error is a unique violation of the specified constraint.
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        match self {
            Self::Postgres(e) => e.is_unique_violation(constraint),
        }
    }
}
