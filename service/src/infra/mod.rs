//! Infrastructure layer.

pub mod auth;
pub mod database;
#[cfg(test)]
pub(crate) mod memory;

pub use self::{auth::Auth, database::Database};
#[cfg(feature = "postgres")]
pub use self::database::{postgres, Postgres};
