//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;

#[cfg(doc)]
use infra::{Auth, Database};

pub use self::{command::Command, query::Query};

/// Domain service.
///
/// The issuing service runs it with a [`Database`] of user credentials and a
/// signing [`Auth`] backend, while the consuming service runs it with a
/// [`Database`] of chats and a remote [`Auth`] backend.
#[derive(Clone, Debug)]
pub struct Service<Db, Auth> {
    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Auth`] backend of this [`Service`].
    auth: Auth,
}

impl<Db, Auth> Service<Db, Auth> {
    /// Creates a new [`Service`] with the provided infrastructure.
    #[must_use]
    pub fn new(database: Db, auth: Auth) -> Self {
        Self { database, auth }
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`Auth`] backend of this [`Service`].
    #[must_use]
    pub fn auth(&self) -> &Auth {
        &self.auth
    }
}
