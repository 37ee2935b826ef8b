//! Application exposes the [`Service`] over REST and RPC: the issuing `auth`
//! service and the consuming `chat` service.
//!
//! [`Service`]: service::Service

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

pub mod args;
pub mod auth;
pub mod chat;
pub mod config;
pub mod cookie;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod server;
pub mod shutdown;

// Used in binaries.
use refinery as _;

pub use self::{
    args::Args,
    error::{AsError, Error},
};
