//! Authentication backends.

pub mod grpc;
pub mod jwt;

use derive_more::{Display, Error as StdError, From};

pub use self::{grpc::Grpc, jwt::Jwt};

/// Authentication operation.
pub use common::Handler as Auth;

/// [`Auth`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Jwt`] error.
    #[display("`Jwt` error: {_0}")]
    Jwt(jwt::Error),

    /// [`Grpc`] error.
    #[display("`Grpc` error: {_0}")]
    Grpc(grpc::Error),
}

impl Error {
    /// Indicates whether this [`Error`] is caused by an expired token.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        match self {
            Self::Jwt(e) => {
                matches!(e.kind(), jwt::ErrorKind::ExpiredSignature)
            }
            Self::Grpc(_) => false,
        }
    }
}
