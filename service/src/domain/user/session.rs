//! [`Session`] definitions.

use std::time::Duration;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, FromStr};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::User;
use crate::domain::user;

/// User session, carried as claims of a signed [`Token`].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Session {
    /// [`user::Login`] of the [`User`] this [`Session`] belongs to.
    #[serde(rename = "sub")]
    pub login: user::Login,

    /// [`DateTime`] when this [`Session`] was issued.
    #[serde(rename = "iat", with = "common::datetime::serde::unix_timestamp")]
    pub issued_at: IssuingDateTime,

    /// [`DateTime`] when this [`Session`] expires.
    #[serde(rename = "exp", with = "common::datetime::serde::unix_timestamp")]
    pub expires_at: ExpirationDateTime,
}

impl Session {
    /// [`Duration`] a [`Session`] stays valid for.
    pub const LIFETIME: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    /// Creates a new [`Session`] of the provided [`user::Login`] issued at
    /// the provided [`DateTime`].
    ///
    /// Claims are kept in whole seconds, as they are encoded in a [`Token`].
    #[must_use]
    pub fn new(login: user::Login, issued_at: IssuingDateTime) -> Self {
        let issued_at = issued_at.trunc_to_secs();
        Self {
            login,
            issued_at,
            expires_at: (issued_at + Self::LIFETIME).coerce(),
        }
    }

    /// Checks whether this [`Session`] is expired at the provided
    /// [`DateTime`].
    #[must_use]
    pub fn is_expired_at<Of: ?Sized>(&self, now: DateTimeOf<Of>) -> bool {
        self.expires_at <= now.coerce()
    }
}

/// Access token of a [`Session`].
#[derive(AsRef, Clone, Debug, Display, Eq, FromStr, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Token(String);

impl Token {
    /// Creates a new [`Token`] without checking its contents.
    ///
    /// # Safety
    ///
    /// The provided `token` must be a valid [`Token`] representation.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(token: String) -> Self {
        Self(token)
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

/// [`DateTime`] when a [`Session`] was issued.
pub type IssuingDateTime = DateTimeOf<(Session, unit::Issuing)>;

/// [`DateTime`] when a [`Session`] expires.
pub type ExpirationDateTime = DateTimeOf<(Session, unit::Expiration)>;
