//! [`User`] definitions.

pub mod session;

use derive_more::{AsRef, Display, From, FromStr, Into};
use md5::{Digest as _, Md5};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use secrecy::{zeroize::Zeroize, CloneableSecret};
use serde::{Deserialize, Serialize};

pub use self::session::Session;

/// User credential record.
///
/// The stored [`session::Token`] is the only way to resolve who a request
/// belongs to. It is minted once on registration and never rotated.
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// [`Login`] of this [`User`].
    pub login: Login,

    /// [`Email`] of this [`User`].
    pub email: Email,

    /// [`Name`] of this [`User`].
    pub name: Name,

    /// [`PasswordHash`] of this [`User`].
    pub password_hash: PasswordHash,

    /// [`session::Token`] of this [`User`].
    pub token: session::Token,
}

/// [`User`] record which is not stored yet.
#[derive(Clone, Debug)]
pub struct Draft {
    /// [`Login`] of a new [`User`].
    pub login: Login,

    /// [`Email`] of a new [`User`].
    pub email: Email,

    /// [`Name`] of a new [`User`].
    pub name: Name,

    /// [`PasswordHash`] of a new [`User`].
    pub password_hash: PasswordHash,

    /// [`session::Token`] minted for a new [`User`].
    pub token: session::Token,
}

/// ID of a [`User`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(i32);

impl Id {
    /// Sentinel [`Id`] reported along with an expired [`Session`].
    pub const INVALID: Self = Self(-1);

    /// Indicates whether this [`Id`] may identify an existing [`User`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 > 0
    }
}

/// Login of a [`User`].
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[as_ref(str, String)]
#[serde(transparent)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Login(String);

impl Login {
    /// Creates a new [`Login`] if the given `login` is not empty.
    #[must_use]
    pub fn new(login: impl Into<String>) -> Option<Self> {
        let login = login.into();
        (!login.is_empty()).then_some(Self(login))
    }
}

impl FromStr for Login {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("empty `Login`")
    }
}

/// Credential identifying a [`User`] on login: either its [`Login`] or its
/// [`Email`].
#[derive(AsRef, Clone, Debug, Display, Eq, From, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Credential(String);

/// Password of a [`User`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Password(String);

impl Password {
    /// Creates a new [`Password`] if the given `password` is not empty.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        (!password.is_empty()).then_some(Self(password))
    }
}

impl FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("empty `Password`")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Password hash of a [`User`].
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Creates a new [`PasswordHash`] from the given [`Password`].
    ///
    /// The digest is an unsalted hex-encoded MD5, so hashes stay comparable
    /// with the records created by earlier deployments.
    #[must_use]
    pub fn new(password: &Password) -> Self {
        // TODO: Migrate stored hashes to `argon2` with per-user salts.
        Self(hex::encode(Md5::digest(password.0.as_bytes())))
    }
}

/// Email address of a [`User`].
#[derive(AsRef, Clone, Debug, Default, Display, Eq, From, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

/// Display name of a [`User`].
#[derive(AsRef, Clone, Debug, Default, Display, Eq, From, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);
