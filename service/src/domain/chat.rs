//! [`Chat`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

use crate::domain::user;
#[cfg(doc)]
use crate::domain::User;

/// Conversation between two [`User`]s.
#[derive(Clone, Copy, Debug)]
pub struct Chat {
    /// ID of this [`Chat`].
    pub id: Id,

    /// Participants of this [`Chat`].
    pub pair: Pair,

    /// [`DateTime`] when this [`Chat`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Chat`].
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

/// Ordered pair of [`User`]s participating in a [`Chat`].
///
/// Only the exact order is unique in storage: `(A, B)` doesn't prevent a
/// separate `(B, A)` [`Chat`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Pair {
    /// [`User`] who started the [`Chat`].
    pub first: user::Id,

    /// [`User`] the [`Chat`] was started with.
    pub second: user::Id,
}

impl Pair {
    /// Indicates whether both slots of this [`Pair`] hold the same [`User`].
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.first == self.second
    }

    /// Indicates whether the provided [`User`] occupies any slot of this
    /// [`Pair`].
    #[must_use]
    pub fn contains(&self, user_id: user::Id) -> bool {
        self.first == user_id || self.second == user_id
    }
}

/// [`DateTime`] when a [`Chat`] was created.
pub type CreationDateTime = DateTimeOf<(Chat, unit::Creation)>;
