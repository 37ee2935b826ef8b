//! [`Message`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

use crate::domain::{chat, user};
#[cfg(doc)]
use crate::domain::{Chat, User};

/// Message posted into a [`Chat`].
///
/// Immutable once posted.
#[derive(Clone, Debug)]
pub struct Message {
    /// ID of this [`Message`].
    pub id: Id,

    /// ID of the [`Chat`] this [`Message`] belongs to.
    pub chat_id: chat::Id,

    /// ID of the [`User`] who sent this [`Message`].
    pub sender_id: user::Id,

    /// [`Text`] of this [`Message`].
    pub text: Text,

    /// [`DateTime`] when this [`Message`] was created.
    pub created_at: CreationDateTime,

    /// Indicator whether this [`Message`] has been read.
    pub is_read: bool,
}

/// [`Message`] which is not stored yet.
#[derive(Clone, Debug)]
pub struct Draft {
    /// ID of the [`Chat`] to post into.
    pub chat_id: chat::Id,

    /// ID of the [`User`] posting.
    pub sender_id: user::Id,

    /// [`Text`] to post.
    pub text: Text,
}

/// ID of a [`Message`].
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

/// Text body of a [`Message`].
#[derive(AsRef, Clone, Debug, Display, Eq, From, Into, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Text(String);

/// [`DateTime`] when a [`Message`] was created.
pub type CreationDateTime = DateTimeOf<(Message, unit::Creation)>;
