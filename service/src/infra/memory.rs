//! In-memory doubles of the infrastructure.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use common::{
    operations::{By, Delete, Insert, Select},
    DateTime,
};
use tracerr::Traced;

use crate::{
    domain::{
        chat, message,
        user::{self, session},
        Chat, Message, User,
    },
    infra::{auth, database, Auth, Database},
    read,
};

/// In-memory [`Database`] counting the operations it serves.
#[derive(Clone, Debug, Default)]
pub(crate) struct Memory {
    /// Stored records.
    state: Arc<Mutex<State>>,

    /// Number of served operations.
    ops: Arc<AtomicUsize>,
}

/// Records of a [`Memory`] database.
#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    chats: Vec<(chat::Id, chat::Pair)>,
    messages: Vec<Message>,
    last_selector: Option<read::message::list::Selector>,
}

impl Memory {
    /// Returns the number of operations served so far.
    pub(crate) fn ops(&self) -> usize {
        self.ops.load(Ordering::SeqCst)
    }

    /// Returns the last [`read::message::list::Selector`] served.
    pub(crate) fn last_selector(
        &self,
    ) -> Option<read::message::list::Selector> {
        self.state.lock().unwrap().last_selector
    }

    fn serve<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        _ = self.ops.fetch_add(1, Ordering::SeqCst);
        f(&mut self.state.lock().unwrap())
    }
}

impl Database<Insert<user::Draft>> for Memory {
    type Ok = user::Id;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<user::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.serve(|s| {
            let id = user::Id::from(i32::try_from(s.users.len()).unwrap() + 1);
            s.users.push(User {
                id,
                login: draft.login,
                email: draft.email,
                name: draft.name,
                password_hash: draft.password_hash,
                token: draft.token,
            });
            id
        }))
    }
}

impl<'t> Database<Select<By<Option<User>, &'t session::Token>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'t session::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        let token = by.into_inner();
        Ok(self.serve(|s| s.users.iter().find(|u| &u.token == token).cloned()))
    }
}

impl<'c, 'h>
    Database<
        Select<
            By<Option<User>, (&'c user::Credential, &'h user::PasswordHash)>,
        >,
    > for Memory
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
        let credential: &str = credential.as_ref();
        Ok(self.serve(|s| {
            s.users
                .iter()
                .find(|u| {
                    &u.password_hash == hash
                        && (AsRef::<str>::as_ref(&u.login) == credential
                            || AsRef::<str>::as_ref(&u.email) == credential)
                })
                .cloned()
        }))
    }
}

impl<'t> Database<Delete<By<User, &'t session::Token>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<User, &'t session::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        let token = by.into_inner();
        self.serve(|s| s.users.retain(|u| &u.token != token));
        Ok(())
    }
}

impl Database<Insert<chat::Pair>> for Memory {
    type Ok = Chat;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(pair): Insert<chat::Pair>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.serve(|s| {
            let id = chat::Id::from(i32::try_from(s.chats.len()).unwrap() + 1);
            s.chats.push((id, pair));
            Chat {
                id,
                pair,
                created_at: DateTime::now().coerce(),
            }
        }))
    }
}

impl Database<Select<By<Vec<chat::Id>, user::Id>>> for Memory {
    type Ok = Vec<chat::Id>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<chat::Id>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();
        Ok(self.serve(|s| {
            s.chats
                .iter()
                .filter(|(_, pair)| pair.contains(user_id))
                .map(|(id, _)| *id)
                .collect()
        }))
    }
}

impl Database<Insert<message::Draft>> for Memory {
    type Ok = message::Id;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<message::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.serve(|s| {
            let id =
                message::Id::from(i32::try_from(s.messages.len()).unwrap() + 1);
            s.messages.push(Message {
                id,
                chat_id: draft.chat_id,
                sender_id: draft.sender_id,
                text: draft.text,
                created_at: DateTime::now().coerce(),
                is_read: false,
            });
            id
        }))
    }
}

impl
    Database<
        Select<By<read::message::list::Page, read::message::list::Selector>>,
    > for Memory
{
    type Ok = read::message::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::message::list::Page, read::message::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let selector = by.into_inner();
        Ok(self.serve(|s| {
            s.last_selector = Some(selector);
            s.messages
                .iter()
                .filter(|m| m.chat_id == selector.chat_id)
                .skip(usize::try_from(selector.window.offset()).unwrap())
                .take(usize::try_from(selector.window.limit()).unwrap())
                .cloned()
                .collect()
        }))
    }
}

/// In-memory [`Auth`] backend resolving a fixed set of tokens.
#[derive(Clone, Debug, Default)]
pub(crate) struct Tokens(HashMap<String, user::Id>);

impl Tokens {
    /// Makes the provided `token` resolvable into the provided [`user::Id`].
    pub(crate) fn with(mut self, token: &str, user_id: i32) -> Self {
        _ = self.0.insert(token.into(), user_id.into());
        self
    }
}

impl<'t> Auth<Select<By<user::Id, &'t session::Token>>> for Tokens {
    type Ok = user::Id;
    type Err = Traced<auth::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<user::Id, &'t session::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        let token: &str = by.into_inner().as_ref();
        self.0.get(token).copied().ok_or_else(|| {
            tracerr::new!(auth::Error::from(auth::jwt::Error::from(
                auth::jwt::ErrorKind::InvalidToken
            )))
        })
    }
}
