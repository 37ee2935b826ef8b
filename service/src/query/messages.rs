//! [`Query`] collection related to multiple [`Message`]s.

use common::{
    operations::{By, Select},
    pagination::Window,
};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{Chat, Message};
use crate::{
    domain::chat,
    infra::{database, Database},
    read, Service,
};

use super::Query;

/// Queries a page of [`Message`]s of a [`Chat`] in ascending creation order.
///
/// Non-positive `limit` falls back to [`Window::DEFAULT_LIMIT`], and negative
/// `offset` to `0`.
#[derive(Clone, Copy, Debug)]
pub struct List {
    /// ID of the [`Chat`] to list [`Message`]s of.
    pub chat_id: chat::Id,

    /// Maximum number of [`Message`]s to return.
    pub limit: i64,

    /// Number of [`Message`]s to skip.
    pub offset: i64,
}

impl<Db, A> Query<List> for Service<Db, A>
where
    Db: Database<
        Select<By<read::message::list::Page, read::message::list::Selector>>,
        Ok = read::message::list::Page,
        Err = Traced<database::Error>,
    >,
{
    type Ok = read::message::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(&self, query: List) -> Result<Self::Ok, Self::Err> {
        let List {
            chat_id,
            limit,
            offset,
        } = query;

        self.database()
            .execute(Select(By::new(read::message::list::Selector {
                chat_id,
                window: Window::new(limit, offset),
            })))
            .await
            .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use common::pagination::Window;

    use super::List;
    use crate::{
        command::{PostMessage, StartChat},
        domain::chat,
        infra::memory::Memory,
        read, Command as _, Service,
    };

    async fn assert_selects(limit: i64, offset: i64, expected: (i64, i64)) {
        let service = Service::new(Memory::default(), ());
        let chat_id = chat::Id::from(5);

        drop(
            service
                .execute(List {
                    chat_id,
                    limit,
                    offset,
                })
                .await
                .unwrap(),
        );

        assert_eq!(
            service.database().last_selector(),
            Some(read::message::list::Selector {
                chat_id,
                window: Window::new(expected.0, expected.1),
            }),
        );
        let window = service.database().last_selector().unwrap().window;
        assert_eq!((window.limit(), window.offset()), expected);
    }

    #[tokio::test]
    async fn clamps_window() {
        assert_selects(0, -5, (10, 0)).await;
        assert_selects(-1, 0, (10, 0)).await;
        assert_selects(3, 2, (3, 2)).await;
    }

    #[tokio::test]
    async fn lists_posted_messages() {
        let service = Service::new(Memory::default(), ());
        let chat_id = service
            .execute(StartChat {
                initiator: 1.into(),
                interlocutor: 2.into(),
            })
            .await
            .unwrap();
        _ = service
            .execute(PostMessage {
                chat_id,
                sender_id: 1.into(),
                text: "hi".into(),
            })
            .await
            .unwrap();

        let page = service
            .execute(List {
                chat_id,
                limit: 10,
                offset: 0,
            })
            .await
            .unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].text.to_string(), "hi");
        assert!(!page[0].is_read);
    }
}
