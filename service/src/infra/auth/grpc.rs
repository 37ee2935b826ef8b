//! [`Grpc`] authentication backend.

use std::{sync::Arc, time::Duration};

use common::operations::{By, Select};
use derive_more::{Display, Error as StdError, From};
use proto::auth_service_client::AuthServiceClient;
use tokio::{sync::OnceCell, time};
use tonic::transport::{Channel, Endpoint};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::user::{self, session},
    infra::{auth, Auth},
};

/// Client of a remote `AuthService`, resolving [`session::Token`]s into
/// [`User`]s.
///
/// The underlying connection is established lazily, exactly once, and is
/// shared by all the clones of this [`Grpc`] client.
#[derive(Clone, Debug)]
pub struct Grpc {
    /// [`Endpoint`] of the remote `AuthService`.
    endpoint: Endpoint,

    /// Maximum [`Duration`] of establishing a connection.
    connect_timeout: Duration,

    /// Lazily connected client.
    client: Arc<OnceCell<AuthServiceClient<Channel>>>,
}

impl Grpc {
    /// Default [`Duration`] of establishing a connection.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

    /// Creates a new [`Grpc`] client of the `AuthService` at the provided
    /// `uri`.
    ///
    /// Doesn't connect until the first request.
    ///
    /// # Errors
    ///
    /// If the provided `uri` is invalid.
    pub fn new(
        uri: impl Into<String>,
        connect_timeout: Duration,
    ) -> Result<Self, Traced<auth::Error>> {
        let endpoint = Endpoint::from_shared(uri.into())
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self {
            endpoint,
            connect_timeout,
            client: Arc::new(OnceCell::new()),
        })
    }

    /// Returns the connected client, connecting on the first call.
    async fn client(
        &self,
    ) -> Result<&AuthServiceClient<Channel>, Traced<auth::Error>> {
        self.client
            .get_or_try_init(|| async {
                let channel =
                    time::timeout(self.connect_timeout, self.endpoint.connect())
                        .await
                        .map_err(|_| {
                            tracerr::new!(auth::Error::from(
                                Error::ConnectTimeout(self.connect_timeout)
                            ))
                        })?
                        .map_err(tracerr::from_and_wrap!(=> Error))
                        .map_err(tracerr::map_from)?;
                log::info!(
                    "connected to `AuthService` at {}",
                    self.endpoint.uri(),
                );
                Ok(AuthServiceClient::new(channel))
            })
            .await
    }
}

impl<'t> Auth<Select<By<user::Id, &'t session::Token>>> for Grpc {
    type Ok = user::Id;
    type Err = Traced<auth::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<user::Id, &'t session::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        let token = by.into_inner();

        let mut client = self.client().await.map_err(tracerr::wrap!())?.clone();
        let resp = client
            .validate(proto::Token {
                token: token.to_string(),
            })
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        Ok(resp.into_inner().user_id.into())
    }
}

/// [`Grpc`] client error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Transport error, either of an invalid URI or of a failed connection.
    #[display("Transport error: {_0}")]
    Transport(tonic::transport::Error),

    /// Connection hasn't been established in time.
    #[display("Connection timed out after {_0:?}")]
    #[from(ignore)]
    ConnectTimeout(#[error(not(source))] Duration),

    /// Remote `AuthService` responded with an error.
    #[display("`AuthService` responded with `{}`: {}", _0.code(), _0.message())]
    Status(tonic::Status),
}
