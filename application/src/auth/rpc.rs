//! RPC API of the issuing service.

use std::io;

use proto::{
    auth_service_server::{AuthService, AuthServiceServer},
    GetUserResponse, Token, ValidateResponse,
};
use service::{
    command::{authorize_user_session::ExecutionError, AuthorizeUserSession},
    domain::{user, User},
    Command as _,
};
use tokio::{net::TcpListener, task::JoinHandle};
use tonic::{
    metadata::MetadataValue,
    transport::{server::TcpIncoming, Server},
    Request, Response, Status,
};
use tracing as log;

use crate::{config, logging, shutdown::Shutdown};

use super::Service;

/// Metadata key carrying the [`user::Id::INVALID`] sentinel along with an
/// expired token failure.
pub const USER_ID_METADATA: &str = "user-id";

/// `AuthService` server resolving tokens into users.
#[derive(Clone, Debug)]
pub struct Rpc {
    /// [`Service`] to resolve tokens with.
    service: Service,
}

impl Rpc {
    /// Creates a new [`Rpc`] server backed by the provided [`Service`].
    #[must_use]
    pub fn new(service: Service) -> Self {
        Self { service }
    }

    /// Wraps this [`Rpc`] into a [`tonic`] service.
    #[must_use]
    pub fn into_server(self) -> AuthServiceServer<Self> {
        AuthServiceServer::new(self)
    }

    /// Binds to the configured address and spawns a server of this [`Rpc`],
    /// running until the provided [`Shutdown`] is requested.
    ///
    /// # Errors
    ///
    /// If failed to bind to the configured address.
    pub async fn spawn(
        self,
        conf: &config::Rpc,
        shutdown: Shutdown,
    ) -> io::Result<JoinHandle<()>> {
        let listener =
            TcpListener::bind((conf.host.as_str(), conf.port)).await?;
        let incoming = TcpIncoming::from_listener(listener, true, None)
            .map_err(io::Error::other)?;
        log::info!("RPC server listening on `{}:{}`", conf.host, conf.port);

        let serve = Server::builder()
            .trace_fn(logging::rpc_span)
            .add_service(self.into_server())
            .serve_with_incoming_shutdown(incoming, shutdown.wait());
        Ok(tokio::spawn(async move {
            if let Err(e) = serve.await {
                log::error!("RPC server failed: {e}");
            }
        }))
    }

    /// Resolves the [`User`] owning the provided [`Token`].
    async fn authorize(&self, token: Token) -> Result<User, Status> {
        let token = match token.token.parse() {
            Ok(t) => t,
            Err(e) => match e {},
        };
        self.service
            .execute(AuthorizeUserSession { token })
            .await
            .map_err(|e| {
                log::warn!("failed to authorize `Session`: {e}");
                status(e.as_ref())
            })
    }
}

/// Converts the provided [`ExecutionError`] into a [`Status`].
fn status(err: &ExecutionError) -> Status {
    use ExecutionError as E;

    match err {
        E::InvalidToken(e) => {
            Status::unauthenticated(format!("invalid token: {e}"))
        }
        E::Expired => {
            let mut status = Status::unauthenticated("token has expired");
            _ = status.metadata_mut().insert(
                USER_ID_METADATA,
                MetadataValue::from(i32::from(user::Id::INVALID)),
            );
            status
        }
        E::UserNotExists => Status::not_found("user not found"),
        E::Db(_) => Status::internal("failed to resolve token"),
    }
}

#[tonic::async_trait]
impl AuthService for Rpc {
    async fn validate(
        &self,
        request: Request<Token>,
    ) -> Result<Response<ValidateResponse>, Status> {
        let user = self.authorize(request.into_inner()).await?;

        Ok(Response::new(ValidateResponse {
            user_id: user.id.into(),
        }))
    }

    async fn get_user(
        &self,
        request: Request<Token>,
    ) -> Result<Response<GetUserResponse>, Status> {
        let User {
            login, email, name, ..
        } = self.authorize(request.into_inner()).await?;

        Ok(Response::new(GetUserResponse {
            login: login.to_string(),
            email: email.to_string(),
            name: name.to_string(),
        }))
    }
}
