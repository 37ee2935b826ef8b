//! Spawning of the HTTP servers.

use std::{io, net::SocketAddr};

use axum::Router;
use tokio::{net::TcpListener, task::JoinHandle};
use tower_http::timeout::TimeoutLayer;
use tracing as log;

use crate::{config, logging, shutdown::Shutdown};

/// Binds to the configured address and spawns an HTTP server of the provided
/// [`Router`], running until the provided [`Shutdown`] is requested.
///
/// In-flight requests are completed before the returned [`JoinHandle`]
/// resolves.
///
/// # Errors
///
/// If failed to bind to the configured address.
pub async fn spawn(
    router: Router,
    conf: &config::Server,
    shutdown: Shutdown,
) -> io::Result<JoinHandle<()>> {
    let app =
        logging::trace_http(router.layer(TimeoutLayer::new(conf.timeout)));

    let listener = TcpListener::bind((conf.host.as_str(), conf.port)).await?;
    log::info!("HTTP server listening on `{}:{}`", conf.host, conf.port);

    Ok(tokio::spawn(async move {
        let serve = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait());
        if let Err(e) = serve.await {
            log::error!("HTTP server failed: {e}");
        }
    }))
}
