//! Cooperative shutdown of the servers.

use std::{future::Future, pin::pin, time};

use futures::future;
use tokio::{sync::watch, task::JoinHandle, time::timeout};
use tracing as log;

/// Creates a new [`Trigger`] and the [`Shutdown`] it fires.
#[must_use]
pub fn channel() -> (Trigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (Trigger(tx), Shutdown(rx))
}

/// Firing side of a [`Shutdown`].
#[derive(Debug)]
pub struct Trigger(watch::Sender<bool>);

impl Trigger {
    /// Requests all the [`Shutdown`]s to complete.
    pub fn fire(&self) {
        _ = self.0.send_replace(true);
    }
}

/// Future-like notification of a requested shutdown.
#[derive(Clone, Debug)]
pub struct Shutdown(watch::Receiver<bool>);

impl Shutdown {
    /// Waits until shutdown is requested or its [`Trigger`] is dropped.
    pub fn wait(self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.0;
        async move {
            _ = rx.wait_for(|requested| *requested).await;
        }
    }
}

/// Waits for a `Ctrl+C` or (on Unix) a `SIGTERM` signal.
pub async fn signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to listen for `Ctrl+C`: {e}");
            future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(
            tokio::signal::unix::SignalKind::terminate(),
        ) {
            Ok(mut s) => _ = s.recv().await,
            Err(e) => {
                log::error!("failed to listen for `SIGTERM`: {e}");
                future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

/// Runs the provided servers until a [`signal()`] is received, then fires the
/// [`Trigger`] and gives the servers the `grace` period to complete their
/// in-flight requests.
///
/// Returns as soon as any server stops on its own. The provided `servers`
/// must not be empty.
pub async fn serve_until_signal(
    servers: Vec<JoinHandle<()>>,
    trigger: Trigger,
    grace: time::Duration,
) {
    let mut servers = pin!(future::select_all(servers));

    tokio::select! {
        () = signal() => log::info!("shutdown requested"),
        _ = &mut servers => {
            log::error!("server stopped unexpectedly");
            return;
        }
    }
    trigger.fire();

    let drained = async {
        let (_, _, rest) = servers.await;
        _ = future::join_all(rest).await;
    };
    if timeout(grace, drained).await.is_err() {
        log::warn!("in-flight requests didn't complete in {grace:?}");
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::channel;

    #[tokio::test]
    async fn completes_once_fired() {
        let (trigger, shutdown) = channel();
        let waiting = tokio::spawn(shutdown.clone().wait());

        assert!(timeout(Duration::from_millis(50), shutdown.clone().wait())
            .await
            .is_err());

        trigger.fire();
        timeout(Duration::from_secs(1), waiting)
            .await
            .unwrap()
            .unwrap();
        timeout(Duration::from_secs(1), shutdown.wait())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn completes_once_trigger_dropped() {
        let (trigger, shutdown) = channel();
        drop(trigger);

        timeout(Duration::from_secs(1), shutdown.wait())
            .await
            .unwrap();
    }
}
