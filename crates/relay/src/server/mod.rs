//! The accept loop and the per-connection units it dispatches.
//!
//! The loop waits at most [`ACCEPT_WAIT`] for a connection, so ended units
//! are reaped and an interrupt is noticed even while no client connects.

mod units;

pub use units::{ConnectionUnits, Reaped, UnitInfo, UnitOutcome};

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use flv_http::connection::HttpConnection;
use flv_http::handler::Handler;
use thiserror::Error;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::{signal, time};
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;

pub const ACCEPT_WAIT: Duration = Duration::from_secs(1);

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("can't bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

pub struct Server<H> {
    config: ServerConfig,
    handler: Arc<H>,
}

impl<H> std::fmt::Debug for Server<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server").field("config", &self.config).finish_non_exhaustive()
    }
}

impl<H> Server<H>
where
    H: Handler<OwnedReadHalf, OwnedWriteHalf> + 'static,
{
    pub fn new(config: ServerConfig, handler: H) -> Self {
        Self { config, handler: Arc::new(handler) }
    }

    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let address = self.config.address();
        TcpListener::bind(&address).await.map_err(|source| ServerError::Bind { address, source })
    }

    /// Binds the configured address and serves until the process is interrupted.
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = self.bind().await?;
        self.run_until(listener, interrupted()).await
    }

    /// Serves connections from `listener` until `shutdown` completes.
    ///
    /// On shutdown the listener is closed first, then this waits until every
    /// in-flight connection has ended, or until the configured grace period
    /// runs out.
    pub async fn run_until<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        info!(address = %listener.local_addr()?, "server started");
        tokio::pin!(shutdown);

        let mut units = ConnectionUnits::new();
        loop {
            let accepted = tokio::select! {
                biased;
                () = &mut shutdown => {
                    info!("shutdown requested, stop accepting");
                    break;
                }
                accepted = time::timeout(ACCEPT_WAIT, listener.accept()) => accepted,
            };

            units.reap();

            let (stream, peer_addr) = match accepted {
                Ok(Ok(stream_and_addr)) => stream_and_addr,
                Ok(Err(e)) => {
                    warn!(cause = %e, "failed to accept");
                    if let Some(delay) = accept_retry_delay(&e) {
                        tokio::select! {
                            biased;
                            () = &mut shutdown => {
                                info!("shutdown requested, stop accepting");
                                break;
                            }
                            () = time::sleep(delay) => {}
                        }
                    }
                    continue;
                }
                Err(_elapsed) => continue,
            };

            info!(peer = %peer_addr, "connection accepted");
            let handler = Arc::clone(&self.handler);
            units.dispatch(peer_addr, serve_connection(stream, peer_addr, handler));
        }

        drop(listener);
        info!("listener closed");
        units.reap();
        units.shutdown(self.config.shutdown_grace()).await;
        Ok(())
    }
}

/// How long to pause before accepting again after `error`.
///
/// Errors about the one incoming connection are retried at once. Anything
/// else, such as running out of file descriptors, keeps failing while the
/// listener stays readable, so the loop backs off for [`ACCEPT_WAIT`].
pub fn accept_retry_delay(error: &io::Error) -> Option<Duration> {
    match error.kind() {
        io::ErrorKind::ConnectionAborted | io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionRefused | io::ErrorKind::Interrupted => None,
        _ => Some(ACCEPT_WAIT),
    }
}

/// Serves one accepted connection to completion, then closes it.
///
/// Every failure is logged here; nothing escapes to the accept loop.
pub async fn serve_connection<H>(stream: TcpStream, peer_addr: SocketAddr, handler: Arc<H>)
where
    H: Handler<OwnedReadHalf, OwnedWriteHalf> + ?Sized,
{
    let (reader, writer) = stream.into_split();
    let mut connection = HttpConnection::new(reader, writer, peer_addr);
    debug!(peer = %peer_addr, "unit started");

    match connection.process(handler.as_ref()).await {
        Ok(()) => info!(peer = %peer_addr, "done serving"),
        // already reported by the connection
        Err(e) if e.is_parse_error() => {}
        Err(e) => error!(peer = %peer_addr, cause = %e, detail = ?e, "service has error, connection shutdown"),
    }

    if let Err(e) = connection.close().await {
        debug!(peer = %peer_addr, cause = %e, "can't close connection cleanly");
    }
}

async fn interrupted() {
    match signal::ctrl_c().await {
        Ok(()) => info!("interrupt received"),
        Err(e) => {
            error!(cause = %e, "can't listen for interrupt, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
