//! Server module
//!
//! The HTTP dispatcher: binds a listener, opens one store reader, and
//! runs a single-threaded accept loop until the injected shutdown token
//! fires. Lifecycle: bind (reader + listener) -> serve loop -> shutdown
//! drain -> resources released.

pub mod connection;
pub mod listener;
pub mod signal;

use std::net::SocketAddr;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use crate::config::Config;
use crate::logger;
use crate::store::{PageReader, StoreError};

/// How long the shutdown path waits for in-flight connections.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Fatal server-construction and transport errors.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The configured store could not be opened; the server must not
    /// start listening without it.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// The HTTP dispatcher owning the listener and the store reader.
pub struct Server {
    listener: TcpListener,
    reader: Rc<PageReader>,
    shutdown: Arc<Notify>,
    access_log: bool,
}

impl Server {
    /// Open the store reader and bind the listener.
    ///
    /// Both must succeed before the server may start serving; either
    /// failure aborts construction.
    pub fn bind(
        addr: SocketAddr,
        config: &Config,
        shutdown: Arc<Notify>,
    ) -> Result<Self, ServeError> {
        let reader = PageReader::open_with_timeout(
            &config.store.path,
            Duration::from_millis(config.store.busy_timeout_ms),
        )?;

        let listener =
            listener::create_listener(addr).map_err(|source| ServeError::Bind { addr, source })?;

        Ok(Self {
            listener,
            reader: Rc::new(reader),
            shutdown,
            access_log: config.logging.access_log,
        })
    }

    /// Local address of the bound listener.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the serve loop until the shutdown token fires.
    ///
    /// Blocks the calling task for the server's lifetime. Each accepted
    /// connection is served on the same thread via the local set; the
    /// shutdown path drains in-flight connections before the listener
    /// and reader are released.
    pub async fn serve(self) -> Result<(), ServeError> {
        let active_connections = Arc::new(AtomicUsize::new(0));

        loop {
            tokio::select! {
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            connection::handle_connection(
                                stream,
                                peer_addr,
                                Rc::clone(&self.reader),
                                Arc::clone(&active_connections),
                                self.access_log,
                            );
                        }
                        Err(e) => {
                            logger::log_error(&format!("Failed to accept connection: {e}"));
                        }
                    }
                }

                () = self.shutdown.notified() => {
                    logger::log_shutdown();
                    break;
                }
            }
        }

        drain_connections(&active_connections).await;
        Ok(())
    }
}

/// Wait for in-flight connections to finish, bounded by `DRAIN_TIMEOUT`.
async fn drain_connections(active_connections: &AtomicUsize) {
    let deadline = tokio::time::Instant::now() + DRAIN_TIMEOUT;

    while active_connections.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutdown drain timed out with {} connections still open",
                active_connections.load(Ordering::SeqCst)
            ));
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
