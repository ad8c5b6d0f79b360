// Connection handling module
// Serves one accepted TCP connection on the dispatch thread.

use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;

use crate::handler;
use crate::logger;
use crate::store::PageReader;

/// Serve a connection in a task on the local set.
///
/// The reader handle is shared by reference counting only: every
/// connection task runs on the single dispatch thread, so no locking is
/// required around the engine handle. The counter tracks in-flight
/// connections for the shutdown drain.
pub fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    reader: Rc<PageReader>,
    conn_counter: Arc<AtomicUsize>,
    access_log: bool,
) {
    conn_counter.fetch_add(1, Ordering::SeqCst);

    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);

        let service = service_fn(move |req| {
            let reader = Rc::clone(&reader);
            handler::handle_request(req, reader, peer_addr, access_log)
        });

        let conn = http1::Builder::new()
            .keep_alive(true)
            .serve_connection(io, service);

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
