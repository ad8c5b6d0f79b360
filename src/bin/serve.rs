//! Server entry point: serve a page store over HTTP until signalled.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::Notify;

use pagevault::logger;
use pagevault::server::{signal, Server};
use pagevault::Config;

#[derive(Parser)]
#[command(
    name = "pagevault-serve",
    about = "Serve a packed page store over HTTP"
)]
struct Args {
    /// Page store file to serve
    store: Option<PathBuf>,

    /// Configuration file path (without extension)
    #[arg(long)]
    config: Option<String>,

    /// Bind host, overriding the configuration
    #[arg(long)]
    host: Option<String>,

    /// Bind port, overriding the configuration
    #[arg(long, short)]
    port: Option<u16>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(store) = args.store {
        cfg.store.path = store;
    }
    if let Some(host) = args.host {
        cfg.server.host = host;
    }
    if let Some(port) = args.port {
        cfg.server.port = port;
    }

    let addr = cfg.socket_addr()?;

    // Single-threaded, event-driven dispatch: every request is handled
    // on this one runtime thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg, addr))
}

async fn async_main(cfg: Config, addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    let shutdown = Arc::new(Notify::new());

    // Opening the reader and binding happen before the loop starts; a
    // missing store or occupied port never reaches Listening.
    let server = Server::bind(addr, &cfg, Arc::clone(&shutdown))?;
    signal::spawn_signal_listener(Arc::clone(&shutdown));

    logger::log_server_start(&addr, &cfg);

    let local = tokio::task::LocalSet::new();
    local.run_until(server.serve()).await?;

    Ok(())
}
