// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)
//
// The serve loop owns no signal state; the entry point wires OS signals
// to the shutdown token it injected into the server.

use std::sync::Arc;

use tokio::sync::Notify;

use crate::logger;

/// Start the signal listener (Unix).
///
/// Spawns a background task that waits for SIGINT or SIGTERM and fires
/// the shutdown token once.
#[cfg(unix)]
pub fn spawn_signal_listener(shutdown: Arc<Notify>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => logger::log_signal("SIGTERM"),
            _ = sigint.recv() => logger::log_signal("SIGINT"),
        }

        shutdown.notify_one();
    });
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn spawn_signal_listener(shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_signal("Ctrl+C");
            shutdown.notify_one();
        }
    });
}
