//! Logger module
//!
//! Provides logging utilities for the packer and the HTTP server:
//! - Server lifecycle logging
//! - Access logging in Common Log Format
//! - Pack progress and summary logging
//! - Error and warning logging

use std::net::SocketAddr;
use std::path::Path;

use chrono::Local;

use crate::config::Config;

/// Access log entry for one served request.
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// HTTP method (GET, HEAD)
    pub method: String,
    /// Request URI path as received, before any alias rewriting
    pub path: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
}

impl AccessLogEntry {
    /// Common Log Format (CLF)
    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    pub fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/1.1\" {} {}",
            self.remote_addr,
            Local::now().format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.status,
            self.body_bytes,
        )
    }
}

fn write_info(message: &str) {
    println!("{message}");
}

fn write_error(message: &str) {
    eprintln!("{message}");
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Page server started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Serving store: {}", config.store.path.display()));
    write_info(&format!(
        "Access log: {}",
        if config.logging.access_log { "on" } else { "off" }
    ));
    write_info("======================================\n");
}

pub fn log_access(entry: &AccessLogEntry) {
    write_info(&entry.format_common());
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_signal(name: &str) {
    write_info(&format!("\n[SIGNAL] {name} received, shutting down"));
}

pub fn log_shutdown() {
    write_info("[Server] Serve loop stopped, draining connections");
}

pub fn log_pack_start(root: &Path, store: &Path) {
    write_info(&format!(
        "Packing '{}' into '{}'",
        root.display(),
        store.display()
    ));
}

pub fn log_packed_file(page_path: &str, bytes: usize) {
    write_info(&format!("  stored {page_path} ({bytes} bytes)"));
}

pub fn log_pack_summary(stored: usize, failed: usize) {
    if failed == 0 {
        write_info(&format!("Packed {stored} pages"));
    } else {
        write_info(&format!("Packed {stored} pages, {failed} failed"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_format_shape() {
        let entry = AccessLogEntry {
            remote_addr: "127.0.0.1".to_string(),
            method: "GET".to_string(),
            path: "/index.html".to_string(),
            status: 200,
            body_bytes: 13,
        };

        let line = entry.format_common();
        assert!(line.starts_with("127.0.0.1 - - ["));
        assert!(line.ends_with("\"GET /index.html HTTP/1.1\" 200 13"));
    }
}
