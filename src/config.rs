// Configuration module
// Layered settings: built-in defaults < config file < PAGEVAULT_* environment.
// Command-line flags are applied on top by the binaries.

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Store configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Path to the page store file
    pub path: PathBuf,
    /// Bounded wait on the engine's lock, so a concurrent packer cannot
    /// stall lookups indefinitely
    pub busy_timeout_ms: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
}

impl Config {
    /// Load configuration from the default file name ("pagevault.toml"
    /// next to the working directory, if present).
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("pagevault")
    }

    /// Load configuration from the specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("PAGEVAULT"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("store.path", "pages.db")?
            .set_default("store.busy_timeout_ms", 5000)?
            .set_default("logging.access_log", true)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_without_config_file() {
        let cfg = Config::load_from("no-such-config-file").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.store.path, PathBuf::from("pages.db"));
        assert_eq!(cfg.store.busy_timeout_ms, 5000);
        assert!(cfg.logging.access_log);
    }

    #[test]
    fn test_socket_addr_parses_defaults() {
        let cfg = Config::load_from("no-such-config-file").unwrap();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }
}
