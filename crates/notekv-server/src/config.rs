//! Server configuration for `NoteKV`.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `NOTEKV_*` environment variables.

use std::net::SocketAddr;

use notekv_core::name::DEFAULT_NOTE;

/// Default listen port.
const DEFAULT_PORT: u16 = 8787;

/// Default request body cap (1 MiB).
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Default cap on in-flight requests.
const DEFAULT_CONCURRENCY_LIMIT: usize = 256;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Storage backend type.
    pub storage_backend: StorageBackendType,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
    /// Maximum number of requests served concurrently.
    pub concurrency_limit: usize,
    /// Note served at `/`.
    pub default_note: String,
}

/// Supported storage backend types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackendType {
    /// In-memory (development only, data lost on restart).
    Memory,
    /// `RocksDB` persistent storage.
    RocksDb { path: String },
    /// Redb persistent storage.
    Redb { path: String },
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            storage_backend: StorageBackendType::Memory,
            log_level: "info".to_owned(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            default_note: DEFAULT_NOTE.to_owned(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// Environment variables:
    /// - `PORT`: port to bind on, binds to `0.0.0.0` (PaaS convention)
    /// - `NOTEKV_BIND_ADDR`: full bind address (overrides `PORT`, default: `127.0.0.1:8787`)
    /// - `NOTEKV_STORAGE`: `memory`, `rocksdb`, or `redb` (default: `memory`)
    /// - `NOTEKV_STORAGE_PATH`: path for persistent backends (default: `./data`)
    /// - `NOTEKV_LOG_LEVEL`: log filter (default: `info`)
    /// - `NOTEKV_MAX_BODY_BYTES`: request body cap (default: `1048576`)
    /// - `NOTEKV_CONCURRENCY_LIMIT`: in-flight request cap (default: `256`)
    /// - `NOTEKV_DEFAULT_NOTE`: note served at `/` (default: `default`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        // Priority: NOTEKV_BIND_ADDR > PORT > default
        let bind_addr = if let Some(addr) = lookup("NOTEKV_BIND_ADDR") {
            addr.parse().unwrap_or(defaults.bind_addr)
        } else if let Some(port) = lookup("PORT") {
            let port: u16 = port.parse().unwrap_or(DEFAULT_PORT);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            defaults.bind_addr
        };

        let storage_path = lookup("NOTEKV_STORAGE_PATH").unwrap_or_else(|| "./data".to_owned());

        let storage_backend = match lookup("NOTEKV_STORAGE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "rocksdb" => StorageBackendType::RocksDb { path: storage_path },
            "redb" => StorageBackendType::Redb { path: storage_path },
            _ => StorageBackendType::Memory,
        };

        let log_level = lookup("NOTEKV_LOG_LEVEL").unwrap_or(defaults.log_level);

        let max_body_bytes = lookup("NOTEKV_MAX_BODY_BYTES")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_body_bytes);

        let concurrency_limit = lookup("NOTEKV_CONCURRENCY_LIMIT")
            .and_then(|v| v.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(defaults.concurrency_limit);

        let default_note = lookup("NOTEKV_DEFAULT_NOTE")
            .filter(|n| !n.is_empty())
            .unwrap_or(defaults.default_note);

        Self {
            bind_addr,
            storage_backend,
            log_level,
            max_body_bytes,
            concurrency_limit,
            default_note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = load(&[]);
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 8787)));
        assert_eq!(config.storage_backend, StorageBackendType::Memory);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.max_body_bytes, 1024 * 1024);
        assert_eq!(config.default_note, "default");
    }

    #[test]
    fn port_binds_all_interfaces() {
        let config = load(&[("PORT", "3000")]);
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 3000)));
    }

    #[test]
    fn bind_addr_overrides_port() {
        let config = load(&[("PORT", "3000"), ("NOTEKV_BIND_ADDR", "127.0.0.1:9000")]);
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 9000)));
    }

    #[test]
    fn persistent_backends_use_storage_path() {
        let config = load(&[("NOTEKV_STORAGE", "RocksDB"), ("NOTEKV_STORAGE_PATH", "/srv/notes")]);
        assert_eq!(
            config.storage_backend,
            StorageBackendType::RocksDb {
                path: "/srv/notes".to_owned()
            }
        );

        let config = load(&[("NOTEKV_STORAGE", "redb")]);
        assert_eq!(
            config.storage_backend,
            StorageBackendType::Redb {
                path: "./data".to_owned()
            }
        );
    }

    #[test]
    fn garbage_values_fall_back() {
        let config = load(&[
            ("NOTEKV_BIND_ADDR", "not an addr"),
            ("NOTEKV_MAX_BODY_BYTES", "lots"),
            ("NOTEKV_CONCURRENCY_LIMIT", "0"),
            ("NOTEKV_STORAGE", "floppy"),
            ("NOTEKV_DEFAULT_NOTE", ""),
        ]);
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 8787)));
        assert_eq!(config.max_body_bytes, 1024 * 1024);
        assert_eq!(config.concurrency_limit, 256);
        assert_eq!(config.storage_backend, StorageBackendType::Memory);
        assert_eq!(config.default_note, "default");
    }
}
