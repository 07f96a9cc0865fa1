//! Service configuration layered from an optional TOML file and the environment.

use std::{net::SocketAddr, path::{Path, PathBuf}};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::{
    runtime::handle::RuntimeConfig,
    store::{RecordStore, StoreResult, memory::MemoryStore, sqlite::SqliteStore},
};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "CUSTOMERS_CONFIG";
/// Config file read when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "customers.toml";
/// Prefix for environment overrides, e.g. `CUSTOMERS__SERVER__BIND`.
pub const ENV_PREFIX: &str = "CUSTOMERS";

/// Root of the configuration tree.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP listener.
    pub server: Server,
    /// Record store backend.
    pub storage: Storage,
    /// Log level and optional file output.
    pub logger: Logger,
    /// Store worker sizing.
    pub runtime: Runtime,
}

impl ServiceConfig {
    /// Loads from the file named by `CUSTOMERS_CONFIG` (or `customers.toml`)
    /// with `CUSTOMERS__*` environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    /// Loads from `path`, which may be absent, with environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<ServiceConfig>()
    }
}

/// `[server]` section.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    /// Listen address, default `0.0.0.0:8000`.
    pub bind: SocketAddr,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8000)),
        }
    }
}

/// Storage engine selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// File-backed SQLite table.
    #[default]
    Sqlite,
    /// Process-local store, lost on exit.
    Memory,
}

/// `[storage]` section.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Storage {
    /// Engine to open.
    pub backend: Backend,
    /// Database file for the SQLite backend.
    pub path: PathBuf,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            backend: Backend::Sqlite,
            path: PathBuf::from("customers.db"),
        }
    }
}

impl Storage {
    /// Opens the configured backend. SQLite creates the table on first open.
    pub fn open(&self) -> StoreResult<Box<dyn RecordStore>> {
        Ok(match self.backend {
            Backend::Sqlite => Box::new(SqliteStore::open(&self.path)?),
            Backend::Memory => Box::new(MemoryStore::new()),
        })
    }
}

/// `[logger]` section.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Logger {
    /// Default level when `RUST_LOG` is unset.
    pub level: Level,
    /// Directory for daily rolling log files; console only when unset.
    pub directory: Option<PathBuf>,
}

/// Log verbosity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Everything, including per-row store traffic.
    Trace,
    /// Rejected requests and their reasons.
    Debug,
    /// Writes and lifecycle.
    #[default]
    Info,
    /// Store failures.
    Warn,
    /// Fatal conditions only.
    Error,
}

impl From<Level> for tracing::Level {
    fn from(value: Level) -> Self {
        match value {
            Level::Trace => tracing::Level::TRACE,
            Level::Debug => tracing::Level::DEBUG,
            Level::Info => tracing::Level::INFO,
            Level::Warn => tracing::Level::WARN,
            Level::Error => tracing::Level::ERROR,
        }
    }
}

/// `[runtime]` section, see [`RuntimeConfig`].
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Runtime {
    /// Pending requests accepted before callers wait.
    pub queue_bound: usize,
    /// Events buffered per subscriber.
    pub event_capacity: usize,
}

impl Default for Runtime {
    fn default() -> Self {
        let defaults = RuntimeConfig::default();
        Self {
            queue_bound: defaults.queue_bound,
            event_capacity: defaults.event_capacity,
        }
    }
}

impl From<&Runtime> for RuntimeConfig {
    fn from(value: &Runtime) -> Self {
        Self {
            queue_bound: value.queue_bound,
            event_capacity: value.event_capacity,
        }
    }
}
