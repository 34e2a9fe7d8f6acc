//! Environment configuration for the server binary.
//!
//! | Variable | Default |
//! |---|---|
//! | `ODONTO_BIND` | `0.0.0.0` |
//! | `ODONTO_PORT` | `3535` |
//! | `ODONTO_DB_PATH` | `odonto.sqlite3` (`:memory:` for a throwaway store) |
//! | `ODONTO_DB_POOL_SIZE` | `8` (ignored for `:memory:`) |
//! | `ODONTO_LOG_LEVEL` | `debug` in debug builds, `info` in release |
//! | `ODONTO_LOG_DIR` | `<cwd>/logs` |

use odonto_core::db::{
    open_pool, open_pool_in_memory, DbResult, StorePool, DEFAULT_POOL_SIZE, MEMORY_TARGET,
};
use odonto_core::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 3535;
pub const DEFAULT_DB_PATH: &str = "odonto.sqlite3";
#[derive(Debug)]
pub enum ConfigError {
    InvalidPort(String),
    InvalidBind(String),
    InvalidPoolSize(String),
    WorkingDirectory(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPort(value) => {
                write!(f, "ODONTO_PORT must be a port number, got `{value}`")
            }
            Self::InvalidBind(value) => {
                write!(f, "ODONTO_BIND must be an IP address, got `{value}`")
            }
            Self::InvalidPoolSize(value) => {
                write!(f, "ODONTO_DB_POOL_SIZE must be a positive integer, got `{value}`")
            }
            Self::WorkingDirectory(err) => {
                write!(f, "cannot resolve working directory: {err}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::WorkingDirectory(err) => Some(err),
            _ => None,
        }
    }
}

/// Where the relational store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbTarget {
    File(PathBuf),
    Memory,
}

impl Display for DbTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Memory => f.write_str(MEMORY_TARGET),
        }
    }
}

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub db_target: DbTarget,
    pub pool_size: u32,
    pub log_level: String,
    /// Always absolute.
    pub log_dir: PathBuf,
}

impl ServerConfig {
    /// Reads the process environment, resolving relative paths against the
    /// current directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::WorkingDirectory)?;
        Self::from_lookup(|key| std::env::var(key).ok(), &cwd)
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F, cwd: &Path) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind = match var("ODONTO_BIND") {
            Some(value) => value
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidBind(value))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port = match var("ODONTO_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(value))?,
            None => DEFAULT_PORT,
        };
        let db_target = match var("ODONTO_DB_PATH") {
            Some(value) if value == MEMORY_TARGET => DbTarget::Memory,
            Some(value) => DbTarget::File(cwd.join(value)),
            None => DbTarget::File(cwd.join(DEFAULT_DB_PATH)),
        };
        let pool_size = match var("ODONTO_DB_POOL_SIZE") {
            Some(value) => value
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidPoolSize(value))?,
            None => DEFAULT_POOL_SIZE,
        };
        let log_level =
            var("ODONTO_LOG_LEVEL").unwrap_or_else(|| default_log_level().to_string());
        let log_dir = var("ODONTO_LOG_DIR")
            .map(|value| cwd.join(value))
            .unwrap_or_else(|| cwd.join("logs"));

        Ok(Self {
            bind,
            port,
            db_target,
            pool_size,
            log_level,
            log_dir,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Migrates the configured store and opens its connection pool.
    pub fn open_store(&self) -> DbResult<StorePool> {
        match &self.db_target {
            DbTarget::File(path) => open_pool(path, self.pool_size),
            DbTarget::Memory => open_pool_in_memory(),
        }
    }
}
