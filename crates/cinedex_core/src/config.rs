//! Runtime configuration for the catalog store and logging.
//!
//! # Responsibility
//! - Resolve where the SQLite catalog lives and how connections behave.
//! - Resolve logging level/directory for process bootstrap.
//!
//! # Invariants
//! - Missing keys fall back to defaults; malformed values are rejected.
//! - Parsing never touches process state beyond reading variables.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "CINEDEX_DB_PATH";
pub const ENV_BUSY_TIMEOUT_MS: &str = "CINEDEX_BUSY_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "CINEDEX_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CINEDEX_LOG_DIR";

const DEFAULT_DB_PATH: &str = "sqlite.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value `{value}` for `{key}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Location and connection behavior of the SQLite store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Database file opened on every connection request.
    pub db_path: PathBuf,
    /// How long a connection waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_PATH)
    }
}

/// Full process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub store: StoreConfig,
    pub log_level: String,
    /// Logging is only initialized when a directory is configured.
    pub log_dir: Option<PathBuf>,
}

impl CatalogConfig {
    /// Reads configuration from `CINEDEX_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut store = match read(ENV_DB_PATH) {
            Some(path) => StoreConfig::new(path),
            None => StoreConfig::default(),
        };

        if let Some(raw) = read(ENV_BUSY_TIMEOUT_MS) {
            let millis = raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: ENV_BUSY_TIMEOUT_MS,
                value: raw.clone(),
            })?;
            store.busy_timeout = Duration::from_millis(millis);
        }

        Ok(Self {
            store,
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        })
    }
}
