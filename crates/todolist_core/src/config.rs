//! Runtime configuration for core callers.
//!
//! Layered as defaults → `TODOLIST_*` environment variables
//! (`TODOLIST_DB_PATH`, `TODOLIST_LOG_LEVEL`, `TODOLIST_LOG_DIR`,
//! `TODOLIST_PAGE_SIZE`). Anything unset falls back to in-memory storage,
//! the build-mode log level, no file logging and a page size of 20.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::default_log_level;
use figment::providers::{Env, Serialized};
use figment::Figment;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "TODOLIST_";

const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug)]
pub enum ConfigError {
    Extract(figment::Error),
    InvalidPageSize(u32),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extract(err) => write!(f, "failed to load configuration: {err}"),
            Self::InvalidPageSize(size) => {
                write!(f, "page_size must be a positive integer, got {size}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Extract(err) => Some(err),
            Self::InvalidPageSize(_) => None,
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(value: figment::Error) -> Self {
        Self::Extract(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// `None` selects an in-memory database.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// `None` leaves file logging disabled.
    pub log_dir: Option<PathBuf>,
    pub page_size: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CoreConfig {
    /// Builds the layered provider chain used by `from_env`.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    /// Loads configuration from defaults and the process environment.
    ///
    /// # Errors
    /// - `Extract` when a variable cannot be converted to its field type.
    /// - `InvalidPageSize` when `TODOLIST_PAGE_SIZE` is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Extracts and validates configuration from any provider chain.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let mut config: Self = figment.extract()?;
        config.db_path = config.db_path.filter(|path| !is_blank(path));
        config.log_dir = config.log_dir.filter(|path| !is_blank(path));
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize(self.page_size));
        }
        Ok(())
    }

    /// Whether storage lives only for the lifetime of the opened connection.
    pub fn is_in_memory(&self) -> bool {
        self.db_path.is_none()
    }

    /// Opens the configured database with migrations applied.
    pub fn open_db(&self) -> DbResult<Connection> {
        match &self.db_path {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }
}

fn is_blank(path: &Path) -> bool {
    path.to_str().is_some_and(|value| value.trim().is_empty())
}
