//! Runtime configuration for the core.
//!
//! # Responsibility
//! - Derive store and log locations from one application data directory.
//! - Open the on-disk store and start logging from that configuration.
//!
//! # Invariants
//! - `data_dir` and an explicit `log_dir` are absolute paths.
//! - `log_level` is always one of the normalized level names.

use crate::logging::{default_log_level, init_logging, normalize_level, LoggingError};
use crate::store::{SqliteStore, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default store file name inside `data_dir`.
pub const DEFAULT_STORE_FILE_NAME: &str = "ignition_store.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Configuration failures.
#[derive(Debug)]
pub enum ConfigError {
    RelativePath(PathBuf),
    InvalidStoreFileName(String),
    CreateDataDir { path: PathBuf, source: std::io::Error },
    Logging(LoggingError),
    Store(StoreError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelativePath(path) => {
                write!(f, "path must be absolute, got `{}`", path.display())
            }
            Self::InvalidStoreFileName(name) => write!(f, "invalid store file name `{name}`"),
            Self::CreateDataDir { path, source } => write!(
                f,
                "failed to create data dir `{}`: {source}",
                path.display()
            ),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDataDir { source, .. } => Some(source),
            Self::Logging(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LoggingError> for ConfigError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<StoreError> for ConfigError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Core configuration rooted at one application data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    data_dir: PathBuf,
    log_level: &'static str,
    log_dir: Option<PathBuf>,
    store_file_name: String,
}

impl CoreConfig {
    /// Creates a configuration with build-mode defaults.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let data_dir = require_absolute(data_dir.into())?;
        Ok(Self {
            data_dir,
            log_level: default_log_level(),
            log_dir: None,
            store_file_name: DEFAULT_STORE_FILE_NAME.to_string(),
        })
    }

    pub fn with_log_level(mut self, level: &str) -> Result<Self, ConfigError> {
        self.log_level = normalize_level(level)?;
        Ok(self)
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        self.log_dir = Some(require_absolute(log_dir.into())?);
        Ok(self)
    }

    /// Overrides the store file name. Must be a bare file name.
    pub fn with_store_file_name(mut self, name: &str) -> Result<Self, ConfigError> {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.contains(['/', '\\']) {
            return Err(ConfigError::InvalidStoreFileName(name.to_string()));
        }
        self.store_file_name = trimmed.to_string();
        Ok(self)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_level(&self) -> &'static str {
        self.log_level
    }

    /// Explicit log dir, or `<data_dir>/logs`.
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join(LOG_DIR_NAME))
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(&self.store_file_name)
    }

    /// Opens the on-disk store, creating `data_dir` when missing.
    pub fn open_store(&self) -> Result<SqliteStore, ConfigError> {
        std::fs::create_dir_all(&self.data_dir).map_err(|source| ConfigError::CreateDataDir {
            path: self.data_dir.clone(),
            source,
        })?;
        Ok(SqliteStore::open(self.store_path())?)
    }

    /// Starts process-wide logging with this configuration.
    pub fn init_logging(&self) -> Result<(), ConfigError> {
        init_logging(self.log_level, &self.log_dir())?;
        Ok(())
    }
}

fn require_absolute(path: PathBuf) -> Result<PathBuf, ConfigError> {
    if !path.is_absolute() {
        return Err(ConfigError::RelativePath(path));
    }
    Ok(path)
}
