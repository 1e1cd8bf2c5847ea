//! SQLite file backing `store::SqliteStore`.
//!
//! # Responsibility
//! - Hand out connections whose `kv_entries` schema is current.
//! - Report open, migration and version failures with enough context to act on.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - A store file stamped by a newer build is refused, never downgraded.
//! - No key is read or written through a connection that failed bootstrap.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Store database failures.
#[derive(Debug)]
pub enum DbError {
    /// The store file (or in-memory database) could not be opened.
    Open {
        target: String,
        source: rusqlite::Error,
    },
    /// One migration step failed; the transaction was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The store file was written by a newer schema.
    SchemaTooNew { found: u32, supported: u32 },
    /// Any other statement failure.
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => {
                write!(f, "cannot open store `{target}`: {source}")
            }
            Self::Migration { version, source } => {
                write!(f, "store migration {version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "store file uses schema {found}; this build reads up to {supported}"
            ),
            Self::Sqlite(err) => write!(f, "store query failed: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_failing_store_step() {
        let open = DbError::Open {
            target: "/tmp/board.db".to_string(),
            source: rusqlite::Error::InvalidQuery,
        };
        assert!(open.to_string().starts_with("cannot open store `/tmp/board.db`"));
        assert!(open.source().is_some());

        let too_new = DbError::SchemaTooNew {
            found: 9,
            supported: 1,
        };
        assert_eq!(
            too_new.to_string(),
            "store file uses schema 9; this build reads up to 1"
        );
        assert!(too_new.source().is_none());
    }
}
