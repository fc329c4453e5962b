//! SQLite storage bootstrap and schema migrations.
//!
//! # Responsibility
//! - Open and configure connections for the delivery store.
//! - Bring the schema up to date before any repository touches it.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Foreign keys are enforced on every connection handed out.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening, migrating or querying the delivery store.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// A migration script failed; the whole batch was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The store was written by a newer build of this crate.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Returns whether the store's schema cannot be used by this build.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::Migration { .. } | Self::UnsupportedSchemaVersion { .. }
        )
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "delivery store error: {err}"),
            Self::Migration { version, source } => {
                write!(f, "delivery store migration {version} failed: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "delivery store schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
