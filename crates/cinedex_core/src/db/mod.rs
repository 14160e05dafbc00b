//! SQLite storage bootstrap and connection supply.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the catalog.
//! - Create the `genre`/`movie` schema before any data access.
//!
//! # Invariants
//! - Every connection handed out has `foreign_keys=ON` and the schema in place.
//! - Connections are owned by the caller and released on drop.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod open;
mod schema;

pub use open::{open_db, open_db_in_memory, SqliteConnectionProvider};
pub use schema::ensure_schema;

pub type DbResult<T> = Result<T, DbError>;

/// Failure to obtain a usable connection.
#[derive(Debug)]
pub enum DbError {
    /// The database file could not be opened.
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    /// Connection configuration or schema bootstrap failed.
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "failed to open database `{}`: {source}", path.display())
            }
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Supplies one ready-to-use connection per data-access operation.
///
/// Implementations must return connections that already satisfy the
/// bootstrap invariants of this module. The caller owns the connection for
/// the duration of a single operation and drops it afterwards.
pub trait ConnectionProvider {
    fn connect(&self) -> DbResult<rusqlite::Connection>;
}

impl<P: ConnectionProvider + ?Sized> ConnectionProvider for &P {
    fn connect(&self) -> DbResult<rusqlite::Connection> {
        (**self).connect()
    }
}
