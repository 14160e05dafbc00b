//! Data-access contracts and SQLite implementations.
//!
//! # Responsibility
//! - Expose create/read operations over `genre` and `movie`.
//! - Translate every SQLite failure into `RepoError` with operation context.
//!
//! # Invariants
//! - Each operation acquires its own connection and runs one statement.
//! - The connection is released when the operation returns, on every path.
//! - Absence is `Ok(None)` or an empty `Vec`, never an error.

use crate::db::{ConnectionProvider, DbError};
use crate::model::ValidationError;
use log::{debug, error, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub mod genre_repo;
pub mod movie_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure of a single data-access operation.
#[derive(Debug)]
pub enum RepoError {
    /// No connection could be obtained.
    Connection(DbError),
    /// Statement execution failed.
    Sql {
        operation: &'static str,
        source: rusqlite::Error,
    },
    /// An insert completed without writing a row.
    NoRowsAffected { operation: &'static str },
    /// A stored row could not be mapped to an entity value.
    InvalidData(String),
    /// The input was rejected before any statement ran.
    Validation(ValidationError),
}

/// Coarse classification of `RepoError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    DataAccess,
    Validation,
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connection(_) => ErrorKind::Connection,
            Self::Sql { .. } | Self::NoRowsAffected { .. } | Self::InvalidData(_) => {
                ErrorKind::DataAccess
            }
            Self::Validation(_) => ErrorKind::Validation,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(err) => write!(f, "connection error: {err}"),
            Self::Sql { operation, source } => write!(f, "{operation} failed: {source}"),
            Self::NoRowsAffected { operation } => {
                write!(f, "{operation} failed: no rows affected")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection(err) => Some(err),
            Self::Sql { source, .. } => Some(source),
            Self::NoRowsAffected { .. } => None,
            Self::InvalidData(_) => None,
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Acquires a connection, runs `statement` on it and releases it.
///
/// The connection lives only for the call; statements and cursors created by
/// `statement` borrow it and are dropped before it closes.
pub(crate) fn run_statement<P, T>(
    provider: &P,
    operation: &'static str,
    statement: impl FnOnce(&Connection) -> rusqlite::Result<T>,
) -> RepoResult<T>
where
    P: ConnectionProvider + ?Sized,
{
    let started_at = Instant::now();
    let conn = provider.connect().map_err(|err| {
        error!(
            "event=repo_op module=repo status=error operation={} error_code=connection_failed error={}",
            operation, err
        );
        RepoError::Connection(err)
    })?;

    match statement(&conn) {
        Ok(value) => {
            debug!(
                "event=repo_op module=repo status=ok operation={} duration_ms={}",
                operation,
                started_at.elapsed().as_millis()
            );
            Ok(value)
        }
        Err(source) => {
            error!(
                "event=repo_op module=repo status=error duration_ms={} {}",
                started_at.elapsed().as_millis(),
                failure_fields(operation, &source)
            );
            Err(statement_failure(operation, source))
        }
    }
}

/// Log metadata for a failed statement. Never includes the driver message,
/// which may quote stored column text.
fn failure_fields(operation: &str, source: &rusqlite::Error) -> String {
    let sqlite_code = match source {
        rusqlite::Error::SqliteFailure(err, _) => err.extended_code.to_string(),
        _ => "none".to_string(),
    };
    format!(
        "operation={} error_code={} sqlite_code={}",
        operation,
        failure_code(source),
        sqlite_code
    )
}

fn failure_code(source: &rusqlite::Error) -> &'static str {
    match source {
        rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::IntegralValueOutOfRange(..) => "invalid_data",
        _ => "statement_failed",
    }
}

fn statement_failure(operation: &'static str, source: rusqlite::Error) -> RepoError {
    match source {
        rusqlite::Error::FromSqlConversionFailure(index, value_type, _) => RepoError::InvalidData(
            format!("{operation}: column {index} holds an unreadable {value_type} value"),
        ),
        rusqlite::Error::IntegralValueOutOfRange(index, _) => RepoError::InvalidData(format!(
            "{operation}: column {index} holds an out-of-range integer"
        )),
        source => RepoError::Sql { operation, source },
    }
}

pub(crate) fn no_rows_affected(operation: &'static str) -> RepoError {
    warn!(
        "event=repo_op module=repo status=error operation={} error_code=no_rows_affected",
        operation
    );
    RepoError::NoRowsAffected { operation }
}
