//! Catalog schema bootstrap.
//!
//! The schema is created once and never evolved; statements are idempotent so
//! every fresh connection can run them safely.

use super::DbResult;
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates the `genre` and `movie` tables when they do not exist yet.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
