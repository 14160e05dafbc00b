//! Genre access over the `genre` table.
//!
//! # Invariants
//! - Lookups by name are exact (SQLite BINARY collation).
//! - When several rows share a name, the lowest `idgenre` wins.

use super::{no_rows_affected, run_statement, RepoResult};
use crate::db::ConnectionProvider;
use crate::model::genre::{Genre, GenreId};
use rusqlite::{params, OptionalExtension, Row};

const GENRE_SELECT_SQL: &str = "SELECT idgenre, name FROM genre";

/// Repository interface for genre reads and inserts.
pub trait GenreRepository {
    /// Lists every genre ordered by id.
    fn list_genres(&self) -> RepoResult<Vec<Genre>>;
    /// Finds a genre by exact name.
    fn get_genre(&self, name: &str) -> RepoResult<Option<Genre>>;
    /// Finds a genre by its generated id.
    fn get_genre_by_id(&self, id: GenreId) -> RepoResult<Option<Genre>>;
    /// Inserts a genre and returns it with the generated id.
    fn add_genre(&self, name: &str) -> RepoResult<Genre>;
}

/// SQLite-backed genre repository.
pub struct SqliteGenreRepository<P> {
    provider: P,
}

impl<P: ConnectionProvider> SqliteGenreRepository<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: ConnectionProvider> GenreRepository for SqliteGenreRepository<P> {
    fn list_genres(&self) -> RepoResult<Vec<Genre>> {
        run_statement(&self.provider, "list_genres", |conn| {
            let mut stmt = conn.prepare(&format!("{GENRE_SELECT_SQL} ORDER BY idgenre;"))?;
            let genres = stmt
                .query_map([], parse_genre_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(genres)
        })
    }

    fn get_genre(&self, name: &str) -> RepoResult<Option<Genre>> {
        run_statement(&self.provider, "get_genre", |conn| {
            conn.query_row(
                &format!("{GENRE_SELECT_SQL} WHERE name = ?1 ORDER BY idgenre LIMIT 1;"),
                [name],
                parse_genre_row,
            )
            .optional()
        })
    }

    fn get_genre_by_id(&self, id: GenreId) -> RepoResult<Option<Genre>> {
        run_statement(&self.provider, "get_genre_by_id", |conn| {
            conn.query_row(
                &format!("{GENRE_SELECT_SQL} WHERE idgenre = ?1;"),
                [id],
                parse_genre_row,
            )
            .optional()
        })
    }

    fn add_genre(&self, name: &str) -> RepoResult<Genre> {
        let (changed, id) = run_statement(&self.provider, "add_genre", |conn| {
            let changed = conn.execute("INSERT INTO genre (name) VALUES (?1);", params![name])?;
            Ok((changed, conn.last_insert_rowid()))
        })?;

        if changed == 0 {
            return Err(no_rows_affected("add_genre"));
        }

        Ok(Genre::with_id(id, name))
    }
}

fn parse_genre_row(row: &Row<'_>) -> rusqlite::Result<Genre> {
    Ok(Genre {
        id: Some(row.get("idgenre")?),
        name: row.get("name")?,
    })
}
