//! Movie access over `movie`, hydrated from `genre`.
//!
//! # Responsibility
//! - Keep the movie/genre join in one SELECT prefix and one row mapper.
//! - Write new movies and hand back the store-generated id.
//!
//! # Invariants
//! - Reads use an inner join: movies without a matching genre row are skipped.
//! - `release_date` is truncated to a calendar date on read.
//! - Inserts rely on the `genre_fk` constraint for referential integrity.

use super::{no_rows_affected, run_statement, RepoResult};
use crate::db::ConnectionProvider;
use crate::model::genre::Genre;
use crate::model::movie::{Movie, MovieId};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};
use rusqlite::{params, OptionalExtension, Row};

const MOVIE_SELECT_SQL: &str = "SELECT
    movie.idmovie,
    movie.title,
    movie.release_date,
    movie.duration,
    movie.director,
    movie.summary,
    genre.idgenre,
    genre.name
FROM movie
INNER JOIN genre ON movie.genre_id = genre.idgenre";

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Repository interface for movie reads and inserts.
pub trait MovieRepository {
    /// Lists every movie with its genre, ordered by id.
    fn list_movies(&self) -> RepoResult<Vec<Movie>>;
    /// Lists movies whose genre name matches exactly.
    fn list_movies_by_genre(&self, genre_name: &str) -> RepoResult<Vec<Movie>>;
    /// Finds one movie by its generated id.
    fn get_movie(&self, id: MovieId) -> RepoResult<Option<Movie>>;
    /// Inserts `movie` and returns it with `id` populated.
    fn add_movie(&self, movie: Movie) -> RepoResult<Movie>;
}

/// SQLite-backed movie repository.
pub struct SqliteMovieRepository<P> {
    provider: P,
}

impl<P: ConnectionProvider> SqliteMovieRepository<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: ConnectionProvider> MovieRepository for SqliteMovieRepository<P> {
    fn list_movies(&self) -> RepoResult<Vec<Movie>> {
        run_statement(&self.provider, "list_movies", |conn| {
            let mut stmt = conn.prepare(&format!("{MOVIE_SELECT_SQL} ORDER BY movie.idmovie;"))?;
            let movies = stmt
                .query_map([], parse_movie_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(movies)
        })
    }

    fn list_movies_by_genre(&self, genre_name: &str) -> RepoResult<Vec<Movie>> {
        run_statement(&self.provider, "list_movies_by_genre", |conn| {
            let mut stmt = conn.prepare(&format!(
                "{MOVIE_SELECT_SQL}
                 WHERE genre.name = ?1
                 ORDER BY movie.idmovie;"
            ))?;
            let movies = stmt
                .query_map([genre_name], parse_movie_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(movies)
        })
    }

    fn get_movie(&self, id: MovieId) -> RepoResult<Option<Movie>> {
        run_statement(&self.provider, "get_movie", |conn| {
            conn.query_row(
                &format!("{MOVIE_SELECT_SQL} WHERE movie.idmovie = ?1;"),
                [id],
                parse_movie_row,
            )
            .optional()
        })
    }

    fn add_movie(&self, movie: Movie) -> RepoResult<Movie> {
        let genre_id = movie.validate_for_insert()?;

        let (changed, id) = run_statement(&self.provider, "add_movie", |conn| {
            let changed = conn.execute(
                "INSERT INTO movie (
                    title,
                    release_date,
                    genre_id,
                    duration,
                    director,
                    summary
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    movie.title.as_str(),
                    movie.release_date.map(release_date_to_db),
                    genre_id,
                    movie.duration,
                    movie.director.as_str(),
                    movie.summary.as_deref(),
                ],
            )?;
            Ok((changed, conn.last_insert_rowid()))
        })?;

        if changed == 0 {
            return Err(no_rows_affected("add_movie"));
        }

        Ok(Movie {
            id: Some(id),
            ..movie
        })
    }
}

fn parse_movie_row(row: &Row<'_>) -> rusqlite::Result<Movie> {
    let release_date = row
        .get::<_, Option<StoredDate>>("release_date")?
        .map(|stored| stored.0);

    Ok(Movie {
        id: Some(row.get("idmovie")?),
        title: row.get("title")?,
        release_date,
        genre: Genre {
            id: Some(row.get("idgenre")?),
            name: row.get("name")?,
        },
        duration: row.get("duration")?,
        director: row.get("director")?,
        summary: row.get("summary")?,
    })
}

fn release_date_to_db(date: NaiveDate) -> String {
    date.format("%Y-%m-%d 00:00:00.000").to_string()
}

/// `release_date` column value reduced to its calendar date.
///
/// TEXT holds an ISO date or date-time; INTEGER holds epoch milliseconds.
struct StoredDate(NaiveDate);

impl FromSql for StoredDate {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Text(_) => parse_date_text(value.as_str()?)
                .map(StoredDate)
                .ok_or_else(|| {
                    FromSqlError::Other("release date is not a recognized date".into())
                }),
            ValueRef::Integer(millis) => DateTime::from_timestamp_millis(millis)
                .map(|timestamp| StoredDate(timestamp.date_naive()))
                .ok_or(FromSqlError::OutOfRange(millis)),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|timestamp| timestamp.date())
}
