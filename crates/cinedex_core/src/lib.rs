//! Persistence core for the cinedex movie catalog.
//! Owns the SQLite schema, the entity values and the data-access contracts.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use config::{CatalogConfig, ConfigError, StoreConfig};
pub use db::{ConnectionProvider, DbError, DbResult, SqliteConnectionProvider};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::genre::{Genre, GenreId};
pub use model::movie::{Movie, MovieId};
pub use model::ValidationError;
pub use repo::genre_repo::{GenreRepository, SqliteGenreRepository};
pub use repo::movie_repo::{MovieRepository, SqliteMovieRepository};
pub use repo::{ErrorKind, RepoError, RepoResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
