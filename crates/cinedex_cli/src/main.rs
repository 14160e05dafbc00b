//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire configuration, logging and the SQLite provider end to end.
//! - Print catalog counts so a configured store can be checked quickly.

use cinedex_core::{
    init_logging, CatalogConfig, GenreRepository, MovieRepository, SqliteConnectionProvider,
    SqliteGenreRepository, SqliteMovieRepository,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cinedex: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = CatalogConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let provider = SqliteConnectionProvider::new(config.store.clone());
    let genres = SqliteGenreRepository::new(&provider).list_genres()?;
    let movies = SqliteMovieRepository::new(&provider).list_movies()?;

    log::info!(
        "event=cli_probe module=cli status=ok genres={} movies={}",
        genres.len(),
        movies.len()
    );
    println!("cinedex_core version={}", cinedex_core::core_version());
    println!("store={}", config.store.db_path.display());
    println!("genres={} movies={}", genres.len(), movies.len());
    Ok(())
}
