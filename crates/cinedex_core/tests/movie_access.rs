use chrono::NaiveDate;
use cinedex_core::{
    ErrorKind, Genre, GenreRepository, Movie, MovieRepository, RepoError, SqliteConnectionProvider,
    SqliteGenreRepository, SqliteMovieRepository, StoreConfig, ValidationError,
};
use rusqlite::{params, Connection};
use std::collections::HashSet;
use tempfile::TempDir;

fn fixture_store() -> (TempDir, SqliteConnectionProvider) {
    let dir = tempfile::tempdir().unwrap();
    let provider = SqliteConnectionProvider::new(StoreConfig::new(dir.path().join("catalog.db")));

    let conn = raw_connection(&provider);
    cinedex_core::db::ensure_schema(&conn).unwrap();
    conn.execute_batch(
        "INSERT INTO genre (idgenre, name) VALUES (1, 'Drama');
         INSERT INTO genre (idgenre, name) VALUES (2, 'Comedy');
         INSERT INTO movie (idmovie, title, release_date, genre_id, duration, director, summary)
         VALUES (1, 'Title 1', '2015-11-26 12:00:00.000', 1, 120, 'director 1', 'summary of the first movie');
         INSERT INTO movie (idmovie, title, release_date, genre_id, duration, director, summary)
         VALUES (2, 'My Title 2', '2015-11-14 12:00:00.000', 2, 114, 'director 2', 'summary of the second movie');
         INSERT INTO movie (idmovie, title, release_date, genre_id, duration, director, summary)
         VALUES (3, 'Third title', '2015-12-12 12:00:00.000', 2, 176, 'director 3', 'summary of the third movie');",
    )
    .unwrap();

    (dir, provider)
}

/// Plain connection without the provider bootstrap (foreign keys off).
fn raw_connection(provider: &SqliteConnectionProvider) -> Connection {
    let conn = Connection::open(&provider.config().db_path).unwrap();
    conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();
    conn
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn titles(movies: &[Movie]) -> HashSet<&str> {
    movies.iter().map(|movie| movie.title.as_str()).collect()
}

#[test]
fn list_movies_returns_every_fixture_movie() {
    let (_dir, provider) = fixture_store();
    let repo = SqliteMovieRepository::new(&provider);

    let movies = repo.list_movies().unwrap();
    assert_eq!(movies.len(), 3);
    assert_eq!(
        titles(&movies),
        HashSet::from(["Title 1", "My Title 2", "Third title"])
    );

    let directors = movies
        .iter()
        .map(|movie| movie.director.as_str())
        .collect::<HashSet<_>>();
    assert_eq!(
        directors,
        HashSet::from(["director 1", "director 2", "director 3"])
    );
}

#[test]
fn list_movies_hydrates_genre_and_truncates_release_date() {
    let (_dir, provider) = fixture_store();
    let repo = SqliteMovieRepository::new(&provider);

    let first = repo.list_movies().unwrap().remove(0);
    assert_eq!(
        first,
        Movie {
            id: Some(1),
            title: "Title 1".to_string(),
            release_date: Some(date(2015, 11, 26)),
            genre: Genre::with_id(1, "Drama"),
            duration: Some(120),
            director: "director 1".to_string(),
            summary: Some("summary of the first movie".to_string()),
        }
    );
}

#[test]
fn list_movies_by_genre_filters_on_joined_name() {
    let (_dir, provider) = fixture_store();
    let repo = SqliteMovieRepository::new(&provider);

    let comedies = repo.list_movies_by_genre("Comedy").unwrap();
    assert_eq!(comedies.len(), 2);
    assert_eq!(titles(&comedies), HashSet::from(["My Title 2", "Third title"]));
    assert!(comedies.iter().all(|movie| movie.genre.name == "Comedy"));

    let all = repo.list_movies().unwrap();
    assert!(comedies.iter().all(|movie| all.contains(movie)));
}

#[test]
fn list_movies_by_unknown_genre_is_empty() {
    let (_dir, provider) = fixture_store();
    let repo = SqliteMovieRepository::new(&provider);

    assert!(repo
        .list_movies_by_genre("NonexistentGenre")
        .unwrap()
        .is_empty());
}

#[test]
fn add_movie_populates_id_and_persists_fields() {
    let (_dir, provider) = fixture_store();
    let repo = SqliteMovieRepository::new(&provider);

    let movie = Movie {
        id: None,
        title: "The Test Movie".to_string(),
        release_date: Some(date(2024, 3, 15)),
        genre: Genre::with_id(1, "Drama"),
        duration: Some(135),
        director: "Test Director".to_string(),
        summary: Some("A dramatic test movie".to_string()),
    };

    let saved = repo.add_movie(movie.clone()).unwrap();
    let id = saved.id.expect("generated id should be populated");
    assert_eq!(Movie { id: None, ..saved.clone() }, movie);

    let conn = raw_connection(&provider);
    let mut stmt = conn
        .prepare("SELECT title, director, summary, duration, genre_id FROM movie WHERE idmovie = ?1;")
        .unwrap();
    let mut rows = stmt.query(params![id]).unwrap();
    let row = rows.next().unwrap().expect("inserted row should exist");
    assert_eq!(row.get::<_, String>(0).unwrap(), "The Test Movie");
    assert_eq!(row.get::<_, String>(1).unwrap(), "Test Director");
    assert_eq!(row.get::<_, String>(2).unwrap(), "A dramatic test movie");
    assert_eq!(row.get::<_, i32>(3).unwrap(), 135);
    assert_eq!(row.get::<_, i64>(4).unwrap(), 1);
    assert!(rows.next().unwrap().is_none());

    assert_eq!(repo.get_movie(id).unwrap(), Some(saved));
}

#[test]
fn add_movie_keeps_optional_fields_empty() {
    let (_dir, provider) = fixture_store();
    let repo = SqliteMovieRepository::new(&provider);

    let saved = repo
        .add_movie(Movie::new("Untitled", Genre::with_id(2, "Comedy"), "Nobody"))
        .unwrap();

    let loaded = repo.get_movie(saved.id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded.release_date, None);
    assert_eq!(loaded.duration, None);
    assert_eq!(loaded.summary, None);
    assert_eq!(loaded, saved);
}

#[test]
fn add_movie_with_unknown_genre_violates_foreign_key() {
    let (_dir, provider) = fixture_store();
    let repo = SqliteMovieRepository::new(&provider);

    let err = repo
        .add_movie(Movie::new("Orphan", Genre::with_id(99, "Missing"), "Nobody"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataAccess);
    assert!(matches!(err, RepoError::Sql { operation: "add_movie", .. }));
    assert_eq!(repo.list_movies().unwrap().len(), 3);
}

#[test]
fn add_movie_rejects_values_that_cannot_be_inserted() {
    let (_dir, provider) = fixture_store();
    let repo = SqliteMovieRepository::new(&provider);

    let mut already_saved = Movie::new("Again", Genre::with_id(1, "Drama"), "Someone");
    already_saved.id = Some(1);
    let err = repo.add_movie(already_saved).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::IdAlreadyAssigned(1))
    ));

    let err = repo
        .add_movie(Movie::new("Loose", Genre::new("Unsaved"), "Someone"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn movies_without_matching_genre_are_skipped() {
    let (_dir, provider) = fixture_store();
    raw_connection(&provider)
        .execute(
            "INSERT INTO movie (title, genre_id, director) VALUES ('Dangling', 42, 'someone');",
            [],
        )
        .unwrap();

    let repo = SqliteMovieRepository::new(&provider);
    let movies = repo.list_movies().unwrap();
    assert_eq!(movies.len(), 3);
    assert!(!titles(&movies).contains("Dangling"));
}

#[test]
fn epoch_millis_and_null_release_dates_are_read() {
    let (_dir, provider) = fixture_store();
    let conn = raw_connection(&provider);
    // 2024-03-15T12:00:00Z
    conn.execute(
        "INSERT INTO movie (idmovie, title, release_date, genre_id, director)
         VALUES (10, 'Millis', ?1, 1, 'someone');",
        params![1_710_504_000_000_i64],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO movie (idmovie, title, release_date, genre_id, director)
         VALUES (11, 'Undated', NULL, 1, 'someone');",
        [],
    )
    .unwrap();
    drop(conn);

    let repo = SqliteMovieRepository::new(&provider);
    assert_eq!(
        repo.get_movie(10).unwrap().unwrap().release_date,
        Some(date(2024, 3, 15))
    );
    assert_eq!(repo.get_movie(11).unwrap().unwrap().release_date, None);
}

#[test]
fn unreadable_release_date_is_invalid_data() {
    let (_dir, provider) = fixture_store();
    raw_connection(&provider)
        .execute(
            "INSERT INTO movie (title, release_date, genre_id, director)
             VALUES ('Broken', 'private screening notes', 1, 'someone');",
            [],
        )
        .unwrap();

    let err = SqliteMovieRepository::new(&provider)
        .list_movies()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataAccess);
    assert!(matches!(err, RepoError::InvalidData(_)));
    assert!(!err.to_string().contains("private screening notes"));
    assert!(!format!("{err:?}").contains("private screening notes"));
}

#[test]
fn ignored_insert_reports_no_rows_affected() {
    let (_dir, provider) = fixture_store();
    raw_connection(&provider)
        .execute_batch(
            "CREATE TRIGGER skip_movie_insert BEFORE INSERT ON movie
             BEGIN SELECT RAISE(IGNORE); END;",
        )
        .unwrap();
    let repo = SqliteMovieRepository::new(&provider);

    let err = repo
        .add_movie(Movie::new("Ignored", Genre::with_id(1, "Drama"), "Nobody"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NoRowsAffected {
            operation: "add_movie"
        }
    ));
    assert_eq!(err.kind(), ErrorKind::DataAccess);
    assert_eq!(repo.list_movies().unwrap().len(), 3);
}

#[test]
fn inserted_movies_are_listed_once_each() {
    let (_dir, provider) = fixture_store();
    let genres = SqliteGenreRepository::new(&provider);
    let movies = SqliteMovieRepository::new(&provider);

    let horror = genres.add_genre("Horror").unwrap();
    let mut expected = movies.list_movies().unwrap();
    for index in 0..4 {
        let mut movie = Movie::new(format!("Horror {index}"), horror.clone(), "director");
        movie.duration = Some(90 + index);
        expected.push(movies.add_movie(movie).unwrap());
    }

    assert_eq!(movies.list_movies().unwrap(), expected);
    assert_eq!(movies.list_movies_by_genre("Horror").unwrap(), expected[3..].to_vec());
}
