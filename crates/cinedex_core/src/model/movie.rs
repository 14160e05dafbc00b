//! Movie entity.
//!
//! # Invariants
//! - `genre.id` must be set before a movie can be inserted.
//! - `id` stays `None` until the store assigns it.

use super::genre::{Genre, GenreId};
use super::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store-generated row id of `movie.idmovie`.
pub type MovieId = i64;

/// Catalog entry with its genre hydrated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Option<MovieId>,
    pub title: String,
    /// Calendar date only; any stored time-of-day is dropped on read.
    pub release_date: Option<NaiveDate>,
    pub genre: Genre,
    /// Running time in minutes.
    pub duration: Option<i32>,
    pub director: String,
    pub summary: Option<String>,
}

impl Movie {
    /// Creates an unsaved movie with optional fields left empty.
    pub fn new(title: impl Into<String>, genre: Genre, director: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            release_date: None,
            genre,
            duration: None,
            director: director.into(),
            summary: None,
        }
    }

    /// Checks that this value can be written as a new row and returns the
    /// genre key the row will reference.
    pub fn validate_for_insert(&self) -> Result<GenreId, ValidationError> {
        if let Some(id) = self.id {
            return Err(ValidationError::IdAlreadyAssigned(id));
        }
        self.genre.id.ok_or(ValidationError::MissingGenreId)
    }
}
