//! Genre entity.

use serde::{Deserialize, Serialize};

/// Store-generated row id of `genre.idgenre`.
pub type GenreId = i64;

/// Named category referenced by movies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: Option<GenreId>,
    pub name: String,
}

impl Genre {
    /// Creates a genre value that has not been stored yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Creates a value for an already persisted genre row.
    pub fn with_id(id: GenreId, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }
}
