//! Catalog entity values.
//!
//! # Responsibility
//! - Define `Genre` and `Movie` as plain owned values shared by all layers.
//! - Validate values before they are written.
//!
//! # Invariants
//! - Identifiers are store-generated: `None` before insert, `Some` after.
//! - A `Movie` embeds its fully hydrated `Genre`; the genre id is the
//!   persisted foreign key.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod genre;
pub mod movie;

/// Reasons a value is rejected before reaching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The value already carries an identifier; only the store assigns them.
    IdAlreadyAssigned(i64),
    /// The movie's genre has not been persisted, so there is no key to link.
    MissingGenreId,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdAlreadyAssigned(id) => {
                write!(f, "identifier {id} is already assigned; ids are store-generated")
            }
            Self::MissingGenreId => write!(f, "movie genre has no persisted identifier"),
        }
    }
}

impl Error for ValidationError {}
