//! Core domain types for the movie catalog.
//!
//! Key Rust concepts demonstrated here:
//! - Structs with public fields for plain value records
//! - `HashMap` keyed by an owned `String` for O(1) exact-match lookups
//! - Borrowing: lookups hand out `&Movie`, never a copy

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::seed;

// =============================================================================
// Movie
// =============================================================================

/// A single movie record.
///
/// The name doubles as the lookup key; there is no other identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Movie {
    pub name: String,
    pub year: i32,
    pub country: String,
    pub genre: String,
    pub director: String,
}

impl Movie {
    pub fn new(
        name: impl Into<String>,
        year: i32,
        country: impl Into<String>,
        genre: impl Into<String>,
        director: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            year,
            country: country.into(),
            genre: genre.into(),
            director: director.into(),
        }
    }
}

// =============================================================================
// MovieRepository - The In-Memory Table
// =============================================================================

/// Owns the movie table and answers name lookups.
///
/// The table is filled once (see [`MovieRepository::seeded`]) and is read-only
/// afterwards, so a repository wrapped in an `Arc` can be read from any number
/// of request handlers without locking.
#[derive(Debug, Clone, Default)]
pub struct MovieRepository {
    movies: HashMap<String, Movie>,
}

impl MovieRepository {
    /// Creates a new, empty repository
    pub fn new() -> Self {
        Self {
            movies: HashMap::new(),
        }
    }

    /// Creates a repository that already holds every seed record.
    ///
    /// This is the constructor services should use: the returned value is
    /// complete before anyone can hold a reference to it.
    pub fn seeded() -> Self {
        let mut repository = Self::new();
        repository.initialize();
        repository
    }

    /// Populate the table with the fixed seed records.
    ///
    /// Running it again re-inserts the same records under the same keys,
    /// leaving the table unchanged.
    pub fn initialize(&mut self) {
        for movie in seed::seed_movies() {
            self.insert_movie(movie);
        }
        debug!("Movie table initialized with {} records", self.movies.len());
    }

    /// Look up a movie by its exact, case-sensitive name.
    ///
    /// Returns:
    /// - `Err(CatalogError::MissingName)` if `name` is absent
    /// - `Ok(Some(&movie))` if an entry matches
    /// - `Ok(None)` if no entry matches
    pub fn find_movie(&self, name: Option<&str>) -> Result<Option<&Movie>> {
        let name = name.ok_or(CatalogError::MissingName)?;
        Ok(self.movies.get(name))
    }

    /// Number of movies in the table
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// All movie names, sorted alphabetically
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.movies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    // Keyed by the movie's own name so the table can never hold a record
    // under someone else's key.
    fn insert_movie(&mut self, movie: Movie) {
        self.movies.insert(movie.name.clone(), movie);
    }
}
