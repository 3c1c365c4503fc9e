//! # Catalog Crate
//!
//! This crate owns the movie table served by the lookup service.
//!
//! ## Main Components
//!
//! - **types**: The `Movie` record and the `MovieRepository` table
//! - **seed**: The fixed records loaded at startup
//! - **error**: Error types for lookups
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::MovieRepository;
//! use std::sync::Arc;
//!
//! // Build the table once, then share it read-only
//! let repository = Arc::new(MovieRepository::seeded());
//!
//! let titanic = repository.find_movie(Some("Titanic"))?;
//! assert_eq!(titanic.map(|m| m.year), Some(1997));
//! ```

// Public modules
pub mod error;
pub mod seed;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use types::{Movie, MovieRepository};

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_movie(repository: &MovieRepository, name: &str) -> Movie {
        repository
            .find_movie(Some(name))
            .unwrap()
            .cloned()
            .unwrap_or_else(|| panic!("{name} should be seeded"))
    }

    #[test]
    fn test_find_titanic() {
        let repository = MovieRepository::seeded();
        assert_eq!(
            expect_movie(&repository, "Titanic"),
            Movie::new("Titanic", 1997, "USA", "epic romance-disaster", "James Cameron")
        );
    }

    #[test]
    fn test_find_pearl_harbor() {
        let repository = MovieRepository::seeded();
        assert_eq!(
            expect_movie(&repository, "Pearl Harbor"),
            Movie::new(
                "Pearl Harbor",
                2001,
                "USA",
                "romantic period war drama",
                "Michael Bay"
            )
        );
    }

    #[test]
    fn test_find_spectre() {
        let repository = MovieRepository::seeded();
        assert_eq!(
            expect_movie(&repository, "Spectre"),
            Movie::new("Spectre", 2015, "USA", "spy", "Sam Mendes")
        );
    }

    #[test]
    fn test_unknown_movie_is_none() {
        let repository = MovieRepository::seeded();
        assert!(repository.find_movie(Some("Inception")).unwrap().is_none());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let repository = MovieRepository::seeded();
        assert!(repository.find_movie(Some("titanic")).unwrap().is_none());
        assert!(repository.find_movie(Some("TITANIC")).unwrap().is_none());
        assert!(repository.find_movie(Some(" Titanic")).unwrap().is_none());
    }

    #[test]
    fn test_repeated_lookups_are_idempotent() {
        let repository = MovieRepository::seeded();
        let first = repository.find_movie(Some("Spectre")).unwrap().cloned();
        for _ in 0..10 {
            assert_eq!(repository.find_movie(Some("Spectre")).unwrap().cloned(), first);
        }
        assert_eq!(repository.len(), 3);
    }

    #[test]
    fn test_concurrent_lookups_share_one_table() {
        use std::sync::Arc;
        use std::thread;

        let repository = Arc::new(MovieRepository::seeded());
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let repository = Arc::clone(&repository);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        let titanic = repository.find_movie(Some("Titanic")).unwrap();
                        assert_eq!(titanic.map(|movie| movie.year), Some(1997));
                        assert!(repository.find_movie(Some("Inception")).unwrap().is_none());
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(repository.len(), 3);
    }
}
