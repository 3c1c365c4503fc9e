//! Error types for the catalog crate.
//!
//! The catalog answers "not found" with `Ok(None)`, so the only failure a
//! caller can see is a violated lookup precondition.

use thiserror::Error;

/// Errors that can occur while querying the movie catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The lookup key was absent (a request arrived without a name)
    #[error("The movie's name must not be null")]
    MissingName,
}

/// Convenience type alias for Results in this crate
///
/// Instead of writing `Result<T, CatalogError>` everywhere,
/// we can write `Result<T>`
pub type Result<T> = std::result::Result<T, CatalogError>;
