//! The fixed set of movies every repository starts with.

use crate::types::Movie;

/// Build the seed records.
pub fn seed_movies() -> Vec<Movie> {
    vec![
        Movie::new(
            "Titanic",
            1997,
            "USA",
            "epic romance-disaster",
            "James Cameron",
        ),
        Movie::new(
            "Pearl Harbor",
            2001,
            "USA",
            "romantic period war drama",
            "Michael Bay",
        ),
        Movie::new("Spectre", 2015, "USA", "spy", "Sam Mendes"),
    ]
}
