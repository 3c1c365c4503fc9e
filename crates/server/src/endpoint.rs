//! The get-movie endpoint.

use std::sync::Arc;

use catalog::MovieRepository;
use soap::PayloadRoot;
use tracing::debug;

use crate::error::ServerResult;
use crate::messages::{GET_MOVIE_REQUEST, GetMovieRequest, GetMovieResponse, NAMESPACE_URI};
use crate::router::EndpointRouter;

/// Adapts decoded requests to repository lookups.
#[derive(Debug, Clone)]
pub struct MovieEndpoint {
    repository: Arc<MovieRepository>,
}

impl MovieEndpoint {
    pub fn new(repository: Arc<MovieRepository>) -> Self {
        Self { repository }
    }

    /// The payload root this endpoint answers
    pub fn payload_root() -> PayloadRoot {
        PayloadRoot::new(NAMESPACE_URI, GET_MOVIE_REQUEST)
    }

    /// Look up the requested movie.
    ///
    /// A name that matches nothing still yields a response, with no movie in
    /// it. Only a request without a name is an error.
    pub fn get_movie(&self, request: GetMovieRequest) -> ServerResult<GetMovieResponse> {
        let movie = self.repository.find_movie(request.name.as_deref())?.cloned();
        debug!(
            name = request.name.as_deref().unwrap_or_default(),
            found = movie.is_some(),
            "getMovie"
        );
        Ok(GetMovieResponse { movie })
    }

    /// Add this endpoint's route to `router`.
    pub fn register(self, router: EndpointRouter) -> EndpointRouter {
        router.route(Self::payload_root(), move |payload| {
            let request = GetMovieRequest::from_element(payload)?;
            Ok(self.get_movie(request)?.to_element())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServerError;
    use catalog::{CatalogError, Movie};
    use soap::Element;

    fn endpoint() -> MovieEndpoint {
        MovieEndpoint::new(Arc::new(MovieRepository::seeded()))
    }

    #[test]
    fn get_movie_returns_seeded_record() {
        let response = endpoint().get_movie(GetMovieRequest::new("Pearl Harbor")).unwrap();
        assert_eq!(
            response.movie,
            Some(Movie::new(
                "Pearl Harbor",
                2001,
                "USA",
                "romantic period war drama",
                "Michael Bay"
            ))
        );
    }

    #[test]
    fn get_movie_unknown_name_is_empty_response() {
        let response = endpoint().get_movie(GetMovieRequest::new("Inception")).unwrap();
        assert_eq!(response, GetMovieResponse::default());
    }

    #[test]
    fn get_movie_without_name_fails() {
        let err = endpoint().get_movie(GetMovieRequest::default()).unwrap_err();
        assert!(matches!(err, ServerError::Catalog(CatalogError::MissingName)));
    }

    #[test]
    fn registered_route_handles_payload() {
        let router = endpoint().register(EndpointRouter::new());
        let handler = router.resolve(&MovieEndpoint::payload_root()).unwrap();

        let response = handler(&GetMovieRequest::new("Spectre").to_element()).unwrap();
        let movie = response.child("movie").unwrap();
        assert_eq!(movie.child("director").unwrap().text, "Sam Mendes");
    }

    #[test]
    fn registered_route_rejects_nameless_payload() {
        let router = endpoint().register(EndpointRouter::new());
        let handler = router.resolve(&MovieEndpoint::payload_root()).unwrap();

        let payload = Element::new(NAMESPACE_URI, GET_MOVIE_REQUEST);
        assert!(handler(&payload).is_err());
    }
}
