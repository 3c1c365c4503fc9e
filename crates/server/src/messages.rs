//! Payload types of the get-movie web service and their XML mapping.

use catalog::Movie;
use soap::{Element, SoapError, SoapResult};

/// Target namespace of the service's payload elements.
pub const NAMESPACE_URI: &str = "http://pheely.io/get-movie-web-service";

pub const GET_MOVIE_REQUEST: &str = "getMovieRequest";
pub const GET_MOVIE_RESPONSE: &str = "getMovieResponse";

/// Request payload: the name to look up.
///
/// `name` is `None` when the request carried no `name` element at all, or
/// one marked `xsi:nil="true"`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetMovieRequest {
    pub name: Option<String>,
}

impl GetMovieRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn from_element(element: &Element) -> SoapResult<Self> {
        Ok(Self {
            name: element
                .child("name")
                .filter(|name| !name.nil)
                .map(|name| name.text.clone()),
        })
    }

    pub fn to_element(&self) -> Element {
        let element = Element::new(NAMESPACE_URI, GET_MOVIE_REQUEST);
        match &self.name {
            Some(name) => element.with_text_child("name", name.as_str()),
            None => element,
        }
    }
}

/// Response payload: the movie, or nothing when the name matched no entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetMovieResponse {
    pub movie: Option<Movie>,
}

impl GetMovieResponse {
    pub fn to_element(&self) -> Element {
        let element = Element::new(NAMESPACE_URI, GET_MOVIE_RESPONSE);
        match &self.movie {
            Some(movie) => element.with_child(movie_element(movie)),
            None => element,
        }
    }

    pub fn from_element(element: &Element) -> SoapResult<Self> {
        let movie = element.child("movie").map(parse_movie).transpose()?;
        Ok(Self { movie })
    }
}

fn movie_element(movie: &Movie) -> Element {
    Element::new(NAMESPACE_URI, "movie")
        .with_text_child("name", movie.name.as_str())
        .with_text_child("year", movie.year.to_string())
        .with_text_child("country", movie.country.as_str())
        .with_text_child("genre", movie.genre.as_str())
        .with_text_child("director", movie.director.as_str())
}

fn parse_movie(element: &Element) -> SoapResult<Movie> {
    let field = |name: &str| -> SoapResult<String> {
        element
            .child(name)
            .map(|child| child.text.clone())
            .ok_or_else(|| SoapError::MissingElement {
                payload: element.name.clone(),
                element: name.to_string(),
            })
    };

    let year = field("year")?;
    let year = year.trim().parse::<i32>().map_err(|_| SoapError::InvalidValue {
        field: "year".to_string(),
        value: year.clone(),
    })?;

    Ok(Movie {
        name: field("name")?,
        year,
        country: field("country")?,
        genre: field("genre")?,
        director: field("director")?,
    })
}
