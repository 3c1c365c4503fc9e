//! Server crate for the movie lookup web service.
//!
//! This crate wires the catalog to the outside world:
//! - **messages**: request/response payloads and their XML mapping
//! - **endpoint**: `MovieEndpoint`, which answers `getMovieRequest`
//! - **router**: explicit `(namespace, local part)` → handler table
//! - **dispatcher**: envelope in, envelope (or fault) out
//! - **http**: axum binding of the dispatcher
//! - **config** / **server**: configuration and the listening service

pub mod config;
pub mod dispatcher;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod messages;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use dispatcher::{DispatchOutcome, MessageDispatcher};
pub use endpoint::MovieEndpoint;
pub use error::{ServerError, ServerResult};
pub use messages::{GetMovieRequest, GetMovieResponse, NAMESPACE_URI};
pub use router::{EndpointRouter, Handler};
pub use server::{MovieServer, movie_dispatcher};
