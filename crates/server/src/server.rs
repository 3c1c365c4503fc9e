use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use catalog::MovieRepository;

use crate::config::ServerConfig;
use crate::dispatcher::MessageDispatcher;
use crate::endpoint::MovieEndpoint;
use crate::error::ServerResult;
use crate::http::{AppState, build_router};
use crate::router::EndpointRouter;

/// Build the dispatcher with every endpoint of the service registered.
pub fn movie_dispatcher(repository: Arc<MovieRepository>) -> MessageDispatcher {
    let router = MovieEndpoint::new(repository).register(EndpointRouter::new());
    MessageDispatcher::new(router)
}

/// The movie lookup web service.
pub struct MovieServer {
    config: ServerConfig,
    state: AppState,
}

impl MovieServer {
    pub fn new(config: ServerConfig, repository: Arc<MovieRepository>) -> Self {
        let dispatcher = Arc::new(movie_dispatcher(repository.clone()));
        Self {
            config,
            state: AppState {
                dispatcher,
                repository,
            },
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone(), &self.config.service_path)
    }

    /// Serve requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        self.config.validate()?;
        let app = self.router();
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        info!(
            "Movie service listening on http://{}{}",
            listener.local_addr()?,
            self.config.service_path
        );
        for root in self.state.dispatcher.router().routes() {
            info!(%root, "Mapped endpoint");
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("Movie service stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        // Without a signal handler, run until the process is killed.
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_construction() {
        let server = MovieServer::new(ServerConfig::default(), Arc::new(MovieRepository::seeded()));
        assert_eq!(server.config().service_path, "/ws");
    }

    #[test]
    fn dispatcher_maps_get_movie() {
        let dispatcher = movie_dispatcher(Arc::new(MovieRepository::seeded()));
        assert_eq!(dispatcher.router().routes(), vec![&MovieEndpoint::payload_root()]);
    }

    #[tokio::test]
    async fn router_builds() {
        let server = MovieServer::new(ServerConfig::default(), Arc::new(MovieRepository::seeded()));
        let _router = server.router();
    }
}
