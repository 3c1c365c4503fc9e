use anyhow::{anyhow, Context, Result};
use catalog::{Movie, MovieRepository};
use clap::{Parser, Subcommand};
use colored::Colorize;
use server::{movie_dispatcher, DispatchOutcome, GetMovieRequest, MovieServer, ServerConfig};
use soap::Envelope;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Movie lookup web service
#[derive(Parser)]
#[command(name = "movie-service")]
#[command(about = "SOAP web service answering movie lookups by name", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the SOAP service over HTTP
    Serve {
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address to listen on (overrides the configuration file)
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Path SOAP requests are posted to (overrides the configuration file)
        #[arg(long)]
        path: Option<String>,
    },

    /// Look up a movie without starting the server
    Lookup {
        /// Exact, case-sensitive movie name
        name: String,

        /// Print the SOAP response envelope instead of the record
        #[arg(long)]
        envelope: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // The table is complete before anything can read it
    let repository = Arc::new(MovieRepository::seeded());
    info!("Loaded {} movies", repository.len());

    match cli.command {
        Commands::Serve { config, bind, path } => {
            handle_serve(repository, config, bind, path).await?
        }
        Commands::Lookup { name, envelope } => {
            if envelope {
                handle_lookup_envelope(repository, &name)?
            } else {
                handle_lookup(&repository, &name)?
            }
        }
    }

    Ok(())
}

/// Handle the 'serve' command
async fn handle_serve(
    repository: Arc<MovieRepository>,
    config_path: Option<PathBuf>,
    bind: Option<SocketAddr>,
    path: Option<String>,
) -> Result<()> {
    let mut config = match &config_path {
        Some(file) => ServerConfig::load(file)
            .with_context(|| format!("Failed to load configuration from {}", file.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = bind {
        config.bind_addr = bind;
    }
    if let Some(path) = path {
        config.service_path = path;
    }
    config.validate().context("Invalid configuration")?;

    MovieServer::new(config, repository)
        .serve()
        .await
        .context("Movie service failed")
}

/// Handle the 'lookup' command
fn handle_lookup(repository: &MovieRepository, name: &str) -> Result<()> {
    match repository.find_movie(Some(name))? {
        Some(movie) => print_movie(movie),
        None => {
            println!("{} No movie named '{}'", "✗".red(), name);
            println!("Known movies: {}", repository.names().join(", "));
        }
    }
    Ok(())
}

/// Handle 'lookup --envelope': run the request through the dispatcher
fn handle_lookup_envelope(repository: Arc<MovieRepository>, name: &str) -> Result<()> {
    let request = Envelope::new(GetMovieRequest::new(name).to_element())
        .encode()
        .context("Failed to encode request")?;

    match movie_dispatcher(repository).dispatch(&request) {
        DispatchOutcome::Response(xml) => {
            println!("{xml}");
            Ok(())
        }
        DispatchOutcome::Fault(fault) => {
            println!("{}", fault.encode().context("Failed to encode fault")?);
            Err(anyhow!("Request failed with fault {}", fault))
        }
        DispatchOutcome::NoEndpoint(root) => Err(anyhow!("No endpoint mapping found for {}", root)),
    }
}

fn print_movie(movie: &Movie) {
    println!("{}", movie.name.bold().blue());
    println!("{}Year: {}", "• ".green(), movie.year);
    println!("{}Country: {}", "• ".green(), movie.country);
    println!("{}Genre: {}", "• ".green(), movie.genre);
    println!("{}Director: {}", "• ".green(), movie.director);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_lookup_with_spaces() {
        let cli =
            Cli::try_parse_from(["movie-service", "lookup", "Pearl Harbor", "--envelope"]).unwrap();
        match cli.command {
            Commands::Lookup { name, envelope } => {
                assert_eq!(name, "Pearl Harbor");
                assert!(envelope);
            }
            _ => panic!("expected lookup"),
        }
    }

    #[test]
    fn parses_serve_overrides() {
        let cli =
            Cli::try_parse_from(["movie-service", "serve", "--bind", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Commands::Serve { bind, config, path } => {
                assert_eq!(bind, Some("0.0.0.0:9000".parse().unwrap()));
                assert!(config.is_none());
                assert!(path.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn envelope_lookup_succeeds_for_unknown_movie() {
        let repository = Arc::new(MovieRepository::seeded());
        assert!(handle_lookup_envelope(repository, "Inception").is_ok());
    }
}
