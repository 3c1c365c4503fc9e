use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Default path SOAP requests are posted to.
pub const DEFAULT_SERVICE_PATH: &str = "/ws";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub service_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            service_path: DEFAULT_SERVICE_PATH.to_string(),
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> ServerResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> ServerResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if !self.service_path.starts_with('/') {
            return Err(ServerError::Config(format!(
                "service_path must start with '/': {}",
                self.service_path
            )));
        }
        if self.service_path == crate::http::HEALTH_PATH {
            return Err(ServerError::Config(format!(
                "service_path collides with {}",
                crate::http::HEALTH_PATH
            )));
        }
        Ok(())
    }
}
