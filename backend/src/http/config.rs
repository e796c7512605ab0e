//! Listener configuration for the HTTP server.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tokio::net::TcpListener;

use crate::db::config::parse_port;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8000;
/// Default listen host (all interfaces).
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Load a `.env` file into the process environment.
///
/// With `None` the file is searched for from the working directory upwards.
/// Variables already present in the environment are left alone. Returns the
/// file that was applied, or `None` when there is no file to load.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    match loaded {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(anyhow!("failed to load .env: {}", e)),
    }
}

/// Where the server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Read `HOST` and `PORT`, falling back to the defaults when unset.
    ///
    /// A `PORT` that is set but not a valid port number is an error.
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST")
            .ok()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match env::var("PORT") {
            Ok(raw) => parse_port(&raw).map_err(|e| anyhow!("PORT: {}", e))?,
            Err(_) => DEFAULT_PORT,
        };
        Ok(Self { host, port })
    }

    /// Open the listening socket. `host` may be a name such as `localhost`;
    /// it is resolved and the first address that binds wins.
    pub async fn bind(&self) -> Result<TcpListener> {
        TcpListener::bind((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("cannot listen on {}:{}", self.host, self.port))
    }
}
