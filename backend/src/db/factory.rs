//! Choosing and opening the storage backend.
//!
//! Selection happens in two steps. A [`RepositorySelection`] is resolved from
//! `repository.toml` or from the environment, then [`RepositoryFactory::open`]
//! turns it into the shared handle that the HTTP state carries.

use log::{info, warn};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::config::PostgresConfig;
use super::repo_config::RepositoryConfig;
#[cfg(feature = "local-repo")]
use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::PostgresRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};

/// Storage backend kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// PostgreSQL through Diesel
    Postgres,
    /// In-process memory
    Local,
}

impl RepositoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Local => "local",
        }
    }

    /// Backend named by the environment.
    ///
    /// `REPOSITORY_TYPE` wins when set, and an unknown value is an error.
    /// Otherwise the presence of `DATABASE_URL` or `POSTGRES_HOST` selects
    /// Postgres.
    pub fn from_env() -> Result<Self, String> {
        if let Ok(named) = std::env::var("REPOSITORY_TYPE") {
            return named.parse();
        }

        let has_connection = std::env::var_os("DATABASE_URL").is_some()
            || std::env::var_os("POSTGRES_HOST").is_some();
        if has_connection {
            Ok(Self::Postgres)
        } else {
            Ok(Self::Local)
        }
    }
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Accepts `postgres`, `postgresql`, `pg`, `local` and `memory`, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl fmt::Display for RepositoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved backend choice, ready to be opened.
#[derive(Debug, Clone)]
pub struct RepositorySelection {
    pub kind: RepositoryType,
    /// Connection settings; present whenever `kind` is Postgres.
    pub postgres: Option<PostgresConfig>,
}

impl RepositorySelection {
    pub fn local() -> Self {
        Self {
            kind: RepositoryType::Local,
            postgres: None,
        }
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self {
            kind: RepositoryType::Postgres,
            postgres: Some(config),
        }
    }

    /// Resolve from environment variables only.
    pub fn from_env() -> RepositoryResult<Self> {
        let kind = RepositoryType::from_env().map_err(|e| {
            RepositoryError::configuration(format!("REPOSITORY_TYPE: {}", e))
        })?;
        match kind {
            RepositoryType::Local => Ok(Self::local()),
            RepositoryType::Postgres => PostgresConfig::from_env()
                .map(Self::postgres)
                .map_err(RepositoryError::configuration),
        }
    }

    /// Resolve from a parsed `repository.toml`.
    pub fn from_config(config: &RepositoryConfig) -> RepositoryResult<Self> {
        match config.to_postgres_config()? {
            Some(pg) => Ok(Self::postgres(pg)),
            None => Ok(Self::local()),
        }
    }

    /// Resolve the way the server does at startup: a config file if one can
    /// be located, the environment otherwise.
    pub fn discover() -> RepositoryResult<Self> {
        let selection = match RepositoryConfig::locate() {
            Some(path) => {
                info!("Loading repository configuration from {}", path.display());
                Self::from_config(&RepositoryConfig::from_file(&path)?)?
            }
            None => Self::from_env()?,
        };
        if selection.kind == RepositoryType::Local {
            warn!("Using the in-memory repository; data is lost on restart");
        }
        info!("Selected {} repository", selection.kind);
        Ok(selection)
    }
}

/// Opens repositories.
///
/// # Example
/// ```ignore
/// use crm_backend::db::{RepositoryFactory, RepositorySelection};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let repo = RepositoryFactory::open(RepositorySelection::discover()?).await?;
///     assert!(repo.health_check().await?);
///     Ok(())
/// }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Open the backend described by `selection`.
    pub async fn open(selection: RepositorySelection) -> RepositoryResult<Arc<dyn FullRepository>> {
        match selection.kind {
            RepositoryType::Local => Self::open_local(),
            RepositoryType::Postgres => {
                let config = selection.postgres.ok_or_else(|| {
                    RepositoryError::configuration("Postgres repository requires PostgresConfig")
                })?;
                Self::open_postgres(config).await
            }
        }
    }

    /// Open a backend of the given kind; `postgres_config` is required for Postgres.
    pub async fn create(
        kind: RepositoryType,
        postgres_config: Option<&PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        Self::open(RepositorySelection {
            kind,
            postgres: postgres_config.cloned(),
        })
        .await
    }

    /// Open a Postgres repository.
    ///
    /// Building the pool connects eagerly, so it runs on the blocking pool.
    #[cfg(feature = "postgres-repo")]
    pub async fn create_postgres(
        config: &PostgresConfig,
    ) -> RepositoryResult<Arc<PostgresRepository>> {
        let config = config.clone();
        let repo = tokio::task::spawn_blocking(move || PostgresRepository::new(&config))
            .await
            .map_err(|e| RepositoryError::internal(format!("Task join error: {}", e)))??;
        Ok(Arc::new(repo))
    }

    #[cfg(feature = "postgres-repo")]
    async fn open_postgres(config: PostgresConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo: Arc<dyn FullRepository> = Self::create_postgres(&config).await?;
        Ok(repo)
    }

    #[cfg(not(feature = "postgres-repo"))]
    async fn open_postgres(_config: PostgresConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        Err(RepositoryError::configuration(
            "Postgres repository feature not enabled",
        ))
    }

    /// A fresh, empty in-memory repository.
    #[cfg(feature = "local-repo")]
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    #[cfg(feature = "local-repo")]
    fn open_local() -> RepositoryResult<Arc<dyn FullRepository>> {
        Ok(Self::create_local())
    }

    #[cfg(not(feature = "local-repo"))]
    fn open_local() -> RepositoryResult<Arc<dyn FullRepository>> {
        Err(RepositoryError::configuration(
            "Local repository feature not enabled",
        ))
    }

    /// Open the backend chosen by the environment.
    pub async fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        Self::open(RepositorySelection::from_env()?).await
    }

    /// Open the backend described by a TOML file.
    pub async fn from_config_file<P: AsRef<Path>>(
        path: P,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let config = RepositoryConfig::from_file(path)?;
        Self::open(RepositorySelection::from_config(&config)?).await
    }

    /// Open the backend the server would use. See [`RepositorySelection::discover`].
    pub async fn discover() -> RepositoryResult<Arc<dyn FullRepository>> {
        Self::open(RepositorySelection::discover()?).await
    }
}
