//! Database connection settings and environment variable handling.

use std::env;
use std::fmt;

/// Default PostgreSQL port.
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Discrete PostgreSQL connection parameters.
///
/// Used when no `DATABASE_URL` is given; rendered into a libpq keyword/value
/// connection string so that passwords need no URL escaping.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Server hostname
    pub host: String,
    /// Role to connect as
    pub user: String,
    /// Password for the role
    pub password: String,
    /// Database name
    pub database: String,
    /// Server port (default: 5432)
    pub port: u16,
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `POSTGRES_HOST` (required): server hostname
    /// - `POSTGRES_USER` (optional, default: `postgres`)
    /// - `POSTGRES_PASSWORD` (optional, default: empty)
    /// - `POSTGRES_DATABASE` (optional, default: `postgres`)
    /// - `POSTGRES_PORT` (optional, default: 5432)
    ///
    /// # Errors
    /// Returns an error if `POSTGRES_HOST` is missing or the port is not a number.
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("POSTGRES_HOST")
            .map_err(|_| "POSTGRES_HOST environment variable not set".to_string())?;
        let user = env::var("POSTGRES_USER").unwrap_or_else(|_| "postgres".to_string());
        let password = env::var("POSTGRES_PASSWORD").unwrap_or_default();
        let database = env::var("POSTGRES_DATABASE").unwrap_or_else(|_| "postgres".to_string());
        let port = match env::var("POSTGRES_PORT") {
            Ok(raw) => parse_port(&raw)?,
            Err(_) => DEFAULT_POSTGRES_PORT,
        };

        Ok(Self {
            host,
            user,
            password,
            database,
            port,
        })
    }

    /// Render a libpq keyword/value connection string.
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            quote_value(&self.host),
            self.port,
            quote_value(&self.user),
            quote_value(&self.password),
            quote_value(&self.database),
        )
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("port", &self.port)
            .finish()
    }
}

/// Configuration for connecting to Postgres.
#[derive(Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    /// Database connection URL or libpq keyword/value string
    pub database_url: String,
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_URL`: Connection string, takes precedence when set
    /// - otherwise `POSTGRES_HOST`, `POSTGRES_USER`, `POSTGRES_PASSWORD`,
    ///   `POSTGRES_DATABASE`, `POSTGRES_PORT`
    pub fn from_env() -> Result<Self, String> {
        if let Ok(database_url) = std::env::var("DATABASE_URL") {
            if !database_url.trim().is_empty() {
                return Ok(Self::with_url(database_url));
            }
        }

        let db = DbConfig::from_env()
            .map_err(|e| format!("DATABASE_URL not set and {}", e))?;
        Ok(Self::from_db_config(&db))
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// Create a configuration from discrete connection parameters.
    pub fn from_db_config(db: &DbConfig) -> Self {
        Self::with_url(db.connection_string())
    }
}

impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Connection strings carry credentials.
        f.debug_struct("PostgresConfig")
            .field("database_url", &"<redacted>")
            .finish()
    }
}

/// Parse a TCP port, rejecting zero and non-numeric input.
pub fn parse_port(raw: &str) -> Result<u16, String> {
    match raw.trim().parse::<u16>() {
        Ok(0) | Err(_) => Err(format!("'{}' is not a valid port number", raw)),
        Ok(port) => Ok(port),
    }
}

// libpq: single-quote the value, backslash-escape quotes and backslashes.
fn quote_value(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}
