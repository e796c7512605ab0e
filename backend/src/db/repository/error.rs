//! Error types for repository operations.
//!
//! A [`RepositoryError`] pairs an [`ErrorKind`] with the raw message and an
//! [`ErrorContext`] saying where it happened. The full error is for server
//! logs; [`RepositoryError::public_summary`] is what a caller may see.

use std::fmt;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Pool checkout or connection failure.
    Connection,
    /// A statement was rejected or failed while running.
    Query,
    /// Requested entity was not found.
    NotFound,
    /// Input rejected before any statement was issued.
    Validation,
    /// Bad or missing configuration.
    Configuration,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// Label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Connection => "Connection error",
            Self::Query => "Query error",
            Self::NotFound => "Not found",
            Self::Validation => "Validation error",
            Self::Configuration => "Configuration error",
            Self::Internal => "Internal error",
        }
    }

    /// Wording safe to show to API callers.
    fn public_label(&self) -> &'static str {
        match self {
            Self::Connection => "database unavailable",
            Self::Query => "database query failed",
            Self::NotFound => "record not found",
            Self::Validation => "invalid input",
            Self::Configuration => "server misconfigured",
            Self::Internal => "internal error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a repository error happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Operation name, e.g. `create_customer`
    pub operation: Option<String>,
    /// Entity kind, e.g. `customer`
    pub entity: Option<String>,
    pub entity_id: Option<String>,
    /// Driver specifics such as constraint names
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.operation.is_none()
            && self.entity.is_none()
            && self.entity_id.is_none()
            && self.details.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("operation", &self.operation),
            ("entity", &self.entity),
            ("id", &self.entity_id),
            ("details", &self.details),
        ];
        let rendered: Vec<String> = fields
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| format!("{}={}", name, v)))
            .collect();
        write!(f, "[{}]", rendered.join(", "))
    }
}

/// Error type for repository operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {message} {context}")]
pub struct RepositoryError {
    kind: ErrorKind,
    message: String,
    context: ErrorContext,
}

impl RepositoryError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Connection, message)
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Query, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Raw message. May contain driver output; do not send to clients.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &ErrorContext {
        &self.context
    }

    /// Replace the whole context.
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = context;
        self
    }

    /// Set the operation, replacing any earlier one.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context.operation = Some(operation.into());
        self
    }

    /// Record which entity the failed operation targeted.
    pub fn with_entity(mut self, entity: impl Into<String>, id: impl ToString) -> Self {
        self.context.entity = Some(entity.into());
        self.context.entity_id = Some(id.to_string());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.context.details = Some(details.into());
        self
    }

    /// Whether the caller's input, not the storage backend, caused the failure.
    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::Validation
    }

    /// Caller-safe description of the failure.
    ///
    /// Validation messages are built from request fields and are returned as
    /// is. Every other kind collapses to its category, prefixed with the
    /// operation when known, e.g. `Failed to create customer: database query failed`.
    pub fn public_summary(&self) -> String {
        if self.is_validation() {
            return self.message.clone();
        }
        match self.context.operation {
            Some(ref op) => format!(
                "Failed to {}: {}",
                op.replace('_', " "),
                self.kind.public_label()
            ),
            None => self.kind.public_label().to_string(),
        }
    }
}

impl From<String> for RepositoryError {
    fn from(s: String) -> Self {
        RepositoryError::internal(s)
    }
}

impl From<&str> for RepositoryError {
    fn from(s: &str) -> Self {
        RepositoryError::internal(s)
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::Error as DieselError;

        match err {
            DieselError::NotFound => RepositoryError::not_found("Record not found"),
            DieselError::DatabaseError(kind, info) => {
                let details = match info.constraint_name() {
                    Some(constraint) => {
                        format!("db_error_kind={:?}, constraint={}", kind, constraint)
                    }
                    None => format!("db_error_kind={:?}", kind),
                };
                RepositoryError::query(info.message()).with_details(details)
            }
            DieselError::DeserializationError(e) | DieselError::SerializationError(e) => {
                RepositoryError::internal(format!("Row conversion error: {}", e))
            }
            other => RepositoryError::query(other.to_string()),
        }
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        RepositoryError::connection(err.to_string()).with_details("pool_error")
    }
}
