use thiserror::Error;

use crate::domain::collection::Collection;
use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Storage backend failures.
///
/// Every adapter maps its native errors into these variants so the store and
/// the mirrored strategy can reason about them without knowing the backend.
#[derive(Error, Debug, Clone)]
pub enum PersistenceError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    /// The backend could not be reached (transport failure or server error).
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered and refused the request.
    #[error("request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("record encoding error: {0}")]
    Encoding(String),
}

impl PersistenceError {
    /// Whether a fallback backend may be tried instead of surfacing the error.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Connection(_))
    }
}

impl From<reqwest::Error> for PersistenceError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if status.is_client_error() => Self::Rejected {
                status: status.as_u16(),
                body: err.to_string(),
            },
            _ if err.is_decode() => Self::Encoding(err.to_string()),
            _ => Self::Unavailable(err.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error("{collection} record not found: {id}")]
    NotFound { collection: Collection, id: String },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn not_found(collection: Collection, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection,
            id: id.into(),
        }
    }

    /// Whether the error is a rejected input rather than an infrastructure failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
