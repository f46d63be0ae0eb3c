// src/error.rs

//! Unified error handling for the ingestion application.

use std::fmt;

use thiserror::Error;

/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// SQLite statement or transaction failed
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// CSV reading or writing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Fetching a package record from the provider failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A provider record could not be normalized
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Identifier input error
    #[error("Input error: {0}")]
    Input(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an identifier input error.
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }
}

/// Failure of a single fetch attempt against the provider.
///
/// Carries the identifier it was issued for so that one failed fetch can be
/// reported and skipped without touching its siblings.
#[derive(Error, Debug)]
#[error("fetch failed for package {id}: {kind}")]
pub struct FetchError {
    /// Identifier the request was issued for.
    pub id: u32,
    /// What went wrong, by layer.
    pub kind: FetchErrorKind,
}

impl FetchError {
    pub fn new(id: u32, kind: FetchErrorKind) -> Self {
        Self { id, kind }
    }
}

/// Classification of a fetch failure.
#[derive(Debug)]
pub enum FetchErrorKind {
    /// Transport-level failure (DNS, timeout, reset); no HTTP status.
    Connection(reqwest::Error),
    /// Provider answered with a 4xx status.
    BadRequest(u16),
    /// Provider answered with a 5xx status.
    ServerError(u16),
    /// 2xx answer whose body carries no payload for the identifier.
    EmptyResponse,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchErrorKind::Connection(e) => write!(f, "connection error: {e}"),
            FetchErrorKind::BadRequest(status) => write!(f, "bad request (HTTP {status})"),
            FetchErrorKind::ServerError(status) => write!(f, "server error (HTTP {status})"),
            FetchErrorKind::EmptyResponse => write!(f, "empty response"),
        }
    }
}

/// A successful provider record that is missing a structurally required
/// field and therefore cannot be turned into a `Package`.
#[derive(Error, Debug)]
#[error("package {id}: missing required field `{field}`")]
pub struct NormalizationError {
    /// Identifier of the record that failed to normalize.
    pub id: u32,
    /// Name of the absent field.
    pub field: &'static str,
}

impl NormalizationError {
    pub fn missing(id: u32, field: &'static str) -> Self {
        Self { id, field }
    }
}
