//! Error types for scenario sync
//!
//! Provides the error taxonomy of a sync run:
//! - Configuration failures (credentials, unreadable feature directory)
//! - Validation failures (duplicate issue keys)
//! - Remote failures (authentication, query, import)
//! - IO failures while reading scanned files

use crate::validation::DuplicateKeyError;
use std::path::PathBuf;

/// Invalid or missing configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable absent or empty
    #[error("environment variable {0} is required")]
    MissingVariable(&'static str),
}

/// Errors while discovering feature files
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Directory could not be listed
    #[error("unable to read feature directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Create unreadable-directory error for path
    pub fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryUnreadable {
            path: path.into(),
            source,
        }
    }
}

/// Failures talking to the remote catalog
///
/// Status codes and response bodies are carried verbatim.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Authentication rejected by the catalog
    #[error("authentication failed ({status}): {body}")]
    AuthenticationFailed { status: u16, body: String },

    /// Authentication succeeded but returned no token
    #[error("received an empty authentication token")]
    EmptyToken,

    /// Scenario query returned a non-success status
    #[error("scenario query failed ({status}): {body}")]
    QueryFailed { status: u16, body: String },

    /// Scenario query returned application-level errors
    #[error("scenario query reported errors: {0}")]
    QueryRejected(String),

    /// Feature import returned a non-success status
    #[error("failed to import {path} ({status}): {body}")]
    ImportFailed {
        path: PathBuf,
        status: u16,
        body: String,
    },

    /// Endpoint URL could not be built
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Response body could not be decoded
    #[error("invalid response from {operation}: {message}")]
    InvalidResponse {
        operation: &'static str,
        message: String,
    },

    /// Request never produced a response
    #[error("transport error during {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl RemoteError {
    /// Create transport error for operation
    pub fn transport(
        operation: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Transport {
            operation,
            source: source.into(),
        }
    }

    /// Create invalid response error for operation
    pub fn invalid_response(operation: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            operation,
            message: message.into(),
        }
    }
}

/// Error classification for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad settings or unreadable input location
    Configuration,
    /// Local scenario set is inconsistent
    Validation,
    /// Remote catalog failure
    Remote,
    /// Local file IO failure
    Io,
}

/// Main sync error type
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("validation error: {0}")]
    Validation(#[from] DuplicateKeyError),

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Classify the error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) | Self::Scan(_) => ErrorKind::Configuration,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Remote(_) => ErrorKind::Remote,
            Self::Io { .. } => ErrorKind::Io,
        }
    }
}

/// Result type alias for sync operations
pub type SyncResult<T> = Result<T, SyncError>;
