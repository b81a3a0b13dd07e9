//! Error types for the arXiv watcher.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Each layer has its own enum; [`WatchError`] ties them together for a whole run.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors from the page fetch layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Search endpoint answered 429
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Wait time suggested by the server
        retry_after: Duration,
    },

    /// Search endpoint answered 404
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// HTTP status carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::RateLimited { .. } => Some(429),
            Self::NotFound { .. } => Some(404),
            Self::Server { status, .. } | Self::UnexpectedStatus { status, .. } => Some(*status),
        }
    }
}

/// Errors from the persisted seen-set.
#[derive(thiserror::Error, Debug)]
pub enum StateError {
    /// The state file exists but does not hold a JSON array of strings.
    #[error("Seen-set file {path} is corrupt: {source}")]
    Corrupt {
        /// Path of the offending file
        path: PathBuf,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },

    /// The state file exists but could not be read.
    #[error("Failed to read seen-set file {path}: {source}")]
    Read {
        /// Path of the file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The state file (or its directory) could not be written.
    #[error("Failed to write seen-set file {path}: {source}")]
    Write {
        /// Path of the file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Another run holds the lock on this state.
    #[error("Seen-set {path} is locked by another run")]
    Locked {
        /// Path of the lock file
        path: PathBuf,
    },
}

impl StateError {
    /// Create a corrupt-state error.
    #[must_use]
    pub fn corrupt(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Self::Corrupt { path: path.as_ref().to_path_buf(), source }
    }

    /// Create a read error.
    #[must_use]
    pub fn read(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Read { path: path.as_ref().to_path_buf(), source }
    }

    /// Create a write error.
    #[must_use]
    pub fn write(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Write { path: path.as_ref().to_path_buf(), source }
    }

    /// Returns true if persisted state exists but cannot be trusted.
    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// Configuration errors, raised before any state is touched.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// No usable search terms after trimming and dropping blanks.
    #[error("No search terms configured (all terms were blank)")]
    EmptyTerms,

    /// The search endpoint is not a valid absolute URL.
    #[error("Invalid search URL '{url}': {source}")]
    InvalidUrl {
        /// The rejected value
        url: String,
        /// Parser error
        #[source]
        source: url::ParseError,
    },
}

/// Errors that abort a watcher run.
#[derive(thiserror::Error, Debug)]
pub enum WatchError {
    /// Bad configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Persisted state could not be loaded, locked or saved
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// The page fetch failed
    #[error("Fetch error: {0}")]
    Transport(#[from] ClientError),
}

impl WatchError {
    /// Returns true if the run stopped because persisted state is corrupt.
    #[must_use]
    pub const fn is_corrupt_state(&self) -> bool {
        matches!(self, Self::State(StateError::Corrupt { .. }))
    }

    /// Convert to a short message suitable for the command line.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::State(StateError::Corrupt { path, .. }) => format!(
                "Seen-set file {} is corrupt. Fix or remove it before the next run.",
                path.display()
            ),
            Self::State(StateError::Locked { path }) => format!(
                "Another run is in progress (lock held on {}).",
                path.display()
            ),
            Self::Transport(ClientError::RateLimited { retry_after }) => {
                format!("Rate limited by arXiv. Please wait {:?} before retrying.", retry_after)
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias for fetch operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for seen-set operations.
pub type StateResult<T> = Result<T, StateError>;

/// Result type alias for a whole run.
pub type WatchResult<T> = Result<T, WatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<Vec<String>>("{").unwrap_err()
    }

    #[test]
    fn test_client_error_status() {
        assert_eq!(ClientError::rate_limited(30).status(), Some(429));
        assert_eq!(ClientError::not_found("page").status(), Some(404));
        assert_eq!(ClientError::server(503, "down").status(), Some(503));
    }

    #[test]
    fn test_state_error_corrupt_is_distinct() {
        let corrupt = StateError::corrupt("seen.json", json_error());
        assert!(corrupt.is_corrupt());

        let locked = StateError::Locked { path: PathBuf::from("seen.json.lock") };
        assert!(!locked.is_corrupt());
    }

    #[test]
    fn test_watch_error_user_message() {
        let err = WatchError::from(StateError::corrupt(".cache/seen.json", json_error()));
        assert!(err.is_corrupt_state());
        assert!(err.to_user_message().contains(".cache/seen.json"));

        let err = WatchError::from(ConfigError::EmptyTerms);
        assert!(!err.is_corrupt_state());
        assert!(err.to_user_message().contains("No search terms"));
    }
}
