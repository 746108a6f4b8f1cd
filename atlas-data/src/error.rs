//! Error types for Atlas Data API operations
//!
//! The Data API surfaces three kinds of failure that callers must be able to
//! tell apart:
//!
//! - **Authentication** - credentials missing or malformed, or the API answered 401/403.
//!   Never retryable.
//! - **Rate limit** - the API answered 429. Carries the number of seconds to
//!   wait before reissuing the call. Always retryable.
//! - **MongoDB API** - any other non-2xx answer. Carries the HTTP status and a
//!   best-effort message taken from the response body.
//!
//! Transport and decoding failures are kept as separate variants so that the
//! three kinds above stay exact.
//!
//! # Example
//!
//! ```rust
//! use atlas_data::error::{AtlasError, ErrorKind};
//!
//! let err = AtlasError::RateLimit { retry_after: 120 };
//! assert_eq!(err.kind(), ErrorKind::RateLimit);
//! assert!(err.is_retryable());
//! assert_eq!(err.retry_after(), Some(120));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Atlas Data API operations
pub type Result<T> = std::result::Result<T, AtlasError>;

/// Fixed message for 401/403 answers
pub const AUTHENTICATION_FAILED_MESSAGE: &str =
    "Authentication failed. Please check your API key and App ID.";

/// Error kind visible to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Credentials missing or rejected (401/403)
    Authentication,
    /// Too many requests (429)
    RateLimit,
    /// Any other non-2xx answer from the Data API
    MongodbApi,
    /// The request never produced an HTTP answer
    Transport,
    /// A 2xx answer whose body could not be decoded
    InvalidResponse,
}

impl ErrorKind {
    /// Stable snake_case name, identical to the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Authentication => "authentication",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::MongodbApi => "mongodb_api",
            ErrorKind::Transport => "transport",
            ErrorKind::InvalidResponse => "invalid_response",
        }
    }
}

/// Errors that can occur while talking to the Atlas Data API
#[derive(Error, Debug)]
pub enum AtlasError {
    /// The API rejected the credentials (401/403)
    #[error("{message}")]
    Authentication { message: String },

    /// A mandatory credential value was empty or absent
    #[error("Missing required credential: {name}")]
    MissingCredential { name: &'static str },

    /// A credential value that cannot be sent as an HTTP header
    #[error("Invalid credential: {name} contains characters not allowed in an HTTP header")]
    InvalidCredential { name: &'static str },

    /// The API answered 429
    #[error("Rate limit exceeded. Retry after {retry_after} seconds.")]
    RateLimit { retry_after: u64 },

    /// Any other non-2xx answer
    #[error("{message}")]
    MongoDbApi { status: u16, message: String },

    /// Connection, DNS or TLS failure before an answer arrived
    #[error("Request to MongoDB Atlas Data API failed: {0}")]
    Transport(String),

    /// A 2xx answer that does not match the expected result shape
    #[error("Invalid response from MongoDB Atlas Data API: {reason}")]
    InvalidResponse { reason: String },

    /// JSON encoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AtlasError {
    /// Authentication error carrying the fixed 401/403 message
    pub fn authentication_failed() -> Self {
        AtlasError::Authentication {
            message: AUTHENTICATION_FAILED_MESSAGE.to_string(),
        }
    }

    /// Returns the caller-visible error kind
    ///
    /// Missing credentials are reported as [`ErrorKind::Authentication`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            AtlasError::Authentication { .. }
            | AtlasError::MissingCredential { .. }
            | AtlasError::InvalidCredential { .. } => ErrorKind::Authentication,
            AtlasError::RateLimit { .. } => ErrorKind::RateLimit,
            AtlasError::MongoDbApi { .. } => ErrorKind::MongodbApi,
            AtlasError::Transport(_) => ErrorKind::Transport,
            AtlasError::InvalidResponse { .. } | AtlasError::Json(_) => ErrorKind::InvalidResponse,
        }
    }

    /// Returns the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AtlasError::Authentication { .. } => "AUTHENTICATION_ERROR",
            AtlasError::MissingCredential { .. } => "MISSING_CREDENTIAL",
            AtlasError::InvalidCredential { .. } => "INVALID_CREDENTIAL",
            AtlasError::RateLimit { .. } => "RATE_LIMIT_ERROR",
            AtlasError::MongoDbApi { .. } => "MONGODB_API_ERROR",
            AtlasError::Transport(_) => "TRANSPORT_ERROR",
            AtlasError::InvalidResponse { .. } => "INVALID_RESPONSE",
            AtlasError::Json(_) => "JSON_ERROR",
        }
    }

    /// Returns true if reissuing the same call might succeed
    ///
    /// This is a hint for the caller. The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            AtlasError::RateLimit { .. } | AtlasError::Transport(_) => true,
            AtlasError::MongoDbApi { status, .. } => *status == 408 || *status >= 500,
            _ => false,
        }
    }

    /// HTTP status that produced this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            AtlasError::MongoDbApi { status, .. } => Some(*status),
            AtlasError::RateLimit { .. } => Some(429),
            _ => None,
        }
    }

    /// Seconds to wait before retrying, for rate limit errors
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            AtlasError::RateLimit { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AtlasError {
    fn from(err: reqwest::Error) -> Self {
        AtlasError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            AtlasError::authentication_failed().kind(),
            ErrorKind::Authentication
        );
        assert_eq!(
            AtlasError::MissingCredential { name: "apiKey" }.kind(),
            ErrorKind::Authentication
        );
        assert_eq!(
            AtlasError::InvalidCredential { name: "apiKey" }.kind(),
            ErrorKind::Authentication
        );
        assert_eq!(
            AtlasError::RateLimit { retry_after: 60 }.kind(),
            ErrorKind::RateLimit
        );
        assert_eq!(
            AtlasError::MongoDbApi {
                status: 404,
                message: "not found".to_string()
            }
            .kind(),
            ErrorKind::MongodbApi
        );
    }

    #[test]
    fn test_retryable() {
        assert!(AtlasError::RateLimit { retry_after: 1 }.is_retryable());
        assert!(!AtlasError::authentication_failed().is_retryable());
        assert!(!AtlasError::MissingCredential { name: "appId" }.is_retryable());
        assert!(!AtlasError::InvalidCredential { name: "apiKey" }.is_retryable());
        assert!(AtlasError::MongoDbApi {
            status: 503,
            message: "unavailable".to_string()
        }
        .is_retryable());
        assert!(!AtlasError::MongoDbApi {
            status: 400,
            message: "bad request".to_string()
        }
        .is_retryable());
        assert!(AtlasError::Transport("connection refused".to_string()).is_retryable());
    }

    #[test]
    fn test_status_and_retry_after() {
        let err = AtlasError::RateLimit { retry_after: 120 };
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.retry_after(), Some(120));

        let err = AtlasError::MongoDbApi {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.retry_after(), None);
        assert_eq!(AtlasError::authentication_failed().status(), None);
    }

    #[test]
    fn test_messages() {
        let err = AtlasError::authentication_failed();
        assert!(err.to_string().contains("API key"));
        assert!(err.to_string().contains("App ID"));

        let err = AtlasError::MissingCredential { name: "dataSource" };
        assert_eq!(err.to_string(), "Missing required credential: dataSource");

        let err = AtlasError::MongoDbApi {
            status: 404,
            message: "MongoDB API error: 404".to_string(),
        };
        assert_eq!(err.to_string(), "MongoDB API error: 404");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AtlasError::RateLimit { retry_after: 60 }.error_code(),
            "RATE_LIMIT_ERROR"
        );
        assert_eq!(
            AtlasError::authentication_failed().error_code(),
            "AUTHENTICATION_ERROR"
        );
        assert_eq!(ErrorKind::MongodbApi.as_str(), "mongodb_api");
    }
}
