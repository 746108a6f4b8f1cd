//! Error types for Atlas MCP Server

use serde::{Deserialize, Serialize};
use thiserror::Error;

use atlas_data::AtlasError;

use crate::server::{INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR};

/// Result type for MCP operations
pub type McpResult<T> = Result<T, McpError>;

/// Errors that can occur while serving a tool call
#[derive(Error, Debug)]
pub enum McpError {
    /// Data API client error (authentication, rate limit, API error, ...)
    #[error(transparent)]
    Atlas(#[from] AtlasError),

    /// A caller argument could not be decoded or has the wrong shape
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    /// A required argument was absent or empty
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// No tool with this name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The connectivity probe reported no connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Structured diagnostics carried in a failure envelope's `details` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    /// Error kind (`authentication`, `rate_limit`, `mongodb_api`, `validation`, ...)
    pub kind: String,
    /// Stable error code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Whether reissuing the call might succeed
    pub retryable: bool,
    /// HTTP status from the Data API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Seconds to wait before retrying
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl McpError {
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        McpError::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error is marked retryable for the caller
    pub fn is_retryable(&self) -> bool {
        match self {
            McpError::Atlas(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Error kind name used in failure details
    pub fn kind(&self) -> &'static str {
        match self {
            McpError::Atlas(err) => err.kind().as_str(),
            McpError::InvalidArgument { .. } | McpError::MissingArgument(_) => "validation",
            McpError::UnknownTool(_) => "unknown_tool",
            McpError::ConnectionFailed(_) => "connection",
            McpError::Serialization(_) => "serialization",
        }
    }

    /// Stable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            McpError::Atlas(err) => err.error_code(),
            McpError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            McpError::MissingArgument(_) => "MISSING_ARGUMENT",
            McpError::UnknownTool(_) => "UNKNOWN_TOOL",
            McpError::ConnectionFailed(_) => "CONNECTION_FAILED",
            McpError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Structured details for the failure envelope
    pub fn details(&self) -> ErrorDetails {
        let (status, retry_after) = match self {
            McpError::Atlas(err) => (err.status(), err.retry_after()),
            _ => (None, None),
        };

        ErrorDetails {
            kind: self.kind().to_string(),
            code: self.error_code().to_string(),
            message: self.to_string(),
            retryable: self.is_retryable(),
            status,
            retry_after,
        }
    }

    /// Get error code for the JSON-RPC layer
    pub fn jsonrpc_code(&self) -> i32 {
        match self {
            McpError::InvalidArgument { .. } | McpError::MissingArgument(_) => INVALID_PARAMS,
            McpError::UnknownTool(_) => METHOD_NOT_FOUND,
            McpError::Serialization(_) => PARSE_ERROR,
            _ => INTERNAL_ERROR,
        }
    }
}
