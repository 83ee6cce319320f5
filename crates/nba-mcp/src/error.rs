//! Error types for the MCP server

use thiserror::Error;

use crate::protocol::{INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND};

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during MCP server operations
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown tool requested
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A tool argument is missing or malformed
    #[error("Invalid parameter '{param}': {reason}")]
    InvalidParams { param: String, reason: String },

    /// The upstream API answered with a non-success status
    #[error("Upstream request to {url} failed with status {status}: {body}")]
    UpstreamStatus {
        status: u16,
        url: String,
        body: String,
    },

    /// HTTP transport failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid server configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Shorthand for [`Error::InvalidParams`].
    pub fn invalid_params(param: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            param: param.into(),
            reason: reason.into(),
        }
    }

    /// JSON-RPC error code reported to the client for this error.
    pub fn rpc_code(&self) -> i32 {
        match self {
            Self::UnknownTool(_) => METHOD_NOT_FOUND,
            Self::InvalidParams { .. } => INVALID_PARAMS,
            _ => INTERNAL_ERROR,
        }
    }
}
