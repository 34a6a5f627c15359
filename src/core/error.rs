//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type that can represent errors from
//! all domains and external dependencies, providing consistent error handling
//! across the entire application.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
///
/// Dispatch errors normally never reach this type: the call router turns
/// them into structured responses. They appear here only when a caller
/// needs to propagate one.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the dispatch domain.
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] crate::domains::dispatch::DispatchError),

    /// Error originating from the auth domain.
    #[error("Auth error: {0}")]
    Auth(#[from] crate::domains::auth::AuthError),

    /// Error originating from the Spotify client.
    #[error("Spotify error: {0}")]
    Spotify(#[from] crate::domains::playback::SpotifyError),

    /// Transport startup or serving failure.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// Configuration-related errors. Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from file operations or network communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
