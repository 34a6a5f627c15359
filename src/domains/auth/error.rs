//! Authentication error types.

use thiserror::Error;

/// Errors that can occur while authorizing against the streaming provider.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The one-time code could not be exchanged for a token.
    #[error("Authorization code exchange failed: {0}")]
    ExchangeFailed(String),

    /// The token could not be read from or written to the credential store.
    #[error("Credential store error: {0}")]
    Store(String),

    /// The accounts service answered with something that is not a token.
    #[error("Invalid token response: {0}")]
    InvalidResponse(String),

    /// The callback carried a state this server never issued, or one
    /// that was already used.
    #[error("Invalid or expired authorization state")]
    InvalidState,
}

impl AuthError {
    /// Create a new "exchange failed" error.
    pub fn exchange_failed(msg: impl Into<String>) -> Self {
        Self::ExchangeFailed(msg.into())
    }

    /// Create a new "store" error.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a new "invalid response" error.
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }
}
