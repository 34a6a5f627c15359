//! Playback error types.

use serde_json::Value;
use thiserror::Error;

/// Errors raised by the Spotify Web API client.
#[derive(Debug, Error)]
pub enum SpotifyError {
    /// Transport-level failure (DNS, TLS, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The access token was rejected.
    #[error("Spotify rejected the credentials: {0}")]
    Unauthorized(String),

    /// Too many requests.
    #[error("Spotify rate limit exceeded, please try again later")]
    RateLimited,

    /// Any other non-success answer.
    #[error("Spotify API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The body could not be understood.
    #[error("Invalid response from Spotify: {0}")]
    InvalidResponse(String),
}

impl SpotifyError {
    /// Build an error from a non-success status and its body.
    ///
    /// Understands both the Web API envelope
    /// (`{"error":{"status":..,"message":..}}`) and the accounts service one
    /// (`{"error":"..","error_description":".."}`).
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = error_message(body).unwrap_or_else(|| body.trim().to_string());

        match status {
            401 => Self::Unauthorized(message),
            429 => Self::RateLimited,
            _ => Self::Api { status, message },
        }
    }
}

fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        Value::Object(error) => error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        Value::String(code) => Some(
            value
                .get("error_description")
                .and_then(Value::as_str)
                .unwrap_or(code)
                .to_string(),
        ),
        _ => None,
    }
}

/// Normalized failure surfaced by the upstream adapter.
///
/// Carries only the upstream message text.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("{0}")]
    Upstream(String),
}

impl AdapterError {
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }
}

impl From<SpotifyError> for AdapterError {
    fn from(e: SpotifyError) -> Self {
        Self::Upstream(e.to_string())
    }
}
