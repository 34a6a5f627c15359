//! Access token model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tokens closer than this to expiry are treated as already expired.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Token endpoint response, shared by the authorization-code and
/// client-credentials grants.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    #[serde(default)]
    pub scope: Option<String>,

    /// Lifetime in seconds.
    pub expires_in: i64,

    #[serde(default)]
    pub refresh_token: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// A cached access credential.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl AccessToken {
    /// Build a token from a token endpoint response received at `now`.
    pub fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            scope: response.scope,
            refresh_token: response.refresh_token,
            expires_at: now + Duration::seconds(response.expires_in),
        }
    }

    /// Whether the token can still be used.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Whether the token can still be used at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty()
            && self.expires_at - Duration::seconds(EXPIRY_MARGIN_SECS) > now
    }
}

/// Bearer credential of an authenticated user, used for player calls.
#[derive(Clone, PartialEq, Eq)]
pub struct UserSession {
    access_token: String,
}

impl UserSession {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    /// The bearer token to send upstream.
    pub fn bearer(&self) -> &str {
        &self.access_token
    }
}

impl std::fmt::Debug for UserSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("UserSession([REDACTED])")
    }
}

impl From<&AccessToken> for UserSession {
    fn from(token: &AccessToken) -> Self {
        Self::new(token.access_token.clone())
    }
}
