//! OAuth authorization-code flow against the Spotify accounts service.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, instrument, warn};

use super::error::AuthError;
use super::token::{AccessToken, TokenResponse};
use crate::core::config::SpotifyConfig;

/// Capability to send a user to the provider's consent page and to turn
/// the returned one-time code into a token.
#[async_trait]
pub trait AuthorizationFlow: Send + Sync {
    /// Consent page URL carrying the given anti-forgery `state`.
    fn authorize_url(&self, state: &str) -> String;

    /// Exchange a one-time authorization code for a token.
    async fn exchange_code(&self, code: &str) -> Result<AccessToken, AuthError>;
}

/// Spotify implementation of [`AuthorizationFlow`].
pub struct SpotifyOAuth {
    http: Client,
    accounts_base: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scopes: String,
}

impl SpotifyOAuth {
    /// Create the flow from the Spotify configuration.
    pub fn new(config: &SpotifyConfig) -> Result<Self, AuthError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| AuthError::exchange_failed(e.to_string()))?;

        Ok(Self {
            http,
            accounts_base: config.accounts_base.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scopes: config.scopes.clone(),
        })
    }
}

#[async_trait]
impl AuthorizationFlow for SpotifyOAuth {
    fn authorize_url(&self, state: &str) -> String {
        let query = serde_urlencoded::to_string([
            ("client_id", self.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("scope", self.scopes.as_str()),
            ("state", state),
        ])
        .unwrap_or_default();

        format!("{}/authorize?{}", self.accounts_base, query)
    }

    #[instrument(skip_all)]
    async fn exchange_code(&self, code: &str) -> Result<AccessToken, AuthError> {
        info!("Exchanging authorization code");

        let response = self
            .http
            .post(format!("{}/api/token", self.accounts_base))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::exchange_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Token endpoint answered {}: {}", status, body);
            return Err(AuthError::exchange_failed(format!(
                "token endpoint answered {}: {}",
                status.as_u16(),
                body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::invalid_response(e.to_string()))?;

        Ok(AccessToken::from_response(token, Utc::now()))
    }
}
