//! Spotify Web API client.
//!
//! Catalog search runs with an application token obtained through the
//! client-credentials grant. Player commands need the user's own token,
//! passed in as a [`UserSession`].

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::json;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::error::SpotifyError;
use super::models::{CurrentlyPlayingResponse, NowPlaying, SearchResponse, Track};
use crate::core::config::SpotifyConfig;
use crate::domains::auth::{AccessToken, TokenResponse, UserSession};

/// Upstream streaming capability used by the playback adapter.
#[async_trait]
pub trait StreamingClient: Send + Sync {
    /// Best-ranked track matching `query`, if any.
    async fn search_track(&self, query: &str) -> Result<Option<Track>, SpotifyError>;

    /// Start playing `uri` on the user's active device.
    async fn start_playback(&self, session: &UserSession, uri: &str) -> Result<(), SpotifyError>;

    async fn pause(&self, session: &UserSession) -> Result<(), SpotifyError>;

    async fn resume(&self, session: &UserSession) -> Result<(), SpotifyError>;

    async fn next_track(&self, session: &UserSession) -> Result<(), SpotifyError>;

    async fn previous_track(&self, session: &UserSession) -> Result<(), SpotifyError>;

    /// What the user's player holds right now; `None` when idle.
    async fn current_playback(
        &self,
        session: &UserSession,
    ) -> Result<Option<NowPlaying>, SpotifyError>;
}

/// `reqwest`-backed Spotify Web API client.
pub struct SpotifyClient {
    http: Client,
    api_base: String,
    accounts_base: String,
    client_id: String,
    client_secret: String,

    /// Cached client-credentials token.
    app_token: RwLock<Option<AccessToken>>,
}

impl SpotifyClient {
    /// Create a client from the Spotify configuration.
    pub fn new(config: &SpotifyConfig) -> Result<Self, SpotifyError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("spotify-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            accounts_base: config.accounts_base.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            app_token: RwLock::new(None),
        })
    }

    /// A valid application token, fetching a new one when needed.
    async fn app_token(&self) -> Result<String, SpotifyError> {
        if let Some(token) = self.app_token.read().await.as_ref().filter(|t| t.is_valid()) {
            return Ok(token.access_token.clone());
        }

        let mut cached = self.app_token.write().await;
        // Another task may have refreshed it while we waited for the lock.
        if let Some(token) = cached.as_ref().filter(|t| t.is_valid()) {
            return Ok(token.access_token.clone());
        }

        info!("Requesting client-credentials token");
        let response = self
            .execute(
                self.http
                    .post(format!("{}/api/token", self.accounts_base))
                    .basic_auth(&self.client_id, Some(&self.client_secret))
                    .form(&[("grant_type", "client_credentials")]),
            )
            .await?;

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SpotifyError::InvalidResponse(e.to_string()))?;
        let token = AccessToken::from_response(token, Utc::now());
        let access_token = token.access_token.clone();
        *cached = Some(token);

        Ok(access_token)
    }

    /// Send a request and turn non-success statuses into errors.
    async fn execute(&self, request: RequestBuilder) -> Result<Response, SpotifyError> {
        let response = request.send().await?;
        let status = response.status();
        debug!("Spotify answered {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Spotify error ({}): {}", status.as_u16(), body);
        Err(SpotifyError::from_status(status.as_u16(), &body))
    }

    /// Issue a player command that answers with no content.
    async fn player_command(
        &self,
        request: RequestBuilder,
        session: &UserSession,
    ) -> Result<(), SpotifyError> {
        self.execute(request.bearer_auth(session.bearer())).await?;
        Ok(())
    }

    fn player_url(&self, endpoint: &str) -> String {
        format!("{}/me/player/{}", self.api_base, endpoint)
    }
}

#[async_trait]
impl StreamingClient for SpotifyClient {
    #[instrument(skip(self))]
    async fn search_track(&self, query: &str) -> Result<Option<Track>, SpotifyError> {
        let token = self.app_token().await?;

        let response = match self
            .execute(
                self.http
                    .get(format!("{}/search", self.api_base))
                    .bearer_auth(token)
                    .query(&[("q", query), ("type", "track"), ("limit", "1")]),
            )
            .await
        {
            Err(SpotifyError::Unauthorized(message)) => {
                warn!("Application token rejected, dropping it");
                *self.app_token.write().await = None;
                return Err(SpotifyError::Unauthorized(message));
            }
            other => other?,
        };

        let results: SearchResponse = response
            .json()
            .await
            .map_err(|e| SpotifyError::InvalidResponse(e.to_string()))?;

        Ok(results
            .tracks
            .and_then(|page| page.items.into_iter().next())
            .map(Track::from))
    }

    #[instrument(skip(self, session))]
    async fn start_playback(&self, session: &UserSession, uri: &str) -> Result<(), SpotifyError> {
        self.player_command(
            self.http
                .put(self.player_url("play"))
                .json(&json!({ "uris": [uri] })),
            session,
        )
        .await
    }

    async fn pause(&self, session: &UserSession) -> Result<(), SpotifyError> {
        self.player_command(self.http.put(self.player_url("pause")).body(""), session)
            .await
    }

    async fn resume(&self, session: &UserSession) -> Result<(), SpotifyError> {
        self.player_command(self.http.put(self.player_url("play")).body(""), session)
            .await
    }

    async fn next_track(&self, session: &UserSession) -> Result<(), SpotifyError> {
        self.player_command(self.http.post(self.player_url("next")).body(""), session)
            .await
    }

    async fn previous_track(&self, session: &UserSession) -> Result<(), SpotifyError> {
        self.player_command(
            self.http.post(self.player_url("previous")).body(""),
            session,
        )
        .await
    }

    async fn current_playback(
        &self,
        session: &UserSession,
    ) -> Result<Option<NowPlaying>, SpotifyError> {
        let response = self
            .execute(
                self.http
                    .get(self.player_url("currently-playing"))
                    .bearer_auth(session.bearer()),
            )
            .await?;

        // 204: no active device or nothing loaded.
        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let current: CurrentlyPlayingResponse = response
            .json()
            .await
            .map_err(|e| SpotifyError::InvalidResponse(e.to_string()))?;

        Ok(current.into_now_playing())
    }
}
