//! Upstream Adapter.
//!
//! Translates a validated resource call into exactly one upstream
//! operation (or none, for acknowledgments without a user session) and
//! maps the result into an [`Outcome`].

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::client::StreamingClient;
use super::error::AdapterError;
use crate::domains::auth::{CredentialGate, UserSession};
use crate::domains::resources::ResourceKind;

const PAUSED: &str = "Reproducción pausada";
const RESUMED: &str = "Reproducción iniciada";
const NEXT: &str = "Siguiente canción";
const PREVIOUS: &str = "Canción anterior";
const NOTHING_PLAYING: &str = "No se está reproduciendo nada en este momento.";

/// Result of a successful upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The operation produced a result.
    Completed {
        message: String,
        track_uri: Option<String>,
    },

    /// The operation ran but found nothing (e.g. an empty search).
    NothingFound { message: String },
}

impl Outcome {
    pub fn completed(message: impl Into<String>) -> Self {
        Self::Completed {
            message: message.into(),
            track_uri: None,
        }
    }
}

/// Executes the handler variant of a resource.
///
/// Parameters arrive already validated for presence.
#[async_trait]
pub trait ResourceExecutor: Send + Sync {
    async fn execute(
        &self,
        kind: ResourceKind,
        parameters: &Map<String, Value>,
    ) -> Result<Outcome, AdapterError>;
}

/// Spotify-backed executor.
pub struct PlaybackAdapter {
    client: Arc<dyn StreamingClient>,
    gate: Option<Arc<CredentialGate>>,
}

impl PlaybackAdapter {
    /// Adapter without a user session: searches only, controls are no-ops.
    pub fn new(client: Arc<dyn StreamingClient>) -> Self {
        Self { client, gate: None }
    }

    /// Use the gate's cached user credential for player calls.
    pub fn with_gate(mut self, gate: Arc<CredentialGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    async fn session(&self) -> Option<UserSession> {
        match &self.gate {
            Some(gate) => gate.user_session().await,
            None => None,
        }
    }

    async fn play_song(&self, query: &str) -> Result<Outcome, AdapterError> {
        let Some(track) = self.client.search_track(query).await? else {
            info!("No match for '{}'", query);
            return Ok(Outcome::NothingFound {
                message: format!("No se encontró nada para '{}'", query),
            });
        };

        if let Some(session) = self.session().await {
            self.client.start_playback(&session, &track.uri).await?;
            info!("Playback started: {}", track.uri);
        }

        Ok(Outcome::Completed {
            message: format!(
                "Listo para reproducir: {} - {}",
                track.name,
                track.primary_artist()
            ),
            track_uri: Some(track.uri),
        })
    }

    async fn control(&self, kind: ResourceKind, message: &str) -> Result<Outcome, AdapterError> {
        let Some(session) = self.session().await else {
            debug!("No user session, acknowledging {:?} without a player call", kind);
            return Ok(Outcome::completed(message));
        };

        match kind {
            ResourceKind::PausePlayback => self.client.pause(&session).await?,
            ResourceKind::ResumePlayback => self.client.resume(&session).await?,
            ResourceKind::NextTrack => self.client.next_track(&session).await?,
            ResourceKind::PreviousTrack => self.client.previous_track(&session).await?,
            other => {
                return Err(AdapterError::upstream(format!(
                    "{:?} is not a playback control",
                    other
                )));
            }
        }

        Ok(Outcome::completed(message))
    }

    async fn current_song(&self) -> Result<Outcome, AdapterError> {
        let Some(session) = self.session().await else {
            return Ok(Outcome::completed(NOTHING_PLAYING));
        };

        let message = match self.client.current_playback(&session).await? {
            Some(now) if now.is_playing => {
                format!("{} por {}", now.track.name, now.track.primary_artist())
            }
            _ => NOTHING_PLAYING.to_string(),
        };

        Ok(Outcome::completed(message))
    }
}

#[async_trait]
impl ResourceExecutor for PlaybackAdapter {
    #[instrument(skip(self, parameters))]
    async fn execute(
        &self,
        kind: ResourceKind,
        parameters: &Map<String, Value>,
    ) -> Result<Outcome, AdapterError> {
        match kind {
            ResourceKind::PlaySong => {
                let query = parameters.get("query").map(text_value).unwrap_or_default();
                self.play_song(&query).await
            }
            ResourceKind::PausePlayback => self.control(kind, PAUSED).await,
            ResourceKind::ResumePlayback => self.control(kind, RESUMED).await,
            ResourceKind::NextTrack => self.control(kind, NEXT).await,
            ResourceKind::PreviousTrack => self.control(kind, PREVIOUS).await,
            ResourceKind::GetCurrentSong => self.current_song().await,
        }
    }
}

/// Declared types are advisory: non-string values are used as their JSON text.
fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::{
        AccessToken, AuthError, AuthorizationFlow, MemoryCredentialStore,
    };
    use crate::domains::playback::{NowPlaying, SpotifyError, Track};
    use chrono::{Duration, Utc};
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every upstream call.
    #[derive(Default)]
    struct StubClient {
        track: Option<Track>,
        now_playing: Option<NowPlaying>,
        fail_with: Option<u16>,
        calls: Mutex<Vec<String>>,
    }

    impl StubClient {
        fn record(&self, call: impl Into<String>) -> Result<(), SpotifyError> {
            self.calls.lock().unwrap().push(call.into());
            match self.fail_with {
                Some(status) => Err(SpotifyError::from_status(
                    status,
                    r#"{"error":{"status":404,"message":"No active device found"}}"#,
                )),
                None => Ok(()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StreamingClient for StubClient {
        async fn search_track(&self, query: &str) -> Result<Option<Track>, SpotifyError> {
            self.record(format!("search:{}", query))?;
            Ok(self.track.clone())
        }

        async fn start_playback(&self, _: &UserSession, uri: &str) -> Result<(), SpotifyError> {
            self.record(format!("play:{}", uri))
        }

        async fn pause(&self, _: &UserSession) -> Result<(), SpotifyError> {
            self.record("pause")
        }

        async fn resume(&self, _: &UserSession) -> Result<(), SpotifyError> {
            self.record("resume")
        }

        async fn next_track(&self, _: &UserSession) -> Result<(), SpotifyError> {
            self.record("next")
        }

        async fn previous_track(&self, _: &UserSession) -> Result<(), SpotifyError> {
            self.record("previous")
        }

        async fn current_playback(
            &self,
            _: &UserSession,
        ) -> Result<Option<NowPlaying>, SpotifyError> {
            self.record("current")?;
            Ok(self.now_playing.clone())
        }
    }

    struct NoFlow;

    #[async_trait]
    impl AuthorizationFlow for NoFlow {
        fn authorize_url(&self, _state: &str) -> String {
            String::new()
        }

        async fn exchange_code(&self, _code: &str) -> Result<AccessToken, AuthError> {
            Err(AuthError::exchange_failed("unused"))
        }
    }

    fn logged_in_gate() -> Arc<CredentialGate> {
        let store = MemoryCredentialStore::with_token(AccessToken {
            access_token: "user-token".to_string(),
            token_type: "Bearer".to_string(),
            scope: None,
            refresh_token: None,
            expires_at: Utc::now() + Duration::hours(1),
        });
        Arc::new(CredentialGate::new(Arc::new(store), Arc::new(NoFlow)))
    }

    fn imagine() -> Track {
        Track::new(
            "Imagine",
            "spotify:track:abc123",
            vec!["John Lennon".to_string()],
        )
    }

    fn query(q: &str) -> Map<String, Value> {
        json!({ "query": q }).as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_play_song_found_without_session() {
        let client = Arc::new(StubClient {
            track: Some(imagine()),
            ..Default::default()
        });
        let adapter = PlaybackAdapter::new(client.clone());

        let outcome = adapter
            .execute(ResourceKind::PlaySong, &query("Imagine"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Completed {
                message: "Listo para reproducir: Imagine - John Lennon".to_string(),
                track_uri: Some("spotify:track:abc123".to_string()),
            }
        );
        assert_eq!(client.calls(), vec!["search:Imagine"]);
    }

    #[tokio::test]
    async fn test_play_song_starts_playback_with_session() {
        let client = Arc::new(StubClient {
            track: Some(imagine()),
            ..Default::default()
        });
        let adapter = PlaybackAdapter::new(client.clone()).with_gate(logged_in_gate());

        adapter
            .execute(ResourceKind::PlaySong, &query("Imagine"))
            .await
            .unwrap();

        assert_eq!(
            client.calls(),
            vec!["search:Imagine", "play:spotify:track:abc123"]
        );
    }

    #[tokio::test]
    async fn test_play_song_not_found() {
        let adapter = PlaybackAdapter::new(Arc::new(StubClient::default()));

        let outcome = adapter
            .execute(ResourceKind::PlaySong, &query("zzzzznonexistent"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::NothingFound {
                message: "No se encontró nada para 'zzzzznonexistent'".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_controls_are_noops_without_session() {
        let client = Arc::new(StubClient::default());
        let adapter = PlaybackAdapter::new(client.clone());

        let outcome = adapter
            .execute(ResourceKind::PausePlayback, &Map::new())
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::completed("Reproducción pausada"));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_controls_call_player_with_session() {
        let client = Arc::new(StubClient::default());
        let adapter = PlaybackAdapter::new(client.clone()).with_gate(logged_in_gate());

        let expected = [
            (ResourceKind::PausePlayback, "Reproducción pausada"),
            (ResourceKind::ResumePlayback, "Reproducción iniciada"),
            (ResourceKind::NextTrack, "Siguiente canción"),
            (ResourceKind::PreviousTrack, "Canción anterior"),
        ];
        for (kind, message) in expected {
            let outcome = adapter.execute(kind, &Map::new()).await.unwrap();
            assert_eq!(outcome, Outcome::completed(message));
        }

        assert_eq!(client.calls(), vec!["pause", "resume", "next", "previous"]);
    }

    #[tokio::test]
    async fn test_current_song_playing() {
        let client = Arc::new(StubClient {
            now_playing: Some(NowPlaying {
                track: imagine(),
                is_playing: true,
            }),
            ..Default::default()
        });
        let adapter = PlaybackAdapter::new(client).with_gate(logged_in_gate());

        let outcome = adapter
            .execute(ResourceKind::GetCurrentSong, &Map::new())
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::completed("Imagine por John Lennon"));
    }

    #[tokio::test]
    async fn test_current_song_paused_is_nothing_playing() {
        let client = Arc::new(StubClient {
            now_playing: Some(NowPlaying {
                track: imagine(),
                is_playing: false,
            }),
            ..Default::default()
        });
        let adapter = PlaybackAdapter::new(client).with_gate(logged_in_gate());

        let outcome = adapter
            .execute(ResourceKind::GetCurrentSong, &Map::new())
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::completed(NOTHING_PLAYING));
    }

    #[tokio::test]
    async fn test_current_song_without_session() {
        let client = Arc::new(StubClient::default());
        let adapter = PlaybackAdapter::new(client.clone());

        let outcome = adapter
            .execute(ResourceKind::GetCurrentSong, &Map::new())
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::completed(NOTHING_PLAYING));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_error_is_normalized() {
        let client = Arc::new(StubClient {
            fail_with: Some(404),
            ..Default::default()
        });
        let adapter = PlaybackAdapter::new(client).with_gate(logged_in_gate());

        let error = adapter
            .execute(ResourceKind::NextTrack, &Map::new())
            .await
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Spotify API error (404): No active device found"
        );
    }

    #[tokio::test]
    async fn test_non_string_query_is_used_as_text() {
        let client = Arc::new(StubClient::default());
        let adapter = PlaybackAdapter::new(client.clone());

        let params = json!({ "query": 1999 }).as_object().unwrap().clone();
        adapter
            .execute(ResourceKind::PlaySong, &params)
            .await
            .unwrap();
        assert_eq!(client.calls(), vec!["search:1999"]);
    }
}
