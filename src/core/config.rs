//! Configuration management for the MCP server.
//!
//! Configuration is read from the environment (and a `.env` file, if
//! present). Missing Spotify credentials are a fatal startup error.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Spotify application credentials and endpoints.
    pub spotify: SpotifyConfig,

    /// Credential gate configuration.
    pub auth: AuthConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,

    /// Human-readable description used in the resource catalog.
    pub description: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Spotify application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,

    /// OAuth redirect URI registered for the application.
    pub redirect_uri: String,

    /// Space-separated OAuth scopes requested at login.
    pub scopes: String,

    /// Web API base URL.
    pub api_base: String,

    /// Accounts service base URL (authorize and token endpoints).
    pub accounts_base: String,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for SpotifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .field("api_base", &self.api_base)
            .field("accounts_base", &self.accounts_base)
            .finish()
    }
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: "http://127.0.0.1:8080/callback".to_string(),
            scopes: "user-read-playback-state user-modify-playback-state user-read-currently-playing"
                .to_string(),
            api_base: "https://api.spotify.com/v1".to_string(),
            accounts_base: "https://accounts.spotify.com".to_string(),
        }
    }
}

/// Whether invocations require a logged-in user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Invocations are never gated. Player calls run only once a user has
    /// logged in; until then they are acknowledged without effect.
    #[default]
    None,

    /// Invocations are rejected with 401 until a user has logged in.
    User,
}

impl AuthMode {
    pub fn requires_user(self) -> bool {
        self == Self::User
    }
}

/// Credential gate configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    pub mode: AuthMode,

    /// JSON token cache file. The cache lives in memory when unset.
    pub token_cache: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "spotify-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: "Control de Spotify a través de recursos MCP".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            spotify: SpotifyConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file first when one exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through a variable lookup.
    ///
    /// Fails when `SPOTIFY_CLIENT_ID` or `SPOTIFY_CLIENT_SECRET` is missing
    /// or empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        config.spotify.client_id = var("SPOTIFY_CLIENT_ID")
            .ok_or_else(|| Error::config("SPOTIFY_CLIENT_ID is not set"))?;
        config.spotify.client_secret = var("SPOTIFY_CLIENT_SECRET")
            .ok_or_else(|| Error::config("SPOTIFY_CLIENT_SECRET is not set"))?;

        if let Some(uri) = var("SPOTIFY_REDIRECT_URI") {
            config.spotify.redirect_uri = uri;
        }
        if let Some(scopes) = var("SPOTIFY_SCOPES") {
            config.spotify.scopes = scopes;
        }
        if let Some(base) = var("SPOTIFY_API_BASE") {
            config.spotify.api_base = base;
        }
        if let Some(base) = var("SPOTIFY_ACCOUNTS_BASE") {
            config.spotify.accounts_base = base;
        }

        if let Some(path) = var("SPOTIFY_TOKEN_CACHE") {
            config.auth.token_cache = Some(PathBuf::from(path));
        }

        config.auth.mode = match var("MCP_AUTH_MODE").map(|m| m.to_lowercase()).as_deref() {
            None | Some("none") => AuthMode::None,
            Some("user") => AuthMode::User,
            Some(other) => {
                return Err(Error::config(format!(
                    "MCP_AUTH_MODE must be 'none' or 'user', got '{}'",
                    other
                )));
            }
        };

        if let Some(name) = var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Some(level) = var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_lookup(&lookup);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const CREDENTIALS: [(&str, &str); 2] = [
        ("SPOTIFY_CLIENT_ID", "client-123"),
        ("SPOTIFY_CLIENT_SECRET", "secret-456"),
    ];

    #[test]
    fn test_defaults_with_credentials() {
        let config = Config::from_lookup(lookup(&CREDENTIALS)).unwrap();

        assert_eq!(config.server.name, "spotify-mcp-server");
        assert_eq!(config.spotify.client_id, "client-123");
        assert_eq!(
            config.spotify.redirect_uri,
            "http://127.0.0.1:8080/callback"
        );
        assert_eq!(config.spotify.api_base, "https://api.spotify.com/v1");
        assert_eq!(config.auth.mode, AuthMode::None);
        assert!(config.auth.token_cache.is_none());
    }

    #[test]
    fn test_missing_client_id_is_fatal() {
        let err = Config::from_lookup(lookup(&[("SPOTIFY_CLIENT_SECRET", "s")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("SPOTIFY_CLIENT_ID"));
    }

    #[test]
    fn test_empty_secret_is_fatal() {
        let err = Config::from_lookup(lookup(&[
            ("SPOTIFY_CLIENT_ID", "id"),
            ("SPOTIFY_CLIENT_SECRET", "  "),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("SPOTIFY_CLIENT_SECRET"));
    }

    #[test]
    fn test_overrides() {
        let mut vars = CREDENTIALS.to_vec();
        vars.extend([
            ("MCP_AUTH_MODE", "USER"),
            ("MCP_SERVER_NAME", "my-player"),
            ("SPOTIFY_TOKEN_CACHE", "/tmp/tokens.json"),
            ("SPOTIFY_API_BASE", "http://localhost:9000/v1"),
            ("MCP_LOG_LEVEL", "debug"),
        ]);
        let config = Config::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.auth.mode, AuthMode::User);
        assert!(config.auth.mode.requires_user());
        assert_eq!(config.server.name, "my-player");
        assert_eq!(
            config.auth.token_cache,
            Some(PathBuf::from("/tmp/tokens.json"))
        );
        assert_eq!(config.spotify.api_base, "http://localhost:9000/v1");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_auth_mode() {
        let mut vars = CREDENTIALS.to_vec();
        vars.push(("MCP_AUTH_MODE", "sometimes"));
        assert!(Config::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn test_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("SPOTIFY_CLIENT_ID", "env-client");
            std::env::set_var("SPOTIFY_CLIENT_SECRET", "env-secret");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.spotify.client_id, "env-client");
        unsafe {
            std::env::remove_var("SPOTIFY_CLIENT_ID");
            std::env::remove_var("SPOTIFY_CLIENT_SECRET");
        }
    }

    #[test]
    fn test_secret_redacted_in_debug() {
        let config = Config::from_lookup(lookup(&CREDENTIALS)).unwrap();
        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("secret-456"));
    }
}
