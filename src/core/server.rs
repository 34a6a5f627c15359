//! MCP Server implementation and lifecycle management.
//!
//! [`McpServer`] is the explicit context object of the process: it owns
//! the resource registry, the credential gate and the call gateway, and
//! is cloned into every transport. Nothing is held in globals.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use super::config::Config;
use super::gateway::CallGateway;
use super::tools::build_tool_router;
use crate::domains::auth::{
    CredentialGate, CredentialStore, FileCredentialStore, MemoryCredentialStore, SpotifyOAuth,
};
use crate::domains::dispatch::Dispatcher;
use crate::domains::playback::{PlaybackAdapter, ResourceExecutor, SpotifyClient};
use crate::domains::resources::ResourceRegistry;

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Immutable resource catalog.
    registry: Arc<ResourceRegistry>,

    /// Gate, legacy translation and routing for every invocation.
    gateway: Arc<CallGateway>,

    /// Tool router for the STDIO transport.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server backed by the Spotify Web API.
    pub fn new(config: Config) -> super::error::Result<Self> {
        let client = Arc::new(SpotifyClient::new(&config.spotify)?);
        let flow = Arc::new(SpotifyOAuth::new(&config.spotify)?);

        let store: Arc<dyn CredentialStore> = match &config.auth.token_cache {
            Some(path) => Arc::new(FileCredentialStore::new(path)),
            None => Arc::new(MemoryCredentialStore::new()),
        };
        let gate = Arc::new(CredentialGate::new(store, flow));

        let executor = Arc::new(PlaybackAdapter::new(client).with_gate(gate.clone()));

        Ok(Self::from_parts(config, executor, gate))
    }

    /// Assemble a server from an executor and a gate.
    pub fn from_parts(
        config: Config,
        executor: Arc<dyn ResourceExecutor>,
        gate: Arc<CredentialGate>,
    ) -> Self {
        let registry = Arc::new(ResourceRegistry::new());
        let dispatcher = Arc::new(Dispatcher::new(registry.clone(), executor));
        let gateway = Arc::new(CallGateway::new(dispatcher, gate, config.auth.mode));

        info!(
            "Registered {} resources (auth mode: {:?})",
            registry.list().len(),
            config.auth.mode
        );

        Self {
            tool_router: build_tool_router::<Self>(&registry, gateway.clone()),
            config: Arc::new(config),
            registry,
            gateway,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    pub fn gateway(&self) -> &CallGateway {
        &self.gateway
    }

    pub fn gate(&self) -> &Arc<CredentialGate> {
        self.gateway.gate()
    }

    /// The discovery document.
    pub fn catalog(&self) -> Value {
        self.registry
            .catalog(&self.config.server.name, &self.config.server.description)
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Spotify playback control. Each tool is one resource: play_song searches \
                 and plays a track, the others control or inspect playback."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::{AccessToken, AuthError, AuthorizationFlow};
    use crate::domains::playback::{AdapterError, Outcome};
    use crate::domains::resources::ResourceKind;
    use async_trait::async_trait;
    use serde_json::Map;

    struct EchoExecutor;

    #[async_trait]
    impl ResourceExecutor for EchoExecutor {
        async fn execute(
            &self,
            kind: ResourceKind,
            _parameters: &Map<String, Value>,
        ) -> std::result::Result<Outcome, AdapterError> {
            Ok(Outcome::completed(format!("{:?}", kind)))
        }
    }

    struct NoFlow;

    #[async_trait]
    impl AuthorizationFlow for NoFlow {
        fn authorize_url(&self, _state: &str) -> String {
            String::new()
        }

        async fn exchange_code(&self, _code: &str) -> std::result::Result<AccessToken, AuthError> {
            Err(AuthError::exchange_failed("not supported"))
        }
    }

    fn server() -> McpServer {
        let gate = Arc::new(CredentialGate::new(
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(NoFlow),
        ));
        McpServer::from_parts(Config::default(), Arc::new(EchoExecutor), gate)
    }

    #[test]
    fn test_catalog() {
        let catalog = server().catalog();
        assert_eq!(catalog["name"], "spotify-mcp-server");
        assert_eq!(catalog["schema_version"], "1.0");
        assert_eq!(catalog["resources"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_server_info_enables_tools() {
        let info = server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
    }

    #[test]
    fn test_new_builds_spotify_backend() {
        let mut config = Config::default();
        config.spotify.client_id = "id".to_string();
        config.spotify.client_secret = "secret".to_string();

        let server = McpServer::new(config).unwrap();
        assert_eq!(server.registry().list().len(), 6);
        assert!(!server.gateway().requires_user());
    }
}
