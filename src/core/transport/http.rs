//! HTTP transport implementation.
//!
//! Plain HTTP resource API: discovery, canonical invocation, the legacy
//! per-action paths and the OAuth login/callback pages. Every invocation
//! goes through the server's [`CallGateway`](crate::core::gateway::CallGateway).

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use bytes::Bytes;
use http::{HeaderValue, StatusCode};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument, warn};

use super::{TransportConfig, TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::domains::auth::AuthError;
use crate::domains::dispatch::{CallResponse, DispatchError};

/// Response header mirroring the body's `request_id`.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Where unauthenticated callers are sent.
pub const LOGIN_PATH: &str = "/login";

/// Where the cached credential is forgotten.
pub const LOGOUT_PATH: &str = "/logout";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Create from TransportConfig (extracts HTTP config).
    pub fn from_transport_config(config: &TransportConfig) -> Option<Self> {
        match config {
            TransportConfig::Http(http_config) => Some(Self::new(http_config.clone())),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = router(server, self.config.enable_cors);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (CORS {})", addr, cors_status);
        info!("  → Resources: GET  /mcp/resources");
        info!("  → Call:      POST /mcp/call");
        info!("  → Legacy:    POST /play /pause /next /previous");
        info!("  → Login:     GET  {}", LOGIN_PATH);
        info!("  → Logout:    POST {}", LOGOUT_PATH);

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Build the application router.
pub fn router(server: McpServer, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/mcp/resources", get(list_resources))
        .route("/mcp/call", post(call_resource))
        .route(LOGIN_PATH, get(login))
        .route("/callback", get(callback))
        .route(LOGOUT_PATH, post(logout))
        .route("/{legacy}", post(legacy_call))
        .with_state(server)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

// ============================================================================
// Pages
// ============================================================================

#[derive(Debug, Deserialize)]
struct IndexQuery {
    auth_error: Option<String>,
}

/// Status page.
async fn index(State(server): State<McpServer>, Query(query): Query<IndexQuery>) -> Html<String> {
    let session = if server.gate().is_authenticated().await {
        format!(
            "<p>Sesión de Spotify: conectada.</p>\
             <form method=\"post\" action=\"{}\"><button>Cerrar sesión</button></form>",
            LOGOUT_PATH
        )
    } else {
        format!(
            "<p>Sesión de Spotify: no conectada. <a href=\"{}\">Iniciar sesión</a></p>",
            LOGIN_PATH
        )
    };

    let error = query
        .auth_error
        .map(|e| format!("<p class=\"error\">Error de autorización: {}</p>", escape_html(&e)))
        .unwrap_or_default();

    Html(format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{name}</title></head>\
         <body><h1>{name}</h1>\
         <p>¡El servidor MCP de Spotify está listo para recibir peticiones.</p>\
         {error}{session}\
         <p><a href=\"/mcp/resources\">Recursos disponibles</a></p>\
         </body></html>",
        name = escape_html(server.name()),
        error = error,
        session = session,
    ))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

// ============================================================================
// Resource API
// ============================================================================

/// Discovery document. Never gated.
async fn list_resources(State(server): State<McpServer>) -> impl IntoResponse {
    Json(server.catalog())
}

#[instrument(skip_all)]
async fn call_resource(State(server): State<McpServer>, body: Bytes) -> Response {
    let response = server.gateway().invoke_body(&body).await;
    call_response(response)
}

#[instrument(skip_all)]
async fn legacy_call(
    State(server): State<McpServer>,
    Path(legacy): Path<String>,
    body: Bytes,
) -> Response {
    debug!("Legacy call on /{}", legacy);
    match server.gateway().invoke_legacy(&legacy, &body).await {
        Ok(response) => call_response(response),
        Err(e) => error_response(&e),
    }
}

/// Render a call response with its status code and correlation header.
fn call_response(response: CallResponse) -> Response {
    let status = StatusCode::from_u16(response.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut body = response.to_json();
    if status == StatusCode::UNAUTHORIZED {
        body["login_url"] = LOGIN_PATH.into();
    }

    let mut http_response = (status, Json(body)).into_response();
    if let Some(id) = response.correlation_id {
        if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
            http_response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
    }
    http_response
}

fn error_response(error: &DispatchError) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(serde_json::json!({ "error": error.to_string() }))).into_response()
}

// ============================================================================
// Authorization
// ============================================================================

/// Start the authorization flow.
async fn login(State(server): State<McpServer>) -> Redirect {
    Redirect::to(&server.gate().authorize_url().await)
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Complete the authorization flow.
#[instrument(skip_all)]
async fn callback(
    State(server): State<McpServer>,
    query: Result<Query<CallbackQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(e) => {
            warn!("Malformed authorization callback: {}", e);
            return callback_failure("invalid query");
        }
    };

    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        let reason = query.error.unwrap_or_else(|| "missing code".to_string());
        warn!("Authorization callback without code: {}", reason);
        return callback_failure(&reason);
    };

    let state = query.state.unwrap_or_default();
    match server.gate().complete_authorization(&code, &state).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(AuthError::InvalidState) => {
            Redirect::to("/?auth_error=invalid_state").into_response()
        }
        Err(e) => {
            warn!("Authorization failed: {}", e);
            Redirect::to("/?auth_error=exchange_failed").into_response()
        }
    }
}

fn callback_failure(reason: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Html(format!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"></head><body>\
             <p>No se recibió el código de autorización ({}).</p>\
             <p><a href=\"{}\">Reintentar</a></p></body></html>",
            escape_html(reason),
            LOGIN_PATH
        )),
    )
        .into_response()
}

/// Forget the cached credential.
async fn logout(State(server): State<McpServer>) -> Response {
    match server.gate().sign_out().await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => {
            warn!("Sign-out failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
