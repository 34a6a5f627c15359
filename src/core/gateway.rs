//! Call gateway.
//!
//! Single entry point shared by every transport: the credential gate check
//! runs first, then legacy translation (for legacy paths), then the call
//! router. A rejected gate check never reaches the router.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::warn;

use super::config::AuthMode;
use crate::domains::auth::CredentialGate;
use crate::domains::dispatch::{CallResponse, DispatchError, Dispatcher};
use crate::domains::legacy::LegacyTranslator;

pub struct CallGateway {
    dispatcher: Arc<Dispatcher>,
    legacy: LegacyTranslator,
    gate: Arc<CredentialGate>,
    mode: AuthMode,
}

impl CallGateway {
    pub fn new(dispatcher: Arc<Dispatcher>, gate: Arc<CredentialGate>, mode: AuthMode) -> Self {
        Self {
            legacy: LegacyTranslator::new(dispatcher.clone()),
            dispatcher,
            gate,
            mode,
        }
    }

    pub fn gate(&self) -> &Arc<CredentialGate> {
        &self.gate
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Whether invocations are gated on a user login.
    pub fn requires_user(&self) -> bool {
        self.mode.requires_user()
    }

    /// A 401 rejection when the deployment is gated and nobody is logged in.
    pub async fn check_access(&self) -> Option<CallResponse> {
        if !self.requires_user() || self.gate.is_authenticated().await {
            return None;
        }
        warn!("Rejecting unauthenticated call");
        Some(CallResponse::rejected(DispatchError::AuthRequired))
    }

    /// Invoke a resource by name.
    pub async fn invoke(&self, name: &str, parameters: Map<String, Value>) -> CallResponse {
        if let Some(rejection) = self.check_access().await {
            return rejection;
        }
        self.dispatcher.dispatch(name, parameters).await
    }

    /// Invoke from a raw `{name, parameters}` body.
    pub async fn invoke_body(&self, body: &[u8]) -> CallResponse {
        if let Some(rejection) = self.check_access().await {
            return rejection;
        }
        self.dispatcher.dispatch_body(body).await
    }

    /// Invoke through a legacy path with an optional raw body.
    pub async fn invoke_legacy(
        &self,
        path: &str,
        body: &[u8],
    ) -> Result<CallResponse, DispatchError> {
        if let Some(rejection) = self.check_access().await {
            return Ok(rejection);
        }
        self.legacy.invoke_body(path, body).await
    }
}
