//! Credential Gate.
//!
//! Decides whether a caller may proceed with the cached credential or must
//! first complete the authorization flow.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use super::error::AuthError;
use super::flow::AuthorizationFlow;
use super::store::CredentialStore;
use super::token::UserSession;

/// Upper bound on outstanding authorization states.
const MAX_PENDING_STATES: usize = 64;

pub struct CredentialGate {
    store: Arc<dyn CredentialStore>,
    flow: Arc<dyn AuthorizationFlow>,
    pending_states: RwLock<HashSet<String>>,
}

impl CredentialGate {
    pub fn new(store: Arc<dyn CredentialStore>, flow: Arc<dyn AuthorizationFlow>) -> Self {
        Self {
            store,
            flow,
            pending_states: RwLock::new(HashSet::new()),
        }
    }

    /// Whether a valid credential is cached.
    ///
    /// Store failures count as "not authenticated".
    pub async fn is_authenticated(&self) -> bool {
        self.user_session().await.is_some()
    }

    /// The cached user credential, when present and still valid.
    pub async fn user_session(&self) -> Option<UserSession> {
        match self.store.get().await {
            Ok(Some(token)) if token.is_valid() => Some(UserSession::from(&token)),
            Ok(_) => None,
            Err(e) => {
                warn!("Credential lookup failed: {}", e);
                None
            }
        }
    }

    /// Redirect target starting a new authorization.
    ///
    /// The embedded state is remembered until a callback consumes it.
    pub async fn authorize_url(&self) -> String {
        let state = Uuid::new_v4().simple().to_string();

        let mut pending = self.pending_states.write().await;
        if pending.len() >= MAX_PENDING_STATES {
            warn!("Too many abandoned authorizations, forgetting pending states");
            pending.clear();
        }
        pending.insert(state.clone());

        self.flow.authorize_url(&state)
    }

    /// Exchange a one-time code and store the resulting credential.
    ///
    /// `state` must be one issued by [`authorize_url`](Self::authorize_url)
    /// and not yet used; it is consumed before the code is exchanged.
    pub async fn complete_authorization(&self, code: &str, state: &str) -> Result<(), AuthError> {
        if !self.pending_states.write().await.remove(state) {
            warn!("Authorization callback with unknown state");
            return Err(AuthError::InvalidState);
        }

        let token = self.flow.exchange_code(code).await.map_err(|e| match e {
            AuthError::ExchangeFailed(_) => e,
            other => AuthError::exchange_failed(other.to_string()),
        })?;

        self.store.set(token).await?;
        info!("Authorization completed, credential cached");
        Ok(())
    }

    /// Forget the cached credential.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.store.clear().await?;
        info!("Cached credential cleared");
        Ok(())
    }
}
