//! Legacy Path Translator.
//!
//! Older clients call fixed per-action paths (`POST /pause`, ...). Each
//! path maps to a resource name and goes through the same dispatcher as
//! canonical calls, so the two surfaces cannot diverge.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domains::dispatch::{CallResponse, DispatchError, Dispatcher};

/// Fixed mapping from legacy path to resource name.
pub const LEGACY_ROUTES: &[(&str, &str)] = &[
    ("/play", "resume_playback"),
    ("/pause", "pause_playback"),
    ("/next", "next_track"),
    ("/previous", "previous_track"),
];

/// Resource name for a legacy path. The leading slash is optional.
pub fn translate(path: &str) -> Option<&'static str> {
    let path = path.trim_start_matches('/');
    LEGACY_ROUTES
        .iter()
        .find(|(route, _)| &route[1..] == path)
        .map(|(_, resource)| *resource)
}

/// Merge legacy parameters into a base set. Legacy values win.
pub fn merge_parameters(
    mut base: Map<String, Value>,
    legacy: Map<String, Value>,
) -> Map<String, Value> {
    base.extend(legacy);
    base
}

pub struct LegacyTranslator {
    dispatcher: Arc<Dispatcher>,
}

impl LegacyTranslator {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Translate and dispatch a legacy call.
    ///
    /// Unknown paths are rejected before reaching the router.
    pub async fn invoke(
        &self,
        path: &str,
        parameters: Map<String, Value>,
    ) -> Result<CallResponse, DispatchError> {
        let Some(resource) = translate(path) else {
            warn!("Unknown legacy path '{}'", path);
            return Err(DispatchError::PathNotFound(normalize(path)));
        };

        debug!("Legacy path '{}' -> '{}'", path, resource);
        let parameters = merge_parameters(Map::new(), parameters);
        Ok(self.dispatcher.dispatch(resource, parameters).await)
    }

    /// Translate and dispatch a legacy call from its raw body.
    ///
    /// An empty body or a non-object JSON body carries no parameters.
    pub async fn invoke_body(
        &self,
        path: &str,
        body: &[u8],
    ) -> Result<CallResponse, DispatchError> {
        let parameters = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => map,
            Ok(_) => Map::new(),
            Err(_) if body.iter().all(u8::is_ascii_whitespace) => Map::new(),
            Err(e) => {
                if translate(path).is_none() {
                    return Err(DispatchError::PathNotFound(normalize(path)));
                }
                return Ok(CallResponse::rejected(DispatchError::validation(format!(
                    "Cuerpo JSON inválido: {}",
                    e
                ))));
            }
        };

        self.invoke(path, parameters).await
    }
}

fn normalize(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}
