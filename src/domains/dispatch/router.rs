//! Call Router.
//!
//! Resolves a resource name through the registry, checks required
//! parameters, hands the call to the executor and normalizes the result.
//! Every call is attempted exactly once.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{Span, info, instrument, warn};

use super::error::DispatchError;
use super::request::{CallRequest, InvocationBody};
use super::response::CallResponse;
use crate::domains::playback::{Outcome, ResourceExecutor};
use crate::domains::resources::{ResourceDescriptor, ResourceRegistry};

pub struct Dispatcher {
    registry: Arc<ResourceRegistry>,
    executor: Arc<dyn ResourceExecutor>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ResourceRegistry>, executor: Arc<dyn ResourceExecutor>) -> Self {
        Self { registry, executor }
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Route one call by resource name.
    pub async fn dispatch(&self, name: &str, parameters: Map<String, Value>) -> CallResponse {
        self.route(CallRequest::new(name, parameters)).await
    }

    /// Route one call whose parameters have not been checked to be an object.
    ///
    /// `null` counts as no parameters.
    pub async fn dispatch_value(&self, name: &str, parameters: Value) -> CallResponse {
        match parameters {
            Value::Object(map) => self.dispatch(name, map).await,
            Value::Null => self.dispatch(name, Map::new()).await,
            _ => {
                let request = CallRequest::new(name, Map::new());
                CallResponse::error(
                    request.correlation_id,
                    DispatchError::validation("El campo 'parameters' debe ser un objeto."),
                )
            }
        }
    }

    /// Parse and route a raw invocation body (`{name, parameters}`).
    ///
    /// Bodies rejected here never get a correlation id.
    pub async fn dispatch_body(&self, body: &[u8]) -> CallResponse {
        let invocation: InvocationBody = match serde_json::from_slice(body) {
            Ok(invocation) => invocation,
            Err(e) if body.iter().all(u8::is_ascii_whitespace) => {
                warn!("Empty invocation body: {}", e);
                return CallResponse::rejected(missing_name());
            }
            Err(e) => {
                warn!("Malformed invocation body: {}", e);
                return CallResponse::rejected(DispatchError::validation(format!(
                    "Cuerpo JSON inválido: {}",
                    e
                )));
            }
        };

        match invocation.name {
            Some(Value::String(name)) if !name.is_empty() => {
                self.dispatch_value(&name, invocation.parameters).await
            }
            _ => CallResponse::rejected(missing_name()),
        }
    }

    #[instrument(
        name = "dispatch",
        skip_all,
        fields(resource = %request.resource_name, request_id = %request.correlation_id, status)
    )]
    async fn route(&self, request: CallRequest) -> CallResponse {
        let id = request.correlation_id;

        let Some(descriptor) = self.registry.get(&request.resource_name) else {
            warn!("Unknown resource requested");
            return self.finish(CallResponse::error(
                id,
                DispatchError::ResourceNotFound(request.resource_name),
            ));
        };

        if let Some(missing) = missing_parameter(descriptor, &request.parameters) {
            warn!("Missing required parameter '{}'", missing);
            return self.finish(CallResponse::error(
                id,
                DispatchError::missing_parameter(missing),
            ));
        }

        let response = match self
            .executor
            .execute(descriptor.kind, &request.parameters)
            .await
        {
            Ok(Outcome::Completed { message, track_uri }) => {
                CallResponse::success(id, message, track_uri)
            }
            Ok(Outcome::NothingFound { message }) => CallResponse::not_found(id, message),
            Err(e) => {
                warn!("Upstream failure: {}", e);
                CallResponse::error(id, DispatchError::Upstream(e.to_string()))
            }
        };

        self.finish(response)
    }

    fn finish(&self, response: CallResponse) -> CallResponse {
        Span::current().record("status", response.status_code());
        info!("Call finished");
        response
    }
}

fn missing_name() -> DispatchError {
    DispatchError::validation("El campo 'name' es requerido.")
}

/// First required parameter that is absent, `null` or an empty string.
fn missing_parameter(
    descriptor: &ResourceDescriptor,
    parameters: &Map<String, Value>,
) -> Option<&'static str> {
    descriptor
        .required_parameters()
        .find(|name| match parameters.get(*name) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::dispatch::{CallOutcome, CallStatus};
    use crate::domains::playback::AdapterError;
    use crate::domains::resources::{ResourceKind, resource_names};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic executor counting its invocations.
    #[derive(Default)]
    struct CountingExecutor {
        calls: AtomicUsize,
        fail: bool,
        empty_search: bool,
    }

    impl CountingExecutor {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ResourceExecutor for CountingExecutor {
        async fn execute(
            &self,
            kind: ResourceKind,
            parameters: &Map<String, Value>,
        ) -> Result<Outcome, AdapterError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AdapterError::upstream("Spotify rate limit exceeded"));
            }
            match kind {
                ResourceKind::PlaySong if self.empty_search => Ok(Outcome::NothingFound {
                    message: format!("No se encontró nada para '{}'", parameters["query"]),
                }),
                ResourceKind::PlaySong => Ok(Outcome::Completed {
                    message: "Listo para reproducir: Imagine - John Lennon".to_string(),
                    track_uri: Some("spotify:track:abc123".to_string()),
                }),
                other => Ok(Outcome::completed(format!("{:?}", other))),
            }
        }
    }

    fn dispatcher(executor: Arc<CountingExecutor>) -> Dispatcher {
        Dispatcher::new(Arc::new(ResourceRegistry::new()), executor)
    }

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_known_resources_succeed() {
        let executor = Arc::new(CountingExecutor::default());
        let dispatcher = dispatcher(executor.clone());

        for name in resource_names() {
            let response = dispatcher
                .dispatch(name, params(json!({"query": "Imagine"})))
                .await;
            assert_eq!(response.status(), CallStatus::Success, "{}", name);
            assert!(response.correlation_id.is_some());
        }
        assert_eq!(executor.calls(), resource_names().len());
    }

    #[tokio::test]
    async fn test_play_song_success_payload() {
        let dispatcher = dispatcher(Arc::new(CountingExecutor::default()));
        let response = dispatcher
            .dispatch("play_song", params(json!({"query": "Imagine"})))
            .await;

        let body = response.to_json();
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "Listo para reproducir: Imagine - John Lennon");
        assert_eq!(body["track_uri"], "spotify:track:abc123");
        assert_eq!(
            body["request_id"],
            response.correlation_id.unwrap().to_string()
        );
    }

    #[tokio::test]
    async fn test_empty_search_is_not_found() {
        let dispatcher = dispatcher(Arc::new(CountingExecutor {
            empty_search: true,
            ..Default::default()
        }));
        let response = dispatcher
            .dispatch("play_song", params(json!({"query": "zzzzznonexistent"})))
            .await;

        assert_eq!(response.status(), CallStatus::NotFound);
        assert_eq!(response.status_code(), 200);
        assert!(response.to_json().get("track_uri").is_none());
    }

    #[tokio::test]
    async fn test_unknown_resource_never_reaches_executor() {
        let executor = Arc::new(CountingExecutor::default());
        let dispatcher = dispatcher(executor.clone());

        let response = dispatcher.dispatch("unknown_resource", Map::new()).await;

        assert_eq!(response.status_code(), 404);
        assert_eq!(
            response.to_json()["error"],
            "Recurso 'unknown_resource' no encontrado"
        );
        assert!(response.correlation_id.is_some());
        assert_eq!(executor.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_parameter_never_reaches_executor() {
        let executor = Arc::new(CountingExecutor::default());
        let dispatcher = dispatcher(executor.clone());

        for parameters in [json!({}), json!({"query": null}), json!({"query": ""})] {
            let response = dispatcher.dispatch("play_song", params(parameters)).await;
            assert_eq!(response.status(), CallStatus::Error);
            assert_eq!(response.status_code(), 400);
            assert_eq!(
                response.message(),
                "El parámetro 'query' es requerido."
            );
            assert!(response.correlation_id.is_some());
        }
        assert_eq!(executor.calls(), 0);
    }

    #[tokio::test]
    async fn test_presence_only_validation() {
        let executor = Arc::new(CountingExecutor::default());
        let dispatcher = dispatcher(executor.clone());

        let response = dispatcher
            .dispatch("play_song", params(json!({"query": 42})))
            .await;
        assert_eq!(response.status(), CallStatus::Success);
        assert_eq!(executor.calls(), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure() {
        let dispatcher = dispatcher(Arc::new(CountingExecutor {
            fail: true,
            ..Default::default()
        }));
        let response = dispatcher.dispatch("next_track", Map::new()).await;

        assert_eq!(response.status_code(), 500);
        assert_eq!(
            response.outcome,
            CallOutcome::Error(DispatchError::Upstream(
                "Spotify rate limit exceeded".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_dispatch_body() {
        let dispatcher = dispatcher(Arc::new(CountingExecutor::default()));

        let response = dispatcher
            .dispatch_body(br#"{"name": "play_song", "parameters": {"query": "Imagine"}}"#)
            .await;
        assert_eq!(response.status(), CallStatus::Success);

        let legacy_key = dispatcher
            .dispatch_body(br#"{"resource": "get_current_song"}"#)
            .await;
        assert_eq!(legacy_key.status(), CallStatus::Success);
    }

    #[tokio::test]
    async fn test_dispatch_body_rejections_have_no_id() {
        let executor = Arc::new(CountingExecutor::default());
        let dispatcher = dispatcher(executor.clone());

        for body in [
            &b""[..],
            &b"{}"[..],
            &br#"{"parameters": {}}"#[..],
            &br#"{"name": 7}"#[..],
            &b"not json"[..],
            &b"[1, 2]"[..],
        ] {
            let response = dispatcher.dispatch_body(body).await;
            assert_eq!(response.status_code(), 400);
            assert!(response.correlation_id.is_none());
        }
        assert_eq!(executor.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_object_parameters() {
        let executor = Arc::new(CountingExecutor::default());
        let dispatcher = dispatcher(executor.clone());

        let response = dispatcher
            .dispatch_body(br#"{"name": "pause_playback", "parameters": [1]}"#)
            .await;
        assert_eq!(response.status_code(), 400);
        assert!(response.correlation_id.is_some());
        assert_eq!(executor.calls(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_ids_are_unique() {
        let dispatcher = Arc::new(dispatcher(Arc::new(CountingExecutor::default())));

        let handles: Vec<_> = (0..128)
            .map(|_| {
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move { dispatcher.dispatch("pause_playback", Map::new()).await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            let response = handle.await.unwrap();
            assert!(ids.insert(response.correlation_id.unwrap()));
        }
        assert_eq!(ids.len(), 128);
    }
}
