//! Call request types.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Opaque per-request token echoed on the matching response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// A fresh, never reused id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A call being routed.
#[derive(Debug, Clone)]
pub struct CallRequest {
    pub resource_name: String,
    pub parameters: Map<String, Value>,
    pub correlation_id: CorrelationId,
}

impl CallRequest {
    pub fn new(resource_name: impl Into<String>, parameters: Map<String, Value>) -> Self {
        Self {
            resource_name: resource_name.into(),
            parameters,
            correlation_id: CorrelationId::new(),
        }
    }
}

/// Wire body of an invocation call.
///
/// `resource` is accepted as an alias of `name` for older clients.
#[derive(Debug, Deserialize)]
pub struct InvocationBody {
    #[serde(default, alias = "resource")]
    pub name: Option<Value>,

    #[serde(default)]
    pub parameters: Value,
}
