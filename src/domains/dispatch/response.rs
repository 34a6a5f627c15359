//! Call response types.

use serde::{Serialize, Serializer};
use serde_json::Value;

use super::error::DispatchError;
use super::request::CorrelationId;

/// Coarse result of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    Success,
    NotFound,
    Error,
}

/// What happened to a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Success {
        message: String,
        track_uri: Option<String>,
    },
    NotFound {
        message: String,
    },
    Error(DispatchError),
}

/// Normalized response of the call router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallResponse {
    pub outcome: CallOutcome,

    /// Id of the originating request; `None` only for calls rejected
    /// before an id was assigned.
    pub correlation_id: Option<CorrelationId>,
}

impl CallResponse {
    pub fn success(
        id: CorrelationId,
        message: impl Into<String>,
        track_uri: Option<String>,
    ) -> Self {
        Self {
            outcome: CallOutcome::Success {
                message: message.into(),
                track_uri,
            },
            correlation_id: Some(id),
        }
    }

    pub fn not_found(id: CorrelationId, message: impl Into<String>) -> Self {
        Self {
            outcome: CallOutcome::NotFound {
                message: message.into(),
            },
            correlation_id: Some(id),
        }
    }

    pub fn error(id: CorrelationId, error: DispatchError) -> Self {
        Self {
            outcome: CallOutcome::Error(error),
            correlation_id: Some(id),
        }
    }

    /// A call rejected before it got a correlation id.
    pub fn rejected(error: DispatchError) -> Self {
        Self {
            outcome: CallOutcome::Error(error),
            correlation_id: None,
        }
    }

    pub fn status(&self) -> CallStatus {
        match self.outcome {
            CallOutcome::Success { .. } => CallStatus::Success,
            CallOutcome::NotFound { .. } => CallStatus::NotFound,
            CallOutcome::Error(_) => CallStatus::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status() == CallStatus::Error
    }

    /// Human-readable message, whatever the outcome.
    pub fn message(&self) -> String {
        match &self.outcome {
            CallOutcome::Success { message, .. } | CallOutcome::NotFound { message } => {
                message.clone()
            }
            CallOutcome::Error(e) => e.to_string(),
        }
    }

    /// HTTP-equivalent status code.
    ///
    /// A `not_found` outcome is a successful call that found nothing: 200.
    pub fn status_code(&self) -> u16 {
        match &self.outcome {
            CallOutcome::Error(e) => e.status_code(),
            _ => 200,
        }
    }

    /// The wire body as a JSON value.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Wire shape shared by every outcome.
#[derive(Serialize)]
struct ResponseBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<CallStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    track_uri: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<String>,
}

impl Serialize for CallResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let request_id = self.correlation_id.map(|id| id.to_string());

        let body = match &self.outcome {
            CallOutcome::Success { message, track_uri } => ResponseBody {
                status: Some(CallStatus::Success),
                message: Some(message.as_str()),
                track_uri: track_uri.as_deref(),
                error: None,
                request_id,
            },
            CallOutcome::NotFound { message } => ResponseBody {
                status: Some(CallStatus::NotFound),
                message: Some(message.as_str()),
                track_uri: None,
                error: None,
                request_id,
            },
            CallOutcome::Error(e) => ResponseBody {
                status: None,
                message: None,
                track_uri: None,
                error: Some(e.to_string()),
                request_id,
            },
        };

        body.serialize(serializer)
    }
}
