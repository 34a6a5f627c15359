//! Dispatch error taxonomy.
//!
//! The display text of each variant is the user-visible `error` message.

use thiserror::Error;

/// Failures turned into structured responses at the router boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// No resource with this name.
    #[error("Recurso '{0}' no encontrado")]
    ResourceNotFound(String),

    /// No legacy route with this path.
    #[error("Ruta '{0}' no encontrada")]
    PathNotFound(String),

    /// The deployment requires a valid user credential.
    #[error("Not authenticated")]
    AuthRequired,

    /// The upstream client failed; message passed through verbatim.
    #[error("{0}")]
    Upstream(String),
}

impl DispatchError {
    /// Create a new validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// A required parameter is absent.
    pub fn missing_parameter(name: &str) -> Self {
        Self::Validation(format!("El parámetro '{}' es requerido.", name))
    }

    /// HTTP-equivalent status code.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::AuthRequired => 401,
            Self::ResourceNotFound(_) | Self::PathNotFound(_) => 404,
            Self::Upstream(_) => 500,
        }
    }
}
