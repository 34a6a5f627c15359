//! Resource descriptor types.
//!
//! A descriptor is the immutable, compiled-in description of one invokable
//! resource: its name, what it does, which parameters it takes and which
//! fields its response carries.

use serde::Serialize;
use serde_json::{Map, Value, json};

use super::definitions::ResourceKind;

/// Advisory type of a parameter or returned field.
///
/// Types are published in the schema for callers; the dispatcher only
/// checks presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
}

impl ParamType {
    /// JSON Schema type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
        }
    }
}

/// One declared input parameter of a resource.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub required: bool,
    pub description: &'static str,
}

impl ParameterSpec {
    /// A required parameter.
    pub const fn required(
        name: &'static str,
        param_type: ParamType,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            param_type,
            required: true,
            description,
        }
    }
}

/// One field of a resource's response body.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnField {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub field_type: ParamType,
    pub description: &'static str,
}

impl ReturnField {
    pub const fn new(name: &'static str, field_type: ParamType, description: &'static str) -> Self {
        Self {
            name,
            field_type,
            description,
        }
    }
}

/// Immutable description of an invokable resource.
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    /// Unique resource name used for dispatch.
    pub name: &'static str,

    /// Human-readable description shown to callers.
    pub description: &'static str,

    /// Handler variant executing this resource.
    pub kind: ResourceKind,

    /// Declared parameters, in declaration order.
    pub parameters: Vec<ParameterSpec>,

    /// Fields present in a successful response.
    pub returns: Vec<ReturnField>,
}

impl ResourceDescriptor {
    /// Names of the parameters that must be present on every call.
    pub fn required_parameters(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
    }

    /// Parameter schema as a JSON-Schema-like object.
    pub fn parameters_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.parameters {
            properties.insert(
                param.name.to_string(),
                json!({
                    "type": param.param_type.as_str(),
                    "description": param.description,
                }),
            );
        }
        let required: Vec<&str> = self.required_parameters().collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Return schema as a JSON-Schema-like object.
    pub fn returns_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.returns {
            properties.insert(
                field.name.to_string(),
                json!({
                    "type": field.field_type.as_str(),
                    "description": field.description,
                }),
            );
        }

        json!({
            "type": "object",
            "properties": properties,
        })
    }

    /// Entry of the discovery catalog.
    pub fn to_catalog_entry(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.parameters_schema(),
            "returns": self.returns_schema(),
        })
    }
}
