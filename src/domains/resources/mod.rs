//! Resources domain module.
//!
//! Resources are the named operations a caller can discover and invoke:
//! searching and playing a track, transport controls and now-playing.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual resource definitions
//! - `descriptor.rs` - Descriptor and schema types
//! - `registry.rs` - Central resource registration and discovery catalog

pub mod definitions;
mod descriptor;
mod registry;

pub use definitions::{ResourceDefinition, ResourceKind};
pub use descriptor::{ParamType, ParameterSpec, ResourceDescriptor, ReturnField};
pub use registry::{ResourceRegistry, SCHEMA_VERSION, get_all_resources, resource_names};
