//! Resource Registry - central registration of all resources.
//!
//! When adding a new resource:
//! 1. Create the resource file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here in `get_all_resources()`

use serde_json::{Value, json};
use std::collections::HashMap;

use super::definitions::{
    GetCurrentSongResource, NextTrackResource, PausePlaybackResource, PlaySongResource,
    PreviousTrackResource, ResourceDefinition, ResumePlaybackResource,
};
use super::descriptor::ResourceDescriptor;

/// Version of the discovery document layout.
pub const SCHEMA_VERSION: &str = "1.0";

/// Build a descriptor from a definition.
fn build_descriptor<R: ResourceDefinition>() -> ResourceDescriptor {
    ResourceDescriptor {
        name: R::NAME,
        description: R::DESCRIPTION,
        kind: R::KIND,
        parameters: R::parameters(),
        returns: R::returns(),
    }
}

/// Get all registered resources, in catalog order.
///
/// This is the central place where all resources are registered.
pub fn get_all_resources() -> Vec<ResourceDescriptor> {
    vec![
        build_descriptor::<PlaySongResource>(),
        build_descriptor::<PausePlaybackResource>(),
        build_descriptor::<ResumePlaybackResource>(),
        build_descriptor::<NextTrackResource>(),
        build_descriptor::<PreviousTrackResource>(),
        build_descriptor::<GetCurrentSongResource>(),
    ]
}

/// Get the list of all resource names.
pub fn resource_names() -> Vec<&'static str> {
    vec![
        PlaySongResource::NAME,
        PausePlaybackResource::NAME,
        ResumePlaybackResource::NAME,
        NextTrackResource::NAME,
        PreviousTrackResource::NAME,
        GetCurrentSongResource::NAME,
    ]
}

/// Static catalog of invokable resources.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct ResourceRegistry {
    resources: Vec<ResourceDescriptor>,

    /// Resource name to position in `resources`.
    index: HashMap<&'static str, usize>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        let resources = get_all_resources();
        let index = resources
            .iter()
            .enumerate()
            .map(|(position, r)| (r.name, position))
            .collect();

        Self { resources, index }
    }

    /// All descriptors, in catalog order.
    pub fn list(&self) -> &[ResourceDescriptor] {
        &self.resources
    }

    /// Look up a descriptor by resource name.
    pub fn get(&self, name: &str) -> Option<&ResourceDescriptor> {
        self.index.get(name).map(|&position| &self.resources[position])
    }

    /// Render the discovery document.
    pub fn catalog(&self, server_name: &str, description: &str) -> Value {
        let resources: Vec<Value> = self
            .resources
            .iter()
            .map(ResourceDescriptor::to_catalog_entry)
            .collect();

        json!({
            "name": server_name,
            "description": description,
            "schema_version": SCHEMA_VERSION,
            "resources": resources,
        })
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
