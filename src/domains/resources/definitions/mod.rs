//! Resource definitions module.
//!
//! Each resource is defined with:
//! - name and description
//! - declared parameters and returned fields
//! - the handler variant that executes it
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Add a `ResourceKind` variant and handle it in the playback adapter
//! 4. Register in `registry.rs`

mod current_song;
mod play_song;
mod playback_controls;

pub use current_song::GetCurrentSongResource;
pub use play_song::PlaySongResource;
pub use playback_controls::{
    NextTrackResource, PausePlaybackResource, PreviousTrackResource, ResumePlaybackResource,
};

use super::descriptor::{ParamType, ParameterSpec, ReturnField};

/// Handler variant for each dispatchable resource.
///
/// The dispatcher resolves a resource name to one of these variants; the
/// executor matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    PlaySong,
    PausePlayback,
    ResumePlayback,
    NextTrack,
    PreviousTrack,
    GetCurrentSong,
}

impl ResourceKind {
    /// Every variant, in catalog order.
    pub const ALL: [ResourceKind; 6] = [
        Self::PlaySong,
        Self::PausePlayback,
        Self::ResumePlayback,
        Self::NextTrack,
        Self::PreviousTrack,
        Self::GetCurrentSong,
    ];
}

/// Trait for resource definitions.
///
/// Each resource must implement this trait to provide its metadata.
pub trait ResourceDefinition {
    /// The unique name of the resource.
    const NAME: &'static str;

    /// A description of the resource.
    const DESCRIPTION: &'static str;

    /// The handler variant executing this resource.
    const KIND: ResourceKind;

    /// Declared parameters. Defaults to none.
    fn parameters() -> Vec<ParameterSpec> {
        Vec::new()
    }

    /// Fields of a successful response.
    fn returns() -> Vec<ReturnField> {
        acknowledgment_returns()
    }
}

/// Response fields shared by every resource.
pub(crate) fn acknowledgment_returns() -> Vec<ReturnField> {
    vec![
        ReturnField::new(
            "status",
            ParamType::String,
            "Resultado de la llamada: success o not_found",
        ),
        ReturnField::new("message", ParamType::String, "Mensaje legible"),
        ReturnField::new(
            "request_id",
            ParamType::String,
            "Identificador único de la petición",
        ),
    ]
}
