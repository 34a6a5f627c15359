//! Transport control resources: pause, resume, next and previous.
//!
//! None of them takes parameters. Without a user session they are accepted
//! and acknowledged without touching the player.

use super::{ResourceDefinition, ResourceKind};

pub struct PausePlaybackResource;

impl ResourceDefinition for PausePlaybackResource {
    const NAME: &'static str = "pause_playback";
    const DESCRIPTION: &'static str = "Pausa la reproducción actual en Spotify.";
    const KIND: ResourceKind = ResourceKind::PausePlayback;
}

pub struct ResumePlaybackResource;

impl ResourceDefinition for ResumePlaybackResource {
    const NAME: &'static str = "resume_playback";
    const DESCRIPTION: &'static str = "Reanuda la reproducción en Spotify.";
    const KIND: ResourceKind = ResourceKind::ResumePlayback;
}

pub struct NextTrackResource;

impl ResourceDefinition for NextTrackResource {
    const NAME: &'static str = "next_track";
    const DESCRIPTION: &'static str = "Salta a la siguiente canción.";
    const KIND: ResourceKind = ResourceKind::NextTrack;
}

pub struct PreviousTrackResource;

impl ResourceDefinition for PreviousTrackResource {
    const NAME: &'static str = "previous_track";
    const DESCRIPTION: &'static str = "Vuelve a la canción anterior.";
    const KIND: ResourceKind = ResourceKind::PreviousTrack;
}
