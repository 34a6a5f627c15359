//! Now-playing resource definition.

use super::{ResourceDefinition, ResourceKind};

/// Reports the track currently playing on the user's player.
pub struct GetCurrentSongResource;

impl ResourceDefinition for GetCurrentSongResource {
    const NAME: &'static str = "get_current_song";
    const DESCRIPTION: &'static str =
        "Obtiene la canción que se está reproduciendo actualmente en Spotify.";
    const KIND: ResourceKind = ResourceKind::GetCurrentSong;
}
