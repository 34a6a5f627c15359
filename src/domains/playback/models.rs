//! Track and player models, plus the Spotify JSON shapes they come from.

use serde::Deserialize;

/// A playable catalog track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub name: String,

    /// Opaque playable identifier (`spotify:track:...`).
    pub uri: String,

    /// Credited artists, primary first.
    pub artists: Vec<String>,
}

impl Track {
    pub fn new(name: impl Into<String>, uri: impl Into<String>, artists: Vec<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            artists,
        }
    }

    /// The first credited artist.
    pub fn primary_artist(&self) -> &str {
        self.artists
            .first()
            .map(String::as_str)
            .unwrap_or("Artista desconocido")
    }
}

/// State of the user's player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub track: Track,
    pub is_playing: bool,
}

// ============================================================================
// Spotify Web API payloads
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub tracks: Option<Paging<TrackObject>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackObject {
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<ArtistObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistObject {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentlyPlayingResponse {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub item: Option<TrackObject>,
}

impl From<TrackObject> for Track {
    fn from(track: TrackObject) -> Self {
        Self {
            name: track.name,
            uri: track.uri,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
        }
    }
}

impl CurrentlyPlayingResponse {
    pub fn into_now_playing(self) -> Option<NowPlaying> {
        let is_playing = self.is_playing;
        self.item.map(|item| NowPlaying {
            track: item.into(),
            is_playing,
        })
    }
}
