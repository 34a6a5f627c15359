//! Search-and-play resource definition.

use super::{ResourceDefinition, ResourceKind, acknowledgment_returns};
use crate::domains::resources::descriptor::{ParamType, ParameterSpec, ReturnField};

/// Searches the catalog for a track and starts it when a user session exists.
pub struct PlaySongResource;

impl ResourceDefinition for PlaySongResource {
    const NAME: &'static str = "play_song";
    const DESCRIPTION: &'static str =
        "Busca una canción en Spotify y la reproduce. Puede ser una canción, artista o álbum.";
    const KIND: ResourceKind = ResourceKind::PlaySong;

    fn parameters() -> Vec<ParameterSpec> {
        vec![ParameterSpec::required(
            "query",
            ParamType::String,
            "La canción, artista o álbum a buscar y reproducir.",
        )]
    }

    fn returns() -> Vec<ReturnField> {
        let mut fields = acknowledgment_returns();
        fields.push(ReturnField::new(
            "track_uri",
            ParamType::String,
            "URI de Spotify de la pista encontrada",
        ));
        fields
    }
}
