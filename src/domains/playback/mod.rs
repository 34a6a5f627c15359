//! Playback domain module.
//!
//! Wraps the Spotify Web API behind the [`ResourceExecutor`] seam used by
//! the dispatcher.
//!
//! ## Architecture
//!
//! - `client.rs` - Spotify Web API client (`StreamingClient`)
//! - `adapter.rs` - Upstream adapter mapping resources to client calls
//! - `models.rs` - Track and player models
//! - `error.rs` - Spotify and adapter error types

mod adapter;
mod client;
mod error;
mod models;

pub use adapter::{Outcome, PlaybackAdapter, ResourceExecutor};
pub use client::{SpotifyClient, StreamingClient};
pub use error::{AdapterError, SpotifyError};
pub use models::{NowPlaying, Track};
