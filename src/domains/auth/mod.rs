//! Authentication domain module.
//!
//! Holds the single cached Spotify credential and the gate that decides
//! whether a call may proceed or the caller must authorize first.
//!
//! ## Architecture
//!
//! - `token.rs` - Access token model and validity check
//! - `store.rs` - Credential stores (memory, JSON file)
//! - `flow.rs` - OAuth authorization-code flow
//! - `gate.rs` - The credential gate used by transports and the adapter

mod error;
mod flow;
mod gate;
mod store;
mod token;

pub use error::AuthError;
pub use flow::{AuthorizationFlow, SpotifyOAuth};
pub use gate::CredentialGate;
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use token::{AccessToken, TokenResponse, UserSession};
