//! Domains module containing business logic organized by bounded contexts.
//!
//! Each subdomain owns one step of the call lifecycle: gate, legacy
//! translation, routing, upstream execution. The resource registry is
//! shared by all of them.

pub mod auth;
pub mod dispatch;
pub mod legacy;
pub mod playback;
pub mod resources;
