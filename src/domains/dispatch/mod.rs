//! Dispatch domain module.
//!
//! The call router: name to handler, required-parameter checks,
//! correlation ids and response normalization. All dispatch errors stop
//! here and become structured [`CallResponse`]s.

mod error;
mod request;
mod response;
mod router;

pub use error::DispatchError;
pub use request::{CallRequest, CorrelationId, InvocationBody};
pub use response::{CallOutcome, CallResponse, CallStatus};
pub use router::Dispatcher;
