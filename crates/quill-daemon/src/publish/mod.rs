//! Publish workflow
//!
//! [`PublishRequestHandler`] accepts requests and moves manuscripts to
//! UNDER_REVIEW; [`PublishOrchestrator`] finishes each accepted request in
//! the background.

mod orchestrator;
mod request;

#[cfg(test)]
pub(crate) mod testing;

pub use orchestrator::PublishOrchestrator;
pub use request::{PublishAccepted, PublishRequestHandler};
