//! Domain errors

use crate::status::ManuscriptStatus;
use thiserror::Error;

/// A status change that is not an edge of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal status transition {from} -> {to}")]
pub struct TransitionError {
    pub from: ManuscriptStatus,
    pub to: ManuscriptStatus,
}

/// Errors raised by operations on the manuscript aggregate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManuscriptError {
    /// Title or content may not change in the current status
    #[error("manuscript is not editable while {0}")]
    NotEditable(ManuscriptStatus),
}
