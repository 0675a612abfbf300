//! Manuscript status state machine
//!
//! ```text
//! DRAFT ──► SUBMITTED ──► UNDER_REVIEW ──► PUBLISHED
//!   │                         ▲    │
//!   └─────────────────────────┘    └─────► REJECTED
//! ```
//!
//! UNDER_REVIEW is entered only through a publish request and left only by
//! the publish workflow. PUBLISHED and REJECTED are terminal.

use crate::error::TransitionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Editorial status of a manuscript
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ManuscriptStatus {
    /// Being written; the initial state
    #[default]
    Draft,

    /// Handed in by the author, not yet under review
    Submitted,

    /// A publish run owns the manuscript
    UnderReview,

    /// Registered in the catalog
    Published,

    /// The publish run failed
    Rejected,
}

impl ManuscriptStatus {
    pub const ALL: [ManuscriptStatus; 5] = [
        ManuscriptStatus::Draft,
        ManuscriptStatus::Submitted,
        ManuscriptStatus::UnderReview,
        ManuscriptStatus::Published,
        ManuscriptStatus::Rejected,
    ];

    /// States from which a publish request is accepted
    pub const PUBLISHABLE: [ManuscriptStatus; 2] =
        [ManuscriptStatus::Draft, ManuscriptStatus::Submitted];

    /// States from which the owner may delete the record
    pub const DELETABLE: [ManuscriptStatus; 3] = [
        ManuscriptStatus::Draft,
        ManuscriptStatus::Submitted,
        ManuscriptStatus::Rejected,
    ];

    /// Whether `self -> next` is a permitted edge
    pub fn can_transition_to(self, next: ManuscriptStatus) -> bool {
        use ManuscriptStatus::*;
        matches!(
            (self, next),
            (Draft, Submitted)
                | (Draft, UnderReview)
                | (Submitted, UnderReview)
                | (UnderReview, Published)
                | (UnderReview, Rejected)
        )
    }

    /// Validate the edge and return the new status
    pub fn transition(self, next: ManuscriptStatus) -> Result<ManuscriptStatus, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError {
                from: self,
                to: next,
            })
        }
    }

    /// No further transitions happen from this state
    pub fn is_terminal(self) -> bool {
        matches!(self, ManuscriptStatus::Published | ManuscriptStatus::Rejected)
    }

    /// Title and content may still change
    pub fn is_editable(self) -> bool {
        matches!(self, ManuscriptStatus::Draft | ManuscriptStatus::Submitted)
    }

    /// A publish request may be accepted
    pub fn is_publishable(self) -> bool {
        Self::PUBLISHABLE.contains(&self)
    }

    /// The record may be removed by its owner
    pub fn is_deletable(self) -> bool {
        Self::DELETABLE.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ManuscriptStatus::Draft => "DRAFT",
            ManuscriptStatus::Submitted => "SUBMITTED",
            ManuscriptStatus::UnderReview => "UNDER_REVIEW",
            ManuscriptStatus::Published => "PUBLISHED",
            ManuscriptStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for ManuscriptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManuscriptStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown manuscript status: {}", s))
    }
}
