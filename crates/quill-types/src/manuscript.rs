//! Manuscript aggregate
//!
//! A Manuscript is owned by the store. Everything else works on snapshots
//! and writes changes back through the store.

use crate::error::ManuscriptError;
use crate::{AuthorId, ManuscriptId, ManuscriptStatus};
use serde::{Deserialize, Serialize};

/// A manuscript and its editorial status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manuscript {
    /// Unique manuscript identifier
    pub id: ManuscriptId,

    /// Owning author
    pub author_id: AuthorId,

    pub title: String,

    pub content: String,

    /// Current editorial status
    pub status: ManuscriptStatus,

    /// Created timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,

    /// Last updated timestamp
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// New title and content for an existing manuscript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManuscriptEdit {
    pub title: String,
    pub content: String,
}

impl Manuscript {
    /// Create a new manuscript in DRAFT
    pub fn draft(
        author_id: AuthorId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: ManuscriptId::generate(),
            author_id,
            title: title.into(),
            content: content.into(),
            status: ManuscriptStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, author_id: &AuthorId) -> bool {
        &self.author_id == author_id
    }

    /// Replace title and content; only allowed while DRAFT or SUBMITTED
    pub fn apply_edit(&mut self, edit: ManuscriptEdit) -> Result<(), ManuscriptError> {
        if !self.status.is_editable() {
            return Err(ManuscriptError::NotEditable(self.status));
        }
        self.title = edit.title;
        self.content = edit.content;
        self.updated_at = chrono::Utc::now();
        Ok(())
    }

    /// Length of the content in characters
    pub fn content_chars(&self) -> usize {
        self.content.chars().count()
    }
}
