//! Publish workflow payloads
//!
//! A [`PublishJob`] is built once by the publish request, moved into the
//! detached run and dropped when the run ends. Nothing here is persisted.

use crate::{AuthorId, AuthorIdentity, CatalogId, Credential, Manuscript, ManuscriptId, ManuscriptStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable input of a single publish run
#[derive(Debug, Clone)]
pub struct PublishJob {
    pub manuscript_id: ManuscriptId,

    /// The approved author who requested publication
    pub author: AuthorIdentity,

    /// Forwarded to the downstream services
    pub credential: Credential,
}

impl PublishJob {
    pub fn new(manuscript_id: ManuscriptId, author: AuthorIdentity, credential: Credential) -> Self {
        Self {
            manuscript_id,
            author,
            credential,
        }
    }
}

/// Metadata produced by the metadata-generation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManuscriptMetadata {
    pub summary: String,
    pub category: String,
    pub score: i32,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
}

/// Everything the catalog needs to register a published work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub author_id: AuthorId,
    pub author_name: String,
    pub title: String,
    pub score: i32,
    pub category: String,
    pub summary: String,
    pub content: String,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
}

impl CatalogEntry {
    /// Combine the manuscript snapshot, the requesting author and generated metadata
    pub fn assemble(
        author: &AuthorIdentity,
        manuscript: &Manuscript,
        metadata: ManuscriptMetadata,
    ) -> Self {
        Self {
            author_id: author.id,
            author_name: author.name.clone(),
            title: manuscript.title.clone(),
            score: metadata.score,
            category: metadata.category,
            summary: metadata.summary,
            content: manuscript.content.clone(),
            image_url: metadata.image_url,
            audio_url: metadata.audio_url,
        }
    }
}

/// Catalog answer to a registration request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogReceipt {
    pub success: bool,
    pub catalog_id: Option<CatalogId>,
    pub message: Option<String>,
}

impl CatalogReceipt {
    pub fn registered(catalog_id: CatalogId) -> Self {
        Self {
            success: true,
            catalog_id: Some(catalog_id),
            message: None,
        }
    }

    pub fn refused(message: impl Into<String>) -> Self {
        Self {
            success: false,
            catalog_id: None,
            message: Some(message.into()),
        }
    }
}

/// Why a run stopped at the guard without touching anything
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The manuscript no longer exists
    Missing,

    /// Someone moved the manuscript out of UNDER_REVIEW first
    StatusChanged { current: ManuscriptStatus },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Missing => f.write_str("manuscript no longer exists"),
            SkipReason::StatusChanged { current } => {
                write!(f, "manuscript status is {}, not UNDER_REVIEW", current)
            }
        }
    }
}

/// How a single publish run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PublishOutcome {
    /// Catalog registration succeeded and PUBLISHED was stored
    Published { catalog_id: Option<CatalogId> },

    /// A downstream step failed and REJECTED was stored
    Rejected { reason: String },

    /// The guard stopped the run; no remote call, no write
    Skipped { reason: SkipReason },

    /// The final status could not be stored; the record keeps its last written status
    Unreconciled {
        intended: ManuscriptStatus,
        reason: String,
    },
}

impl PublishOutcome {
    /// Status the run wrote, if it wrote one
    pub fn stored_status(&self) -> Option<ManuscriptStatus> {
        match self {
            PublishOutcome::Published { .. } => Some(ManuscriptStatus::Published),
            PublishOutcome::Rejected { .. } => Some(ManuscriptStatus::Rejected),
            PublishOutcome::Skipped { .. } | PublishOutcome::Unreconciled { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_entry_takes_title_and_content_from_manuscript() {
        let author = AuthorIdentity::new(AuthorId::generate(), "Ada");
        let manuscript = Manuscript::draft(author.id, "Engines", "Notes on engines");
        let metadata = ManuscriptMetadata {
            summary: "s".into(),
            category: "fiction".into(),
            score: 7,
            image_url: Some("http://img".into()),
            audio_url: None,
        };

        let entry = CatalogEntry::assemble(&author, &manuscript, metadata);

        assert_eq!(entry.author_id, author.id);
        assert_eq!(entry.author_name, "Ada");
        assert_eq!(entry.title, "Engines");
        assert_eq!(entry.content, "Notes on engines");
        assert_eq!(entry.score, 7);
        assert_eq!(entry.category, "fiction");
        assert_eq!(entry.image_url.as_deref(), Some("http://img"));
        assert!(entry.audio_url.is_none());
    }

    #[test]
    fn stored_status_matches_outcome() {
        assert_eq!(
            PublishOutcome::Published { catalog_id: None }.stored_status(),
            Some(ManuscriptStatus::Published)
        );
        assert_eq!(
            PublishOutcome::Skipped {
                reason: SkipReason::Missing
            }
            .stored_status(),
            None
        );
        assert_eq!(
            PublishOutcome::Unreconciled {
                intended: ManuscriptStatus::Rejected,
                reason: "store down".into(),
            }
            .stored_status(),
            None
        );
    }

    #[test]
    fn skip_reason_display() {
        let reason = SkipReason::StatusChanged {
            current: ManuscriptStatus::Draft,
        };
        assert_eq!(reason.to_string(), "manuscript status is DRAFT, not UNDER_REVIEW");
    }
}
