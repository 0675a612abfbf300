//! Storage trait definitions

use crate::error::StorageError;
use async_trait::async_trait;
use quill_types::{AuthorId, Manuscript, ManuscriptId, ManuscriptStatus};

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result of a conditional status update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The status was changed; carries the stored record
    Applied(Manuscript),

    /// No record with that id
    Missing,

    /// The stored status was not one of the expected ones; nothing was written
    Conflict { current: ManuscriptStatus },
}

/// Durable manuscript storage
///
/// Every method is atomic for a single manuscript id.
#[async_trait]
pub trait ManuscriptStore: Send + Sync {
    /// Get a manuscript by ID
    async fn get_manuscript(&self, id: &ManuscriptId) -> StorageResult<Option<Manuscript>>;

    /// List an author's manuscripts, newest first
    async fn list_manuscripts_for_author(
        &self,
        author_id: &AuthorId,
    ) -> StorageResult<Vec<Manuscript>>;

    /// List every manuscript
    async fn list_manuscripts(&self) -> StorageResult<Vec<Manuscript>>;

    /// Create or replace a manuscript
    async fn upsert_manuscript(&self, manuscript: Manuscript) -> StorageResult<()>;

    /// Replace a stored manuscript if its stored status is still `expected`
    async fn update_manuscript(
        &self,
        manuscript: Manuscript,
        expected: ManuscriptStatus,
    ) -> StorageResult<StatusUpdate>;

    /// Delete a manuscript if its stored status is one of `expected`.
    ///
    /// `Applied` carries the removed record.
    async fn delete_manuscript(
        &self,
        id: &ManuscriptId,
        expected: &[ManuscriptStatus],
    ) -> StorageResult<StatusUpdate>;

    /// Set the status to `next` if the stored status is one of `expected`.
    ///
    /// Read, check and write happen under one lock. The edge must also be
    /// permitted by the state machine, otherwise `InvalidTransition` is returned.
    async fn transition_status(
        &self,
        id: &ManuscriptId,
        expected: &[ManuscriptStatus],
        next: ManuscriptStatus,
    ) -> StorageResult<StatusUpdate>;
}
