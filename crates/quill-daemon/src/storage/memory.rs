//! In-memory storage implementation

use super::traits::*;
use crate::error::StorageError;
use async_trait::async_trait;
use quill_types::{AuthorId, Manuscript, ManuscriptId, ManuscriptStatus};
use std::collections::{hash_map::Entry, HashMap};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::RwLock;

/// In-memory storage for development and testing
#[derive(Debug)]
pub struct InMemoryStorage {
    manuscripts: Arc<RwLock<HashMap<ManuscriptId, Manuscript>>>,
    writes: Arc<AtomicU64>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            manuscripts: Arc::new(RwLock::new(HashMap::new())),
            writes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of successful mutations since creation
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ManuscriptStore for InMemoryStorage {
    async fn get_manuscript(&self, id: &ManuscriptId) -> StorageResult<Option<Manuscript>> {
        let manuscripts = self.manuscripts.read().await;
        Ok(manuscripts.get(id).cloned())
    }

    async fn list_manuscripts_for_author(
        &self,
        author_id: &AuthorId,
    ) -> StorageResult<Vec<Manuscript>> {
        let manuscripts = self.manuscripts.read().await;
        let mut owned: Vec<_> = manuscripts
            .values()
            .filter(|m| &m.author_id == author_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn list_manuscripts(&self) -> StorageResult<Vec<Manuscript>> {
        let manuscripts = self.manuscripts.read().await;
        Ok(manuscripts.values().cloned().collect())
    }

    async fn upsert_manuscript(&self, manuscript: Manuscript) -> StorageResult<()> {
        let mut manuscripts = self.manuscripts.write().await;
        manuscripts.insert(manuscript.id, manuscript);
        self.record_write();
        Ok(())
    }

    async fn update_manuscript(
        &self,
        manuscript: Manuscript,
        expected: ManuscriptStatus,
    ) -> StorageResult<StatusUpdate> {
        let mut manuscripts = self.manuscripts.write().await;
        let Some(stored) = manuscripts.get_mut(&manuscript.id) else {
            return Ok(StatusUpdate::Missing);
        };

        if stored.status != expected {
            return Ok(StatusUpdate::Conflict {
                current: stored.status,
            });
        }

        *stored = manuscript;
        self.record_write();

        Ok(StatusUpdate::Applied(stored.clone()))
    }

    async fn delete_manuscript(
        &self,
        id: &ManuscriptId,
        expected: &[ManuscriptStatus],
    ) -> StorageResult<StatusUpdate> {
        let mut manuscripts = self.manuscripts.write().await;
        let Entry::Occupied(entry) = manuscripts.entry(*id) else {
            return Ok(StatusUpdate::Missing);
        };

        let current = entry.get().status;
        if !expected.contains(&current) {
            return Ok(StatusUpdate::Conflict { current });
        }

        let removed = entry.remove();
        self.record_write();

        Ok(StatusUpdate::Applied(removed))
    }

    async fn transition_status(
        &self,
        id: &ManuscriptId,
        expected: &[ManuscriptStatus],
        next: ManuscriptStatus,
    ) -> StorageResult<StatusUpdate> {
        let mut manuscripts = self.manuscripts.write().await;
        let Some(manuscript) = manuscripts.get_mut(id) else {
            return Ok(StatusUpdate::Missing);
        };

        if !expected.contains(&manuscript.status) {
            return Ok(StatusUpdate::Conflict {
                current: manuscript.status,
            });
        }

        let status = manuscript.status.transition(next).map_err(StorageError::from)?;
        manuscript.status = status;
        manuscript.updated_at = chrono::Utc::now();
        self.record_write();

        Ok(StatusUpdate::Applied(manuscript.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_types::TransitionError;

    #[tokio::test]
    async fn test_upsert_and_get() {
        let storage = InMemoryStorage::new();
        let m = Manuscript::draft(AuthorId::generate(), "T", "C");
        storage.upsert_manuscript(m.clone()).await.unwrap();

        assert_eq!(storage.get_manuscript(&m.id).await.unwrap(), Some(m));
        assert_eq!(storage.write_count(), 1);
    }

    #[tokio::test]
    async fn test_list_for_author_filters_and_orders() {
        let storage = InMemoryStorage::new();
        let author = AuthorId::generate();
        let mut older = Manuscript::draft(author, "old", "");
        older.created_at -= chrono::Duration::minutes(5);
        let newer = Manuscript::draft(author, "new", "");
        let foreign = Manuscript::draft(AuthorId::generate(), "other", "");

        for m in [older.clone(), newer.clone(), foreign] {
            storage.upsert_manuscript(m).await.unwrap();
        }

        let listed = storage.list_manuscripts_for_author(&author).await.unwrap();
        let titles: Vec<_> = listed.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_a_write() {
        let storage = InMemoryStorage::new();
        let update = storage
            .delete_manuscript(&ManuscriptId::generate(), &ManuscriptStatus::ALL)
            .await
            .unwrap();
        assert_eq!(update, StatusUpdate::Missing);
        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_only_from_expected_status() {
        let storage = InMemoryStorage::new();
        let m = Manuscript::draft(AuthorId::generate(), "T", "C");
        storage.upsert_manuscript(m.clone()).await.unwrap();
        storage
            .transition_status(&m.id, &[ManuscriptStatus::Draft], ManuscriptStatus::UnderReview)
            .await
            .unwrap();

        let update = storage
            .delete_manuscript(&m.id, &[ManuscriptStatus::Draft])
            .await
            .unwrap();

        assert_eq!(
            update,
            StatusUpdate::Conflict {
                current: ManuscriptStatus::UnderReview
            }
        );
        assert_eq!(storage.write_count(), 2);
        assert!(storage.get_manuscript(&m.id).await.unwrap().is_some());

        let update = storage
            .delete_manuscript(&m.id, &[ManuscriptStatus::UnderReview])
            .await
            .unwrap();
        assert!(matches!(update, StatusUpdate::Applied(removed) if removed.id == m.id));
        assert!(storage.get_manuscript(&m.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_transition_applies_when_expected() {
        let storage = InMemoryStorage::new();
        let m = Manuscript::draft(AuthorId::generate(), "T", "C");
        storage.upsert_manuscript(m.clone()).await.unwrap();

        let update = storage
            .transition_status(
                &m.id,
                &ManuscriptStatus::PUBLISHABLE,
                ManuscriptStatus::UnderReview,
            )
            .await
            .unwrap();

        match update {
            StatusUpdate::Applied(stored) => {
                assert_eq!(stored.status, ManuscriptStatus::UnderReview);
                assert_eq!(stored.title, "T");
            }
            other => panic!("unexpected update: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transition_conflict_writes_nothing() {
        let storage = InMemoryStorage::new();
        let m = Manuscript::draft(AuthorId::generate(), "T", "C");
        storage.upsert_manuscript(m.clone()).await.unwrap();

        let update = storage
            .transition_status(
                &m.id,
                &[ManuscriptStatus::UnderReview],
                ManuscriptStatus::Published,
            )
            .await
            .unwrap();

        assert_eq!(
            update,
            StatusUpdate::Conflict {
                current: ManuscriptStatus::Draft
            }
        );
        assert_eq!(storage.write_count(), 1);
    }

    #[tokio::test]
    async fn test_transition_missing() {
        let storage = InMemoryStorage::new();
        let update = storage
            .transition_status(
                &ManuscriptId::generate(),
                &[ManuscriptStatus::UnderReview],
                ManuscriptStatus::Rejected,
            )
            .await
            .unwrap();
        assert_eq!(update, StatusUpdate::Missing);
    }

    #[tokio::test]
    async fn test_transition_rejects_illegal_edge() {
        let storage = InMemoryStorage::new();
        let m = Manuscript::draft(AuthorId::generate(), "T", "C");
        storage.upsert_manuscript(m.clone()).await.unwrap();

        let err = storage
            .transition_status(&m.id, &[ManuscriptStatus::Draft], ManuscriptStatus::Published)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StorageError::InvalidTransition(TransitionError {
                from: ManuscriptStatus::Draft,
                to: ManuscriptStatus::Published,
            })
        ));
        let stored = storage.get_manuscript(&m.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ManuscriptStatus::Draft);
    }

    #[tokio::test]
    async fn test_update_only_when_status_unchanged() {
        let storage = InMemoryStorage::new();
        let m = Manuscript::draft(AuthorId::generate(), "T", "C");
        storage.upsert_manuscript(m.clone()).await.unwrap();

        let mut edited = m.clone();
        edited.title = "T2".into();
        let update = storage
            .update_manuscript(edited.clone(), ManuscriptStatus::Draft)
            .await
            .unwrap();
        assert_eq!(update, StatusUpdate::Applied(edited.clone()));

        storage
            .transition_status(&m.id, &[ManuscriptStatus::Draft], ManuscriptStatus::UnderReview)
            .await
            .unwrap();
        let mut stale = edited;
        stale.title = "T3".into();
        let update = storage
            .update_manuscript(stale, ManuscriptStatus::Draft)
            .await
            .unwrap();

        assert_eq!(
            update,
            StatusUpdate::Conflict {
                current: ManuscriptStatus::UnderReview
            }
        );
        let stored = storage.get_manuscript(&m.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "T2");
        assert_eq!(stored.status, ManuscriptStatus::UnderReview);
    }
}
