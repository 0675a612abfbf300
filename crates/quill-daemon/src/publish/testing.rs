//! In-process fakes for the publish workflow tests

use crate::clients::{CatalogService, MetadataService};
use crate::error::{RemoteError, RemoteResult, StorageError};
use crate::storage::{InMemoryStorage, ManuscriptStore, StatusUpdate, StorageResult};
use async_trait::async_trait;
use quill_types::{
    AuthorId, CatalogEntry, CatalogId, CatalogReceipt, Credential, Manuscript, ManuscriptId,
    ManuscriptMetadata, ManuscriptStatus,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Hook = Box<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub(crate) fn sample_metadata() -> ManuscriptMetadata {
    ManuscriptMetadata {
        summary: "s".into(),
        category: "fiction".into(),
        score: 7,
        image_url: None,
        audio_url: None,
    }
}

/// Metadata service that answers from a script and counts calls
pub(crate) struct FakeMetadata {
    fail: bool,
    calls: AtomicUsize,
    watched: Option<Arc<dyn ManuscriptStore>>,
    observed: Mutex<Vec<ManuscriptStatus>>,
}

impl FakeMetadata {
    pub(crate) fn succeeding() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
            watched: None,
            observed: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::succeeding()
        }
    }

    /// Record the stored status of the manuscript (matched by title) on every call
    pub(crate) fn watching(mut self, store: Arc<dyn ManuscriptStore>) -> Self {
        self.watched = Some(store);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn observed_statuses(&self) -> Vec<ManuscriptStatus> {
        self.observed.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataService for FakeMetadata {
    async fn generate_metadata(
        &self,
        title: &str,
        _author_name: &str,
        _content: &str,
        _credential: &Credential,
    ) -> RemoteResult<ManuscriptMetadata> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(store) = &self.watched {
            let statuses: Vec<_> = store
                .list_manuscripts()
                .await
                .unwrap()
                .into_iter()
                .filter(|m| m.title == title)
                .map(|m| m.status)
                .collect();
            self.observed.lock().unwrap().extend(statuses);
        }

        if self.fail {
            return Err(RemoteError::Status {
                service: "metadata service",
                status: 500,
                body: "model unavailable".into(),
            });
        }
        Ok(sample_metadata())
    }
}

enum CatalogScript {
    Register(CatalogId),
    Refuse(String),
    Fail,
}

/// Catalog service that answers from a script and keeps what it was sent
pub(crate) struct FakeCatalog {
    script: CatalogScript,
    entries: Mutex<Vec<CatalogEntry>>,
    hook: Mutex<Option<Hook>>,
}

impl FakeCatalog {
    fn with(script: CatalogScript) -> Self {
        Self {
            script,
            entries: Mutex::new(Vec::new()),
            hook: Mutex::new(None),
        }
    }

    pub(crate) fn registering(id: &str) -> Self {
        Self::with(CatalogScript::Register(CatalogId::new(id)))
    }

    pub(crate) fn refusing(message: &str) -> Self {
        Self::with(CatalogScript::Refuse(message.to_string()))
    }

    pub(crate) fn failing() -> Self {
        Self::with(CatalogScript::Fail)
    }

    /// Run `hook` after the entry is received and before answering
    pub(crate) fn before_answer<F>(&self, hook: F)
    where
        F: Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync + 'static,
    {
        *self.hook.lock().unwrap() = Some(Box::new(hook));
    }

    pub(crate) fn calls(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub(crate) fn entries(&self) -> Vec<CatalogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogService for FakeCatalog {
    async fn register(
        &self,
        entry: &CatalogEntry,
        _credential: &Credential,
    ) -> RemoteResult<CatalogReceipt> {
        self.entries.lock().unwrap().push(entry.clone());

        let pending = self.hook.lock().unwrap().as_ref().map(|hook| hook());
        if let Some(pending) = pending {
            pending.await;
        }

        match &self.script {
            CatalogScript::Register(id) => Ok(CatalogReceipt::registered(id.clone())),
            CatalogScript::Refuse(message) => Ok(CatalogReceipt::refused(message.clone())),
            CatalogScript::Fail => Err(RemoteError::Timeout {
                service: "catalog service",
            }),
        }
    }
}

/// In-memory store whose reads or status updates can be switched to fail
pub(crate) struct FlakyStore {
    inner: Arc<InMemoryStorage>,
    fail_reads: AtomicBool,
    fail_transitions: AtomicBool,
}

impl FlakyStore {
    pub(crate) fn new(inner: Arc<InMemoryStorage>) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_transitions: AtomicBool::new(false),
        }
    }

    pub(crate) fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_transitions(&self, fail: bool) {
        self.fail_transitions.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn write_count(&self) -> u64 {
        self.inner.write_count()
    }

    fn unavailable() -> StorageError {
        StorageError::Connection("store unavailable".into())
    }
}

#[async_trait]
impl ManuscriptStore for FlakyStore {
    async fn get_manuscript(&self, id: &ManuscriptId) -> StorageResult<Option<Manuscript>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.get_manuscript(id).await
    }

    async fn list_manuscripts_for_author(
        &self,
        author_id: &AuthorId,
    ) -> StorageResult<Vec<Manuscript>> {
        self.inner.list_manuscripts_for_author(author_id).await
    }

    async fn list_manuscripts(&self) -> StorageResult<Vec<Manuscript>> {
        self.inner.list_manuscripts().await
    }

    async fn upsert_manuscript(&self, manuscript: Manuscript) -> StorageResult<()> {
        self.inner.upsert_manuscript(manuscript).await
    }

    async fn update_manuscript(
        &self,
        manuscript: Manuscript,
        expected: ManuscriptStatus,
    ) -> StorageResult<StatusUpdate> {
        self.inner.update_manuscript(manuscript, expected).await
    }

    async fn delete_manuscript(
        &self,
        id: &ManuscriptId,
        expected: &[ManuscriptStatus],
    ) -> StorageResult<StatusUpdate> {
        self.inner.delete_manuscript(id, expected).await
    }

    async fn transition_status(
        &self,
        id: &ManuscriptId,
        expected: &[ManuscriptStatus],
        next: ManuscriptStatus,
    ) -> StorageResult<StatusUpdate> {
        if self.fail_transitions.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.transition_status(id, expected, next).await
    }
}

/// Poll until the manuscript reaches `status` or two seconds pass
pub(crate) async fn wait_for_status(
    store: &dyn ManuscriptStore,
    id: &ManuscriptId,
    status: ManuscriptStatus,
) -> Manuscript {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let current = store.get_manuscript(id).await.unwrap().unwrap();
        if current.status == status {
            return current;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "manuscript stuck in {} waiting for {}",
            current.status,
            status
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
