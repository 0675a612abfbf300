//! Publish requests
//!
//! Validates a request synchronously, moves the manuscript to UNDER_REVIEW and
//! hands the rest to a detached [`PublishOrchestrator`] run. The caller gets
//! an acknowledgement, never the run's outcome.

use super::PublishOrchestrator;
use crate::error::PublishRequestError;
use crate::storage::{ManuscriptStore, StatusUpdate};
use quill_types::{AuthorIdentity, Credential, ManuscriptId, ManuscriptStatus, PublishJob};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Acknowledgement for an accepted publish request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishAccepted {
    pub manuscript_id: ManuscriptId,

    /// Status the manuscript had before it moved to UNDER_REVIEW
    pub previous_status: ManuscriptStatus,
}

/// Entry point for publish requests
pub struct PublishRequestHandler {
    store: Arc<dyn ManuscriptStore>,
    orchestrator: Arc<PublishOrchestrator>,
    in_flight: Arc<AtomicUsize>,
}

impl PublishRequestHandler {
    pub fn new(store: Arc<dyn ManuscriptStore>, orchestrator: Arc<PublishOrchestrator>) -> Self {
        Self {
            store,
            orchestrator,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of publish runs started and not yet finished
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Accept or refuse a publish request.
    ///
    /// On success the manuscript is UNDER_REVIEW before this returns and a
    /// publish run has been dispatched. On any error nothing was written and
    /// nothing was dispatched.
    pub async fn request_publish(
        &self,
        manuscript_id: ManuscriptId,
        author: AuthorIdentity,
        credential: Credential,
    ) -> Result<PublishAccepted, PublishRequestError> {
        let manuscript = self
            .store
            .get_manuscript(&manuscript_id)
            .await?
            .ok_or(PublishRequestError::NotFound(manuscript_id))?;

        if !manuscript.is_owned_by(&author.id) {
            tracing::warn!(
                manuscript_id = %manuscript_id,
                author_id = %author.id,
                "Publish refused: not the owner"
            );
            return Err(PublishRequestError::Forbidden(manuscript_id));
        }

        if !manuscript.status.is_publishable() {
            return Err(PublishRequestError::InvalidState {
                id: manuscript_id,
                status: manuscript.status,
            });
        }

        match self
            .store
            .transition_status(
                &manuscript_id,
                &ManuscriptStatus::PUBLISHABLE,
                ManuscriptStatus::UnderReview,
            )
            .await?
        {
            StatusUpdate::Applied(_) => {}
            StatusUpdate::Missing => return Err(PublishRequestError::NotFound(manuscript_id)),
            StatusUpdate::Conflict { current } => {
                return Err(PublishRequestError::InvalidState {
                    id: manuscript_id,
                    status: current,
                })
            }
        }

        tracing::info!(
            manuscript_id = %manuscript_id,
            author_id = %author.id,
            from = %manuscript.status,
            "Publish request accepted"
        );

        self.dispatch(PublishJob::new(manuscript_id, author, credential));

        Ok(PublishAccepted {
            manuscript_id,
            previous_status: manuscript.status,
        })
    }

    fn dispatch(&self, job: PublishJob) {
        let orchestrator = self.orchestrator.clone();
        let guard = InFlight::enter(self.in_flight.clone());

        tokio::spawn(async move {
            let outcome = orchestrator.run(job).await;
            tracing::debug!(?outcome, "Publish run finished");
            drop(guard);
        });
    }
}

/// Counts a run as in flight until dropped, including on panic
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
