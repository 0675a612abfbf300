//! Publish orchestrator
//!
//! Runs one publish saga for a manuscript that a publish request moved to
//! UNDER_REVIEW:
//!
//! 1. guard: re-read the record and stop quietly unless it is still UNDER_REVIEW
//! 2. enrich: ask the metadata service for summary, category, score and media
//! 3. register: hand the enriched work to the catalog
//! 4. reconcile: store PUBLISHED on a successful registration, REJECTED otherwise
//!
//! There is one attempt per remote call and no per-step compensation. The
//! metadata call has no side effect to undo, and the catalog registration
//! either happened or the manuscript is rejected as a whole.
//!
//! The guard is an optimistic read, not a lock. Two runs for the same
//! manuscript can both pass it and both call the catalog. The final write is
//! conditional on UNDER_REVIEW, so neither run can overwrite a status that
//! changed after its guard.

use crate::clients::{CatalogService, MetadataService};
use crate::error::RemoteError;
use crate::storage::{ManuscriptStore, StatusUpdate};
use quill_types::{
    CatalogEntry, CatalogId, CatalogReceipt, Manuscript, ManuscriptStatus, PublishJob,
    PublishOutcome, SkipReason,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// What the saga decided before the final write
#[derive(Debug)]
enum Verdict {
    Publish { catalog_id: Option<CatalogId> },
    Reject { reason: String },
}

impl Verdict {
    fn status(&self) -> ManuscriptStatus {
        match self {
            Verdict::Publish { .. } => ManuscriptStatus::Published,
            Verdict::Reject { .. } => ManuscriptStatus::Rejected,
        }
    }

    fn into_outcome(self) -> PublishOutcome {
        match self {
            Verdict::Publish { catalog_id } => PublishOutcome::Published { catalog_id },
            Verdict::Reject { reason } => PublishOutcome::Rejected { reason },
        }
    }
}

/// Drives the publish saga against the store and the two remote services
pub struct PublishOrchestrator {
    store: Arc<dyn ManuscriptStore>,
    metadata: Arc<dyn MetadataService>,
    catalog: Arc<dyn CatalogService>,
}

impl PublishOrchestrator {
    pub fn new(
        store: Arc<dyn ManuscriptStore>,
        metadata: Arc<dyn MetadataService>,
        catalog: Arc<dyn CatalogService>,
    ) -> Self {
        Self {
            store,
            metadata,
            catalog,
        }
    }

    /// Run the saga to completion.
    ///
    /// Every failure ends up in the returned outcome or the log; nothing is
    /// propagated because nobody is waiting on a detached run.
    pub async fn run(&self, job: PublishJob) -> PublishOutcome {
        let span = tracing::info_span!(
            "publish",
            manuscript_id = %job.manuscript_id,
            author_id = %job.author.id,
        );
        self.run_saga(job).instrument(span).await
    }

    async fn run_saga(&self, job: PublishJob) -> PublishOutcome {
        let started = Instant::now();
        tracing::info!(author_name = %job.author.name, "Publish run started");

        let manuscript = match self.store.get_manuscript(&job.manuscript_id).await {
            Ok(Some(m)) if m.status == ManuscriptStatus::UnderReview => m,
            Ok(Some(m)) => {
                let reason = SkipReason::StatusChanged { current: m.status };
                tracing::warn!(%reason, "Publish run skipped");
                return PublishOutcome::Skipped { reason };
            }
            Ok(None) => {
                tracing::warn!("Publish run skipped: manuscript no longer exists");
                return PublishOutcome::Skipped {
                    reason: SkipReason::Missing,
                };
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to re-read manuscript");
                let verdict = Verdict::Reject {
                    reason: format!("failed to re-read manuscript: {}", e),
                };
                return self.reconcile(&job, verdict, started).await;
            }
        };

        let verdict = match self.enrich_and_register(&job, &manuscript).await {
            Ok(receipt) if receipt.success => Verdict::Publish {
                catalog_id: receipt.catalog_id,
            },
            Ok(receipt) => Verdict::Reject {
                reason: format!(
                    "catalog refused registration: {}",
                    receipt.message.as_deref().unwrap_or("no reason given")
                ),
            },
            Err(e) => Verdict::Reject {
                reason: e.to_string(),
            },
        };

        self.reconcile(&job, verdict, started).await
    }

    async fn enrich_and_register(
        &self,
        job: &PublishJob,
        manuscript: &Manuscript,
    ) -> Result<CatalogReceipt, RemoteError> {
        tracing::debug!(
            title = %manuscript.title,
            content_chars = manuscript.content_chars(),
            "Requesting metadata"
        );
        let step = Instant::now();
        let metadata = self
            .metadata
            .generate_metadata(
                &manuscript.title,
                &job.author.name,
                &manuscript.content,
                &job.credential,
            )
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Metadata generation failed"))?;
        tracing::info!(
            elapsed_ms = elapsed_ms(step),
            category = %metadata.category,
            score = metadata.score,
            has_image = metadata.image_url.is_some(),
            has_audio = metadata.audio_url.is_some(),
            "Metadata generated"
        );

        let entry = CatalogEntry::assemble(&job.author, manuscript, metadata);
        let step = Instant::now();
        let receipt = self
            .catalog
            .register(&entry, &job.credential)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Catalog registration failed"))?;
        tracing::info!(
            elapsed_ms = elapsed_ms(step),
            success = receipt.success,
            catalog_id = receipt.catalog_id.as_ref().map(|id| id.as_str()).unwrap_or("-"),
            message = receipt.message.as_deref().unwrap_or(""),
            "Catalog answered"
        );

        Ok(receipt)
    }

    /// Store the verdict if the manuscript is still UNDER_REVIEW
    async fn reconcile(
        &self,
        job: &PublishJob,
        verdict: Verdict,
        started: Instant,
    ) -> PublishOutcome {
        let intended = verdict.status();
        let update = self
            .store
            .transition_status(
                &job.manuscript_id,
                &[ManuscriptStatus::UnderReview],
                intended,
            )
            .await;

        match update {
            Ok(StatusUpdate::Applied(_)) => {
                let outcome = verdict.into_outcome();
                match &outcome {
                    PublishOutcome::Rejected { reason } => tracing::warn!(
                        total_ms = elapsed_ms(started),
                        %reason,
                        "Manuscript rejected"
                    ),
                    _ => tracing::info!(total_ms = elapsed_ms(started), "Manuscript published"),
                }
                outcome
            }
            Ok(StatusUpdate::Missing) => {
                tracing::warn!(%intended, "Manuscript vanished before the final status could be stored");
                PublishOutcome::Unreconciled {
                    intended,
                    reason: "manuscript no longer exists".to_string(),
                }
            }
            Ok(StatusUpdate::Conflict { current }) => {
                tracing::warn!(%intended, %current, "Manuscript left UNDER_REVIEW during the run; keeping newer status");
                PublishOutcome::Unreconciled {
                    intended,
                    reason: format!("status changed to {} during the run", current),
                }
            }
            Err(e) => {
                tracing::error!(%intended, error = %e, "Failed to store final status");
                PublishOutcome::Unreconciled {
                    intended,
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis().min(u64::MAX as u128) as u64
}
