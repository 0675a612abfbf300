//! Application state for API handlers

use crate::clients::AuthorDirectory;
use crate::publish::PublishRequestHandler;
use crate::storage::ManuscriptStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Manuscript storage
    pub store: Arc<dyn ManuscriptStore>,

    /// Resolves caller credentials to authors
    pub authors: Arc<dyn AuthorDirectory>,

    /// Accepts publish requests and dispatches publish runs
    pub publisher: Arc<PublishRequestHandler>,

    /// Daemon version
    pub version: String,

    /// Daemon start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        store: Arc<dyn ManuscriptStore>,
        authors: Arc<dyn AuthorDirectory>,
        publisher: Arc<PublishRequestHandler>,
    ) -> Self {
        Self {
            store,
            authors,
            publisher,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    /// Get uptime as a human-readable string
    pub fn uptime(&self) -> String {
        let secs = (chrono::Utc::now() - self.started_at).num_seconds();

        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else if secs < 86400 {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        } else {
            format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
        }
    }
}
