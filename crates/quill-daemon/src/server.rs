//! Server setup and lifecycle management

use crate::api::{create_router, rest::AppState};
use crate::clients::{
    AuthorDirectory, CatalogService, HttpAuthorDirectory, HttpCatalogService,
    HttpMetadataService, MetadataService,
};
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use crate::publish::{PublishOrchestrator, PublishRequestHandler};
use crate::storage::{InMemoryStorage, ManuscriptStore};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Quill daemon server
pub struct Server {
    config: DaemonConfig,
    state: AppState,
}

impl Server {
    /// Create a server talking to the services named in `config`
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let store: Arc<dyn ManuscriptStore> = Arc::new(InMemoryStorage::new());
        let metadata: Arc<dyn MetadataService> =
            Arc::new(HttpMetadataService::new(&config.services.metadata)?);
        let catalog: Arc<dyn CatalogService> =
            Arc::new(HttpCatalogService::new(&config.services.catalog)?);
        let authors: Arc<dyn AuthorDirectory> =
            Arc::new(HttpAuthorDirectory::new(&config.services.authors)?);

        Ok(Self::with_parts(config, store, authors, metadata, catalog))
    }

    /// Create a server from explicit collaborators
    pub fn with_parts(
        config: DaemonConfig,
        store: Arc<dyn ManuscriptStore>,
        authors: Arc<dyn AuthorDirectory>,
        metadata: Arc<dyn MetadataService>,
        catalog: Arc<dyn CatalogService>,
    ) -> Self {
        let orchestrator = Arc::new(PublishOrchestrator::new(store.clone(), metadata, catalog));
        let publisher = Arc::new(PublishRequestHandler::new(store.clone(), orchestrator));
        let state = AppState::new(store, authors, publisher);

        Self { config, state }
    }

    /// The HTTP router with all routes and middleware
    pub fn router(&self) -> Router {
        create_router(self.state.clone(), self.config.server.enable_cors)
    }

    /// Run the server until Ctrl+C or SIGTERM
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;
        let app = self.router();

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Quill daemon listening on {}", addr);
        tracing::info!(
            metadata = %self.config.services.metadata.base_url,
            catalog = %self.config.services.catalog.base_url,
            authors = %self.config.services.authors.base_url,
            "Remote services"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        let in_flight = self.state.publisher.in_flight();
        if in_flight > 0 {
            tracing::warn!(
                in_flight,
                "Quill daemon shutting down with publish runs in flight; their manuscripts stay UNDER_REVIEW"
            );
        } else {
            tracing::info!("Quill daemon shutting down");
        }

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
