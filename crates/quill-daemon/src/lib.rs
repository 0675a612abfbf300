//! Quill daemon library
//!
//! Manuscript service with an asynchronous publish workflow:
//! - REST API for authors to manage and publish manuscripts
//! - Storage backends
//! - Clients for the metadata, catalog and author services
//! - The publish request handler and orchestrator
//! - Server lifecycle management

#![deny(unsafe_code)]

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod publish;
pub mod server;
pub mod storage;

pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError, PublishRequestError, RemoteError, StorageError};
pub use publish::{PublishAccepted, PublishOrchestrator, PublishRequestHandler};
pub use server::Server;
pub use storage::{InMemoryStorage, ManuscriptStore, StatusUpdate};
