//! Quill Types - Core types for the manuscript publishing workflow
//!
//! Quill tracks a manuscript through its editorial lifecycle and, on request,
//! publishes it by enriching it with generated metadata and registering it
//! in an external catalog.
//!
//! ## Key Concepts
//!
//! - **Manuscript**: The aggregate owned by the store (title, content, status)
//! - **ManuscriptStatus**: The status state machine and its legal edges
//! - **PublishJob**: Immutable payload handed to a detached publish run
//! - **ManuscriptMetadata**: Output of the metadata-generation service
//! - **CatalogEntry / CatalogReceipt**: Catalog registration request and result
//! - **PublishOutcome**: How a single publish run ended

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod author;
pub mod error;
pub mod ids;
pub mod manuscript;
pub mod publish;
pub mod status;

// Re-export main types
pub use author::{AuthorIdentity, Credential};
pub use error::{ManuscriptError, TransitionError};
pub use ids::{AuthorId, CatalogId, ManuscriptId};
pub use manuscript::{Manuscript, ManuscriptEdit};
pub use publish::{
    CatalogEntry, CatalogReceipt, ManuscriptMetadata, PublishJob, PublishOutcome, SkipReason,
};
pub use status::ManuscriptStatus;
