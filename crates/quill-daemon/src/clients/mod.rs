//! Remote collaborators
//!
//! Each collaborator is a trait so the publish workflow can run against
//! in-process fakes; the HTTP implementations speak the wire formats of the
//! metadata, catalog and author services.

mod authors;
mod catalog;
mod metadata;

pub use authors::{AuthorRecord, HttpAuthorDirectory};
pub use catalog::HttpCatalogService;
pub use metadata::HttpMetadataService;

use crate::error::{RemoteError, RemoteResult};
use async_trait::async_trait;
use quill_types::{CatalogEntry, CatalogReceipt, Credential, ManuscriptMetadata};
use reqwest::{header::AUTHORIZATION, Client, RequestBuilder, Response};
use std::time::Duration;

/// Generates summary, category, score and media for a manuscript
#[async_trait]
pub trait MetadataService: Send + Sync {
    async fn generate_metadata(
        &self,
        title: &str,
        author_name: &str,
        content: &str,
        credential: &Credential,
    ) -> RemoteResult<ManuscriptMetadata>;
}

/// Registers published works
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// A refusal is reported as `Ok` with `success == false`
    async fn register(
        &self,
        entry: &CatalogEntry,
        credential: &Credential,
    ) -> RemoteResult<CatalogReceipt>;
}

/// Resolves a caller credential to the author record behind it
#[async_trait]
pub trait AuthorDirectory: Send + Sync {
    async fn resolve(&self, credential: &Credential) -> RemoteResult<AuthorRecord>;
}

/// Build a client whose requests give up after `timeout`
pub(crate) fn build_http_client(
    service: &'static str,
    timeout: Duration,
) -> RemoteResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| RemoteError::Setup {
            service,
            message: e.to_string(),
        })
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Send with the caller's credential and fail on non-success statuses
pub(crate) async fn send_authorized(
    service: &'static str,
    request: RequestBuilder,
    credential: &Credential,
) -> RemoteResult<Response> {
    let response = request
        .header(AUTHORIZATION, credential.expose())
        .send()
        .await
        .map_err(|e| RemoteError::from_reqwest(service, e))?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(RemoteError::Status {
            service,
            status,
            body: truncate(&body, 320),
        });
    }

    Ok(response)
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max_chars).collect();
    out.push('…');
    out
}
