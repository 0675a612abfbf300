//! HTTP client for the catalog service

use super::{build_http_client, endpoint, send_authorized, CatalogService};
use crate::config::RemoteServiceConfig;
use crate::error::{RemoteError, RemoteResult};
use async_trait::async_trait;
use quill_types::{AuthorId, CatalogEntry, CatalogId, CatalogReceipt, Credential};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const SERVICE: &str = "catalog service";

#[derive(Debug, Serialize)]
struct CreateBookRequest<'a> {
    author_id: AuthorId,
    author_name: &'a str,
    title: &'a str,
    point: i32,
    category: &'a str,
    summary: &'a str,
    content: &'a str,
    image_url: Option<&'a str>,
    audio_url: Option<&'a str>,
}

impl<'a> From<&'a CatalogEntry> for CreateBookRequest<'a> {
    fn from(entry: &'a CatalogEntry) -> Self {
        Self {
            author_id: entry.author_id,
            author_name: &entry.author_name,
            title: &entry.title,
            point: entry.score,
            category: &entry.category,
            summary: &entry.summary,
            content: &entry.content,
            image_url: entry.image_url.as_deref(),
            audio_url: entry.audio_url.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateBookResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "bookId")]
    book_id: Option<String>,
}

/// `POST {base_url}/books/create`
pub struct HttpCatalogService {
    client: Client,
    url: String,
}

impl HttpCatalogService {
    pub fn new(config: &RemoteServiceConfig) -> RemoteResult<Self> {
        Ok(Self {
            client: build_http_client(SERVICE, config.timeout())?,
            url: endpoint(&config.base_url, "/books/create"),
        })
    }
}

#[async_trait]
impl CatalogService for HttpCatalogService {
    async fn register(
        &self,
        entry: &CatalogEntry,
        credential: &Credential,
    ) -> RemoteResult<CatalogReceipt> {
        let request = self
            .client
            .post(&self.url)
            .json(&CreateBookRequest::from(entry));

        let response = send_authorized(SERVICE, request, credential).await?;
        let body: CreateBookResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::from_reqwest(SERVICE, e))?;

        Ok(CatalogReceipt {
            success: body.success,
            catalog_id: body.book_id.map(CatalogId::new),
            message: body.message,
        })
    }
}
