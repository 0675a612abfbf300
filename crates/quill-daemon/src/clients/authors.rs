//! HTTP client for the author directory

use super::{build_http_client, endpoint, send_authorized, AuthorDirectory};
use crate::config::RemoteServiceConfig;
use crate::error::{RemoteError, RemoteResult};
use async_trait::async_trait;
use quill_types::{AuthorId, AuthorIdentity, Credential};
use reqwest::Client;
use serde::Deserialize;

const SERVICE: &str = "author directory";
const APPROVED: &str = "APPROVED";

/// Author as known to the directory
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthorRecord {
    pub id: AuthorId,
    pub name: String,
    pub status: String,
}

impl AuthorRecord {
    pub fn is_approved(&self) -> bool {
        self.status == APPROVED
    }

    /// The identity the publish workflow acts on, if the author is approved
    pub fn into_identity(self) -> Option<AuthorIdentity> {
        self.is_approved()
            .then(|| AuthorIdentity::new(self.id, self.name))
    }
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<AuthorRecord>,
}

/// `GET {base_url}/authors/status`
pub struct HttpAuthorDirectory {
    client: Client,
    url: String,
}

impl HttpAuthorDirectory {
    pub fn new(config: &RemoteServiceConfig) -> RemoteResult<Self> {
        Ok(Self {
            client: build_http_client(SERVICE, config.timeout())?,
            url: endpoint(&config.base_url, "/authors/status"),
        })
    }
}

#[async_trait]
impl AuthorDirectory for HttpAuthorDirectory {
    async fn resolve(&self, credential: &Credential) -> RemoteResult<AuthorRecord> {
        let response = send_authorized(SERVICE, self.client.get(&self.url), credential).await?;
        let envelope: StatusEnvelope = response
            .json()
            .await
            .map_err(|e| RemoteError::from_reqwest(SERVICE, e))?;

        match envelope {
            StatusEnvelope {
                success: true,
                data: Some(record),
                ..
            } => Ok(record),
            StatusEnvelope { message, .. } => Err(RemoteError::Refused {
                service: SERVICE,
                message: message.unwrap_or_else(|| "author information not found".to_string()),
            }),
        }
    }
}
