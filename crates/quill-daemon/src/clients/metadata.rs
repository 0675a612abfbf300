//! HTTP client for the metadata-generation service

use super::{build_http_client, endpoint, send_authorized, MetadataService};
use crate::config::RemoteServiceConfig;
use crate::error::{RemoteError, RemoteResult};
use async_trait::async_trait;
use quill_types::{Credential, ManuscriptMetadata};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const SERVICE: &str = "metadata service";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    title: &'a str,
    author_name: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    summary: Option<String>,
    category: Option<String>,
    point: Option<i32>,
    image_url: Option<String>,
    audio_url: Option<String>,
}

impl GenerateResponse {
    fn into_metadata(self) -> RemoteResult<ManuscriptMetadata> {
        let missing = |field: &str| RemoteError::Malformed {
            service: SERVICE,
            message: format!("missing field `{}`", field),
        };

        Ok(ManuscriptMetadata {
            summary: self.summary.ok_or_else(|| missing("summary"))?,
            category: self.category.ok_or_else(|| missing("category"))?,
            score: self.point.ok_or_else(|| missing("point"))?,
            image_url: self.image_url,
            audio_url: self.audio_url,
        })
    }
}

/// `POST {base_url}/ai`
pub struct HttpMetadataService {
    client: Client,
    url: String,
}

impl HttpMetadataService {
    pub fn new(config: &RemoteServiceConfig) -> RemoteResult<Self> {
        Ok(Self {
            client: build_http_client(SERVICE, config.timeout())?,
            url: endpoint(&config.base_url, "/ai"),
        })
    }
}

#[async_trait]
impl MetadataService for HttpMetadataService {
    async fn generate_metadata(
        &self,
        title: &str,
        author_name: &str,
        content: &str,
        credential: &Credential,
    ) -> RemoteResult<ManuscriptMetadata> {
        let request = self.client.post(&self.url).json(&GenerateRequest {
            title,
            author_name,
            content,
        });

        let response = send_authorized(SERVICE, request, credential).await?;
        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::from_reqwest(SERVICE, e))?;

        body.into_metadata()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpMetadataService {
        HttpMetadataService::new(&RemoteServiceConfig::new(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn decodes_generated_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ai"))
            .and(header("authorization", "Bearer t"))
            .and(body_json(json!({
                "title": "Engines",
                "author_name": "Ada",
                "content": "Notes"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "summary": "s",
                "category": "fiction",
                "point": 7,
                "image_url": "http://img/1.png",
                "audio_url": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let metadata = client_for(&server)
            .generate_metadata("Engines", "Ada", "Notes", &Credential::new("Bearer t"))
            .await
            .unwrap();

        assert_eq!(metadata.summary, "s");
        assert_eq!(metadata.category, "fiction");
        assert_eq!(metadata.score, 7);
        assert_eq!(metadata.image_url.as_deref(), Some("http://img/1.png"));
        assert!(metadata.audio_url.is_none());
    }

    #[tokio::test]
    async fn missing_score_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ai"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "summary": "s", "category": "fiction" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate_metadata("t", "a", "c", &Credential::new("Bearer t"))
            .await
            .unwrap_err();

        assert!(matches!(err, RemoteError::Malformed { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn server_error_is_reported_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ai"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate_metadata("t", "a", "c", &Credential::new("Bearer t"))
            .await
            .unwrap_err();

        match err {
            RemoteError::Status { status, body, .. } => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ai"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "summary": "s", "category": "c", "point": 1 }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let config = RemoteServiceConfig {
            base_url: server.uri(),
            timeout_secs: 1,
        };
        let err = HttpMetadataService::new(&config)
            .unwrap()
            .generate_metadata("t", "a", "c", &Credential::new("Bearer t"))
            .await
            .unwrap_err();

        assert!(matches!(err, RemoteError::Timeout { .. }), "{err:?}");
    }
}
