//! Caller resolution
//!
//! The gateway in front of the daemon authenticates users and forwards
//! `X-User-Id` and `X-User-Role` next to the caller's `Authorization` header.
//! Manuscript routes additionally need the caller to be an approved author.

use super::state::AppState;
use crate::error::{ApiError, RemoteError};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use quill_types::{AuthorIdentity, Credential};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

const AUTHOR_ROLE: &str = "AUTHOR";

/// An approved author plus the credential to forward downstream
#[derive(Debug, Clone)]
pub struct CallerAuthor {
    pub identity: AuthorIdentity,
    pub credential: Credential,
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for CallerAuthor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let headers = &parts.headers;

        let user_id = header_value(headers, USER_ID_HEADER)
            .ok_or_else(|| ApiError::Unauthorized("authentication required".to_string()))?;
        let credential = header_value(headers, AUTHORIZATION.as_str())
            .map(Credential::new)
            .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".to_string()))?;

        if header_value(headers, USER_ROLE_HEADER) != Some(AUTHOR_ROLE) {
            return Err(ApiError::Forbidden("author role required".to_string()));
        }

        let record = state.authors.resolve(&credential).await.map_err(|e| match e {
            RemoteError::Refused { message, .. } => ApiError::Forbidden(message),
            other => {
                tracing::error!(user_id, error = %other, "Author lookup failed");
                ApiError::Upstream(other.to_string())
            }
        })?;

        let status = record.status.clone();
        let identity = record
            .into_identity()
            .ok_or_else(|| ApiError::Forbidden(format!("author is not approved ({})", status)))?;

        tracing::debug!(user_id, author_id = %identity.id, "Resolved caller");

        Ok(CallerAuthor {
            identity,
            credential,
        })
    }
}
