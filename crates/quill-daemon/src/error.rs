//! Error types for quill-daemon

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use quill_types::{ManuscriptError, ManuscriptId, ManuscriptStatus, TransitionError};
use serde::Serialize;
use thiserror::Error;

/// Daemon-level errors
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Server startup error
    #[error("Server error: {0}")]
    Server(String),

    /// Remote client construction error
    #[error("Remote service error: {0}")]
    Remote(#[from] RemoteError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage-specific errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Status change rejected by the state machine
    #[error("Invalid transition: {0}")]
    InvalidTransition(#[from] TransitionError),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Failure of a call to one of the remote collaborators
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The HTTP client could not be built
    #[error("{service} client setup failed: {message}")]
    Setup {
        service: &'static str,
        message: String,
    },

    /// Connection or protocol failure
    #[error("{service} request failed: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },

    /// No answer within the configured timeout
    #[error("{service} request timed out")]
    Timeout { service: &'static str },

    /// Non-success HTTP status
    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Body could not be decoded or lacks required fields
    #[error("{service} returned a malformed response: {message}")]
    Malformed {
        service: &'static str,
        message: String,
    },

    /// Well-formed answer that refuses the request
    #[error("{service} refused the request: {message}")]
    Refused {
        service: &'static str,
        message: String,
    },
}

impl RemoteError {
    /// Classify a reqwest error for `service`
    pub fn from_reqwest(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RemoteError::Timeout { service }
        } else if err.is_decode() {
            RemoteError::Malformed {
                service,
                message: err.to_string(),
            }
        } else {
            RemoteError::Transport {
                service,
                message: err.to_string(),
            }
        }
    }
}

/// Precondition failures of a publish request; nothing is written when one is returned
#[derive(Debug, Error)]
pub enum PublishRequestError {
    #[error("Manuscript {0} not found")]
    NotFound(ManuscriptId),

    #[error("Manuscript {0} belongs to another author")]
    Forbidden(ManuscriptId),

    #[error("Manuscript {id} cannot be published while {status}")]
    InvalidState {
        id: ManuscriptId,
        status: ManuscriptStatus,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// API-specific errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or unusable caller identity
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller identity is known but not allowed
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Operation not allowed in the current manuscript status
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A remote collaborator failed while serving the request
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<PublishRequestError> for ApiError {
    fn from(err: PublishRequestError) -> Self {
        match err {
            PublishRequestError::NotFound(_) => ApiError::NotFound(err.to_string()),
            PublishRequestError::Forbidden(_) => ApiError::Forbidden(err.to_string()),
            PublishRequestError::InvalidState { .. } => ApiError::InvalidState(err.to_string()),
            PublishRequestError::Storage(e) => ApiError::Storage(e),
        }
    }
}

impl From<ManuscriptError> for ApiError {
    fn from(err: ManuscriptError) -> Self {
        ApiError::InvalidState(err.to_string())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::InvalidState(_) => (StatusCode::CONFLICT, "INVALID_STATE"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::Storage(StorageError::InvalidTransition(_)) => {
                (StatusCode::CONFLICT, "INVALID_STATE")
            }
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        };

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;

/// Result type alias for remote calls
pub type RemoteResult<T> = Result<T, RemoteError>;
