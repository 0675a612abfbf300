//! API request handlers

mod health;
mod manuscripts;
mod publish;

pub use health::*;
pub use manuscripts::*;
pub use publish::*;

use serde::Serialize;

/// Body returned by mutating endpoints
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub message: String,
}

impl MutationResponse {
    pub fn ok(id: impl ToString, message: impl Into<String>) -> Self {
        Self {
            success: true,
            id: Some(id.to_string()),
            message: message.into(),
        }
    }
}
