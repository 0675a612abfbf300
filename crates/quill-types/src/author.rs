//! Caller identity handed to the publish workflow

use crate::AuthorId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An author already resolved and approved by the author directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorIdentity {
    pub id: AuthorId,

    /// Display name passed on to the metadata and catalog services
    pub name: String,
}

impl AuthorIdentity {
    pub fn new(id: AuthorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// The caller's `Authorization` header value, forwarded to downstream services.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw header value
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
