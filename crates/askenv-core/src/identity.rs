//! # Protocol Identity Newtypes
//!
//! Newtype wrappers for the identifiers carried by skill envelopes. These
//! prevent accidental identifier confusion — you cannot pass a `SessionId`
//! where an `ApplicationId` is expected.
//!
//! Only `ApplicationId` has a validated constructor: it is the identifier
//! that binds a request to a skill, and it appears twice in an inbound
//! envelope (session and device context). The other identifiers are opaque
//! platform-issued strings.

use serde::{Deserialize, Serialize};

use crate::error::AskError;

/// Identifier of the skill an envelope is addressed to.
///
/// Format: non-empty, no whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApplicationId(String);

/// Platform-issued session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

/// Platform-issued request identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

/// Platform-issued user identifier, stable per skill enablement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl ApplicationId {
    /// Create an application identifier, checking its basic format.
    ///
    /// # Errors
    ///
    /// Returns [`AskError::InvalidIdentifier`] if the value is empty or
    /// contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, AskError> {
        let value = value.into();
        if value.is_empty() {
            return Err(AskError::InvalidIdentifier {
                kind: "application id",
                reason: "must not be empty".to_string(),
            });
        }
        if value.chars().any(char::is_whitespace) {
            return Err(AskError::InvalidIdentifier {
                kind: "application id",
                reason: format!("must not contain whitespace, got {value:?}"),
            });
        }
        Ok(Self(value))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ApplicationId {
    type Error = AskError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ApplicationId> for String {
    fn from(id: ApplicationId) -> Self {
        id.0
    }
}

impl SessionId {
    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl RequestId {
    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl UserId {
    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
