//! # Envelope Errors

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::violation::ValidationViolations;

/// Which envelope a document claims to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeKind {
    /// Inbound: platform to skill.
    Request,
    /// Outbound: skill to platform.
    Response,
}

impl fmt::Display for EnvelopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request => f.write_str("request"),
            Self::Response => f.write_str("response"),
        }
    }
}

/// Error during envelope validation or materialization.
#[derive(Error, Debug)]
pub enum EnvelopeError {
    /// The document did not conform to the envelope schema.
    #[error("{kind} envelope failed validation:\n{violations}")]
    ValidationFailed {
        kind: EnvelopeKind,
        /// Every violation found in the pass.
        violations: ValidationViolations,
    },

    /// A validated document could not be turned into its typed record.
    #[error("cannot materialize {kind} envelope: {reason}")]
    Materialize { kind: EnvelopeKind, reason: String },

    /// The document file could not be loaded or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoadError { path: String, reason: String },

    /// The validation policy could not be loaded or parsed.
    #[error("policy load error for '{path}': {reason}")]
    PolicyLoadError { path: String, reason: String },
}

impl EnvelopeError {
    /// The violations, if this is a validation failure.
    pub fn violations(&self) -> Option<&ValidationViolations> {
        match self {
            Self::ValidationFailed { violations, .. } => Some(violations),
            _ => None,
        }
    }
}
