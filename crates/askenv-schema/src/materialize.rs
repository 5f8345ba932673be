//! # Envelope Materializer
//!
//! Turns a validated document into its typed envelope record. The only way
//! to obtain a [`ValidatedDocument`] is from one of the envelope validators,
//! so materialization can never be handed unvalidated input.
//!
//! Materialization is a pure serde conversion: no validation, no I/O, no
//! logging.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{EnvelopeError, EnvelopeKind};

/// A document that passed validation, including any repaired substructure.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDocument {
    kind: EnvelopeKind,
    value: Value,
}

impl ValidatedDocument {
    pub(crate) fn new(kind: EnvelopeKind, value: Value) -> Self {
        Self { kind, value }
    }

    pub fn kind(&self) -> EnvelopeKind {
        self.kind
    }

    /// The normalized document.
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

/// Build the typed record `T` from a validated document.
///
/// # Errors
///
/// Returns [`EnvelopeError::Materialize`] if `T` does not describe the
/// document's shape (e.g. materializing a response as a request).
pub fn materialize<T: DeserializeOwned>(document: ValidatedDocument) -> Result<T, EnvelopeError> {
    let kind = document.kind;
    serde_json::from_value(document.value).map_err(|e| EnvelopeError::Materialize {
        kind,
        reason: e.to_string(),
    })
}
