//! # Document Loading
//!
//! Reads an envelope document from disk. The format is chosen by file
//! extension: `.yaml`/`.yml` for YAML, anything else is parsed as JSON.
//! YAML is accepted for hand-written fixtures; the wire format is JSON.

use std::path::Path;

use serde_json::Value;

use crate::error::EnvelopeError;

/// Load and decode a document file into a JSON value.
///
/// # Errors
///
/// Returns [`EnvelopeError::DocumentLoadError`] if the file cannot be read
/// or decoded.
pub fn load_document(path: &Path) -> Result<Value, EnvelopeError> {
    let load_error = |reason: String| EnvelopeError::DocumentLoadError {
        path: path.display().to_string(),
        reason,
    };

    let content =
        std::fs::read_to_string(path).map_err(|e| load_error(format!("cannot read file: {e}")))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .map_err(|e| load_error(format!("invalid YAML: {e}"))),
        _ => serde_json::from_str(&content).map_err(|e| load_error(format!("invalid JSON: {e}"))),
    }
}
