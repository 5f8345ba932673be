//! # Validation Policy
//!
//! Deployment-specific knobs for the envelope validators, loaded from YAML:
//!
//! ```yaml
//! application_ids:
//!   - amzn1.ask.skill.abc
//! max_output_chars: 8000
//! application_id_consistency: relaxed
//! ```
//!
//! Every key is optional; an empty document yields [`ValidationPolicy::default`].

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::EnvelopeError;
use crate::predicate::{ApplicationIdFormat, CharacterLimit, SharedPredicate, DEFAULT_MAX_OUTPUT_CHARS};

/// Whether the session and device-context application ids must agree when
/// an inbound envelope carries both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationIdConsistency {
    /// No cross-check. A repaired session agrees by construction.
    #[default]
    Relaxed,
    /// Differing ids are a `CrossFieldViolation`.
    Enforced,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationPolicy {
    /// Application ids this deployment serves. Empty accepts any well-formed id.
    pub application_ids: Vec<String>,
    /// Ceiling on the combined text of an output-speech or card object.
    pub max_output_chars: usize,
    pub application_id_consistency: ApplicationIdConsistency,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            application_ids: Vec::new(),
            max_output_chars: DEFAULT_MAX_OUTPUT_CHARS,
            application_id_consistency: ApplicationIdConsistency::default(),
        }
    }
}

impl ValidationPolicy {
    /// Parse a policy from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::PolicyLoadError`] on malformed YAML or
    /// unknown keys.
    pub fn from_yaml_str(content: &str) -> Result<Self, EnvelopeError> {
        Self::parse(content, "<inline>")
    }

    /// Load a policy from a YAML file.
    pub fn load(path: &Path) -> Result<Self, EnvelopeError> {
        let content = std::fs::read_to_string(path).map_err(|e| EnvelopeError::PolicyLoadError {
            path: path.display().to_string(),
            reason: format!("cannot read file: {e}"),
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(content: &str, origin: &str) -> Result<Self, EnvelopeError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let policy: Self =
            serde_yaml::from_str(content).map_err(|e| EnvelopeError::PolicyLoadError {
                path: origin.to_string(),
                reason: format!("invalid YAML: {e}"),
            })?;
        tracing::debug!(
            origin,
            application_ids = policy.application_ids.len(),
            max_output_chars = policy.max_output_chars,
            consistency = ?policy.application_id_consistency,
            "loaded validation policy"
        );
        Ok(policy)
    }

    pub(crate) fn application_id_predicate(&self) -> SharedPredicate {
        Arc::new(ApplicationIdFormat::new(self.application_ids.clone()))
    }

    pub(crate) fn character_limit_predicate(&self) -> SharedPredicate {
        Arc::new(CharacterLimit::new(self.max_output_chars))
    }
}
