//! # Outbound Envelope
//!
//! Schema and validator for the response envelope a skill returns. The
//! character limit is a whole-object check on `response.outputSpeech` and
//! `response.card`, applied once their own fields validated. Reprompt speech
//! is not limited.

use serde_json::Value;

use askenv_core::{CardType, ResponseEnvelope, SpeechType};

use crate::error::{EnvelopeError, EnvelopeKind};
use crate::materialize::{materialize, ValidatedDocument};
use crate::node::{Composite, SchemaNode};
use crate::policy::ValidationPolicy;
use crate::validate::validate_value;

fn output_speech() -> Composite {
    Composite::new()
        .required("type", SchemaNode::choice(SpeechType::WIRE_VALUES))
        .optional("text", SchemaNode::string())
        .optional("ssml", SchemaNode::string())
}

/// Build the outbound envelope schema under `policy`.
pub fn response_schema(policy: &ValidationPolicy) -> SchemaNode {
    let limit = policy.character_limit_predicate();

    let card = Composite::new()
        .optional(
            "type",
            SchemaNode::choice(CardType::WIRE_VALUES).with_default("Simple"),
        )
        .optional("title", SchemaNode::string())
        .optional("content", SchemaNode::string());

    let response = Composite::new()
        .optional("outputSpeech", output_speech().with_predicate(limit.clone()))
        .optional("card", card.with_predicate(limit))
        .optional(
            "reprompt",
            Composite::new().optional("outputSpeech", output_speech()),
        )
        .required("shouldEndSession", SchemaNode::boolean());

    Composite::new()
        .required("version", SchemaNode::float())
        .optional("sessionAttributes", SchemaNode::dict())
        .required("response", response)
        .into()
}

/// Validates outbound envelopes against a schema built once.
#[derive(Debug, Clone)]
pub struct ResponseValidator {
    schema: SchemaNode,
}

impl ResponseValidator {
    pub fn new(policy: &ValidationPolicy) -> Self {
        Self {
            schema: response_schema(policy),
        }
    }

    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    /// # Errors
    ///
    /// Returns [`EnvelopeError::ValidationFailed`] carrying every violation.
    pub fn validate(&self, raw: &Value) -> Result<ValidatedDocument, EnvelopeError> {
        let violations = match validate_value(&self.schema, raw) {
            Ok(value) => {
                tracing::debug!(kind = %EnvelopeKind::Response, "envelope validated");
                return Ok(ValidatedDocument::new(EnvelopeKind::Response, value));
            }
            Err(violations) => violations,
        };
        tracing::debug!(
            kind = %EnvelopeKind::Response,
            violations = violations.len(),
            "envelope rejected"
        );
        Err(EnvelopeError::ValidationFailed {
            kind: EnvelopeKind::Response,
            violations,
        })
    }

    /// Validate and materialize in one step.
    pub fn validate_envelope(&self, raw: &Value) -> Result<ResponseEnvelope, EnvelopeError> {
        materialize(self.validate(raw)?)
    }
}

impl Default for ResponseValidator {
    fn default() -> Self {
        Self::new(&ValidationPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::ViolationKind;
    use serde_json::json;

    fn kinds(err: &EnvelopeError) -> Vec<(&str, ViolationKind)> {
        err.violations()
            .unwrap()
            .violations()
            .iter()
            .map(|v| (v.path.as_str(), v.kind))
            .collect()
    }

    #[test]
    fn minimal_response() {
        let env = ResponseValidator::default()
            .validate_envelope(&json!({"version": 1.0, "response": {"shouldEndSession": true}}))
            .unwrap();
        assert!(env.response.should_end_session);
        assert!(env.response.card.is_none());
        assert!(env.response.output_speech.is_none());
        assert!(env.session_attributes.is_none());
    }

    #[test]
    fn should_end_session_required() {
        let err = ResponseValidator::default()
            .validate(&json!({"version": "1.0", "response": {}}))
            .unwrap_err();
        assert_eq!(
            kinds(&err),
            vec![("response.shouldEndSession", ViolationKind::RequiredFieldMissing)]
        );
    }

    #[test]
    fn card_type_defaults_to_simple() {
        let doc = ResponseValidator::default()
            .validate(&json!({
                "version": 1.0,
                "response": {"card": {"title": "Hi", "content": "There"}, "shouldEndSession": false}
            }))
            .unwrap();
        assert_eq!(doc.as_value()["response"]["card"]["type"], "Simple");
        let env: ResponseEnvelope = materialize(doc).unwrap();
        assert_eq!(env.response.card.unwrap().card_type, CardType::Simple);
    }

    #[test]
    fn invalid_speech_type() {
        let err = ResponseValidator::default()
            .validate(&json!({
                "version": 1.0,
                "response": {"outputSpeech": {"type": "Audio", "text": "x"}, "shouldEndSession": true}
            }))
            .unwrap_err();
        assert_eq!(
            kinds(&err),
            vec![("response.outputSpeech.type", ViolationKind::InvalidChoice)]
        );
    }

    #[test]
    fn character_limit_applies_to_speech_and_card() {
        let policy = ValidationPolicy {
            max_output_chars: 5,
            ..ValidationPolicy::default()
        };
        let validator = ResponseValidator::new(&policy);
        let err = validator
            .validate(&json!({
                "version": 1.0,
                "response": {
                    "outputSpeech": {"type": "SSML", "ssml": "<speak>hello</speak>"},
                    "card": {"type": "Simple", "title": "abc", "content": "def"},
                    "reprompt": {"outputSpeech": {"type": "PlainText", "text": "a long reprompt"}},
                    "shouldEndSession": false
                }
            }))
            .unwrap_err();
        assert_eq!(
            kinds(&err),
            vec![
                ("response.outputSpeech", ViolationKind::PredicateFailure),
                ("response.card", ViolationKind::PredicateFailure),
            ]
        );
        assert!(err.violations().unwrap().violations()[0]
            .message
            .starts_with("exceeds maximum length"));
    }

    #[test]
    fn character_limit_skipped_when_fields_invalid() {
        let policy = ValidationPolicy {
            max_output_chars: 1,
            ..ValidationPolicy::default()
        };
        let err = ResponseValidator::new(&policy)
            .validate(&json!({
                "version": 1.0,
                "response": {"outputSpeech": {"type": "Bad", "text": "too long"}, "shouldEndSession": true}
            }))
            .unwrap_err();
        assert_eq!(
            kinds(&err),
            vec![("response.outputSpeech.type", ViolationKind::InvalidChoice)]
        );
    }

    #[test]
    fn session_attributes_must_be_mapping() {
        let err = ResponseValidator::default()
            .validate(&json!({
                "version": 1.0,
                "sessionAttributes": "nope",
                "response": {"shouldEndSession": true}
            }))
            .unwrap_err();
        assert_eq!(
            kinds(&err),
            vec![("sessionAttributes", ViolationKind::StructuralMismatch)]
        );
    }

    #[test]
    fn full_response_materializes() {
        let env = ResponseValidator::default()
            .validate_envelope(&json!({
                "version": "1.0",
                "sessionAttributes": {"turn": 3},
                "response": {
                    "outputSpeech": {"type": "PlainText", "text": "Hello"},
                    "card": {"type": "LinkAccount"},
                    "reprompt": {"outputSpeech": {"type": "SSML", "ssml": "<speak>Again?</speak>"}},
                    "shouldEndSession": false
                }
            }))
            .unwrap();
        assert_eq!(env.version, 1.0);
        assert_eq!(env.session_attributes.unwrap()["turn"], 3);
        let speech = env.response.output_speech.unwrap();
        assert_eq!(speech.speech_type, SpeechType::PlainText);
        assert_eq!(speech.text.as_deref(), Some("Hello"));
        assert_eq!(env.response.card.unwrap().card_type, CardType::LinkAccount);
        let reprompt = env.response.reprompt.unwrap().output_speech.unwrap();
        assert_eq!(reprompt.speech_type, SpeechType::Ssml);
    }
}
