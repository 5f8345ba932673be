//! # Inbound Envelope
//!
//! Schema and validator for the request envelope the platform sends to a
//! skill, plus the one repair the protocol requires.
//!
//! ## Session Repair
//!
//! `session` is declared optional, but every materialized request carries
//! one. After all fields validated, [`SessionRepair`] decides:
//!
//! - session present: keep it (optionally cross-checking application ids,
//!   see [`ApplicationIdConsistency`]);
//! - session absent and `request.type` is [`MESSAGE_RECEIVED`]: synthesize
//!   `{application: <copy of context.System.application>}`, since the
//!   protocol delivers this request type outside any session;
//! - session absent otherwise: a single `RequiredFieldMissing` on `session`.
//!
//! The repair returns a new mapping; the caller's document is never touched.

use std::sync::Arc;

use serde_json::{Map, Value};

use askenv_core::RequestEnvelope;

use crate::error::{EnvelopeError, EnvelopeKind};
use crate::materialize::{materialize, ValidatedDocument};
use crate::node::{Composite, CrossFieldRule, SchemaNode};
use crate::policy::{ApplicationIdConsistency, ValidationPolicy};
use crate::predicate::SharedPredicate;
use crate::validate::validate_value;
use crate::violation::{FieldPath, Violation, ViolationKind};

/// The out-of-session request type that qualifies for session repair.
pub const MESSAGE_RECEIVED: &str = "Messaging.MessageReceived";

fn application(app_id: &SharedPredicate) -> Composite {
    Composite::new().required(
        "applicationId",
        SchemaNode::string().with_predicate(app_id.clone()),
    )
}

/// Build the inbound envelope schema under `policy`.
pub fn request_schema(policy: &ValidationPolicy) -> SchemaNode {
    let app_id = policy.application_id_predicate();

    let session = Composite::new()
        .required("sessionId", SchemaNode::string())
        .required("application", application(&app_id))
        .nullable("attributes", SchemaNode::dict())
        .required(
            "user",
            Composite::new()
                .required("userId", SchemaNode::string())
                .nullable("accessToken", SchemaNode::string()),
        )
        .required("new", SchemaNode::boolean());

    let request = Composite::new()
        .required("type", SchemaNode::string())
        .required("requestId", SchemaNode::string())
        .required("timestamp", SchemaNode::timestamp())
        .optional(
            "intent",
            Composite::new()
                .required("name", SchemaNode::string())
                .nullable("slots", SchemaNode::dict()),
        )
        .optional("reason", SchemaNode::string())
        .optional("message", SchemaNode::dict());

    let context = Composite::new().required(
        "System",
        Composite::new()
            .required("apiAccessToken", SchemaNode::string())
            .required("application", application(&app_id)),
    );

    Composite::new()
        .required("version", SchemaNode::float())
        .optional("session", session)
        .required("request", request)
        .required("context", context)
        .with_rule(Arc::new(SessionRepair::new(policy.application_id_consistency)))
        .into()
}

/// Cross-field rule guaranteeing a session on every valid request.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionRepair {
    consistency: ApplicationIdConsistency,
}

impl SessionRepair {
    pub fn new(consistency: ApplicationIdConsistency) -> Self {
        Self { consistency }
    }
}

impl CrossFieldRule for SessionRepair {
    fn name(&self) -> &str {
        "session_repair"
    }

    fn apply(
        &self,
        mut validated: Map<String, Value>,
        path: &FieldPath,
    ) -> Result<Map<String, Value>, Vec<Violation>> {
        if validated.contains_key("session") {
            if self.consistency == ApplicationIdConsistency::Enforced {
                check_consistency(&validated, path)?;
            }
            return Ok(validated);
        }

        let request_type = validated
            .get("request")
            .and_then(|r| r.get("type"))
            .and_then(Value::as_str);
        if request_type != Some(MESSAGE_RECEIVED) {
            return Err(vec![Violation::new(
                path.child("session"),
                ViolationKind::RequiredFieldMissing,
                "Session field is required",
            )]);
        }

        let Some(application) = context_application(&validated).cloned() else {
            return Err(vec![Violation::new(
                path.child("context").child("System").child("application"),
                ViolationKind::CrossFieldViolation,
                "cannot synthesize a session without a context application",
            )]);
        };
        tracing::debug!(
            application_id = application_id(Some(&application)),
            "synthesizing session for out-of-session request"
        );
        let mut session = Map::new();
        session.insert("application".to_string(), application);
        validated.insert("session".to_string(), Value::Object(session));
        Ok(validated)
    }
}

fn context_application(validated: &Map<String, Value>) -> Option<&Value> {
    validated
        .get("context")
        .and_then(|c| c.get("System"))
        .and_then(|s| s.get("application"))
}

fn application_id(application: Option<&Value>) -> Option<&str> {
    application
        .and_then(|a| a.get("applicationId"))
        .and_then(Value::as_str)
}

fn check_consistency(validated: &Map<String, Value>, path: &FieldPath) -> Result<(), Vec<Violation>> {
    let session_id = application_id(validated.get("session").and_then(|s| s.get("application")));
    let context_id = application_id(context_application(validated));
    match (session_id, context_id) {
        (Some(s), Some(c)) if s != c => Err(vec![Violation::new(
            path.child("session").child("application").child("applicationId"),
            ViolationKind::CrossFieldViolation,
            format!("session application id {s:?} does not match context application id {c:?}"),
        )]),
        _ => Ok(()),
    }
}

/// Validates inbound envelopes against a schema built once.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    schema: SchemaNode,
}

impl RequestValidator {
    pub fn new(policy: &ValidationPolicy) -> Self {
        Self {
            schema: request_schema(policy),
        }
    }

    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    /// Validate a decoded document, repairing the session where allowed.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::ValidationFailed`] carrying every violation.
    pub fn validate(&self, raw: &Value) -> Result<ValidatedDocument, EnvelopeError> {
        match validate_value(&self.schema, raw) {
            Ok(value) => {
                tracing::debug!(kind = %EnvelopeKind::Request, "envelope validated");
                Ok(ValidatedDocument::new(EnvelopeKind::Request, value))
            }
            Err(violations) => {
                tracing::debug!(
                    kind = %EnvelopeKind::Request,
                    violations = violations.len(),
                    "envelope rejected"
                );
                Err(EnvelopeError::ValidationFailed {
                    kind: EnvelopeKind::Request,
                    violations,
                })
            }
        }
    }

    /// Validate and materialize in one step.
    pub fn validate_envelope(&self, raw: &Value) -> Result<RequestEnvelope, EnvelopeError> {
        materialize(self.validate(raw)?)
    }
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new(&ValidationPolicy::default())
    }
}
