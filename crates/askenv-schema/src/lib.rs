//! # askenv-schema — Skill Envelope Validation
//!
//! Validates and normalizes the two JSON envelopes exchanged between the
//! voice platform and a skill backend, then materializes them into the typed
//! records of `askenv-core`.
//!
//! ## Structure
//!
//! - [`node`] — the schema tree: `Leaf` and `Composite` nodes, declared as
//!   data and built once.
//! - [`validate`] — the tree walker: field checks, object checks, error
//!   collection by field path.
//! - [`inbound`] / [`outbound`] — the two envelope schemas and their
//!   validators. Inbound carries the session repair rule.
//! - [`predicate`] — domain checks layered on type checks (application id,
//!   character limit, or any injected closure).
//! - [`materialize`] — validated document to typed record.
//! - [`export`] — JSON Schema rendering of a tree.
//!
//! ## Usage
//!
//! ```
//! use serde_json::json;
//!
//! let env = askenv_schema::validate_response(&json!({
//!     "version": 1.0,
//!     "response": {"shouldEndSession": true}
//! }))
//! .unwrap();
//! assert!(env.response.should_end_session);
//! ```
//!
//! ## Crate Policy
//!
//! - Depends only on `askenv-core` internally.
//! - Validation is pure: no I/O, no shared mutable state. Validators are
//!   `Send + Sync` and may be used from any number of threads.
//! - Any non-empty violation set means no envelope is produced.

pub mod document;
pub mod error;
pub mod export;
pub mod inbound;
pub mod materialize;
pub mod node;
pub mod outbound;
pub mod policy;
pub mod predicate;
pub mod validate;
pub mod violation;

use std::sync::OnceLock;

use askenv_core::{RequestEnvelope, ResponseEnvelope};
use serde_json::Value;

pub use document::load_document;
pub use error::{EnvelopeError, EnvelopeKind};
pub use export::to_json_schema;
pub use inbound::{request_schema, RequestValidator, SessionRepair, MESSAGE_RECEIVED};
pub use materialize::{materialize, ValidatedDocument};
pub use node::{Composite, CrossFieldRule, Field, Leaf, Primitive, SchemaNode};
pub use outbound::{response_schema, ResponseValidator};
pub use policy::{ApplicationIdConsistency, ValidationPolicy};
pub use predicate::{predicate_fn, ApplicationIdFormat, CharacterLimit, Predicate, SharedPredicate};
pub use validate::validate_value;
pub use violation::{FieldPath, ValidationViolations, Violation, ViolationKind};

/// Process-wide request validator under the default policy.
pub fn default_request_validator() -> &'static RequestValidator {
    static VALIDATOR: OnceLock<RequestValidator> = OnceLock::new();
    VALIDATOR.get_or_init(RequestValidator::default)
}

/// Process-wide response validator under the default policy.
pub fn default_response_validator() -> &'static ResponseValidator {
    static VALIDATOR: OnceLock<ResponseValidator> = OnceLock::new();
    VALIDATOR.get_or_init(ResponseValidator::default)
}

/// Validate and materialize an inbound envelope under the default policy.
pub fn validate_request(raw: &Value) -> Result<RequestEnvelope, EnvelopeError> {
    default_request_validator().validate_envelope(raw)
}

/// Validate and materialize an outbound envelope under the default policy.
pub fn validate_response(raw: &Value) -> Result<ResponseEnvelope, EnvelopeError> {
    default_response_validator().validate_envelope(raw)
}
