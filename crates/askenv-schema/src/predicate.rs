//! # Domain Predicates
//!
//! Pass/fail checks layered on top of basic type validation. A predicate
//! sees the already type-checked (and normalized) value of the node it is
//! attached to: a scalar for leaves, the whole validated mapping for
//! composites.
//!
//! Callers may inject any check with [`predicate_fn`]. The two checks the
//! protocol relies on are provided here: [`ApplicationIdFormat`] and
//! [`CharacterLimit`].

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Default ceiling on the combined text of an output-speech or card object.
pub const DEFAULT_MAX_OUTPUT_CHARS: usize = 8000;

/// A domain check applied after a node's own type validation succeeds.
pub trait Predicate: Send + Sync + fmt::Debug {
    /// Short identifier used in logs and schema exports.
    fn name(&self) -> &str;

    /// Returns `Err(reason)` if the value is rejected.
    fn check(&self, value: &Value) -> Result<(), String>;
}

/// Shared handle to a predicate. Schema trees hold these.
pub type SharedPredicate = Arc<dyn Predicate>;

/// Wrap an opaque callable as a predicate.
pub fn predicate_fn<F>(name: impl Into<String>, check: F) -> SharedPredicate
where
    F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
{
    Arc::new(FnPredicate {
        name: name.into(),
        check: Box::new(check),
    })
}

type CheckFn = Box<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

struct FnPredicate {
    name: String,
    check: CheckFn,
}

impl fmt::Debug for FnPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPredicate").field("name", &self.name).finish()
    }
}

impl Predicate for FnPredicate {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, value: &Value) -> Result<(), String> {
        (self.check)(value)
    }
}

/// Checks an application identifier.
///
/// The identifier must be a non-empty string without whitespace. When
/// `allowed` is non-empty, it must also be one of the listed identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationIdFormat {
    allowed: Vec<String>,
}

impl ApplicationIdFormat {
    pub fn new(allowed: Vec<String>) -> Self {
        Self { allowed }
    }

    /// Accept any well-formed identifier.
    pub fn any() -> Self {
        Self::default()
    }
}

impl Predicate for ApplicationIdFormat {
    fn name(&self) -> &str {
        "application_id_format"
    }

    fn check(&self, value: &Value) -> Result<(), String> {
        let Some(id) = value.as_str() else {
            return Err("invalid application id".to_string());
        };
        if askenv_core::ApplicationId::new(id).is_err() {
            return Err("invalid application id".to_string());
        }
        if !self.allowed.is_empty() && !self.allowed.iter().any(|a| a == id) {
            return Err(format!("invalid application id: {id:?} is not an allowed application"));
        }
        Ok(())
    }
}

/// Caps the combined text carried by an output object.
///
/// Counts the characters of every string value in the object, recursively,
/// except the `type` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterLimit {
    max_chars: usize,
}

impl CharacterLimit {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }
}

impl Default for CharacterLimit {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_OUTPUT_CHARS)
    }
}

impl Predicate for CharacterLimit {
    fn name(&self) -> &str {
        "character_limit"
    }

    fn check(&self, value: &Value) -> Result<(), String> {
        let total = text_chars(value);
        if total > self.max_chars {
            return Err(format!(
                "exceeds maximum length: {total} characters, limit is {}",
                self.max_chars
            ));
        }
        Ok(())
    }
}

fn text_chars(value: &Value) -> usize {
    match value {
        Value::String(s) => s.chars().count(),
        Value::Object(map) => map
            .iter()
            .filter(|(key, _)| key.as_str() != "type")
            .map(|(_, v)| text_chars(v))
            .sum(),
        Value::Array(items) => items.iter().map(text_chars).sum(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn app_id_any_accepts_well_formed() {
        let p = ApplicationIdFormat::any();
        assert!(p.check(&json!("amzn1.ask.skill.abc")).is_ok());
        assert_eq!(p.check(&json!("")).unwrap_err(), "invalid application id");
        assert!(p.check(&json!("has space")).is_err());
        assert!(p.check(&json!(42)).is_err());
    }

    #[test]
    fn app_id_allow_list_is_enforced() {
        let p = ApplicationIdFormat::new(vec!["skill.one".into(), "skill.two".into()]);
        assert!(p.check(&json!("skill.two")).is_ok());
        let err = p.check(&json!("skill.three")).unwrap_err();
        assert!(err.starts_with("invalid application id"));
    }

    #[test]
    fn char_limit_counts_text_fields_not_type() {
        let p = CharacterLimit::new(10);
        assert!(p.check(&json!({"type": "PlainText", "text": "0123456789"})).is_ok());
        assert!(p.check(&json!({"type": "Simple", "title": "01234", "content": "56789"})).is_ok());
        let err = p
            .check(&json!({"type": "Simple", "title": "012345", "content": "56789"}))
            .unwrap_err();
        assert!(err.starts_with("exceeds maximum length"));
    }

    #[test]
    fn char_limit_counts_chars_not_bytes() {
        let p = CharacterLimit::new(3);
        assert!(p.check(&json!({"text": "héé"})).is_ok());
    }

    #[test]
    fn default_char_limit() {
        assert_eq!(CharacterLimit::default().max_chars(), DEFAULT_MAX_OUTPUT_CHARS);
        let long = "x".repeat(DEFAULT_MAX_OUTPUT_CHARS + 1);
        assert!(CharacterLimit::default().check(&json!({"text": long})).is_err());
    }

    #[test]
    fn closure_predicates_are_opaque_checks() {
        let p = predicate_fn("even_length", |v| match v.as_str() {
            Some(s) if s.len() % 2 == 0 => Ok(()),
            _ => Err("odd length".to_string()),
        });
        assert_eq!(p.name(), "even_length");
        assert!(p.check(&json!("ab")).is_ok());
        assert_eq!(p.check(&json!("abc")).unwrap_err(), "odd length");
        assert!(format!("{p:?}").contains("even_length"));
    }
}
