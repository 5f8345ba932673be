//! # Tree Validation
//!
//! Walks a raw JSON document against a [`SchemaNode`] tree, top-down:
//! each composite first checks that it received a mapping, then validates
//! every declared child. Errors from sibling subtrees are all collected.
//! Object-level work (the cross-field rule, then whole-object predicates)
//! only runs once every child of that object succeeded, so it never reads
//! an invalid substructure.
//!
//! The output is a fresh, normalized copy of the document: undeclared keys
//! dropped, defaults filled in, coerced scalars re-rendered in canonical
//! form. The input is never modified.
//!
//! String leaves must carry content: empty or whitespace-only strings are
//! rejected as missing, but non-blank strings are kept verbatim.

use serde_json::{Map, Number, Value};

use askenv_core::Timestamp;

use crate::node::{Composite, Field, Leaf, Primitive, SchemaNode};
use crate::predicate::SharedPredicate;
use crate::violation::{FieldPath, ValidationViolations, Violation, ViolationKind};

/// Validate `raw` against `node`, returning the normalized document.
///
/// # Errors
///
/// Returns every violation found. A non-empty collection always means no
/// document was produced.
pub fn validate_value(node: &SchemaNode, raw: &Value) -> Result<Value, ValidationViolations> {
    let mut violations = Vec::new();
    let validated = validate_node(node, raw, &FieldPath::root(), &mut violations);
    match validated {
        Some(value) if violations.is_empty() => Ok(value),
        _ => Err(ValidationViolations::new(violations)),
    }
}

/// Returns `Some` iff no violation was pushed for this subtree.
fn validate_node(
    node: &SchemaNode,
    raw: &Value,
    path: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    match node {
        SchemaNode::Leaf(leaf) => validate_leaf(leaf, raw, path, out),
        SchemaNode::Composite(composite) => validate_composite(composite, raw, path, out),
    }
}

fn validate_leaf(
    leaf: &Leaf,
    raw: &Value,
    path: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    let value = match coerce(leaf.primitive(), raw) {
        Ok(value) => value,
        Err((kind, message)) => {
            out.push(Violation::new(path.clone(), kind, message));
            return None;
        }
    };
    apply_predicates(leaf.predicates(), value, path, out)
}

fn coerce(primitive: Primitive, raw: &Value) -> Result<Value, (ViolationKind, String)> {
    let mismatch = |raw: &Value| {
        (
            ViolationKind::TypeMismatch,
            format!("expected a {}, got {}", primitive.describe(), describe(raw)),
        )
    };
    match primitive {
        Primitive::String => match raw {
            Value::String(s) if s.trim().is_empty() => Err((
                ViolationKind::RequiredFieldMissing,
                "This field may not be blank.".to_string(),
            )),
            Value::String(_) => Ok(raw.clone()),
            other => Err(mismatch(other)),
        },
        Primitive::Boolean => coerce_bool(raw).map(Value::Bool).ok_or_else(|| mismatch(raw)),
        Primitive::Float => {
            let parsed = match raw {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            parsed
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| mismatch(raw))
        }
        Primitive::Timestamp => match raw {
            Value::String(s) => Timestamp::parse(s)
                .map(|ts| Value::String(ts.to_wire()))
                .map_err(|e| (ViolationKind::TypeMismatch, e.to_string())),
            other => Err(mismatch(other)),
        },
        Primitive::Choice(allowed) => match raw {
            Value::String(s) if allowed.contains(&s.as_str()) => Ok(raw.clone()),
            other => Err((
                ViolationKind::InvalidChoice,
                format!("{other} is not a valid choice, expected one of {allowed:?}"),
            )),
        },
        Primitive::Dict => match raw {
            Value::Object(_) => Ok(raw.clone()),
            other => Err((
                ViolationKind::StructuralMismatch,
                format!("expected a mapping, got {}", describe(other)),
            )),
        },
    }
}

/// String spellings the platform uses for booleans.
pub(crate) const TRUE_STRINGS: &[&str] = &[
    "true", "True", "TRUE", "t", "T", "yes", "Yes", "YES", "y", "Y", "on", "On", "ON", "1",
];
pub(crate) const FALSE_STRINGS: &[&str] = &[
    "false", "False", "FALSE", "f", "F", "no", "No", "NO", "n", "N", "off", "Off", "OFF", "0",
];

fn coerce_bool(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::String(s) if TRUE_STRINGS.contains(&s.as_str()) => Some(true),
        Value::String(s) if FALSE_STRINGS.contains(&s.as_str()) => Some(false),
        Value::Number(n) => match n.as_f64() {
            Some(v) if v == 1.0 => Some(true),
            Some(v) if v == 0.0 => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn validate_composite(
    composite: &Composite,
    raw: &Value,
    path: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    let Some(map) = raw.as_object() else {
        out.push(Violation::new(
            path.clone(),
            ViolationKind::StructuralMismatch,
            format!("expected a mapping, got {}", describe(raw)),
        ));
        return None;
    };

    let before = out.len();
    let mut validated = Map::new();
    for field in composite.fields() {
        if let Some(value) = validate_field(field, map.get(field.name()), path, out) {
            validated.insert(field.name().to_string(), value);
        }
    }
    if out.len() > before {
        return None;
    }

    if let Some(rule) = composite.rule() {
        match rule.apply(validated, path) {
            Ok(repaired) => validated = repaired,
            Err(violations) => {
                out.extend(violations);
                return None;
            }
        }
    }

    apply_predicates(composite.predicates(), Value::Object(validated), path, out)
}

/// Returns `Some(value)` to insert, `None` when absent-and-allowed or invalid.
fn validate_field(
    field: &Field,
    raw: Option<&Value>,
    parent: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    let path = parent.child(field.name());
    match raw {
        None => {
            if !field.may_be_absent() {
                out.push(Violation::new(
                    path,
                    ViolationKind::RequiredFieldMissing,
                    "This field is required.",
                ));
                return None;
            }
            if field.is_required() {
                return None;
            }
            field.node().default_value().cloned()
        }
        Some(Value::Null) => {
            if field.is_nullable() {
                return Some(Value::Null);
            }
            let violation = match field.node() {
                SchemaNode::Leaf(_) => Violation::new(
                    path,
                    ViolationKind::RequiredFieldMissing,
                    "This field may not be null.",
                ),
                SchemaNode::Composite(_) => Violation::new(
                    path,
                    ViolationKind::StructuralMismatch,
                    "expected a mapping, got null",
                ),
            };
            out.push(violation);
            None
        }
        Some(value) => validate_node(field.node(), value, &path, out),
    }
}

fn apply_predicates(
    predicates: &[SharedPredicate],
    value: Value,
    path: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    let mut ok = true;
    for predicate in predicates {
        if let Err(reason) = predicate.check(&value) {
            tracing::debug!(path = %path, predicate = predicate.name(), %reason, "predicate rejected value");
            out.push(Violation::new(
                path.clone(),
                ViolationKind::PredicateFailure,
                reason,
            ));
            ok = false;
        }
    }
    ok.then_some(value)
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::predicate_fn;
    use serde_json::json;

    fn kinds(err: &ValidationViolations) -> Vec<(String, ViolationKind)> {
        err.violations()
            .iter()
            .map(|v| (v.path.as_str().to_string(), v.kind))
            .collect()
    }

    #[test]
    fn leaf_type_checks() {
        assert_eq!(validate_value(&SchemaNode::string(), &json!("x")).unwrap(), json!("x"));
        assert_eq!(validate_value(&SchemaNode::boolean(), &json!(false)).unwrap(), json!(false));

        let err = validate_value(&SchemaNode::string(), &json!(5)).unwrap_err();
        assert_eq!(kinds(&err), vec![(String::new(), ViolationKind::TypeMismatch)]);
        let err = validate_value(&SchemaNode::boolean(), &json!("maybe")).unwrap_err();
        assert_eq!(err.violations()[0].kind, ViolationKind::TypeMismatch);
    }

    #[test]
    fn blank_strings_are_rejected() {
        for blank in ["", "   ", "\t\n"] {
            let err = validate_value(&SchemaNode::string(), &json!(blank)).unwrap_err();
            assert_eq!(kinds(&err), vec![(String::new(), ViolationKind::RequiredFieldMissing)]);
            assert_eq!(err.violations()[0].message, "This field may not be blank.");
        }
        // Surrounding whitespace is kept verbatim when there is content.
        assert_eq!(validate_value(&SchemaNode::string(), &json!(" x ")).unwrap(), json!(" x "));
    }

    #[test]
    fn blank_optional_field_is_still_rejected() {
        let node = SchemaNode::from(Composite::new().optional("reason", SchemaNode::string()));
        assert_eq!(validate_value(&node, &json!({})).unwrap(), json!({}));
        let err = validate_value(&node, &json!({"reason": ""})).unwrap_err();
        assert_eq!(kinds(&err), vec![("reason".to_string(), ViolationKind::RequiredFieldMissing)]);
    }

    #[test]
    fn boolean_accepts_string_and_numeric_spellings() {
        let node = SchemaNode::boolean();
        for truthy in [json!("true"), json!("True"), json!("yes"), json!("1"), json!(1)] {
            assert_eq!(validate_value(&node, &truthy).unwrap(), json!(true));
        }
        for falsy in [json!("false"), json!("FALSE"), json!("off"), json!("0"), json!(0)] {
            assert_eq!(validate_value(&node, &falsy).unwrap(), json!(false));
        }
        assert!(validate_value(&node, &json!(2)).is_err());
        assert!(validate_value(&node, &json!("")).is_err());
    }

    #[test]
    fn float_accepts_numbers_and_numeric_strings() {
        assert_eq!(validate_value(&SchemaNode::float(), &json!(1.0)).unwrap(), json!(1.0));
        assert_eq!(validate_value(&SchemaNode::float(), &json!(2)).unwrap(), json!(2.0));
        assert_eq!(validate_value(&SchemaNode::float(), &json!("1.0")).unwrap(), json!(1.0));
        assert!(validate_value(&SchemaNode::float(), &json!("one")).is_err());
        assert!(validate_value(&SchemaNode::float(), &json!("NaN")).is_err());
        assert!(validate_value(&SchemaNode::float(), &json!(true)).is_err());
    }

    #[test]
    fn timestamp_is_normalized_to_wire_format() {
        let node = SchemaNode::timestamp();
        assert_eq!(
            validate_value(&node, &json!("2024-01-01T00:00:00Z")).unwrap(),
            json!("2024-01-01T00:00:00Z")
        );
        let err = validate_value(&node, &json!("2024-01-01 00:00:00")).unwrap_err();
        assert_eq!(err.violations()[0].kind, ViolationKind::TypeMismatch);
        let err = validate_value(&node, &json!(1_700_000_000)).unwrap_err();
        assert_eq!(err.violations()[0].kind, ViolationKind::TypeMismatch);
    }

    #[test]
    fn choice_rejects_values_outside_set() {
        let node = SchemaNode::choice(&["PlainText", "SSML"]);
        assert!(validate_value(&node, &json!("SSML")).is_ok());
        let err = validate_value(&node, &json!("Markdown")).unwrap_err();
        assert_eq!(err.violations()[0].kind, ViolationKind::InvalidChoice);
        assert!(err.violations()[0].message.contains("Markdown"));
        let err = validate_value(&node, &json!(3)).unwrap_err();
        assert_eq!(err.violations()[0].kind, ViolationKind::InvalidChoice);
    }

    #[test]
    fn dict_passes_through_mappings_only() {
        let payload = json!({"anything": [1, {"nested": null}]});
        assert_eq!(validate_value(&SchemaNode::dict(), &payload).unwrap(), payload);
        let err = validate_value(&SchemaNode::dict(), &json!([1])).unwrap_err();
        assert_eq!(err.violations()[0].kind, ViolationKind::StructuralMismatch);
    }

    #[test]
    fn non_mapping_composite_is_one_error() {
        let node = SchemaNode::from(
            Composite::new()
                .required("a", SchemaNode::string())
                .required("b", SchemaNode::string()),
        );
        let err = validate_value(&node, &json!("scalar")).unwrap_err();
        assert_eq!(kinds(&err), vec![(String::new(), ViolationKind::StructuralMismatch)]);
    }

    #[test]
    fn sibling_errors_are_all_collected() {
        let node = SchemaNode::from(
            Composite::new()
                .required("a", SchemaNode::string())
                .required("b", Composite::new().required("c", SchemaNode::boolean()))
                .required("d", SchemaNode::float()),
        );
        let err = validate_value(&node, &json!({"a": 1, "b": {"c": "no"}})).unwrap_err();
        assert_eq!(
            kinds(&err),
            vec![
                ("a".to_string(), ViolationKind::TypeMismatch),
                ("b.c".to_string(), ViolationKind::TypeMismatch),
                ("d".to_string(), ViolationKind::RequiredFieldMissing),
            ]
        );
    }

    #[test]
    fn absent_null_and_defaults() {
        let node = SchemaNode::from(
            Composite::new()
                .optional("opt", SchemaNode::string())
                .nullable("maybe", SchemaNode::dict())
                .optional("kind", SchemaNode::choice(&["Simple", "LinkAccount"]).with_default("Simple")),
        );
        assert_eq!(validate_value(&node, &json!({})).unwrap(), json!({"kind": "Simple"}));
        assert_eq!(
            validate_value(&node, &json!({"maybe": null, "kind": "LinkAccount"})).unwrap(),
            json!({"maybe": null, "kind": "LinkAccount"})
        );

        let err = validate_value(&node, &json!({"opt": null})).unwrap_err();
        assert_eq!(kinds(&err), vec![("opt".to_string(), ViolationKind::RequiredFieldMissing)]);
    }

    #[test]
    fn null_composite_is_structural_mismatch() {
        let node = SchemaNode::from(
            Composite::new().optional("session", Composite::new().required("id", SchemaNode::string())),
        );
        let err = validate_value(&node, &json!({"session": null})).unwrap_err();
        assert_eq!(kinds(&err), vec![("session".to_string(), ViolationKind::StructuralMismatch)]);
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let node = SchemaNode::from(Composite::new().required("a", SchemaNode::string()));
        assert_eq!(
            validate_value(&node, &json!({"a": "x", "extra": 1})).unwrap(),
            json!({"a": "x"})
        );
    }

    #[test]
    fn object_predicates_run_only_after_children_succeed() {
        let always_fails = predicate_fn("never", |_| Err("rejected".to_string()));
        let node = SchemaNode::from(
            Composite::new()
                .required("a", SchemaNode::string())
                .with_predicate(always_fails),
        );
        let err = validate_value(&node, &json!({"a": 1})).unwrap_err();
        assert_eq!(kinds(&err), vec![("a".to_string(), ViolationKind::TypeMismatch)]);

        let err = validate_value(&node, &json!({"a": "x"})).unwrap_err();
        assert_eq!(kinds(&err), vec![(String::new(), ViolationKind::PredicateFailure)]);
        assert_eq!(err.violations()[0].message, "rejected");
    }

    #[test]
    fn all_leaf_predicates_report() {
        let node = SchemaNode::string()
            .with_predicate(predicate_fn("p1", |_| Err("first".to_string())))
            .with_predicate(predicate_fn("p2", |_| Err("second".to_string())));
        let err = validate_value(&node, &json!("x")).unwrap_err();
        let messages: Vec<&str> = err.violations().iter().map(|v| v.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn input_is_not_modified() {
        let node = SchemaNode::from(
            Composite::new().optional("kind", SchemaNode::choice(&["Simple"]).with_default("Simple")),
        );
        let raw = json!({"extra": true});
        let snapshot = raw.clone();
        let _ = validate_value(&node, &raw).unwrap();
        assert_eq!(raw, snapshot);
    }
}
