//! # JSON Schema Export
//!
//! Renders a [`SchemaNode`] tree as a JSON Schema (Draft 2020-12) document
//! for consumers that want to check envelopes without linking this crate.
//!
//! The export covers structure only. Predicates and cross-field rules cannot
//! be expressed in JSON Schema; their names are listed under the
//! `x-predicates` and `x-cross-field` annotation keywords instead.

use serde_json::{json, Map, Value};

use crate::node::{Composite, Field, Leaf, Primitive, SchemaNode};
use crate::validate::{FALSE_STRINGS, TRUE_STRINGS};

const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";

/// Export `node` as a standalone JSON Schema document.
pub fn to_json_schema(node: &SchemaNode) -> Value {
    let mut schema = node_schema(node);
    if let Value::Object(map) = &mut schema {
        map.insert("$schema".to_string(), json!(DRAFT_2020_12));
    }
    schema
}

fn node_schema(node: &SchemaNode) -> Value {
    let mut schema = match node {
        SchemaNode::Leaf(leaf) => leaf_schema(leaf),
        SchemaNode::Composite(composite) => composite_schema(composite),
    };
    let predicates: Vec<&str> = node.predicates().iter().map(|p| p.name()).collect();
    if !predicates.is_empty() {
        schema["x-predicates"] = json!(predicates);
    }
    schema
}

fn leaf_schema(leaf: &Leaf) -> Value {
    let mut schema = match leaf.primitive() {
        Primitive::String => json!({"type": "string", "pattern": r"\S"}),
        Primitive::Float => json!({
            "anyOf": [
                {"type": "number"},
                {"type": "string", "pattern": r"^\s*[-+]?(\d+\.?\d*|\.\d+)([eE][-+]?\d+)?\s*$"}
            ]
        }),
        Primitive::Boolean => {
            let spellings: Vec<&str> = TRUE_STRINGS.iter().chain(FALSE_STRINGS).copied().collect();
            json!({"anyOf": [{"type": "boolean"}, {"enum": spellings}, {"enum": [0, 1]}]})
        }
        Primitive::Timestamp => json!({
            "type": "string",
            "pattern": r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$"
        }),
        Primitive::Choice(allowed) => json!({"enum": allowed}),
        Primitive::Dict => json!({"type": "object"}),
    };
    if let Some(default) = leaf.default() {
        schema["default"] = default.clone();
    }
    schema
}

fn composite_schema(composite: &Composite) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for field in composite.fields() {
        properties.insert(field.name().to_string(), field_schema(field));
        if !field.may_be_absent() {
            required.push(field.name());
        }
    }
    let mut schema = json!({
        "type": "object",
        "properties": properties,
        "required": required,
    });
    if let Some(rule) = composite.rule() {
        schema["x-cross-field"] = json!(rule.name());
    }
    schema
}

fn field_schema(field: &Field) -> Value {
    let schema = node_schema(field.node());
    if field.is_nullable() {
        json!({"anyOf": [schema, {"type": "null"}]})
    } else {
        schema
    }
}
