//! # Schema Nodes
//!
//! The protocol shape is declared as data: a tree of [`SchemaNode`]s, each
//! either a [`Leaf`] (one primitive value) or a [`Composite`] (a named,
//! ordered collection of child fields). Trees are built once and shared
//! read-only; nothing in this module mutates a tree after construction.
//!
//! ```
//! use askenv_schema::node::{Composite, SchemaNode};
//!
//! let intent = Composite::new()
//!     .required("name", SchemaNode::string())
//!     .nullable("slots", SchemaNode::dict());
//! assert_eq!(intent.fields().len(), 2);
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::predicate::SharedPredicate;
use crate::violation::{FieldPath, Violation};

/// Primitive types a [`Leaf`] can validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    /// Double-precision float. Numeric strings are accepted and converted.
    Float,
    Boolean,
    /// `YYYY-MM-DDTHH:MM:SSZ`.
    Timestamp,
    /// A string from a fixed set.
    Choice(&'static [&'static str]),
    /// Free-form key/value mapping, passed through unvalidated.
    Dict,
}

impl Primitive {
    /// Name used in error messages and schema exports.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Float => "number",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
            Self::Choice(_) => "choice",
            Self::Dict => "mapping",
        }
    }
}

/// A node validating a single primitive value.
#[derive(Debug, Clone)]
pub struct Leaf {
    primitive: Primitive,
    default: Option<Value>,
    predicates: Vec<SharedPredicate>,
}

impl Leaf {
    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    /// Value substituted when an optional field is absent.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn predicates(&self) -> &[SharedPredicate] {
        &self.predicates
    }
}

/// An object-level rule run after every child of a composite validated.
///
/// The rule receives the validated mapping by value and returns the mapping
/// to use from then on, which may be an augmented copy. It must not read
/// anything but its argument.
pub trait CrossFieldRule: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// `path` is the location of the composite the rule is attached to.
    fn apply(
        &self,
        validated: Map<String, Value>,
        path: &FieldPath,
    ) -> Result<Map<String, Value>, Vec<Violation>>;
}

/// One named child of a [`Composite`].
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    node: SchemaNode,
    required: bool,
    nullable: bool,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node(&self) -> &SchemaNode {
        &self.node
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether an absent value is acceptable.
    pub fn may_be_absent(&self) -> bool {
        !self.required || self.nullable
    }
}

/// A node validating a mapping of named child fields.
#[derive(Debug, Clone, Default)]
pub struct Composite {
    fields: Vec<Field>,
    predicates: Vec<SharedPredicate>,
    rule: Option<Arc<dyn CrossFieldRule>>,
}

impl Composite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field that must be present and non-null.
    pub fn required(self, name: &str, node: impl Into<SchemaNode>) -> Self {
        self.declare(name, node.into(), true, false)
    }

    /// Declare a field that may be absent but not null.
    pub fn optional(self, name: &str, node: impl Into<SchemaNode>) -> Self {
        self.declare(name, node.into(), false, false)
    }

    /// Declare a field that may be absent or null.
    pub fn nullable(self, name: &str, node: impl Into<SchemaNode>) -> Self {
        self.declare(name, node.into(), false, true)
    }

    /// Attach a whole-object predicate, checked after all children validated.
    pub fn with_predicate(mut self, predicate: SharedPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Attach the cross-field rule. A composite carries at most one.
    pub fn with_rule(mut self, rule: Arc<dyn CrossFieldRule>) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn predicates(&self) -> &[SharedPredicate] {
        &self.predicates
    }

    pub fn rule(&self) -> Option<&Arc<dyn CrossFieldRule>> {
        self.rule.as_ref()
    }

    // Redeclaring a name replaces the earlier field in place, keeping names unique.
    fn declare(mut self, name: &str, node: SchemaNode, required: bool, nullable: bool) -> Self {
        let field = Field {
            name: name.to_string(),
            node,
            required,
            nullable,
        };
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }
}

/// A node of the schema tree.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    Leaf(Leaf),
    Composite(Composite),
}

impl SchemaNode {
    fn leaf(primitive: Primitive) -> Self {
        Self::Leaf(Leaf {
            primitive,
            default: None,
            predicates: Vec::new(),
        })
    }

    pub fn string() -> Self {
        Self::leaf(Primitive::String)
    }

    pub fn float() -> Self {
        Self::leaf(Primitive::Float)
    }

    pub fn boolean() -> Self {
        Self::leaf(Primitive::Boolean)
    }

    pub fn timestamp() -> Self {
        Self::leaf(Primitive::Timestamp)
    }

    pub fn choice(allowed: &'static [&'static str]) -> Self {
        Self::leaf(Primitive::Choice(allowed))
    }

    pub fn dict() -> Self {
        Self::leaf(Primitive::Dict)
    }

    /// Set the value used when an optional field holding this leaf is
    /// absent. No effect on composites.
    pub fn with_default(self, value: impl Into<Value>) -> Self {
        match self {
            Self::Leaf(mut leaf) => {
                leaf.default = Some(value.into());
                Self::Leaf(leaf)
            }
            other => other,
        }
    }

    /// Attach a predicate to this node.
    pub fn with_predicate(self, predicate: SharedPredicate) -> Self {
        match self {
            Self::Leaf(mut leaf) => {
                leaf.predicates.push(predicate);
                Self::Leaf(leaf)
            }
            Self::Composite(composite) => Self::Composite(composite.with_predicate(predicate)),
        }
    }

    pub fn default_value(&self) -> Option<&Value> {
        match self {
            Self::Leaf(leaf) => leaf.default(),
            Self::Composite(_) => None,
        }
    }

    pub fn predicates(&self) -> &[SharedPredicate] {
        match self {
            Self::Leaf(leaf) => leaf.predicates(),
            Self::Composite(composite) => composite.predicates(),
        }
    }

    pub fn as_composite(&self) -> Option<&Composite> {
        match self {
            Self::Composite(c) => Some(c),
            Self::Leaf(_) => None,
        }
    }

    /// Follow a dotted path of field names down the tree.
    pub fn lookup(&self, path: &str) -> Option<&SchemaNode> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.').try_fold(self, |node, name| {
            node.as_composite()?.field(name).map(Field::node)
        })
    }
}

impl From<Composite> for SchemaNode {
    fn from(composite: Composite) -> Self {
        Self::Composite(composite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::predicate_fn;
    use serde_json::json;

    #[test]
    fn redeclaring_a_field_replaces_it() {
        let c = Composite::new()
            .required("a", SchemaNode::string())
            .optional("b", SchemaNode::boolean())
            .optional("a", SchemaNode::float());
        assert_eq!(c.fields().len(), 2);
        assert_eq!(c.fields()[0].name(), "a");
        assert!(!c.fields()[0].is_required());
        match c.fields()[0].node() {
            SchemaNode::Leaf(leaf) => assert_eq!(leaf.primitive(), Primitive::Float),
            SchemaNode::Composite(_) => panic!("expected leaf"),
        }
    }

    #[test]
    fn presence_flags() {
        let c = Composite::new()
            .required("r", SchemaNode::string())
            .optional("o", SchemaNode::string())
            .nullable("n", SchemaNode::dict());
        assert!(!c.field("r").unwrap().may_be_absent());
        assert!(c.field("o").unwrap().may_be_absent());
        assert!(!c.field("o").unwrap().is_nullable());
        assert!(c.field("n").unwrap().is_nullable());
    }

    #[test]
    fn defaults_only_attach_to_leaves() {
        let leaf = SchemaNode::choice(&["Simple", "LinkAccount"]).with_default("Simple");
        assert_eq!(leaf.default_value(), Some(&json!("Simple")));
        let composite = SchemaNode::from(Composite::new()).with_default("x");
        assert!(composite.default_value().is_none());
    }

    #[test]
    fn predicates_attach_to_either_variant() {
        let p = predicate_fn("ok", |_| Ok(()));
        assert_eq!(SchemaNode::string().with_predicate(p.clone()).predicates().len(), 1);
        assert_eq!(
            SchemaNode::from(Composite::new()).with_predicate(p).predicates().len(),
            1
        );
    }

    #[test]
    fn lookup_follows_dotted_paths() {
        let tree = SchemaNode::from(Composite::new().required(
            "context",
            Composite::new().required(
                "System",
                Composite::new().required("apiAccessToken", SchemaNode::string()),
            ),
        ));
        assert!(tree.lookup("context.System.apiAccessToken").is_some());
        assert!(tree.lookup("context.System.missing").is_none());
        assert!(tree.lookup("").is_some());
    }
}
