//! # Violations
//!
//! Field-path-addressed validation failures. A single validation pass may
//! produce many violations; independent subtrees are all reported.

use std::fmt;

use serde::Serialize;

/// Dot-separated path from the envelope root to a field
/// (e.g. `context.System.application.applicationId`).
///
/// The root itself is the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// The envelope root.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Path of a named child of this path.
    pub fn child(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}.{name}", self.0))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("(root)")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Classification of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViolationKind {
    /// Value present but of the wrong primitive type.
    TypeMismatch,
    /// Required value absent (or null where null is not allowed).
    RequiredFieldMissing,
    /// Enumerated value outside the declared set.
    InvalidChoice,
    /// A domain predicate rejected an otherwise well-typed value.
    PredicateFailure,
    /// Expected a mapping, got a scalar, array, or null.
    StructuralMismatch,
    /// Two validated substructures disagree.
    CrossFieldViolation,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TypeMismatch => "TypeMismatch",
            Self::RequiredFieldMissing => "RequiredFieldMissing",
            Self::InvalidChoice => "InvalidChoice",
            Self::PredicateFailure => "PredicateFailure",
            Self::StructuralMismatch => "StructuralMismatch",
            Self::CrossFieldViolation => "CrossFieldViolation",
        };
        f.write_str(s)
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Path to the violating field.
    pub path: FieldPath,
    pub kind: ViolationKind,
    /// Human-readable description of the violation.
    pub message: String,
}

impl Violation {
    pub fn new(path: FieldPath, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}: [{}] {}", self.path, self.kind, self.message)
    }
}

/// Collection of validation violations, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns the violations reported at exactly `path`.
    pub fn at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations
            .iter()
            .filter(move |v| v.path.as_str() == path)
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}
