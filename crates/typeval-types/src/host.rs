use core::fmt;

use serde::{Deserialize, Serialize};
use thisisplural::Plural;

use crate::{TypeFlags, TypeId};

/// The value carried by a literal type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Boolean(bool),
    Number(f64),
    String(String),
    /// Arbitrary precision integer literal, kept as its decimal text.
    BigInt { bigint: String },
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Boolean(b) => write!(f, "{b}"),
            LiteralValue::Number(n) => write!(f, "{n}"),
            LiteralValue::String(s) => write!(f, "{s:?}"),
            LiteralValue::BigInt { bigint } => write!(f, "{bigint}n"),
        }
    }
}

/// A documentation tag as extracted by the host, before normalization.
///
/// `text` is `None` for bare tags such as `@deprecated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnnotation {
    pub name: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl RawAnnotation {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
        }
    }

    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: None,
        }
    }
}

/// Ordered documentation tags attached to a type or a property.
#[derive(Debug, Default, Clone, PartialEq, Eq, Plural, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotations(pub Vec<RawAnnotation>);

/// A declared property of a structural type.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub ty: TypeId,
    pub optional: bool,
    pub annotations: Annotations,
}

impl Property {
    pub fn required(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            annotations: Annotations::default(),
        }
    }

    pub fn optional(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            optional: true,
            ..Self::required(name, ty)
        }
    }

    pub fn with_annotation(mut self, annotation: RawAnnotation) -> Self {
        self.annotations.0.push(annotation);
        self
    }
}

/// Query interface of a host type-resolution service.
///
/// Every method is a pure lookup; the compiler never mutates the host.
pub trait TypeHost {
    /// Category flags of `ty`.
    fn flags(&self, ty: TypeId) -> TypeFlags;

    /// Value of a literal type, `None` for non-literals.
    fn literal_value(&self, ty: TypeId) -> Option<LiteralValue>;

    /// Resolved display name of a named type (interface, enum or alias).
    fn display_name(&self, ty: TypeId) -> Option<&str>;

    /// Declared symbol name of an interface or enum, ignoring aliases.
    fn symbol_name(&self, ty: TypeId) -> Option<&str>;

    /// Whether an object type is an array.
    fn is_array(&self, ty: TypeId) -> bool;

    /// Element type of an array, `None` for an untyped array.
    fn element_type(&self, ty: TypeId) -> Option<TypeId>;

    /// Members of a union, intersection or enum, in declaration order.
    fn members(&self, ty: TypeId) -> &[TypeId];

    /// Own properties of a structural type, in declaration order.
    fn properties(&self, ty: TypeId) -> &[Property];

    /// Documentation tags of the type itself followed by those of its alias.
    fn annotations(&self, ty: TypeId) -> &Annotations;

    /// Type of `name` as seen from the intersection as a whole, when several
    /// members declare it.
    fn merged_property_type(&self, intersection: TypeId, name: &str) -> Option<TypeId>;

    /// Human readable rendering used in diagnostics.
    fn type_to_string(&self, ty: TypeId) -> String;
}
