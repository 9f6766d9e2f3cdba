//! In-memory reference host.
//!
//! A [`TypeGraph`] is an arena of [`TypeNode`]s addressed by [`TypeId`].
//! Builtin types occupy fixed slots (see [`builtin`]), so the builder can hand
//! them out without lookups.

use indexmap::IndexMap;

use crate::merge::Merger;
use crate::{Annotations, GraphError, LiteralValue, Property, RawAnnotation, TypeFlags, TypeHost, TypeId};

/// Fixed ids of the builtin types, valid in every [`TypeGraph`].
pub mod builtin {
    use crate::TypeId;

    pub const STRING: TypeId = TypeId(0);
    pub const NUMBER: TypeId = TypeId(1);
    pub const BOOLEAN: TypeId = TypeId(2);
    pub const BIGINT: TypeId = TypeId(3);
    pub const ANY: TypeId = TypeId(4);
    pub const UNKNOWN: TypeId = TypeId(5);
    pub const VOID: TypeId = TypeId(6);
    pub const NEVER: TypeId = TypeId(7);
    pub const NULL: TypeId = TypeId(8);
    pub const UNDEFINED: TypeId = TypeId(9);

    pub(crate) const NAMES: [(&str, TypeId); 10] = [
        ("string", STRING),
        ("number", NUMBER),
        ("boolean", BOOLEAN),
        ("bigint", BIGINT),
        ("any", ANY),
        ("unknown", UNKNOWN),
        ("void", VOID),
        ("never", NEVER),
        ("null", NULL),
        ("undefined", UNDEFINED),
    ];

    /// Resolve a builtin keyword.
    pub fn by_name(name: &str) -> Option<TypeId> {
        NAMES
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .map(|(_, id)| *id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Number,
    Boolean,
    BigInt,
}

impl Primitive {
    pub(crate) fn of_literal(value: &LiteralValue) -> Self {
        match value {
            LiteralValue::String(_) => Primitive::String,
            LiteralValue::Number(_) => Primitive::Number,
            LiteralValue::Boolean(_) => Primitive::Boolean,
            LiteralValue::BigInt { .. } => Primitive::BigInt,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Primitive(Primitive),
    Any,
    Unknown,
    Void,
    Never,
    Null,
    Undefined,
    Literal {
        value: LiteralValue,
        /// Member of an enum declaration.
        enum_member: bool,
    },
    Enum {
        name: String,
        members: Vec<TypeId>,
    },
    Array {
        element: Option<TypeId>,
    },
    Record {
        name: Option<String>,
        properties: Vec<Property>,
    },
    Union {
        members: Vec<TypeId>,
    },
    Intersection {
        members: Vec<TypeId>,
        /// Resolved types of properties declared by more than one member.
        merged: IndexMap<String, TypeId>,
    },
    /// Forward declaration awaiting [`TypeGraphBuilder::define`].
    Declared(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    pub kind: TypeKind,
    pub alias: Option<String>,
    pub annotations: Annotations,
}

impl TypeNode {
    pub(crate) fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            alias: None,
            annotations: Annotations::default(),
        }
    }
}

/// A frozen type graph.
#[derive(Debug, Clone)]
pub struct TypeGraph {
    nodes: Vec<TypeNode>,
    names: IndexMap<String, TypeId>,
}

impl TypeGraph {
    pub fn builder() -> TypeGraphBuilder {
        TypeGraphBuilder::new()
    }

    /// Resolve a declared name, falling back to builtin keywords.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.names
            .get(name)
            .copied()
            .or_else(|| builtin::by_name(name))
    }

    /// Declared names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = (&str, TypeId)> {
        self.names.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn node(&self, ty: TypeId) -> &TypeNode {
        &self.nodes[ty.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn kind(&self, ty: TypeId) -> &TypeKind {
        &self.node(ty).kind
    }

    fn write_type(&self, ty: TypeId, depth: usize, out: &mut String) {
        const MAX_DEPTH: usize = 3;

        let node = self.node(ty);
        if depth > 0
            && let Some(name) = node.alias.as_deref().or(match &node.kind {
                TypeKind::Record { name, .. } => name.as_deref(),
                TypeKind::Enum { name, .. } => Some(name.as_str()),
                _ => None,
            })
        {
            out.push_str(name);
            return;
        }
        if depth > MAX_DEPTH {
            out.push_str("...");
            return;
        }
        let join = |members: &[TypeId], sep: &str, out: &mut String| {
            for (i, member) in members.iter().enumerate() {
                if i > 0 {
                    out.push_str(sep);
                }
                self.write_type(*member, depth + 1, out);
            }
        };
        match &node.kind {
            TypeKind::Primitive(Primitive::String) => out.push_str("string"),
            TypeKind::Primitive(Primitive::Number) => out.push_str("number"),
            TypeKind::Primitive(Primitive::Boolean) => out.push_str("boolean"),
            TypeKind::Primitive(Primitive::BigInt) => out.push_str("bigint"),
            TypeKind::Any => out.push_str("any"),
            TypeKind::Unknown => out.push_str("unknown"),
            TypeKind::Void => out.push_str("void"),
            TypeKind::Never => out.push_str("never"),
            TypeKind::Null => out.push_str("null"),
            TypeKind::Undefined => out.push_str("undefined"),
            TypeKind::Literal { value, .. } => out.push_str(&value.to_string()),
            TypeKind::Enum { name, .. } => out.push_str(name),
            TypeKind::Array { element: Some(element) } => {
                self.write_type(*element, depth + 1, out);
                out.push_str("[]");
            }
            TypeKind::Array { element: None } => out.push_str("any[]"),
            TypeKind::Record {
                name: Some(name), ..
            } => out.push_str(name),
            TypeKind::Record {
                name: None,
                properties,
            } => {
                out.push_str("{ ");
                for prop in properties {
                    out.push_str(&prop.name);
                    if prop.optional {
                        out.push('?');
                    }
                    out.push_str(": ");
                    self.write_type(prop.ty, depth + 1, out);
                    out.push_str("; ");
                }
                out.push('}');
            }
            TypeKind::Union { members } => join(members, " | ", out),
            TypeKind::Intersection { members, .. } => join(members, " & ", out),
            TypeKind::Declared(name) => out.push_str(name),
        }
    }
}

impl TypeHost for TypeGraph {
    fn flags(&self, ty: TypeId) -> TypeFlags {
        match self.kind(ty) {
            TypeKind::Primitive(Primitive::String) => TypeFlags::STRING,
            TypeKind::Primitive(Primitive::Number) => TypeFlags::NUMBER,
            TypeKind::Primitive(Primitive::Boolean) => TypeFlags::BOOLEAN,
            TypeKind::Primitive(Primitive::BigInt) => TypeFlags::BIGINT,
            TypeKind::Any => TypeFlags::ANY,
            TypeKind::Unknown => TypeFlags::UNKNOWN,
            TypeKind::Void => TypeFlags::VOID,
            TypeKind::Never => TypeFlags::NEVER,
            TypeKind::Null => TypeFlags::NULL,
            TypeKind::Undefined => TypeFlags::UNDEFINED,
            TypeKind::Literal { value, enum_member } => {
                let mut flags = match Primitive::of_literal(value) {
                    Primitive::String => TypeFlags::STRING_LITERAL,
                    Primitive::Number => TypeFlags::NUMBER_LITERAL,
                    Primitive::Boolean => TypeFlags::BOOLEAN_LITERAL,
                    Primitive::BigInt => TypeFlags::BIGINT_LITERAL,
                };
                if *enum_member {
                    flags |= TypeFlags::ENUM_LITERAL;
                }
                flags
            }
            TypeKind::Enum { .. } => TypeFlags::ENUM | TypeFlags::UNION,
            TypeKind::Array { .. } | TypeKind::Record { .. } => TypeFlags::OBJECT,
            TypeKind::Union { .. } => TypeFlags::UNION,
            TypeKind::Intersection { .. } => TypeFlags::INTERSECTION,
            TypeKind::Declared(_) => TypeFlags::NONE,
        }
    }

    fn literal_value(&self, ty: TypeId) -> Option<LiteralValue> {
        match self.kind(ty) {
            TypeKind::Literal { value, .. } => Some(value.clone()),
            _ => None,
        }
    }

    fn display_name(&self, ty: TypeId) -> Option<&str> {
        self.symbol_name(ty).or(self.node(ty).alias.as_deref())
    }

    fn symbol_name(&self, ty: TypeId) -> Option<&str> {
        match self.kind(ty) {
            TypeKind::Record { name, .. } => name.as_deref(),
            TypeKind::Enum { name, .. } => Some(name),
            _ => None,
        }
    }

    fn is_array(&self, ty: TypeId) -> bool {
        matches!(self.kind(ty), TypeKind::Array { .. })
    }

    fn element_type(&self, ty: TypeId) -> Option<TypeId> {
        match self.kind(ty) {
            TypeKind::Array { element } => *element,
            _ => None,
        }
    }

    fn members(&self, ty: TypeId) -> &[TypeId] {
        match self.kind(ty) {
            TypeKind::Union { members }
            | TypeKind::Intersection { members, .. }
            | TypeKind::Enum { members, .. } => members,
            _ => &[],
        }
    }

    fn properties(&self, ty: TypeId) -> &[Property] {
        match self.kind(ty) {
            TypeKind::Record { properties, .. } => properties,
            _ => &[],
        }
    }

    fn annotations(&self, ty: TypeId) -> &Annotations {
        &self.node(ty).annotations
    }

    fn merged_property_type(&self, intersection: TypeId, name: &str) -> Option<TypeId> {
        match self.kind(intersection) {
            TypeKind::Intersection { merged, .. } => merged.get(name).copied(),
            _ => None,
        }
    }

    fn type_to_string(&self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write_type(ty, 0, &mut out);
        out
    }
}

/// Incremental constructor for a [`TypeGraph`].
///
/// Named records may be declared before they are defined, which is how cyclic
/// graphs are expressed:
///
/// ```
/// use typeval_types::{Property, TypeGraph, builtin};
///
/// let mut builder = TypeGraph::builder();
/// let node = builder.declare("Node");
/// let children = builder.array(Some(node));
/// builder.define_record(
///     node,
///     vec![
///         Property::required("value", builtin::NUMBER),
///         Property::optional("children", children),
///     ],
/// );
/// let graph = builder.build().unwrap();
/// assert_eq!(graph.lookup("Node"), Some(node));
/// ```
#[derive(Debug, Clone)]
pub struct TypeGraphBuilder {
    nodes: Vec<TypeNode>,
    names: IndexMap<String, TypeId>,
    duplicates: Vec<String>,
}

impl Default for TypeGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeGraphBuilder {
    pub fn new() -> Self {
        let nodes = [
            TypeKind::Primitive(Primitive::String),
            TypeKind::Primitive(Primitive::Number),
            TypeKind::Primitive(Primitive::Boolean),
            TypeKind::Primitive(Primitive::BigInt),
            TypeKind::Any,
            TypeKind::Unknown,
            TypeKind::Void,
            TypeKind::Never,
            TypeKind::Null,
            TypeKind::Undefined,
        ]
        .into_iter()
        .map(TypeNode::new)
        .collect();
        Self {
            nodes,
            names: IndexMap::new(),
            duplicates: Vec::new(),
        }
    }

    /// Append an unnamed node.
    pub fn add(&mut self, kind: TypeKind) -> TypeId {
        let id = TypeId(self.nodes.len());
        self.nodes.push(TypeNode::new(kind));
        id
    }

    fn register(&mut self, name: &str, id: TypeId) {
        if self.names.contains_key(name) || builtin::by_name(name).is_some() {
            self.duplicates.push(name.to_string());
        } else {
            self.names.insert(name.to_string(), id);
        }
    }

    pub fn literal(&mut self, value: LiteralValue) -> TypeId {
        self.add(TypeKind::Literal {
            value,
            enum_member: false,
        })
    }

    /// Add a named enum whose members carry the given values.
    pub fn enumeration(
        &mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = LiteralValue>,
    ) -> TypeId {
        let name = name.into();
        let members = values
            .into_iter()
            .map(|value| {
                self.add(TypeKind::Literal {
                    value,
                    enum_member: true,
                })
            })
            .collect();
        let id = self.add(TypeKind::Enum {
            name: name.clone(),
            members,
        });
        self.register(&name, id);
        id
    }

    pub fn record(&mut self, name: impl Into<String>, properties: Vec<Property>) -> TypeId {
        let name = name.into();
        let id = self.add(TypeKind::Record {
            name: Some(name.clone()),
            properties,
        });
        self.register(&name, id);
        id
    }

    pub fn anonymous_record(&mut self, properties: Vec<Property>) -> TypeId {
        self.add(TypeKind::Record {
            name: None,
            properties,
        })
    }

    /// Reserve a named slot to be filled by [`Self::define`].
    pub fn declare(&mut self, name: impl Into<String>) -> TypeId {
        let name = name.into();
        let id = self.add(TypeKind::Declared(name.clone()));
        self.register(&name, id);
        id
    }

    pub fn is_declared(&self, id: TypeId) -> bool {
        matches!(
            self.nodes.get(id.0).map(|node| &node.kind),
            Some(TypeKind::Declared(_))
        )
    }

    pub fn define(&mut self, id: TypeId, kind: TypeKind) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.kind = kind;
        }
    }

    /// Define a declared slot as a record named after the declaration.
    pub fn define_record(&mut self, id: TypeId, properties: Vec<Property>) {
        let name = match self.nodes.get(id.0).map(|node| &node.kind) {
            Some(TypeKind::Declared(name)) => Some(name.clone()),
            _ => None,
        };
        self.define(id, TypeKind::Record { name, properties });
    }

    /// Name `id` through a type alias.
    pub fn alias(&mut self, id: TypeId, name: impl Into<String>) {
        let name = name.into();
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.alias = Some(name);
        }
    }

    /// Copy the definition of `target` into `id` and name it `name`.
    pub fn define_alias(&mut self, id: TypeId, target: TypeId, name: impl Into<String>) {
        if let Some(source) = self.nodes.get(target.0).cloned() {
            self.define(id, source.kind);
            if let Some(node) = self.nodes.get_mut(id.0) {
                node.annotations.0.extend(source.annotations.0);
            }
        }
        self.alias(id, name);
    }

    pub fn annotate(&mut self, id: TypeId, annotation: RawAnnotation) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.annotations.0.push(annotation);
        }
    }

    pub fn union(&mut self, members: Vec<TypeId>) -> TypeId {
        self.add(TypeKind::Union { members })
    }

    /// Add an intersection; nested intersections are flattened.
    pub fn intersection(&mut self, members: Vec<TypeId>) -> TypeId {
        let kind = self.intersection_kind(members);
        self.add(kind)
    }

    pub(crate) fn intersection_kind(&self, members: Vec<TypeId>) -> TypeKind {
        TypeKind::Intersection {
            members: flatten_intersection(&self.nodes, &members),
            merged: IndexMap::new(),
        }
    }

    pub fn array(&mut self, element: Option<TypeId>) -> TypeId {
        self.add(TypeKind::Array { element })
    }

    /// Freeze the graph and resolve merged intersection properties.
    pub fn build(self) -> Result<TypeGraph, GraphError> {
        let Self {
            mut nodes,
            names,
            duplicates,
        } = self;
        if let Some(name) = duplicates.into_iter().next() {
            return Err(GraphError::DuplicateType(name));
        }
        if let Some(name) = nodes.iter().find_map(|node| match &node.kind {
            TypeKind::Declared(name) => Some(name.clone()),
            _ => None,
        }) {
            return Err(GraphError::Undefined(name));
        }
        for i in 0..nodes.len() {
            if let TypeKind::Intersection { members, .. } = &nodes[i].kind {
                let flat = flatten_intersection(&nodes, members);
                if let TypeKind::Intersection { members, .. } = &mut nodes[i].kind {
                    *members = flat;
                }
            }
        }
        Merger::new(&mut nodes).resolve_intersections();
        Ok(TypeGraph { nodes, names })
    }
}

pub(crate) fn flatten_intersection(nodes: &[TypeNode], members: &[TypeId]) -> Vec<TypeId> {
    fn visit(nodes: &[TypeNode], ty: TypeId, seen: &mut Vec<TypeId>, flat: &mut Vec<TypeId>) {
        match nodes.get(ty.0).map(|node| &node.kind) {
            Some(TypeKind::Intersection { members, .. }) => {
                if seen.contains(&ty) {
                    return;
                }
                seen.push(ty);
                for member in members {
                    visit(nodes, *member, seen, flat);
                }
            }
            _ => {
                if !flat.contains(&ty) {
                    flat.push(ty);
                }
            }
        }
    }

    let mut seen = Vec::new();
    let mut flat = Vec::with_capacity(members.len());
    for member in members {
        visit(nodes, *member, &mut seen, &mut flat);
    }
    flat
}
