//! JSON type-graph files.
//!
//! ```json
//! {
//!   "types": {
//!     "Role": { "kind": "enum", "members": ["admin", "guest"] },
//!     "User": {
//!       "kind": "record",
//!       "properties": [
//!         { "name": "id", "type": "number" },
//!         { "name": "role", "type": "Role", "optional": true },
//!         { "name": "tags", "type": { "kind": "array", "element": "string" } }
//!       ]
//!     },
//!     "Email": "string"
//!   }
//! }
//! ```
//!
//! A type reference is either a name (a builtin keyword or a top-level entry)
//! or an inline definition. Top-level entries that are not records or enums
//! become aliases named after their key.

use std::io::Read;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    Annotations, GraphError, LiteralValue, Property, TypeGraph, TypeGraphBuilder, TypeId, TypeKind,
    builtin,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeGraphFile {
    pub types: IndexMap<String, TypeRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    Name(String),
    Inline(Box<TypeDef>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeDef {
    #[serde(flatten)]
    pub body: TypeBody,
    #[serde(default)]
    pub annotations: Annotations,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TypeBody {
    Literal {
        value: LiteralValue,
    },
    Enum {
        members: Vec<LiteralValue>,
    },
    Array {
        #[serde(default)]
        element: Option<TypeRef>,
    },
    Record {
        #[serde(default)]
        properties: Vec<PropertyDef>,
        /// Declare an object type alias instead of an interface.
        #[serde(default)]
        anonymous: bool,
    },
    Union {
        members: Vec<TypeRef>,
    },
    Intersection {
        members: Vec<TypeRef>,
    },
    Alias {
        target: TypeRef,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub annotations: Annotations,
}

pub fn from_str(source: &str) -> Result<TypeGraph, GraphError> {
    let file: TypeGraphFile = serde_json::from_str(source)?;
    file.into_graph()
}

pub fn from_reader(reader: impl Read) -> Result<TypeGraph, GraphError> {
    let file: TypeGraphFile = serde_json::from_reader(reader)?;
    file.into_graph()
}

impl TypeGraphFile {
    pub fn into_graph(self) -> Result<TypeGraph, GraphError> {
        let mut loader = Loader {
            builder: TypeGraph::builder(),
            declared: IndexMap::new(),
        };
        for name in self.types.keys() {
            let id = loader.builder.declare(name.clone());
            loader.declared.insert(name.clone(), id);
        }

        let mut aliases = Vec::new();
        for (name, ty) in self.types {
            let id = loader.declared[&name];
            match ty {
                TypeRef::Name(target) => {
                    aliases.push((name, id, TypeRef::Name(target), Annotations::default()))
                }
                TypeRef::Inline(def) => {
                    let TypeDef { body, annotations } = *def;
                    if let TypeBody::Alias { target } = body {
                        aliases.push((name, id, target, annotations));
                        continue;
                    }
                    loader.define_named(&name, id, body)?;
                    loader.annotate(id, annotations);
                }
            }
        }
        loader.define_aliases(aliases)?;
        loader.builder.build()
    }
}

struct Loader {
    builder: TypeGraphBuilder,
    declared: IndexMap<String, TypeId>,
}

impl Loader {
    fn lookup(&self, name: &str) -> Result<TypeId, GraphError> {
        builtin::by_name(name)
            .or_else(|| self.declared.get(name).copied())
            .ok_or_else(|| GraphError::UnknownType(name.to_string()))
    }

    fn annotate(&mut self, id: TypeId, annotations: Annotations) {
        for annotation in annotations.0 {
            self.builder.annotate(id, annotation);
        }
    }

    fn resolve(&mut self, ty: TypeRef) -> Result<TypeId, GraphError> {
        match ty {
            TypeRef::Name(name) => self.lookup(&name),
            TypeRef::Inline(def) => {
                let TypeDef { body, annotations } = *def;
                let id = match body {
                    TypeBody::Enum { .. } => return Err(GraphError::NotInlinable("enum")),
                    TypeBody::Alias { .. } => return Err(GraphError::NotInlinable("alias")),
                    TypeBody::Record { properties, .. } => {
                        let properties = self.properties(properties)?;
                        self.builder.anonymous_record(properties)
                    }
                    body => {
                        let kind = self.kind(body)?;
                        self.builder.add(kind)
                    }
                };
                self.annotate(id, annotations);
                Ok(id)
            }
        }
    }

    fn properties(&mut self, properties: Vec<PropertyDef>) -> Result<Vec<Property>, GraphError> {
        properties
            .into_iter()
            .map(|prop| {
                Ok(Property {
                    name: prop.name,
                    ty: self.resolve(prop.ty)?,
                    optional: prop.optional,
                    annotations: prop.annotations,
                })
            })
            .collect()
    }

    /// Kind of a definition that is neither a record, an enum nor an alias.
    fn kind(&mut self, body: TypeBody) -> Result<TypeKind, GraphError> {
        Ok(match body {
            TypeBody::Literal { value } => TypeKind::Literal {
                value,
                enum_member: false,
            },
            TypeBody::Array { element } => TypeKind::Array {
                element: element.map(|ty| self.resolve(ty)).transpose()?,
            },
            TypeBody::Union { members } => TypeKind::Union {
                members: self.members(members)?,
            },
            TypeBody::Intersection { members } => {
                let members = self.members(members)?;
                self.builder.intersection_kind(members)
            }
            TypeBody::Enum { .. } => return Err(GraphError::NotInlinable("enum")),
            TypeBody::Record { .. } => return Err(GraphError::NotInlinable("record")),
            TypeBody::Alias { .. } => return Err(GraphError::NotInlinable("alias")),
        })
    }

    fn members(&mut self, members: Vec<TypeRef>) -> Result<Vec<TypeId>, GraphError> {
        members.into_iter().map(|ty| self.resolve(ty)).collect()
    }

    fn define_named(&mut self, name: &str, id: TypeId, body: TypeBody) -> Result<(), GraphError> {
        match body {
            TypeBody::Record {
                properties,
                anonymous,
            } => {
                let properties = self.properties(properties)?;
                if anonymous {
                    self.builder.define(
                        id,
                        TypeKind::Record {
                            name: None,
                            properties,
                        },
                    );
                    self.builder.alias(id, name);
                } else {
                    self.builder.define_record(id, properties);
                }
            }
            TypeBody::Enum { members } => {
                let members = members
                    .into_iter()
                    .map(|value| {
                        self.builder.add(TypeKind::Literal {
                            value,
                            enum_member: true,
                        })
                    })
                    .collect();
                self.builder.define(
                    id,
                    TypeKind::Enum {
                        name: name.to_string(),
                        members,
                    },
                );
            }
            body => {
                let kind = self.kind(body)?;
                self.builder.define(id, kind);
                self.builder.alias(id, name);
            }
        }
        Ok(())
    }

    /// Aliases copy their target, so they are defined once the target is.
    fn define_aliases(
        &mut self,
        mut pending: Vec<(String, TypeId, TypeRef, Annotations)>,
    ) -> Result<(), GraphError> {
        while !pending.is_empty() {
            let mut waiting = Vec::new();
            let before = pending.len();
            for (name, id, target, annotations) in pending {
                let target = match target {
                    TypeRef::Name(target_name) => {
                        let target_id = self.lookup(&target_name)?;
                        if self.builder.is_declared(target_id) {
                            waiting.push((name, id, TypeRef::Name(target_name), annotations));
                            continue;
                        }
                        target_id
                    }
                    inline => self.resolve(inline)?,
                };
                self.builder.define_alias(id, target, name);
                self.annotate(id, annotations);
            }
            if waiting.len() == before {
                // Only cyclic aliases remain.
                return Err(GraphError::Undefined(waiting[0].0.clone()));
            }
            pending = waiting;
        }
        Ok(())
    }
}
