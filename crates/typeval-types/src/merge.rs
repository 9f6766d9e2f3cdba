//! Property type resolution for intersections.
//!
//! When several members of an intersection declare the same property, the
//! property's type is the meet of the declared types. Meeting two structural
//! types yields a fresh intersection which is resolved in turn; intersections
//! are interned by member list so recursive types reach a fixed point.

use ahash::AHashMap;
use indexmap::IndexMap;

use crate::graph::{Primitive, TypeKind, TypeNode, builtin, flatten_intersection};
use crate::{LiteralValue, TypeId};

pub(crate) struct Merger<'a> {
    nodes: &'a mut Vec<TypeNode>,
    interned: AHashMap<Vec<TypeId>, TypeId>,
}

impl<'a> Merger<'a> {
    pub(crate) fn new(nodes: &'a mut Vec<TypeNode>) -> Self {
        let interned = nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| match &node.kind {
                TypeKind::Intersection { members, .. } => Some((members.clone(), TypeId(i))),
                _ => None,
            })
            .collect();
        Self { nodes, interned }
    }

    fn kind(&self, ty: TypeId) -> &TypeKind {
        &self.nodes[ty.0].kind
    }

    fn push(&mut self, kind: TypeKind) -> TypeId {
        let id = TypeId(self.nodes.len());
        self.nodes.push(TypeNode::new(kind));
        id
    }

    /// Resolve every intersection, including the ones created on the way.
    pub(crate) fn resolve_intersections(&mut self) {
        let mut next = 0;
        while next < self.nodes.len() {
            let id = TypeId(next);
            next += 1;
            let TypeKind::Intersection { members, .. } = self.kind(id) else {
                continue;
            };
            let members = members.clone();
            let mut declared: IndexMap<String, Vec<TypeId>> = IndexMap::new();
            for member in &members {
                if let TypeKind::Record { properties, .. } = self.kind(*member) {
                    for prop in properties {
                        declared.entry(prop.name.clone()).or_default().push(prop.ty);
                    }
                }
            }
            let mut merged = IndexMap::new();
            for (name, types) in declared {
                if types.len() < 2 {
                    continue;
                }
                let mut iter = types.into_iter();
                let Some(first) = iter.next() else {
                    continue;
                };
                let ty = iter.fold(first, |acc, ty| self.meet(acc, ty));
                merged.insert(name, ty);
            }
            if let TypeKind::Intersection { merged: slot, .. } = &mut self.nodes[id.0].kind {
                *slot = merged;
            }
        }
    }

    fn meet(&mut self, a: TypeId, b: TypeId) -> TypeId {
        if a == b {
            return a;
        }
        let left = self.atoms(a);
        let right = self.atoms(b);
        let mut results = Vec::new();
        for l in &left {
            for r in &right {
                if let Some(ty) = self.meet_atoms(*l, *r)
                    && !results.contains(&ty)
                {
                    results.push(ty);
                }
            }
        }
        match results.len() {
            0 => builtin::NEVER,
            1 => results[0],
            _ => self.push(TypeKind::Union { members: results }),
        }
    }

    /// Union and enum members, flattened.
    fn atoms(&self, ty: TypeId) -> Vec<TypeId> {
        match self.kind(ty) {
            TypeKind::Union { members } | TypeKind::Enum { members, .. } => members
                .clone()
                .into_iter()
                .flat_map(|member| self.atoms(member))
                .collect(),
            _ => vec![ty],
        }
    }

    fn meet_atoms(&mut self, a: TypeId, b: TypeId) -> Option<TypeId> {
        if a == b {
            return Some(a);
        }
        match (self.kind(a), self.kind(b)) {
            (TypeKind::Any | TypeKind::Unknown, _) => Some(b),
            (_, TypeKind::Any | TypeKind::Unknown) => Some(a),
            (TypeKind::Never, _) | (_, TypeKind::Never) => None,
            (TypeKind::Literal { value: va, .. }, TypeKind::Literal { value: vb, .. }) => {
                literal_eq(va, vb).then_some(a)
            }
            (TypeKind::Literal { value, .. }, TypeKind::Primitive(p)) => {
                (Primitive::of_literal(value) == *p).then_some(a)
            }
            (TypeKind::Primitive(p), TypeKind::Literal { value, .. }) => {
                (Primitive::of_literal(value) == *p).then_some(b)
            }
            (TypeKind::Primitive(pa), TypeKind::Primitive(pb)) => (pa == pb).then_some(a),
            (TypeKind::Null, TypeKind::Null)
            | (TypeKind::Undefined, TypeKind::Undefined)
            | (TypeKind::Void, TypeKind::Void) => Some(a),
            (TypeKind::Void, TypeKind::Undefined) => Some(b),
            (TypeKind::Undefined, TypeKind::Void) => Some(a),
            (TypeKind::Array { element: ea }, TypeKind::Array { element: eb }) => {
                let (ea, eb) = (*ea, *eb);
                let element = match (ea, eb) {
                    (Some(ea), Some(eb)) => Some(self.meet(ea, eb)),
                    (Some(e), None) | (None, Some(e)) => Some(e),
                    (None, None) => None,
                };
                Some(self.push(TypeKind::Array { element }))
            }
            (
                TypeKind::Record { .. } | TypeKind::Intersection { .. },
                TypeKind::Record { .. } | TypeKind::Intersection { .. },
            ) => Some(self.intersect(a, b)),
            _ => None,
        }
    }

    fn intersect(&mut self, a: TypeId, b: TypeId) -> TypeId {
        let members = flatten_intersection(&self.nodes[..], &[a, b]);
        if let Some(id) = self.interned.get(&members) {
            return *id;
        }
        let id = self.push(TypeKind::Intersection {
            members: members.clone(),
            merged: IndexMap::new(),
        });
        self.interned.insert(members, id);
        id
    }
}

fn literal_eq(a: &LiteralValue, b: &LiteralValue) -> bool {
    match (a, b) {
        (LiteralValue::Number(a), LiteralValue::Number(b)) => a.to_bits() == b.to_bits(),
        _ => a == b,
    }
}
