//! Type descriptor model for typeval.
//!
//! The schema compiler never looks at source code. It consumes types that a
//! host type-resolution service has already resolved, through the
//! [`TypeHost`] query interface defined here.
//!
//! This crate also provides [`TypeGraph`], an in-memory reference host that can
//! be assembled with [`TypeGraphBuilder`] or loaded from a JSON type-graph file
//! (see [`load`]).

mod error;
mod flags;
mod graph;
mod host;
pub mod load;
mod merge;

pub use error::GraphError;
pub use flags::TypeFlags;
pub use graph::{Primitive, TypeGraph, TypeGraphBuilder, TypeKind, TypeNode, builtin};
pub use host::{Annotations, LiteralValue, Property, RawAnnotation, TypeHost};

/// Identity of a type descriptor within one host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(pub usize);
