//! Compiles resolved type descriptors into declarative validation schemas.
//!
//! The compiler walks a type through a [`TypeHost`] and produces a
//! [`SchemaNode`] describing the runtime checks equivalent to that type:
//!
//! - primitives, literals, enums and well-known named types become keyword
//!   rules such as `{ type: "string" }` or `{ type: "equal", value: 1 }`;
//! - arrays, records and intersections become nested object rules, except at
//!   the top level where a record is emitted as a bare property map;
//! - unions become lists of alternatives, with `undefined` and `null` members
//!   folded into `optional` and `nullable`.
//!
//! Recursive types terminate: a named record met again on the active path
//! compiles to `{ type: "any" }`.

mod annotation;
mod category;
mod convert;
mod error;
pub mod history;
mod intersection;
pub mod modifier;
mod options;
mod union;

pub use annotation::{normalize_annotation, parse_annotation_value};
pub use category::Category;
pub use convert::Compiler;
pub use error::CompileError;
pub use options::{CompileOptions, DEFAULT_BUFFER_TYPE, DEFAULT_PREDEFINED, DEFAULT_ROOT_MARKER};
pub use typeval_schema::SchemaNode;
use typeval_types::{TypeHost, TypeId};

/// Compile `root` with the default options.
pub fn compile<H: TypeHost + ?Sized>(host: &H, root: TypeId) -> Result<SchemaNode, CompileError> {
    Compiler::new(host).compile(root)
}
