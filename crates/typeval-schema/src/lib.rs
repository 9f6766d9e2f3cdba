//! Schema tree emitted by the typeval compiler.
//!
//! The tree mirrors the declarative rule objects understood by the validation
//! engine: keyword rules (`{ type: "string", optional: true }`), lists of
//! alternative rules, and the bare property map used for a top-level object.

mod node;
mod source;
mod value;

pub use node::{Fields, Properties, Props, Rule, SchemaNode};
pub use value::SchemaValue;
