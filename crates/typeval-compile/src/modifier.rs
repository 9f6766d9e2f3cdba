//! Fields layered onto a converted node.
//!
//! Every modifier is set-if-absent: the first write of a key wins and
//! structural keys are never overwritten.

use typeval_schema::{SchemaNode, SchemaValue};
use typeval_types::Annotations;

use crate::normalize_annotation;

pub const OPTIONAL: &str = "optional";
pub const NULLABLE: &str = "nullable";

pub fn set_optional(node: &mut SchemaNode) {
    node.set_if_absent(OPTIONAL, SchemaValue::Bool(true));
}

pub fn set_nullable(node: &mut SchemaNode) {
    node.set_if_absent(NULLABLE, SchemaValue::Bool(true));
}

pub fn mark_root(node: &mut SchemaNode, marker: &str) {
    node.set_if_absent(marker, SchemaValue::Bool(true));
}

pub fn apply_annotations(node: &mut SchemaNode, annotations: &Annotations) {
    for annotation in annotations.iter() {
        if let Some((name, value)) = normalize_annotation(annotation) {
            node.set_if_absent(name, value);
        }
    }
}
