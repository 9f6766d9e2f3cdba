/// Errors that abort a compilation. No partial schema is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    /// The type matched none of the supported categories.
    #[error("unsupported type `{type_name}`")]
    UnsupportedCategory { type_name: String },

    /// Only object types can take part in an intersection.
    #[error("cannot intersect literal or primitive type `{type_name}`")]
    InvalidIntersectionMember { type_name: String },

    #[error("unknown literal kind of `{type_name}`")]
    UnknownLiteralKind { type_name: String },

    /// The host could not resolve a property declared by several members of an
    /// intersection.
    #[error("no merged type for intersection property `{property}`")]
    UnresolvedMergedProperty { property: String },
}
