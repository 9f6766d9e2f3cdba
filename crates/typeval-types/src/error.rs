/// Errors raised while assembling or loading a type graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("invalid type graph JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A type reference names neither a builtin nor a declared type.
    #[error("unknown type `{0}`")]
    UnknownType(String),
    #[error("type `{0}` is declared more than once")]
    DuplicateType(String),
    /// A forward declaration was never given a definition.
    #[error("type `{0}` is declared but never defined")]
    Undefined(String),
    #[error("`{0}` definitions are only allowed at the top level")]
    NotInlinable(&'static str),
}
