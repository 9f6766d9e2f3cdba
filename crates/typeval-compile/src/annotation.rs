use std::sync::LazyLock;

use regex::Regex;
use typeval_schema::SchemaValue;
use typeval_types::RawAnnotation;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").expect("invalid number regex"));

/// Turn a documentation tag into a schema field.
///
/// Tags without text are dropped.
pub fn normalize_annotation(annotation: &RawAnnotation) -> Option<(&str, SchemaValue)> {
    let text = annotation.text.as_deref()?.trim();
    if text.is_empty() {
        return None;
    }
    Some((annotation.name.as_str(), parse_annotation_value(text)))
}

/// `true`/`false` become booleans, decimal numbers become numbers, anything
/// else stays a string.
pub fn parse_annotation_value(text: &str) -> SchemaValue {
    match text {
        "true" => SchemaValue::Bool(true),
        "false" => SchemaValue::Bool(false),
        _ if NUMBER.is_match(text) => match text.parse::<f64>() {
            Ok(n) => SchemaValue::Number(n),
            Err(_) => SchemaValue::String(text.to_string()),
        },
        _ => SchemaValue::String(text.to_string()),
    }
}
