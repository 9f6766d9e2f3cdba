use serde::{Serialize, Serializer};

/// A field value of a schema rule.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaValue {
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<SchemaValue>),
    /// Identifier of a runtime value, such as a class constructor.
    Reference(String),
}

impl SchemaValue {
    /// Integral numbers that fit in an `i64`, for rendering without a fraction.
    pub(crate) fn as_integer(n: f64) -> Option<i64> {
        const LIMIT: f64 = 9_007_199_254_740_992.0;
        (n.fract() == 0.0 && n.abs() <= LIMIT).then_some(n as i64)
    }
}

impl From<bool> for SchemaValue {
    fn from(value: bool) -> Self {
        SchemaValue::Bool(value)
    }
}

impl From<f64> for SchemaValue {
    fn from(value: f64) -> Self {
        SchemaValue::Number(value)
    }
}

impl From<&str> for SchemaValue {
    fn from(value: &str) -> Self {
        SchemaValue::String(value.to_string())
    }
}

impl From<String> for SchemaValue {
    fn from(value: String) -> Self {
        SchemaValue::String(value)
    }
}

impl Serialize for SchemaValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SchemaValue::Bool(b) => serializer.serialize_bool(*b),
            SchemaValue::Number(n) => match Self::as_integer(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            SchemaValue::String(s) | SchemaValue::Reference(s) => serializer.serialize_str(s),
            SchemaValue::List(items) => items.serialize(serializer),
        }
    }
}
