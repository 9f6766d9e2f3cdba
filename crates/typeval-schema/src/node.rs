use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::SchemaValue;

/// Property rules of an object, in declaration order.
pub type Props = IndexMap<String, SchemaNode>;

/// Extra keys of a rule, in insertion order.
pub type Fields = IndexMap<String, SchemaValue>;

/// A compiled validation schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// `{ type: <keyword>, ... }`
    Rule(Rule),
    /// Any one of the rules must match.
    Alternatives(Vec<SchemaNode>),
    /// Bare property map of a top-level object.
    Properties(Properties),
}

/// A keyword rule, optionally carrying element or property rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub ty: String,
    pub items: Option<Box<SchemaNode>>,
    pub props: Option<Props>,
    pub fields: Fields,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    pub props: Props,
    pub fields: Fields,
}

impl Rule {
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            items: None,
            props: None,
            fields: Fields::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<SchemaValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_items(mut self, items: SchemaNode) -> Self {
        self.items = Some(Box::new(items));
        self
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = Some(props);
        self
    }

    /// Whether `key` is already taken. Structural keys are always reserved,
    /// even when a rule has no items or props.
    pub fn has_key(&self, key: &str) -> bool {
        match key {
            "type" | "items" | "props" => true,
            _ => self.fields.contains_key(key),
        }
    }
}

impl Properties {
    pub fn new(props: Props) -> Self {
        Self {
            props,
            fields: Fields::new(),
        }
    }

    /// Field names share the key space with property names.
    pub fn has_key(&self, key: &str) -> bool {
        self.props.contains_key(key) || self.fields.contains_key(key)
    }
}

impl SchemaNode {
    /// `{ type: <ty> }`
    pub fn keyword(ty: impl Into<String>) -> Self {
        SchemaNode::Rule(Rule::new(ty))
    }

    /// `{ type: "object", props }`, omitting `props` when there are none.
    pub fn object(props: Props) -> Self {
        let rule = Rule::new("object");
        if props.is_empty() {
            SchemaNode::Rule(rule)
        } else {
            SchemaNode::Rule(rule.with_props(props))
        }
    }

    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            SchemaNode::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    /// The keyword of a rule node.
    pub fn rule_type(&self) -> Option<&str> {
        self.as_rule().map(|rule| rule.ty.as_str())
    }

    /// An extra field of a rule or property map.
    pub fn field(&self, key: &str) -> Option<&SchemaValue> {
        match self {
            SchemaNode::Rule(rule) => rule.fields.get(key),
            SchemaNode::Properties(properties) => properties.fields.get(key),
            SchemaNode::Alternatives(_) => None,
        }
    }

    /// Insert `key` unless the node already has it.
    ///
    /// Alternatives forward to each element. Returns whether any node changed.
    pub fn set_if_absent(&mut self, key: &str, value: SchemaValue) -> bool {
        match self {
            SchemaNode::Rule(rule) => {
                if rule.has_key(key) {
                    return false;
                }
                rule.fields.insert(key.to_string(), value);
                true
            }
            SchemaNode::Properties(properties) => {
                if properties.has_key(key) {
                    return false;
                }
                properties.fields.insert(key.to_string(), value);
                true
            }
            SchemaNode::Alternatives(nodes) => {
                let mut changed = false;
                for node in nodes {
                    changed |= node.set_if_absent(key, value.clone());
                }
                changed
            }
        }
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SchemaNode::Rule(rule) => rule.serialize(serializer),
            SchemaNode::Alternatives(nodes) => nodes.serialize(serializer),
            SchemaNode::Properties(properties) => properties.serialize(serializer),
        }
    }
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1
            + usize::from(self.items.is_some())
            + usize::from(self.props.is_some())
            + self.fields.len();
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("type", &self.ty)?;
        if let Some(items) = &self.items {
            map.serialize_entry("items", items)?;
        }
        if let Some(props) = &self.props {
            map.serialize_entry("props", props)?;
        }
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.props.len() + self.fields.len()))?;
        for (key, node) in &self.props {
            map.serialize_entry(key, node)?;
        }
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
