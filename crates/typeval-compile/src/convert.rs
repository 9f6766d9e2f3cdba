//! Category dispatch and the leaf handlers.

use tracing::{debug, trace};
use typeval_schema::{Properties, Props, Rule, SchemaNode, SchemaValue};
use typeval_types::{LiteralValue, Property, TypeFlags, TypeHost, TypeId};

use crate::history::{History, HistoryKey};
use crate::{Category, CompileError, CompileOptions, modifier};

/// Compiles types of one host into schemas.
///
/// ```
/// use typeval_compile::Compiler;
/// use typeval_types::{Property, TypeGraph, builtin};
///
/// let mut builder = TypeGraph::builder();
/// let point = builder.record("Point", vec![Property::required("x", builtin::NUMBER)]);
/// let graph = builder.build().unwrap();
///
/// let schema = Compiler::new(&graph).compile(point).unwrap();
/// assert_eq!(schema.to_source(), r#"{ x: { type: "number" } }"#);
/// ```
#[derive(Debug)]
pub struct Compiler<'a, H: ?Sized> {
    pub(crate) host: &'a H,
    pub(crate) options: CompileOptions,
}

impl<'a, H: TypeHost + ?Sized> Compiler<'a, H> {
    pub fn new(host: &'a H) -> Self {
        Self::with_options(host, CompileOptions::default())
    }

    pub fn with_options(host: &'a H, options: CompileOptions) -> Self {
        Self { host, options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn compile(&self, root: TypeId) -> Result<SchemaNode, CompileError> {
        self.compile_in(&mut History::new(), root)
    }

    /// Compile `root` against a caller-owned history.
    ///
    /// `root` is treated as the outermost type only if `history` is empty.
    pub fn compile_in(&self, history: &mut History, root: TypeId) -> Result<SchemaNode, CompileError> {
        debug!(root = %self.host.type_to_string(root), "compiling schema");
        let result = self.convert(history, root);
        if let Err(err) = &result {
            debug!(%err, "schema compilation failed");
        }
        result
    }

    pub(crate) fn convert(&self, history: &mut History, ty: TypeId) -> Result<SchemaNode, CompileError> {
        let outermost = history.is_empty();
        let category = Category::resolve(self.host, &self.options, ty)?;
        trace!(ty = ty.0, ?category, outermost, "dispatch");

        let mut node = match category {
            Category::Never => SchemaNode::keyword("forbidden"),
            Category::Literal => self.literal(ty)?,
            Category::Predefined(keyword) => SchemaNode::keyword(keyword),
            Category::Buffer => SchemaNode::Rule(Rule::new("class").with_field(
                "instanceOf",
                SchemaValue::Reference(self.options.buffer_type.clone()),
            )),
            Category::Enum => self.enumeration(self.host.members(ty))?,
            Category::Primitive(keyword) => SchemaNode::keyword(keyword),
            Category::Any => SchemaNode::keyword("any"),
            Category::Array => self.array(history, ty)?,
            Category::Record => self.record(history, ty)?,
            Category::Union => self.union(history, ty)?,
            Category::Intersection => self.intersection(history, ty)?,
        };
        if outermost && category.is_keyword() {
            modifier::mark_root(&mut node, &self.options.root_marker);
        }
        modifier::apply_annotations(&mut node, self.host.annotations(ty));
        Ok(node)
    }

    pub(crate) fn literal(&self, ty: TypeId) -> Result<SchemaNode, CompileError> {
        Ok(SchemaNode::Rule(
            Rule::new("equal")
                .with_field("value", self.literal_value(ty)?)
                .with_field("strict", true),
        ))
    }

    /// `{ type: "enum", values }` over the literal members, skipping `undefined`.
    pub(crate) fn enumeration(&self, members: &[TypeId]) -> Result<SchemaNode, CompileError> {
        let values = members
            .iter()
            .filter(|member| !self.host.flags(**member).intersects(TypeFlags::UNDEFINED))
            .map(|member| self.literal_value(*member))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SchemaNode::Rule(
            Rule::new("enum").with_field("values", SchemaValue::List(values)),
        ))
    }

    fn literal_value(&self, ty: TypeId) -> Result<SchemaValue, CompileError> {
        match self.host.literal_value(ty) {
            Some(LiteralValue::String(s)) => Ok(SchemaValue::String(s)),
            Some(LiteralValue::Number(n)) => Ok(SchemaValue::Number(n)),
            Some(LiteralValue::Boolean(b)) => Ok(SchemaValue::Bool(b)),
            Some(LiteralValue::BigInt { .. }) | None => Err(CompileError::UnknownLiteralKind {
                type_name: self.host.type_to_string(ty),
            }),
        }
    }

    fn array(&self, history: &mut History, ty: TypeId) -> Result<SchemaNode, CompileError> {
        let outermost = history.is_empty();
        let element = self
            .host
            .element_type(ty)
            .filter(|element| !self.host.flags(*element).intersects(TypeFlags::ANY));
        let mut rule = Rule::new("array");
        if let Some(element) = element {
            let mut guard = history.enter_many(outermost.then_some(HistoryKey::Anonymous));
            rule = rule.with_items(self.convert(&mut guard, element)?);
        }
        Ok(SchemaNode::Rule(rule))
    }

    fn record(&self, history: &mut History, ty: TypeId) -> Result<SchemaNode, CompileError> {
        let key = HistoryKey::from_name(self.host.display_name(ty));
        if let HistoryKey::Named(name) = &key
            && history.contains(&key)
        {
            debug!(%name, "cycle cut");
            return Ok(SchemaNode::keyword("any"));
        }

        let outermost = history.is_empty();
        let mut guard = history.enter(key);
        let props = self.properties(&mut guard, self.host.properties(ty))?;
        drop(guard);
        Ok(self.object(outermost, props))
    }

    fn properties(&self, history: &mut History, properties: &[Property]) -> Result<Props, CompileError> {
        let mut props = Props::new();
        for prop in properties {
            let mut node = self.convert(history, prop.ty)?;
            if prop.optional {
                modifier::set_optional(&mut node);
            }
            modifier::apply_annotations(&mut node, &prop.annotations);
            props.insert(prop.name.clone(), node);
        }
        Ok(props)
    }

    /// The bare property map when outermost, an object rule otherwise.
    pub(crate) fn object(&self, outermost: bool, props: Props) -> SchemaNode {
        if outermost {
            SchemaNode::Properties(Properties::new(props))
        } else {
            SchemaNode::object(props)
        }
    }
}

#[cfg(test)]
mod tests {
    use typeval_types::{RawAnnotation, TypeGraph, builtin};

    use super::*;

    fn json(node: &SchemaNode) -> serde_json::Value {
        serde_json::to_value(node).unwrap()
    }

    #[test]
    fn test_root_primitive_carries_marker() {
        let graph = TypeGraph::builder().build().unwrap();
        let schema = Compiler::new(&graph).compile(builtin::STRING).unwrap();
        assert_eq!(
            json(&schema),
            serde_json::json!({ "type": "string", "$$root": true })
        );
    }

    #[test]
    fn test_literal() {
        let mut builder = TypeGraph::builder();
        let one = builder.literal(LiteralValue::Number(1.0));
        let graph = builder.build().unwrap();
        let schema = Compiler::new(&graph).compile(one).unwrap();
        assert_eq!(
            json(&schema),
            serde_json::json!({ "type": "equal", "value": 1, "strict": true, "$$root": true })
        );
    }

    #[test]
    fn test_bigint_literal_is_rejected() {
        let mut builder = TypeGraph::builder();
        let big = builder.literal(LiteralValue::BigInt {
            bigint: "10".into(),
        });
        let graph = builder.build().unwrap();
        assert_eq!(
            Compiler::new(&graph).compile(big),
            Err(CompileError::UnknownLiteralKind {
                type_name: "10n".into()
            })
        );
    }

    #[test]
    fn test_any_array_has_no_items() {
        let mut builder = TypeGraph::builder();
        let any_list = builder.array(Some(builtin::ANY));
        let untyped = builder.array(None);
        let graph = builder.build().unwrap();
        let compiler = Compiler::new(&graph);
        for ty in [any_list, untyped] {
            assert_eq!(
                json(&compiler.compile(ty).unwrap()),
                serde_json::json!({ "type": "array", "$$root": true })
            );
        }
    }

    #[test]
    fn test_root_array_nests_records() {
        let mut builder = TypeGraph::builder();
        let point = builder.record("Point", vec![Property::required("x", builtin::NUMBER)]);
        let points = builder.array(Some(point));
        let graph = builder.build().unwrap();
        let schema = Compiler::new(&graph).compile(points).unwrap();
        assert_eq!(
            json(&schema),
            serde_json::json!({
                "type": "array",
                "items": { "type": "object", "props": { "x": { "type": "number" } } },
                "$$root": true
            })
        );
    }

    #[test]
    fn test_type_annotations_follow_root_marker() {
        let mut builder = TypeGraph::builder();
        let name = builder.declare("Name");
        builder.define_alias(name, builtin::STRING, "Name");
        builder.annotate(name, RawAnnotation::new("min", "3"));
        builder.annotate(name, RawAnnotation::bare("deprecated"));
        let graph = builder.build().unwrap();
        let schema = Compiler::new(&graph).compile(name).unwrap();
        assert_eq!(
            serde_json::to_string(&schema).unwrap(),
            r#"{"type":"string","$$root":true,"min":3}"#
        );
    }

    #[test]
    fn test_optional_property_ignores_optional_tag() {
        let mut builder = TypeGraph::builder();
        let record = builder.record(
            "R",
            vec![
                Property::optional("a", builtin::STRING)
                    .with_annotation(RawAnnotation::new("optional", "false")),
                Property::required("b", builtin::STRING)
                    .with_annotation(RawAnnotation::new("optional", "true")),
            ],
        );
        let graph = builder.build().unwrap();
        let schema = Compiler::new(&graph).compile(record).unwrap();
        assert_eq!(
            json(&schema),
            serde_json::json!({
                "a": { "type": "string", "optional": true },
                "b": { "type": "string", "optional": true }
            })
        );
    }

    #[test]
    fn test_custom_root_marker() {
        let graph = TypeGraph::builder().build().unwrap();
        let options = CompileOptions {
            root_marker: "$root".into(),
            ..CompileOptions::default()
        };
        let schema = Compiler::with_options(&graph, options)
            .compile(builtin::NEVER)
            .unwrap();
        assert_eq!(
            json(&schema),
            serde_json::json!({ "type": "forbidden", "$root": true })
        );
    }
}
