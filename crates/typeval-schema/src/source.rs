//! Rendering of a schema as a script object literal.
//!
//! This is the form substituted at a compile call site. Unlike the JSON
//! output, references are emitted as bare identifiers.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::{Props, SchemaNode, SchemaValue};

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("invalid identifier regex"));

enum Entry<'a> {
    Node(&'a SchemaNode),
    Value(&'a SchemaValue),
    Keyword(&'a str),
    Props(&'a Props),
}

struct SourceWriter {
    out: String,
    /// `None` renders on a single line.
    indent: Option<usize>,
    depth: usize,
}

impl SchemaNode {
    /// Render on a single line: `{ type: "number", optional: true }`.
    pub fn to_source(&self) -> String {
        let mut writer = SourceWriter::new(None);
        writer.node(self);
        writer.out
    }

    /// Render across lines, indenting nested objects by two spaces.
    pub fn to_source_pretty(&self) -> String {
        let mut writer = SourceWriter::new(Some(2));
        writer.node(self);
        writer.out
    }
}

impl SourceWriter {
    fn new(indent: Option<usize>) -> Self {
        Self {
            out: String::new(),
            indent,
            depth: 0,
        }
    }

    fn node(&mut self, node: &SchemaNode) {
        match node {
            SchemaNode::Rule(rule) => {
                let mut entries = vec![("type", Entry::Keyword(&rule.ty))];
                if let Some(items) = &rule.items {
                    entries.push(("items", Entry::Node(items)));
                }
                if let Some(props) = &rule.props {
                    entries.push(("props", Entry::Props(props)));
                }
                entries.extend(
                    rule.fields
                        .iter()
                        .map(|(key, value)| (key.as_str(), Entry::Value(value))),
                );
                self.object(entries);
            }
            SchemaNode::Alternatives(nodes) => {
                self.list(nodes.len(), |writer, i| writer.node(&nodes[i]));
            }
            SchemaNode::Properties(properties) => {
                let entries = properties
                    .props
                    .iter()
                    .map(|(key, node)| (key.as_str(), Entry::Node(node)))
                    .chain(
                        properties
                            .fields
                            .iter()
                            .map(|(key, value)| (key.as_str(), Entry::Value(value))),
                    )
                    .collect();
                self.object(entries);
            }
        }
    }

    fn object(&mut self, entries: Vec<(&str, Entry<'_>)>) {
        if entries.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.open('{');
        for (i, (key, entry)) in entries.into_iter().enumerate() {
            self.separator(i);
            self.key(key);
            match entry {
                Entry::Node(node) => self.node(node),
                Entry::Value(value) => self.value(value),
                Entry::Keyword(keyword) => self.string(keyword),
                Entry::Props(props) => self.props(props),
            }
        }
        self.close('}');
    }

    fn props(&mut self, props: &Props) {
        let entries = props
            .iter()
            .map(|(key, node)| (key.as_str(), Entry::Node(node)))
            .collect();
        self.object(entries);
    }

    fn list(&mut self, len: usize, mut item: impl FnMut(&mut Self, usize)) {
        if len == 0 {
            self.out.push_str("[]");
            return;
        }
        self.open('[');
        for i in 0..len {
            self.separator(i);
            item(self, i);
        }
        self.close(']');
    }

    fn open(&mut self, bracket: char) {
        self.out.push(bracket);
        self.depth += 1;
        if self.indent.is_none() && bracket == '{' {
            self.out.push(' ');
        }
    }

    fn close(&mut self, bracket: char) {
        self.depth -= 1;
        match self.indent {
            Some(_) => self.newline(),
            None if bracket == '}' => self.out.push(' '),
            None => {}
        }
        self.out.push(bracket);
    }

    fn separator(&mut self, index: usize) {
        if index > 0 {
            self.out.push(',');
            if self.indent.is_none() {
                self.out.push(' ');
            }
        }
        if self.indent.is_some() {
            self.newline();
        }
    }

    fn newline(&mut self) {
        self.out.push('\n');
        let width = self.indent.unwrap_or(0) * self.depth;
        self.out.extend(std::iter::repeat_n(' ', width));
    }

    fn key(&mut self, key: &str) {
        if IDENTIFIER.is_match(key) {
            self.out.push_str(key);
        } else {
            self.string(key);
        }
        self.out.push_str(": ");
    }

    fn value(&mut self, value: &SchemaValue) {
        match value {
            SchemaValue::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            SchemaValue::Number(n) => self.number(*n),
            SchemaValue::String(s) => self.string(s),
            SchemaValue::Reference(name) => self.out.push_str(name),
            SchemaValue::List(items) => {
                self.list(items.len(), |writer, i| writer.value(&items[i]));
            }
        }
    }

    fn number(&mut self, n: f64) {
        if n.is_nan() {
            self.out.push_str("NaN");
        } else if n.is_infinite() {
            self.out
                .push_str(if n > 0.0 { "Infinity" } else { "-Infinity" });
        } else if let Some(i) = SchemaValue::as_integer(n) {
            let _ = write!(self.out, "{i}");
        } else {
            let _ = write!(self.out, "{n:?}");
        }
    }

    fn string(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                c if c.is_control() => {
                    let _ = write!(self.out, "\\u{:04x}", c as u32);
                }
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }
}
