use serde_json::{Value, json};
use typeval_compile::history::History;
use typeval_compile::{CompileError, CompileOptions, Compiler, compile};
use typeval_types::{TypeGraph, load};

fn graph(source: Value) -> TypeGraph {
    load::from_str(&source.to_string()).unwrap()
}

fn compile_named(graph: &TypeGraph, name: &str) -> Value {
    let ty = graph.lookup(name).unwrap();
    serde_json::to_value(compile(graph, ty).unwrap()).unwrap()
}

#[test]
fn test_interface_at_root_is_bare_map() {
    let graph = graph(json!({
        "types": {
            "IUser": {
                "kind": "record",
                "properties": [
                    { "name": "a", "type": "number" },
                    { "name": "b", "type": "string", "optional": true }
                ]
            },
            "IHolder": {
                "kind": "record",
                "properties": [{ "name": "user", "type": "IUser" }]
            }
        }
    }));
    assert_eq!(
        compile_named(&graph, "IUser"),
        json!({ "a": { "type": "number" }, "b": { "type": "string", "optional": true } })
    );
    assert_eq!(
        compile_named(&graph, "IHolder"),
        json!({
            "user": {
                "type": "object",
                "props": {
                    "a": { "type": "number" },
                    "b": { "type": "string", "optional": true }
                }
            }
        })
    );
}

#[test]
fn test_empty_nested_record_omits_props() {
    let graph = graph(json!({
        "types": {
            "IEmpty": { "kind": "record" },
            "IHolder": {
                "kind": "record",
                "properties": [{ "name": "empty", "type": "IEmpty" }]
            }
        }
    }));
    assert_eq!(compile_named(&graph, "IEmpty"), json!({}));
    assert_eq!(
        compile_named(&graph, "IHolder"),
        json!({ "empty": { "type": "object" } })
    );
}

#[test]
fn test_self_reference_is_cut() {
    let graph = graph(json!({
        "types": {
            "INode": {
                "kind": "record",
                "properties": [
                    { "name": "value", "type": "number" },
                    { "name": "next", "type": "INode", "optional": true },
                    { "name": "children", "type": { "kind": "array", "element": "INode" } }
                ]
            }
        }
    }));
    assert_eq!(
        compile_named(&graph, "INode"),
        json!({
            "value": { "type": "number" },
            "next": { "type": "any", "optional": true },
            "children": { "type": "array", "items": { "type": "any" } }
        })
    );
}

#[test]
fn test_mutual_recursion_terminates() {
    let graph = graph(json!({
        "types": {
            "IParent": {
                "kind": "record",
                "properties": [{ "name": "child", "type": "IChild" }]
            },
            "IChild": {
                "kind": "record",
                "properties": [
                    { "name": "parent", "type": "IParent" },
                    { "name": "sibling", "type": "IChild", "optional": true }
                ]
            }
        }
    }));
    assert_eq!(
        compile_named(&graph, "IParent"),
        json!({
            "child": {
                "type": "object",
                "props": {
                    "parent": { "type": "any" },
                    "sibling": { "type": "any", "optional": true }
                }
            }
        })
    );
}

#[test]
fn test_recursive_alias_terminates() {
    let graph = graph(json!({
        "types": {
            "Tree": {
                "kind": "record",
                "anonymous": true,
                "properties": [
                    { "name": "children", "type": { "kind": "array", "element": "Tree" } }
                ]
            }
        }
    }));
    assert_eq!(
        compile_named(&graph, "Tree"),
        json!({ "children": { "type": "array", "items": { "type": "any" } } })
    );
}

#[test]
fn test_sibling_references_are_not_cycles() {
    let graph = graph(json!({
        "types": {
            "IPoint": {
                "kind": "record",
                "properties": [{ "name": "x", "type": "number" }]
            },
            "ILine": {
                "kind": "record",
                "properties": [
                    { "name": "from", "type": "IPoint" },
                    { "name": "to", "type": "IPoint" }
                ]
            }
        }
    }));
    let point = json!({ "type": "object", "props": { "x": { "type": "number" } } });
    assert_eq!(
        compile_named(&graph, "ILine"),
        json!({ "from": point, "to": point })
    );
}

#[test]
fn test_arrays() {
    let graph = graph(json!({
        "types": {
            "IArrays": {
                "kind": "record",
                "properties": [
                    { "name": "numbers", "type": { "kind": "array", "element": "number" } },
                    { "name": "anything", "type": { "kind": "array", "element": "any" } },
                    { "name": "untyped", "type": { "kind": "array" } },
                    {
                        "name": "matrix",
                        "type": { "kind": "array", "element": { "kind": "array", "element": "string" } }
                    }
                ]
            }
        }
    }));
    assert_eq!(
        compile_named(&graph, "IArrays"),
        json!({
            "numbers": { "type": "array", "items": { "type": "number" } },
            "anything": { "type": "array" },
            "untyped": { "type": "array" },
            "matrix": {
                "type": "array",
                "items": { "type": "array", "items": { "type": "string" } }
            }
        })
    );
}

#[test]
fn test_enums() {
    let graph = graph(json!({
        "types": {
            "Color": { "kind": "enum", "members": ["red", "green"] },
            "Level": { "kind": "enum", "members": [1, 2, 3] },
            "IPalette": {
                "kind": "record",
                "properties": [
                    { "name": "color", "type": "Color" },
                    { "name": "level", "type": "Level", "optional": true }
                ]
            }
        }
    }));
    assert_eq!(
        compile_named(&graph, "IPalette"),
        json!({
            "color": { "type": "enum", "values": ["red", "green"] },
            "level": { "type": "enum", "values": [1, 2, 3], "optional": true }
        })
    );
    assert_eq!(
        compile_named(&graph, "Color"),
        json!({ "type": "enum", "values": ["red", "green"], "$$root": true })
    );
}

#[test]
fn test_never_null_undefined_are_forbidden() {
    let graph = graph(json!({
        "types": {
            "INever": {
                "kind": "record",
                "properties": [
                    { "name": "never", "type": "never" },
                    { "name": "null", "type": "null" },
                    { "name": "undefined", "type": "undefined", "optional": true }
                ]
            }
        }
    }));
    assert_eq!(
        compile_named(&graph, "INever"),
        json!({
            "never": { "type": "forbidden" },
            "null": { "type": "forbidden" },
            "undefined": { "type": "forbidden", "optional": true }
        })
    );
}

#[test]
fn test_any_unknown_void() {
    let graph = graph(json!({
        "types": {
            "IAny": {
                "kind": "record",
                "properties": [
                    { "name": "a", "type": "any" },
                    { "name": "u", "type": "unknown" },
                    { "name": "v", "type": "void" }
                ]
            }
        }
    }));
    assert_eq!(
        compile_named(&graph, "IAny"),
        json!({ "a": { "type": "any" }, "u": { "type": "any" }, "v": { "type": "any" } })
    );
}

#[test]
fn test_annotations() {
    let graph = graph(json!({
        "types": {
            "IAnnotated": {
                "kind": "record",
                "annotations": [{ "name": "strict", "text": "remove" }],
                "properties": [
                    {
                        "name": "str",
                        "type": "string",
                        "annotations": [
                            { "name": "min", "text": "3" },
                            { "name": "pattern", "text": "^[0-9]+$" },
                            { "name": "trim", "text": "true" },
                            { "name": "deprecated" }
                        ]
                    },
                    {
                        "name": "num",
                        "type": "number",
                        "optional": true,
                        "annotations": [
                            { "name": "convert", "text": "true" },
                            { "name": "positive", "text": "false" },
                            { "name": "max", "text": "10.5" }
                        ]
                    },
                    {
                        "name": "either",
                        "type": { "kind": "union", "members": ["string", "number"] },
                        "annotations": [{ "name": "min", "text": "1" }]
                    }
                ]
            }
        }
    }));
    assert_eq!(
        compile_named(&graph, "IAnnotated"),
        json!({
            "str": { "type": "string", "min": 3, "pattern": "^[0-9]+$", "trim": true },
            "num": {
                "type": "number",
                "convert": true,
                "positive": false,
                "max": 10.5,
                "optional": true
            },
            "either": [
                { "type": "string", "min": 1 },
                { "type": "number", "min": 1 }
            ],
            "strict": "remove"
        })
    );
}

#[test]
fn test_root_elements() {
    let graph = graph(json!({
        "types": {
            "Lit": { "kind": "literal", "value": "string" },
            "Num": { "kind": "literal", "value": 1 },
            "Yes": { "kind": "literal", "value": true },
            "StrOrNum": { "kind": "union", "members": ["string", "number"] },
            "IEmail": { "kind": "record", "properties": [] },
            "IDate": "string",
            "Buffer": { "kind": "record", "properties": [] },
            "Ids": { "kind": "array", "element": "number" }
        }
    }));
    let cases = [
        ("Lit", json!({ "type": "equal", "value": "string", "strict": true, "$$root": true })),
        ("Num", json!({ "type": "equal", "value": 1, "strict": true, "$$root": true })),
        ("Yes", json!({ "type": "equal", "value": true, "strict": true, "$$root": true })),
        (
            "StrOrNum",
            json!([
                { "type": "string", "$$root": true },
                { "type": "number", "$$root": true }
            ]),
        ),
        ("IEmail", json!({ "type": "email", "$$root": true })),
        ("IDate", json!({ "type": "date", "$$root": true })),
        ("Buffer", json!({ "type": "class", "instanceOf": "Buffer", "$$root": true })),
        (
            "Ids",
            json!({ "type": "array", "items": { "type": "number" }, "$$root": true }),
        ),
        ("boolean", json!({ "type": "boolean", "$$root": true })),
    ];
    for (name, expected) in cases {
        assert_eq!(compile_named(&graph, name), expected, "{name}");
    }
}

#[test]
fn test_predefined_inside_record() {
    let graph = graph(json!({
        "types": {
            "IUUID": { "kind": "record", "properties": [] },
            "IUrl": { "kind": "record", "properties": [] },
            "ILink": {
                "kind": "record",
                "properties": [
                    { "name": "id", "type": "IUUID" },
                    { "name": "href", "type": "IUrl", "optional": true }
                ]
            }
        }
    }));
    assert_eq!(
        compile_named(&graph, "ILink"),
        json!({
            "id": { "type": "uuid" },
            "href": { "type": "url", "optional": true }
        })
    );
}

#[test]
fn test_source_output_uses_bare_buffer_reference() {
    let graph = graph(json!({
        "types": {
            "Buffer": { "kind": "record", "properties": [] },
            "IFile": {
                "kind": "record",
                "properties": [{ "name": "data", "type": "Buffer" }]
            }
        }
    }));
    let file = graph.lookup("IFile").unwrap();
    assert_eq!(
        compile(&graph, file).unwrap().to_source(),
        r#"{ data: { type: "class", instanceOf: Buffer } }"#
    );
}

#[test]
fn test_configured_predefined_table() {
    let graph = graph(json!({
        "types": {
            "IPhone": "string",
            "ICurrency": { "kind": "record", "properties": [] }
        }
    }));
    let options: CompileOptions = toml::from_str(
        r#"
        [predefined]
        IPhone = "phone"
        "#,
    )
    .unwrap();
    let compiler = Compiler::with_options(&graph, options);
    let phone = compiler.compile(graph.lookup("IPhone").unwrap()).unwrap();
    let currency = compiler.compile(graph.lookup("ICurrency").unwrap()).unwrap();
    assert_eq!(phone.rule_type(), Some("phone"));
    assert_eq!(currency.rule_type(), Some("currency"));
}

#[test]
fn test_history_is_balanced_after_compile() {
    let graph = graph(json!({
        "types": {
            "INode": {
                "kind": "record",
                "properties": [
                    { "name": "next", "type": { "kind": "union", "members": ["INode", "null"] } },
                    { "name": "list", "type": { "kind": "array", "element": "INode" } }
                ]
            },
            "IBroken": {
                "kind": "record",
                "properties": [
                    { "name": "ok", "type": "INode" },
                    { "name": "big", "type": "bigint" }
                ]
            }
        }
    }));
    let compiler = Compiler::new(&graph);
    let mut history = History::new();

    compiler
        .compile_in(&mut history, graph.lookup("INode").unwrap())
        .unwrap();
    assert!(history.is_empty());

    let err = compiler
        .compile_in(&mut history, graph.lookup("IBroken").unwrap())
        .unwrap_err();
    assert_eq!(
        err,
        CompileError::UnsupportedCategory {
            type_name: "bigint".into()
        }
    );
    assert!(history.is_empty());
}

#[test]
fn test_intersection_of_primitives_is_rejected() {
    let graph = graph(json!({
        "types": {
            "Impossible": { "kind": "intersection", "members": ["string", "number"] },
            "IWrapper": {
                "kind": "record",
                "properties": [{ "name": "bad", "type": "Impossible" }]
            }
        }
    }));
    let wrapper = graph.lookup("IWrapper").unwrap();
    assert!(matches!(
        compile(&graph, wrapper),
        Err(CompileError::InvalidIntersectionMember { .. })
    ));
}

#[test]
fn test_intersection_with_external_annotations() {
    let graph = graph(json!({
        "types": {
            "IBase1": {
                "kind": "record",
                "properties": [{ "name": "a", "type": "number", "optional": true }]
            },
            "IExternal": {
                "kind": "record",
                "properties": [
                    {
                        "name": "str",
                        "type": "string",
                        "annotations": [{ "name": "pattern", "text": "^[0-9]+$" }]
                    },
                    {
                        "name": "num",
                        "type": "number",
                        "annotations": [{ "name": "convert", "text": "true" }]
                    }
                ]
            },
            "Both": { "kind": "intersection", "members": ["IBase1", "IExternal"] }
        }
    }));
    assert_eq!(
        compile_named(&graph, "Both"),
        json!({
            "a": { "type": "number", "optional": true },
            "str": { "type": "string", "pattern": "^[0-9]+$" },
            "num": { "type": "number", "convert": true }
        })
    );
}

#[test]
fn test_intersection_of_nested_records_is_merged() {
    let graph = graph(json!({
        "types": {
            "IInnerA": {
                "kind": "record",
                "properties": [{ "name": "x", "type": "number" }]
            },
            "IInnerB": {
                "kind": "record",
                "properties": [{ "name": "y", "type": "string", "optional": true }]
            },
            "IA": {
                "kind": "record",
                "properties": [{ "name": "inner", "type": "IInnerA" }]
            },
            "IB": {
                "kind": "record",
                "properties": [{ "name": "inner", "type": "IInnerB" }]
            },
            "Both": { "kind": "intersection", "members": ["IA", "IB"] }
        }
    }));
    assert_eq!(
        compile_named(&graph, "Both"),
        json!({
            "inner": {
                "type": "object",
                "props": {
                    "x": { "type": "number" },
                    "y": { "type": "string", "optional": true }
                }
            }
        })
    );
}

#[test]
fn test_recursive_intersection_alias_is_cut() {
    let graph = graph(json!({
        "types": {
            "Base": {
                "kind": "record",
                "properties": [{ "name": "id", "type": "string" }]
            },
            "Tree": {
                "kind": "intersection",
                "members": [
                    "Base",
                    {
                        "kind": "record",
                        "properties": [{
                            "name": "children",
                            "type": { "kind": "array", "element": "Tree" },
                            "optional": true
                        }]
                    }
                ]
            }
        }
    }));
    assert_eq!(
        compile_named(&graph, "Tree"),
        json!({
            "id": { "type": "string" },
            "children": { "type": "array", "items": { "type": "any" }, "optional": true }
        })
    );
}

#[test]
fn test_merged_recursive_records_are_cut() {
    let graph = graph(json!({
        "types": {
            "A": {
                "kind": "record",
                "properties": [{ "name": "next", "type": { "kind": "array", "element": "A" } }]
            },
            "B": {
                "kind": "record",
                "properties": [{ "name": "next", "type": { "kind": "array", "element": "B" } }]
            },
            "IHolder": {
                "kind": "record",
                "properties": [{
                    "name": "both",
                    "type": { "kind": "intersection", "members": ["A", "B"] }
                }]
            }
        }
    }));
    assert_eq!(
        compile_named(&graph, "IHolder"),
        json!({
            "both": {
                "type": "object",
                "props": {
                    "next": { "type": "array", "items": { "type": "any" } }
                }
            }
        })
    );
}

#[test]
fn test_recursive_union_alias_is_cut() {
    let graph = graph(json!({
        "types": {
            "Json": {
                "kind": "union",
                "members": ["string", { "kind": "array", "element": "Json" }]
            },
            "IDoc": {
                "kind": "record",
                "properties": [{ "name": "body", "type": "Json" }]
            }
        }
    }));
    assert_eq!(
        compile_named(&graph, "IDoc"),
        json!({
            "body": [
                { "type": "string" },
                { "type": "array", "items": { "type": "any" } }
            ]
        })
    );
}

#[test]
fn test_optional_tag_does_not_override_optional_property() {
    let graph = graph(json!({
        "types": {
            "IForm": {
                "kind": "record",
                "properties": [{
                    "name": "note",
                    "type": "string",
                    "optional": true,
                    "annotations": [
                        { "name": "optional", "text": "false" },
                        { "name": "max", "text": "80" }
                    ]
                }]
            }
        }
    }));
    let form = graph.lookup("IForm").unwrap();
    assert_eq!(
        compile(&graph, form).unwrap().to_source(),
        r#"{ note: { type: "string", optional: true, max: 80 } }"#
    );
}
