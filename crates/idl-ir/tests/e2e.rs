//! End-to-end tests: JSON syntax trees through the public API.

use anyhow::Result;
use idl_ir::ir::{ExtAttrValue, Exposure, IdlType};
use idl_ir::projection::dictionaries;
use idl_ir::{merge_units, parse_definitions, read_idl_file, ErrorKind, IdlError, ReadOptions};
use serde_json::{json, Value};

fn file(children: Value) -> String {
    json!({"class": "File", "children": children}).to_string()
}

fn prim(name: &str) -> Value {
    json!({"class": "Type", "children": [{"class": "PrimitiveType", "name": name}]})
}

fn dom_string() -> Value {
    json!({"class": "Type", "children": [{"class": "StringType", "name": "DOMString"}]})
}

fn attribute(name: &str, ty: Value) -> Value {
    json!({"class": "Attribute", "name": name, "children": [ty]})
}

fn operation(name: &str, args: Value) -> Value {
    json!({"class": "Operation", "name": name, "children": [
        {"class": "Arguments", "children": args},
        prim("undefined")
    ]})
}

fn argument(name: &str, ty: Value) -> Value {
    json!({"class": "Argument", "name": name, "children": [ty]})
}

fn interface(name: &str, children: Value) -> Value {
    json!({"class": "Interface", "name": name, "children": children})
}

fn partial_interface(name: &str, children: Value) -> Value {
    json!({"class": "Interface", "name": name, "properties": {"PARTIAL": true}, "children": children})
}

fn build_error(src: &str) -> IdlError {
    let err = parse_definitions(src).expect_err("construction should fail");
    match err.downcast_ref::<IdlError>() {
        Some(idl) => idl.clone(),
        None => panic!("not an IdlError: {err:#}"),
    }
}

#[test]
fn type_translation_is_deterministic() -> Result<()> {
    let src = file(json!([interface("Foo", json!([
        attribute("x", json!({"class": "Type", "properties": {"NULLABLE": true}, "children": [
            {"class": "UnionType", "children": [prim("long"), dom_string()]}
        ]}))
    ]))]));
    let first = parse_definitions(&src)?;
    let second = parse_definitions(&src)?;
    let a = &first.interfaces["Foo"].attributes()[0].idl_type;
    let b = &second.interfaces["Foo"].attributes()[0].idl_type;
    assert_eq!(a, b);
    assert_eq!(a.to_string(), "(long or DOMString)?");
    assert_eq!(a.name(), "LongOrStringOrNull");
    Ok(())
}

#[test]
fn typedefs_are_unions_and_merge() -> Result<()> {
    let a = parse_definitions(&file(json!([
        {"class": "Typedef", "name": "Id", "children": [prim("long")]}
    ])))?;
    assert!(matches!(a.typedefs["Id"].idl_type(), IdlType::Union(members) if members.len() == 1));

    let b = parse_definitions(&file(json!([
        {"class": "Typedef", "name": "Id", "children": [dom_string()]}
    ])))?;
    let merged = merge_units([a, b])?;
    assert_eq!(merged.typedefs["Id"].idl_type().to_string(), "(long or DOMString)");
    Ok(())
}

#[test]
fn enum_merge_is_a_set_union() -> Result<()> {
    let unit = |items: &[&str]| {
        let children: Vec<Value> = items.iter().map(|i| json!({"class": "EnumItem", "name": i})).collect();
        parse_definitions(&file(json!([{"class": "Enum", "name": "Mode", "children": children}])))
    };
    let merged = merge_units([unit(&["A", "B"])?, unit(&["B", "C"])?])?;
    assert_eq!(merged.enumerations["Mode"].values, ["A", "B", "C"]);

    let merged = merge_units([unit(&["A", "A"])?, unit(&["B"])?])?;
    assert_eq!(merged.enumerations["Mode"].values, ["A", "B"]);
    Ok(())
}

#[test]
fn signed_prefix_digits_are_malformed_defaults() {
    let with_default = |value: &str| {
        file(json!([{"class": "Dictionary", "name": "Init", "children": [
            {"class": "Key", "name": "n", "children": [
                prim("long"),
                {"class": "Default", "properties": {"TYPE": "integer", "VALUE": value}}
            ]}
        ]}]))
    };
    for value in ["0x-1", "-0x-1", "0-7", "0x+f", "0x"] {
        let err = build_error(&with_default(value));
        assert!(matches!(err, IdlError::MalformedValue { .. }), "{value}: {err}");
    }
}

#[test]
fn static_stringifier_cannot_be_unforgeable() {
    let src = file(json!([interface("Location", json!([
        {"class": "Stringifier", "children": [
            {"class": "Attribute", "name": "href", "properties": {"STATIC": true}, "children": [dom_string()]},
            {"class": "ExtAttributes", "children": [{"class": "ExtAttribute", "name": "Unforgeable"}]}
        ]}
    ]))]));
    assert_eq!(build_error(&src).kind(), ErrorKind::Semantic);
}

#[test]
fn named_constructor_and_constructor_operation_conflict() {
    let src = file(json!([interface("Image", json!([
        {"class": "ExtAttributes", "children": [
            {"class": "ExtAttribute", "name": "NamedConstructor", "children": [
                {"class": "Call", "name": "Image", "children": [{"class": "Arguments"}]}
            ]}
        ]},
        {"class": "Constructor", "children": [{"class": "Arguments"}]}
    ]))]));
    let err = build_error(&src);
    assert_eq!(err.kind(), ErrorKind::Semantic);
    assert!(err.to_string().contains("mixed [NamedConstructor]"));
}

#[test]
fn duplicate_handle_event_fails() {
    let src = file(json!([interface("EventListener", json!([
        operation("handleEvent", json!([])),
        operation("handleEvent", json!([argument("event", prim("long"))]))
    ]))]));
    let err = build_error(&src);
    assert!(matches!(err, IdlError::Invariant(ref msg) if msg.contains("handleEvent")));
}

#[test]
fn value_iterator_needs_length_and_indexed_getter() -> Result<()> {
    let iterable = json!({"class": "Iterable", "children": [dom_string()]});
    let err = build_error(&file(json!([interface("List", json!([iterable.clone()]))])));
    assert_eq!(err.kind(), ErrorKind::Semantic);

    let getter = json!({"class": "Operation", "properties": {"GETTER": true}, "children": [
        {"class": "Arguments", "children": [argument("index", prim("unsigned long"))]},
        dom_string()
    ]});
    let defs = parse_definitions(&file(json!([interface("List", json!([
        attribute("length", prim("unsigned long")),
        getter,
        iterable
    ]))])))?;
    assert!(defs.interfaces["List"].has_indexed_elements);
    Ok(())
}

#[test]
fn exposure_lists_and_runtime_flags() -> Result<()> {
    let defs = parse_definitions(&file(json!([
        interface("A", json!([{"class": "ExtAttributes", "children": [
            {"class": "ExtAttribute", "name": "Exposed", "properties": {"VALUE": ["Window", "Worker"]}}
        ]}])),
        interface("B", json!([{"class": "ExtAttributes", "children": [
            {"class": "ExtAttribute", "name": "Exposed", "children": [
                {"class": "Arguments", "children": [
                    argument("FeatureFlag", json!({"class": "Type", "children": [{"class": "Typeref", "name": "Window"}]}))
                ]}
            ]}
        ]}]))
    ])))?;
    assert_eq!(
        defs.interfaces["A"].extended_attributes.exposures(),
        [Exposure::new("Window"), Exposure::new("Worker")]
    );
    assert_eq!(
        defs.interfaces["B"].extended_attributes.get("Exposed"),
        Some(&ExtAttrValue::Exposures(vec![Exposure::with_runtime_flag("Window", "FeatureFlag")]))
    );
    Ok(())
}

#[test]
fn dictionary_projection_example() -> Result<()> {
    let defs = parse_definitions(&file(json!([{
        "class": "Dictionary", "name": "PersonInit", "children": [
            {"class": "Key", "name": "name", "properties": {"REQUIRED": true}, "children": [dom_string()]},
            {"class": "Key", "name": "age", "children": [
                prim("long"),
                {"class": "Default", "properties": {"TYPE": "integer", "VALUE": "3"}}
            ]}
        ]
    }])))?;
    let members = serde_json::to_value(dictionaries(&defs))?[0]["Members"].clone();
    assert_eq!(members[0]["Name"], "name");
    assert_eq!(members[0]["Required"], true);
    assert_eq!(members[0]["Default"], Value::Null);
    assert_eq!(members[1]["Name"], "age");
    assert_eq!(members[1]["Required"], false);
    assert_eq!(members[1]["Default"], 3);
    Ok(())
}

#[test]
fn partial_fragment_adds_members() -> Result<()> {
    // The partial comes first; bases are applied before partials.
    let partial = parse_definitions(&file(json!([partial_interface("Foo", json!([attribute("y", prim("long"))]))])))?;
    let base = parse_definitions(&file(json!([interface("Foo", json!([attribute("x", prim("long"))]))])))?;
    let merged = merge_units([partial, base])?;

    let foo = &merged.interfaces["Foo"];
    let names: Vec<&str> = foo.attributes().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["x", "y"]);
    assert_eq!(foo.partial_interfaces.len(), 1);
    assert_eq!(foo.attribute("y").and_then(|a| a.defined_in.as_deref()), Some("Foo"));
    Ok(())
}

#[test]
fn partial_without_base_fails_to_merge() -> Result<()> {
    let partial = parse_definitions(&file(json!([partial_interface("Foo", json!([]))])))?;
    let err = merge_units([partial]).expect_err("no base");
    assert_eq!(err.kind(), ErrorKind::Semantic);
    Ok(())
}

#[test]
fn child_override_wins_after_inheritance() -> Result<()> {
    let mut defs = parse_definitions(&file(json!([
        interface("Base", json!([
            operation("foo", json!([argument("n", prim("long"))])),
            operation("bar", json!([]))
        ])),
        json!({"class": "Interface", "name": "Derived", "children": [
            {"class": "Inherit", "name": "Base"},
            operation("foo", json!([]))
        ]})
    ])))?;
    defs.resolve_inheritance()?;

    let derived = &defs.interfaces["Derived"];
    let foos: Vec<_> = derived.operations.iter().filter(|op| op.name() == Some("foo")).collect();
    assert_eq!(foos.len(), 1);
    assert_eq!(foos[0].defined_in.as_deref(), Some("Derived"));
    assert!(foos[0].arguments.is_empty());
    assert!(derived.has_operation("bar"));
    assert!(defs.interfaces["Derived"].is_subclass_of("Base", &defs.interfaces));
    Ok(())
}

#[test]
fn read_idl_file_checks_filename() -> Result<()> {
    let dir = std::env::temp_dir().join(format!("idl-ir-e2e-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let src = file(json!([interface("ReadableStream", json!([]))]));

    let good = dir.join("readable_stream.json");
    std::fs::write(&good, &src)?;
    let defs = read_idl_file(&good, &ReadOptions::default())?;
    assert!(defs.interfaces.contains_key("ReadableStream"));

    let bad = dir.join("Stream.json");
    std::fs::write(&bad, &src)?;
    let err = read_idl_file(&bad, &ReadOptions::default()).expect_err("name mismatch");
    assert!(matches!(err.downcast_ref::<IdlError>(), Some(IdlError::FilenameConvention(_))));
    read_idl_file(&bad, &ReadOptions { check_filename: false })?;

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn decode_errors_carry_context() {
    let err = parse_definitions("{\"class\": \"File\", \"children\": [{\"class\": 3}]}").expect_err("bad json");
    let message = format!("{err:#}");
    assert!(message.contains("failed to decode syntax tree"));
}
