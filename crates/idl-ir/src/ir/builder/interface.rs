//! Interface construction.
//!
//! Members are built in declaration order, then the interface-level rules
//! are checked once every child has been seen:
//!
//! 1. at most one of iterable / maplike / setlike
//! 2. `[LegacyUnenumerableNamedProperties]` needs a named getter
//! 3. a value iterator needs an integer `length` and an indexed getter
//! 4. no `[Unforgeable]` on the interface itself
//! 5. either `[NamedConstructor]` or constructor operations, not both

use super::ext_attrs::extended_attributes;
use super::members::{
    build_attribute, build_constant, build_constructor, build_iterable, build_operation,
    build_stringifier, convert_constructor_attributes,
};
use crate::error::{invariant, IdlError, Result};
use crate::ir::{Attribute, ExtAttrValue, ExtendedAttributes, Interface, Operation, Special};
use idl_ast::Node;
use tracing::debug;

pub(super) fn build_interface(node: &Node) -> Result<Interface> {
    let name = super::required_name(node, "interface name")?;
    let mut iface = Interface::new(name.clone());
    iface.is_callback = node.flag("CALLBACK");
    iface.is_partial = node.flag("PARTIAL");
    iface.is_mixin = node.flag("MIXIN");

    let mut has_indexed_property_getter = false;
    let mut has_integer_typed_length = false;
    let mut constructor_operations = Vec::new();
    let mut custom_constructor_operations = Vec::new();
    let mut constructor_attributes = ExtendedAttributes::new();

    for child in node.children() {
        match child.class() {
            "Attribute" => {
                let mut attr = build_attribute(child)?;
                if attr.idl_type.is_integer() && attr.name == "length" {
                    has_integer_typed_length = true;
                }
                attr.defined_in = Some(name.clone());
                add_attribute(&mut iface, attr)?;
            }
            "Const" => {
                let mut constant = build_constant(child)?;
                constant.defined_in = Some(name.clone());
                iface.constants.push(constant);
            }
            "ExtAttributes" => {
                let mut attrs = extended_attributes(child)?;
                iface.constructors = named_constructors(&mut attrs)?;
                iface.custom_constructors.clear();
                iface.extended_attributes = attrs;
            }
            "Operation" => {
                let mut op = build_operation(child)?;
                if op.is_special(Special::Getter) {
                    match op.arguments.first().map(|arg| arg.idl_type.to_string()).as_deref() {
                        Some("unsigned long") => has_indexed_property_getter = true,
                        Some("DOMString") => iface.has_named_property_getter = true,
                        _ => {}
                    }
                }
                op.defined_in = Some(name.clone());
                if op.name() == Some("handleEvent") {
                    if iface.handle_event.is_some() {
                        invariant!("Duplicate handleEvent for {}", name);
                    }
                    iface.handle_event = Some(op.clone());
                }
                iface.operations.push(op);
            }
            "Constructor" => {
                let operation = build_constructor(child)?;
                if operation.is_custom {
                    custom_constructor_operations.push(operation.constructor);
                } else {
                    if !constructor_operations.is_empty() {
                        check_constructor_consistency(&constructor_attributes, &operation.extended_attributes)?;
                    }
                    constructor_operations.push(operation.constructor);
                    constructor_attributes.extend(operation.extended_attributes);
                }
            }
            "Inherit" => iface.parent = child.name().map(str::to_string),
            "Stringifier" => {
                let stringifier = build_stringifier(child)?;
                if let Some(attribute) = &stringifier.attribute {
                    let mut attribute = attribute.clone();
                    attribute.defined_in = Some(name.clone());
                    add_attribute(&mut iface, attribute)?;
                } else if let Some(operation) = &stringifier.operation {
                    let mut operation = operation.clone();
                    operation.defined_in = Some(name.clone());
                    iface.operations.push(operation);
                }
                iface.stringifier = Some(stringifier);
            }
            "Iterable" | "Maplike" | "Setlike" => {
                if iface.iterable.is_some() {
                    invariant!("Interface can only have one of iterable<>, maplike<> and setlike<>.");
                }
                iface.iterable = Some(build_iterable(child)?);
            }
            other => return Err(IdlError::unexpected(format!("interface {}", name), other)),
        }
    }

    if iface.extended_attributes.contains("LegacyUnenumerableNamedProperties")
        && !iface.has_named_property_getter
    {
        invariant!(
            "[LegacyUnenumerableNamedProperties] can be used only in interfaces that support named properties."
        );
    }

    if has_integer_typed_length && has_indexed_property_getter {
        iface.has_indexed_elements = true;
    } else if iface.iterable.as_ref().is_some_and(|it| it.is_value_iterator()) {
        invariant!(
            "Value iterators (iterable<V>) must be accompanied by an indexed property getter and an integer-typed length attribute."
        );
    }

    if iface.extended_attributes.contains("Unforgeable") {
        invariant!("[Unforgeable] cannot appear on interfaces.");
    }

    if !constructor_operations.is_empty() || !custom_constructor_operations.is_empty() {
        if !iface.constructors.is_empty() || !iface.custom_constructors.is_empty() {
            invariant!(
                "Detected mixed [NamedConstructor] and constructor operations. Do not use both in a single interface."
            );
        }
        let converted = convert_constructor_attributes(&constructor_attributes)?;
        if let Some(key) = iface.extended_attributes.keys().find(|k| converted.contains(k)) {
            invariant!(
                "Detected [{}] on both interface {} and its constructor operations. Do not use both.",
                key,
                name
            );
        }
        iface.constructors = constructor_operations;
        iface.custom_constructors = custom_constructor_operations;
        iface.extended_attributes.extend(converted);
    }

    debug!(
        interface = %iface.name,
        partial = iface.is_partial,
        attributes = iface.attributes().len(),
        operations = iface.operations.len(),
        constructors = iface.constructors.len(),
        "built interface"
    );
    Ok(iface)
}

fn add_attribute(iface: &mut Interface, attr: Attribute) -> Result<()> {
    if iface.has_attribute(&attr.name) {
        invariant!("Duplicate attribute {} in interface {}", attr.name, iface.name);
    }
    if attr.is_event_handler {
        iface.event_handlers.push(attr.clone());
    }
    iface.push_attribute(attr);
    Ok(())
}

/// Turn a pending `[NamedConstructor=Name(...)]` into a constructor
/// operation, leaving just the name behind in the mapping.
fn named_constructors(attrs: &mut ExtendedAttributes) -> Result<Vec<Operation>> {
    match attrs.get("NamedConstructor") {
        None => Ok(Vec::new()),
        Some(ExtAttrValue::Call(call)) => {
            let call = call.clone();
            attrs.insert("NamedConstructor", ExtAttrValue::String(call.name));
            Ok(vec![Operation::constructor("NamedConstructor", call.arguments)])
        }
        Some(_) => Err(IdlError::child_count("[NamedConstructor]", "1 Call", 0)),
    }
}

/// Every constructor operation must agree on `[CallWith]` and
/// `[RaisesException]`.
fn check_constructor_consistency(current: &ExtendedAttributes, new: &ExtendedAttributes) -> Result<()> {
    for attr in ["CallWith", "RaisesException"] {
        if current.get(attr) != new.get(attr) {
            invariant!("[{}] should have the same value on all constructor operations", attr);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn ty(inner: Node) -> Node {
        Node::new("Type").with_child(inner)
    }

    fn primitive(name: &str) -> Node {
        ty(Node::new("PrimitiveType").named(name))
    }

    fn string_type() -> Node {
        ty(Node::new("StringType").named("DOMString"))
    }

    fn ext(attrs: Vec<Node>) -> Node {
        Node::new("ExtAttributes").with_children(attrs)
    }

    fn ext_attr(name: &str) -> Node {
        Node::new("ExtAttribute").named(name)
    }

    fn attribute(name: &str, idl_type: Node) -> Node {
        Node::new("Attribute").named(name).with_child(idl_type)
    }

    fn argument(name: &str, idl_type: Node) -> Node {
        Node::new("Argument").named(name).with_child(idl_type)
    }

    fn getter(key_type: Node) -> Node {
        Node::new("Operation")
            .with_property("GETTER", true)
            .with_child(Node::new("Arguments").with_child(argument("key", key_type)))
            .with_child(string_type())
    }

    fn operation(name: &str) -> Node {
        Node::new("Operation")
            .named(name)
            .with_child(Node::new("Arguments"))
            .with_child(primitive("void"))
    }

    fn constructor(attrs: Vec<Node>) -> Node {
        Node::new("Constructor")
            .with_child(Node::new("Arguments"))
            .with_child(ext(attrs))
    }

    fn interface(name: &str, children: Vec<Node>) -> Node {
        Node::new("Interface").named(name).with_children(children)
    }

    fn named_constructor(name: &str) -> Node {
        ext(vec![ext_attr("NamedConstructor")
            .with_child(Node::new("Call").named(name).with_child(Node::new("Arguments")))])
    }

    #[test]
    fn members_are_tagged_with_their_interface() {
        let node = interface("Foo", vec![
            attribute("x", primitive("long")),
            operation("run"),
            Node::new("Const")
                .named("K")
                .with_child(Node::new("PrimitiveType").named("short"))
                .with_child(Node::new("Value").with_property("VALUE", "1")),
        ]);
        let iface = build_interface(&node).expect("valid interface");
        assert_eq!(iface.attributes()[0].defined_in.as_deref(), Some("Foo"));
        assert_eq!(iface.operations[0].defined_in.as_deref(), Some("Foo"));
        assert_eq!(iface.constants[0].defined_in.as_deref(), Some("Foo"));
    }

    #[test]
    fn flags_and_parent() {
        let node = interface("Foo", vec![Node::new("Inherit").named("Bar")])
            .with_property("PARTIAL", true)
            .with_property("MIXIN", true);
        let iface = build_interface(&node).expect("valid interface");
        assert!(iface.is_partial);
        assert!(iface.is_mixin);
        assert!(!iface.is_callback);
        assert_eq!(iface.parent.as_deref(), Some("Bar"));
    }

    #[test]
    fn duplicate_attribute_names_fail() {
        let node = interface("Foo", vec![
            attribute("x", primitive("long")),
            attribute("x", string_type()),
        ]);
        assert_eq!(build_interface(&node).expect_err("duplicate").kind(), ErrorKind::Semantic);
    }

    #[test]
    fn getters_set_derived_flags() {
        let node = interface("List", vec![
            attribute("length", primitive("unsigned long")).with_property("READONLY", true),
            getter(primitive("unsigned long")),
            getter(string_type()),
        ]);
        let iface = build_interface(&node).expect("valid interface");
        assert!(iface.has_indexed_elements);
        assert!(iface.has_named_property_getter);
    }

    #[test]
    fn value_iterator_requires_length_and_indexed_getter() {
        let iterable = Node::new("Iterable").with_child(primitive("long"));
        let missing = interface("Foo", vec![iterable.clone()]);
        assert_eq!(build_interface(&missing).expect_err("no getter").kind(), ErrorKind::Semantic);

        let only_length = interface("Foo", vec![attribute("length", primitive("long")), iterable.clone()]);
        assert!(build_interface(&only_length).is_err());

        let complete = interface("Foo", vec![
            attribute("length", primitive("unsigned long")),
            getter(primitive("unsigned long")),
            iterable,
        ]);
        let iface = build_interface(&complete).expect("value iterator");
        assert!(iface.iterable.is_some());
    }

    #[test]
    fn pair_iterator_needs_no_getter() {
        let node = interface("Headers", vec![Node::new("Iterable").with_child(string_type()).with_child(string_type())]);
        assert!(build_interface(&node).is_ok());
    }

    #[test]
    fn only_one_iterable_declaration() {
        let node = interface("Foo", vec![
            Node::new("Setlike").with_child(string_type()),
            Node::new("Maplike").with_child(string_type()).with_child(primitive("long")),
        ]);
        assert_eq!(build_interface(&node).expect_err("two").kind(), ErrorKind::Semantic);
    }

    #[test]
    fn legacy_unenumerable_named_properties_needs_named_getter() {
        let bare = interface("Foo", vec![ext(vec![ext_attr("LegacyUnenumerableNamedProperties")])]);
        assert_eq!(build_interface(&bare).expect_err("no getter").kind(), ErrorKind::Semantic);

        let with_getter = interface("Foo", vec![
            getter(string_type()),
            ext(vec![ext_attr("LegacyUnenumerableNamedProperties")]),
        ]);
        assert!(build_interface(&with_getter).is_ok());
    }

    #[test]
    fn unforgeable_interface_is_rejected() {
        let node = interface("Foo", vec![ext(vec![ext_attr("Unforgeable")])]);
        assert_eq!(build_interface(&node).expect_err("unforgeable").kind(), ErrorKind::Semantic);
    }

    #[test]
    fn duplicate_handle_event_fails() {
        let once = interface("Listener", vec![operation("handleEvent")]).with_property("CALLBACK", true);
        let iface = build_interface(&once).expect("one handleEvent");
        assert_eq!(iface.handle_event.as_ref().and_then(Operation::name), Some("handleEvent"));

        let twice = interface("Listener", vec![operation("handleEvent"), operation("handleEvent")]);
        assert_eq!(build_interface(&twice).expect_err("two").kind(), ErrorKind::Semantic);
    }

    #[test]
    fn named_constructor_becomes_constructor() {
        let node = interface("HTMLImageElement", vec![named_constructor("Image")]);
        let iface = build_interface(&node).expect("named constructor");
        assert_eq!(iface.constructors.len(), 1);
        assert_eq!(iface.constructors[0].name(), Some("NamedConstructor"));
        assert_eq!(iface.extended_attributes.string("NamedConstructor"), Some("Image"));
    }

    #[test]
    fn named_constructor_and_constructor_operation_conflict() {
        let node = interface("HTMLImageElement", vec![named_constructor("Image"), constructor(vec![])]);
        assert_eq!(build_interface(&node).expect_err("mixed").kind(), ErrorKind::Semantic);
    }

    #[test]
    fn constructor_operations_convert_metadata() {
        let node = interface("Foo", vec![
            constructor(vec![ext_attr("CallWith").with_property("VALUE", "ScriptState"), ext_attr("RaisesException")]),
            constructor(vec![ext_attr("CallWith").with_property("VALUE", "ScriptState"), ext_attr("RaisesException")]),
            Node::new("Constructor").with_child(Node::new("Arguments")).with_child(ext(vec![ext_attr("Custom")])),
        ]);
        let iface = build_interface(&node).expect("constructors");
        assert_eq!(iface.constructors.len(), 2);
        assert_eq!(iface.custom_constructors.len(), 1);
        assert_eq!(iface.extended_attributes.string("ConstructorCallWith"), Some("ScriptState"));
        assert_eq!(iface.extended_attributes.string("RaisesException"), Some("Constructor"));
    }

    #[test]
    fn constructor_operations_must_agree() {
        let node = interface("Foo", vec![
            constructor(vec![ext_attr("CallWith").with_property("VALUE", "ScriptState")]),
            constructor(vec![]),
        ]);
        assert_eq!(build_interface(&node).expect_err("disagree").kind(), ErrorKind::Semantic);
    }

    #[test]
    fn constructor_metadata_collides_with_interface_metadata() {
        let node = interface("Foo", vec![
            ext(vec![ext_attr("MeasureAs").with_property("VALUE", "Iface")]),
            constructor(vec![ext_attr("MeasureAs").with_property("VALUE", "Ctor")]),
        ]);
        assert_eq!(build_interface(&node).expect_err("collision").kind(), ErrorKind::Semantic);
    }

    #[test]
    fn stringifier_member_joins_interface() {
        let node = interface("URL", vec![Node::new("Stringifier").with_child(attribute("href", string_type()))]);
        let iface = build_interface(&node).expect("stringifier");
        assert!(iface.has_attribute("href"));
        assert!(iface.stringifier.is_some());
    }

    #[test]
    fn event_handlers_are_collected() {
        let handler = attribute("onload", ty(Node::new("Typeref").named("EventHandler")))
            .with_child(ext(vec![ext_attr("EventHandler")]));
        let iface = build_interface(&interface("Img", vec![handler])).expect("handlers");
        assert_eq!(iface.event_handlers.len(), 1);
        assert_eq!(iface.event_handlers[0].name, "onload");
    }

    #[test]
    fn unknown_member_class_fails() {
        let node = interface("Foo", vec![Node::new("Namespace")]);
        assert_eq!(build_interface(&node).expect_err("unknown").kind(), ErrorKind::Structural);
    }
}
