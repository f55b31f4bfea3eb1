//! `ExtAttributes` nodes to [`ExtendedAttributes`].

use super::members::arguments_from_node;
use crate::error::{unsupported, IdlError, Result};
use crate::ir::{ExtAttrValue, Exposure, ExtendedAttributes, NamedConstructorCall};
use idl_ast::{Node, PropertyValue};

/// Translate an `ExtAttributes` node. Later entries with the same name
/// replace earlier ones.
pub fn extended_attributes(node: &Node) -> Result<ExtendedAttributes> {
    let mut attrs = ExtendedAttributes::new();
    for attr in node.children() {
        let name = super::required_name(attr, "extended attribute name")?;
        let child = match attr.single_child() {
            Ok(child) => child,
            Err(count) => {
                return Err(IdlError::child_count(
                    format!("extended attribute [{}]", name),
                    "at most 1",
                    count,
                ))
            }
        };

        let value = match name.as_str() {
            "Constructor" => {
                unsupported!("[Constructor] is deprecated. Use constructor operations")
            }
            "CustomConstructor" => unsupported!(
                "[CustomConstructor] is deprecated. Use constructor operations with [Custom]"
            ),
            "NamedConstructor" => match child {
                Some(call) => ExtAttrValue::Call(named_constructor_call(call)?),
                None => scalar_value(attr),
            },
            "Exposed" => ExtAttrValue::Exposures(exposures(attr, child)?),
            _ if child.is_some() => {
                return Err(IdlError::unexpected(
                    format!("extended attribute [{}]", name),
                    child.map(Node::class).unwrap_or_default(),
                ))
            }
            _ => scalar_value(attr),
        };
        attrs.insert(name, value);
    }
    Ok(attrs)
}

fn scalar_value(attr: &Node) -> ExtAttrValue {
    match attr.property("VALUE") {
        Some(PropertyValue::String(s)) => ExtAttrValue::String(s.clone()),
        Some(PropertyValue::List(items)) => ExtAttrValue::List(items.clone()),
        Some(PropertyValue::Bool(b)) => ExtAttrValue::String(b.to_string()),
        None => ExtAttrValue::None,
    }
}

fn named_constructor_call(call: &Node) -> Result<NamedConstructorCall> {
    super::expect_class(call, "Call", "[NamedConstructor]")?;
    let arguments = match call.children() {
        [arguments] => {
            super::expect_class(arguments, "Arguments", "[NamedConstructor] call")?;
            arguments_from_node(Some(arguments))?
        }
        children => {
            return Err(IdlError::child_count(
                "[NamedConstructor] call",
                "exactly 1",
                children.len(),
            ))
        }
    };
    Ok(NamedConstructorCall {
        name: super::required_name(call, "named constructor name")?,
        arguments,
    })
}

fn exposures(attr: &Node, child: Option<&Node>) -> Result<Vec<Exposure>> {
    if let Some(arguments) = child {
        super::expect_class(arguments, "Arguments", "[Exposed]")?;
        // `Exposed(Window FeatureFlag)` parses as an argument list where the
        // type is the global and the argument name is the flag.
        return Ok(arguments_from_node(Some(arguments))?
            .into_iter()
            .map(|arg| Exposure::with_runtime_flag(arg.idl_type.to_string(), arg.name))
            .collect());
    }
    match attr.property("VALUE") {
        Some(PropertyValue::String(s)) => Ok(vec![Exposure::new(s.as_str())]),
        Some(PropertyValue::List(items)) => Ok(items.iter().map(|s| Exposure::new(s.as_str())).collect()),
        Some(other) => Err(IdlError::malformed("[Exposed] value", other.to_string())),
        None => Err(IdlError::malformed("[Exposed] value", "")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn attr(name: &str) -> Node {
        Node::new("ExtAttribute").named(name)
    }

    fn list(children: Vec<Node>) -> Node {
        Node::new("ExtAttributes").with_children(children)
    }

    fn typed_argument(type_name: &str, name: &str) -> Node {
        Node::new("Argument")
            .named(name)
            .with_child(Node::new("Type").with_child(Node::new("Typeref").named(type_name)))
    }

    #[test]
    fn generic_values() {
        let attrs = extended_attributes(&list(vec![
            attr("Clamp"),
            attr("ImplementedAs").with_property("VALUE", "Impl"),
            attr("CallAfter").with_property("VALUE", vec!["open", "send"]),
        ]))
        .expect("valid attributes");
        assert_eq!(attrs.get("Clamp"), Some(&ExtAttrValue::None));
        assert_eq!(attrs.string("ImplementedAs"), Some("Impl"));
        assert_eq!(
            attrs.get("CallAfter"),
            Some(&ExtAttrValue::List(vec!["open".into(), "send".into()]))
        );
        let keys: Vec<&str> = attrs.keys().collect();
        assert_eq!(keys, ["Clamp", "ImplementedAs", "CallAfter"]);
    }

    #[test]
    fn exposed_list_yields_bare_entries() {
        let attrs = extended_attributes(&list(vec![
            attr("Exposed").with_property("VALUE", vec!["Window", "Worker"]),
        ]))
        .expect("valid");
        assert_eq!(
            attrs.exposures(),
            [Exposure::new("Window"), Exposure::new("Worker")]
        );
    }

    #[test]
    fn exposed_arguments_yield_runtime_flags() {
        let attrs = extended_attributes(&list(vec![attr("Exposed").with_child(
            Node::new("Arguments").with_child(typed_argument("Window", "FeatureFlag")),
        )]))
        .expect("valid");
        assert_eq!(
            attrs.exposures(),
            [Exposure::with_runtime_flag("Window", "FeatureFlag")]
        );
    }

    #[test]
    fn named_constructor_is_stored_as_call() {
        let attrs = extended_attributes(&list(vec![attr("NamedConstructor").with_child(
            Node::new("Call")
                .named("Image")
                .with_child(Node::new("Arguments").with_child(typed_argument("unsigned long", "width"))),
        )]))
        .expect("valid");
        let Some(ExtAttrValue::Call(call)) = attrs.get("NamedConstructor") else {
            panic!("expected a pending call");
        };
        assert_eq!(call.name, "Image");
        assert_eq!(call.arguments.len(), 1);
        assert_eq!(call.arguments[0].name, "width");
    }

    #[test]
    fn named_constructor_rejects_other_children() {
        let err = extended_attributes(&list(vec![
            attr("NamedConstructor").with_child(Node::new("Arguments")),
        ]))
        .expect_err("not a call");
        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn deprecated_constructors_are_unsupported() {
        for name in ["Constructor", "CustomConstructor"] {
            let err = extended_attributes(&list(vec![attr(name)])).expect_err(name);
            assert_eq!(err.kind(), ErrorKind::Unsupported);
            assert!(err.to_string().contains("constructor operations"));
        }
    }

    #[test]
    fn unexpected_children_are_structural() {
        let too_many = attr("Foo").with_child(Node::new("Arguments")).with_child(Node::new("Arguments"));
        assert!(matches!(
            extended_attributes(&list(vec![too_many])),
            Err(IdlError::ChildCount { found: 2, .. })
        ));

        let stray = attr("Foo").with_child(Node::new("Arguments"));
        assert!(matches!(
            extended_attributes(&list(vec![stray])),
            Err(IdlError::UnexpectedNode { .. })
        ));
    }

    #[test]
    fn attribute_name_is_required() {
        let nameless = Node::new("ExtAttribute").with_property("VALUE", "Window");
        assert!(matches!(
            extended_attributes(&list(vec![nameless])),
            Err(IdlError::MalformedValue { what: "extended attribute name", .. })
        ));
    }
}
