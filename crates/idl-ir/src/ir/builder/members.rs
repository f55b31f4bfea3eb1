//! Member builders: arguments, attributes, operations, constants, defaults,
//! constructor operations, stringifiers and iterable declarations.

use super::ext_attrs::extended_attributes;
use super::types::{inner_type_from_node, type_from_node};
use crate::error::{invariant, unsupported, IdlError, Result};
use crate::ir::{
    Argument, ArgumentOrigin, Attribute, Constant, ExtAttrValue, ExtendedAttributes,
    IterableDeclaration, Literal, NumericConstraints, Operation, Special, Stringifier,
    DEFAULT_WEIGHT,
};
use idl_ast::{Node, PropertyValue};
use tracing::trace;

/// Arguments of an `Arguments` node. A missing node means no arguments.
pub(super) fn arguments_from_node(node: Option<&Node>) -> Result<Vec<Argument>> {
    node.map_or(Ok(Vec::new()), |node| {
        node.children().iter().map(build_argument).collect()
    })
}

pub(super) fn build_argument(node: &Node) -> Result<Argument> {
    let name = node.name().unwrap_or_default().to_string();
    let mut idl_type = None;
    let mut attrs = ExtendedAttributes::new();
    let mut is_variadic = false;
    let mut default_value = None;

    for child in node.children() {
        match child.class() {
            "Type" => idl_type = Some(type_from_node(child)?),
            "ExtAttributes" => attrs = extended_attributes(child)?,
            "Argument" => {
                let marker = child.name().unwrap_or_default();
                if marker != "..." {
                    return Err(IdlError::malformed("variadic marker", marker));
                }
                is_variadic = child.flag("ELLIPSIS");
            }
            "Default" => default_value = Some(build_default(child)?),
            other => return Err(IdlError::unexpected(format!("argument {}", name), other)),
        }
    }
    let idl_type = idl_type.ok_or_else(|| IdlError::child_count(format!("argument {}", name), "1 Type", 0))?;

    let origin = if attrs.contains("FromThis") {
        ArgumentOrigin::This
    } else if attrs.contains("FromOther") {
        ArgumentOrigin::Other
    } else {
        ArgumentOrigin::None
    };
    let numeric = NumericConstraints::from_extended_attributes(&idl_type, &attrs)?;

    Ok(Argument {
        name,
        idl_type,
        extended_attributes: attrs,
        is_optional: node.flag("OPTIONAL"),
        is_variadic,
        default_value,
        origin,
        numeric,
    })
}

/// A `Default` node (`TYPE`, `VALUE`) as a literal.
pub(super) fn build_default(node: &Node) -> Result<Literal> {
    let kind = node.string_property("TYPE").unwrap_or_default();
    let value = node.property("VALUE");
    let text = value.map(PropertyValue::to_string).unwrap_or_default();
    match kind {
        "DOMString" => Literal::string(text),
        "integer" => Literal::parse_integer(&text),
        "float" => Literal::parse_float(&text),
        "boolean" => match value {
            Some(PropertyValue::Bool(b)) => Ok(Literal::Boolean(*b)),
            Some(PropertyValue::String(s)) if s == "true" => Ok(Literal::Boolean(true)),
            Some(PropertyValue::String(s)) if s == "false" => Ok(Literal::Boolean(false)),
            _ => Err(IdlError::malformed("boolean literal", text)),
        },
        "NULL" => Ok(Literal::Null),
        "sequence" => Ok(Literal::Sequence(if text.is_empty() { "[]".to_string() } else { text })),
        "dictionary" => Ok(Literal::Dictionary(if text.is_empty() { "{}".to_string() } else { text })),
        other => Err(IdlError::malformed("default value type", other)),
    }
}

pub(super) fn build_attribute(node: &Node) -> Result<Attribute> {
    let name = node.name().unwrap_or_default().to_string();
    let is_static = node.flag("STATIC");
    let mut idl_type = None;
    let mut attrs = ExtendedAttributes::new();

    for child in node.children() {
        match child.class() {
            "Type" => idl_type = Some(type_from_node(child)?),
            "ExtAttributes" => attrs = extended_attributes(child)?,
            other => return Err(IdlError::unexpected(format!("attribute {}", name), other)),
        }
    }
    let idl_type = idl_type.ok_or_else(|| IdlError::child_count(format!("attribute {}", name), "1 Type", 0))?;

    if attrs.contains("Unforgeable") && is_static {
        invariant!("[Unforgeable] cannot appear on static attributes.");
    }
    if idl_type.is_sequence() || idl_type.is_record() {
        invariant!("Type \"{}\" cannot be used as an attribute.", idl_type);
    }

    let is_event_handler = attrs.contains("EventHandler");
    let event_type = if is_event_handler {
        attrs.get("EventType").map(ToString::to_string).unwrap_or_default()
    } else {
        String::new()
    };
    let numeric = NumericConstraints::from_extended_attributes(&idl_type, &attrs)?;

    trace!(attribute = %name, idl_type = %idl_type, "built attribute");
    Ok(Attribute {
        name,
        idl_type,
        extended_attributes: attrs,
        is_read_only: node.flag("READONLY"),
        is_static,
        is_event_handler,
        event_type,
        numeric,
        defined_in: None,
    })
}

pub(super) fn build_operation(node: &Node) -> Result<Operation> {
    let name = node.name().map(str::to_string);
    let context = || format!("operation {}", name.as_deref().unwrap_or("<anonymous>"));
    let is_static = node.flag("STATIC");
    let specials = [
        ("GETTER", Special::Getter),
        ("SETTER", Special::Setter),
        ("DELETER", Special::Deleter),
    ]
    .into_iter()
    .filter(|(key, _)| node.has_property(key))
    .map(|(_, special)| special)
    .collect();

    let mut arguments = Vec::new();
    let mut idl_type = None;
    let mut attrs = ExtendedAttributes::new();
    for child in node.children() {
        match child.class() {
            "Arguments" => arguments = arguments_from_node(Some(child))?,
            "Type" => idl_type = Some(type_from_node(child)?),
            "ExtAttributes" => attrs = extended_attributes(child)?,
            other => return Err(IdlError::unexpected(context(), other)),
        }
    }

    if attrs.contains("Unforgeable") && is_static {
        invariant!("[Unforgeable] cannot appear on static operations.");
    }

    let call_after = match attrs.get("CallAfter") {
        Some(ExtAttrValue::String(text)) => split_call_after(text),
        Some(ExtAttrValue::List(items)) => items.iter().map(|s| s.trim().to_string()).collect(),
        _ => Vec::new(),
    };
    let weight = match attrs.get("Weight") {
        None => DEFAULT_WEIGHT,
        Some(value) => {
            let text = value.to_string();
            text.trim()
                .parse::<u32>()
                .map_err(|_| IdlError::malformed("operation weight", text))?
        }
    };

    Ok(Operation {
        name,
        idl_type,
        arguments,
        extended_attributes: attrs,
        specials,
        is_static,
        is_constructor: false,
        is_getter: node.property("GETTER").and_then(PropertyValue::as_bool) == Some(true),
        is_setter: node.property("SETTER").and_then(PropertyValue::as_bool) == Some(true),
        weight,
        call_after,
        pending: false,
        defined_in: None,
    })
}

/// `(a, b)` to `["a", "b"]`: the first and last characters are dropped.
fn split_call_after(text: &str) -> Vec<String> {
    let mut chars = text.chars();
    chars.next();
    chars.next_back();
    chars
        .as_str()
        .replace(' ', "")
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub(super) fn build_constant(node: &Node) -> Result<Constant> {
    let name = node.name().unwrap_or_default().to_string();
    let children = node.children();
    if children.len() < 2 || children.len() > 3 {
        return Err(IdlError::child_count(format!("const {}", name), "2 or 3", children.len()));
    }
    let value_node = &children[1];
    super::expect_class(value_node, "Value", "const value")?;

    let idl_type = inner_type_from_node(&children[0])?;
    let attrs = match children.get(2) {
        Some(node) => extended_attributes(node)?,
        None => ExtendedAttributes::new(),
    };
    let numeric = NumericConstraints::from_extended_attributes(&idl_type, &attrs)?;

    Ok(Constant {
        name,
        idl_type,
        value: value_node
            .property("VALUE")
            .map(PropertyValue::to_string)
            .unwrap_or_default(),
        extended_attributes: attrs,
        numeric,
        defined_in: None,
    })
}

/// A `Constructor` member before it is folded into the interface.
#[derive(Debug)]
pub(super) struct ConstructorOperation {
    pub(super) constructor: Operation,
    pub(super) extended_attributes: ExtendedAttributes,
    pub(super) is_custom: bool,
}

pub(super) fn build_constructor(node: &Node) -> Result<ConstructorOperation> {
    let mut arguments_node = None;
    let mut attrs = ExtendedAttributes::new();
    for child in node.children() {
        match child.class() {
            "Arguments" => arguments_node = Some(child),
            "ExtAttributes" => attrs = extended_attributes(child)?,
            other => return Err(IdlError::unexpected("constructor operation", other)),
        }
    }
    let Some(arguments_node) = arguments_node else {
        return Err(IdlError::child_count("constructor operation", "1 Arguments", 0));
    };
    let arguments = arguments_from_node(Some(arguments_node))?;

    let is_custom = match attrs.remove("Custom") {
        Some(value) if value.is_set() => {
            invariant!("[Custom] should not have a value on constructor operations")
        }
        Some(_) => true,
        None => false,
    };
    let name = if is_custom { "CustomConstructor" } else { "Constructor" };
    Ok(ConstructorOperation {
        constructor: Operation::constructor(name, arguments),
        extended_attributes: attrs,
        is_custom,
    })
}

/// Constructor-operation metadata as interface-level extended attributes.
pub(super) fn convert_constructor_attributes(attrs: &ExtendedAttributes) -> Result<ExtendedAttributes> {
    let mut converted = ExtendedAttributes::new();
    for (name, value) in attrs.iter() {
        match name {
            "CallWith" => {
                converted.insert("ConstructorCallWith", value.clone());
            }
            "RaisesException" => {
                if value.is_set() {
                    invariant!("[RaisesException] should not have a value on constructor operations");
                }
                converted.insert("RaisesException", ExtAttrValue::String("Constructor".to_string()));
            }
            "MeasureAs" => {
                converted.insert("MeasureAs", value.clone());
            }
            "Measure" => {
                converted.insert("Measure", ExtAttrValue::None);
            }
            other => unsupported!("[{}] is not supported on constructor operations", other),
        }
    }
    Ok(converted)
}

pub(super) fn build_stringifier(node: &Node) -> Result<Stringifier> {
    let mut stringifier = Stringifier::default();
    let mut is_static = node.flag("STATIC");
    for child in node.children() {
        match child.class() {
            "Attribute" => {
                let attribute = build_attribute(child)?;
                is_static |= attribute.is_static;
                stringifier.attribute = Some(attribute);
            }
            "Operation" => {
                let operation = build_operation(child)?;
                is_static |= operation.is_static;
                if operation.name().is_some_and(|n| !n.is_empty()) {
                    stringifier.operation = Some(operation);
                }
            }
            "ExtAttributes" => stringifier.extended_attributes = extended_attributes(child)?,
            other => return Err(IdlError::unexpected("stringifier", other)),
        }
    }

    // [Unforgeable] and friends on the stringifier apply to its member, so the
    // member-level static check has to see them too.
    if is_static && stringifier.extended_attributes.contains("Unforgeable") {
        invariant!("[Unforgeable] cannot appear on static stringifiers.");
    }
    let inherited = stringifier.extended_attributes.clone();
    if let Some(attribute) = stringifier.attribute.as_mut() {
        attribute.extended_attributes.extend(inherited);
    } else if let Some(operation) = stringifier.operation.as_mut() {
        operation.extended_attributes.extend(inherited);
    }
    Ok(stringifier)
}

/// `Iterable`, `Maplike` or `Setlike`.
pub(super) fn build_iterable(node: &Node) -> Result<IterableDeclaration> {
    let mut attrs = ExtendedAttributes::new();
    let mut types = Vec::new();
    for child in node.children() {
        match child.class() {
            "ExtAttributes" => attrs = extended_attributes(child)?,
            "Type" => types.push(type_from_node(child)?),
            other => return Err(IdlError::unexpected(node.class().to_lowercase(), other)),
        }
    }

    let count = types.len();
    let mut types = types.into_iter();
    let declaration = match (node.class(), types.next(), types.next(), types.next()) {
        ("Iterable", Some(value_type), None, None) => IterableDeclaration::Iterable {
            key_type: None,
            value_type,
            extended_attributes: attrs,
        },
        ("Iterable", Some(key_type), Some(value_type), None) => IterableDeclaration::Iterable {
            key_type: Some(key_type),
            value_type,
            extended_attributes: attrs,
        },
        ("Maplike", Some(key_type), Some(value_type), None) => IterableDeclaration::Maplike {
            key_type,
            value_type,
            is_read_only: node.flag("READONLY"),
            extended_attributes: attrs,
        },
        ("Setlike", Some(value_type), None, None) => IterableDeclaration::Setlike {
            value_type,
            is_read_only: node.flag("READONLY"),
            extended_attributes: attrs,
        },
        ("Iterable", ..) => return Err(IdlError::child_count("iterable<>", "1 or 2 Type", count)),
        ("Maplike", ..) => return Err(IdlError::child_count("maplike<>", "2 Type", count)),
        ("Setlike", ..) => return Err(IdlError::child_count("setlike<>", "1 Type", count)),
        (other, ..) => return Err(IdlError::unexpected("interface", other)),
    };
    Ok(declaration)
}
