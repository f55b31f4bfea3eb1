//! Builders for the non-interface definitions.

use super::ext_attrs::extended_attributes;
use super::members::{arguments_from_node, build_default};
use super::types::type_from_node;
use crate::error::{invariant, IdlError, Result};
use crate::ir::{
    CallbackFunction, Dictionary, DictionaryMember, Enumeration, ExtendedAttributes, Include,
    NumericConstraints, Typedef,
};
use idl_ast::Node;
use indexmap::IndexSet;
use tracing::debug;

pub(super) fn build_dictionary(node: &Node) -> Result<Dictionary> {
    let name = super::required_name(node, "dictionary name")?;
    let mut dictionary = Dictionary {
        name,
        is_partial: node.flag("PARTIAL"),
        parent: None,
        members: Vec::new(),
        extended_attributes: ExtendedAttributes::new(),
    };
    for child in node.children() {
        match child.class() {
            "Inherit" => dictionary.parent = child.name().map(str::to_string),
            "Key" => dictionary.members.push(build_dictionary_member(child)?),
            "ExtAttributes" => dictionary.extended_attributes = extended_attributes(child)?,
            other => {
                return Err(IdlError::unexpected(format!("dictionary {}", dictionary.name), other))
            }
        }
    }
    debug!(dictionary = %dictionary.name, members = dictionary.members.len(), "built dictionary");
    Ok(dictionary)
}

fn build_dictionary_member(node: &Node) -> Result<DictionaryMember> {
    let name = node.name().unwrap_or_default().to_string();
    let mut idl_type = None;
    let mut default_value = None;
    let mut attrs = ExtendedAttributes::new();
    for child in node.children() {
        match child.class() {
            "Type" => idl_type = Some(type_from_node(child)?),
            "Default" => default_value = Some(build_default(child)?),
            "ExtAttributes" => attrs = extended_attributes(child)?,
            other => return Err(IdlError::unexpected(format!("dictionary member {}", name), other)),
        }
    }
    let idl_type = idl_type
        .ok_or_else(|| IdlError::child_count(format!("dictionary member {}", name), "1 Type", 0))?;

    let value_only = match attrs.get("BooleanOnly") {
        Some(value) if value.is_set() => match value.as_str() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => invariant!("Unsupported [BooleanOnly] value in {}.", name),
        },
        _ => None,
    };
    let exclude_id = attrs
        .get("Exclude")
        .map(ToString::to_string)
        .unwrap_or_default();
    let numeric = NumericConstraints::from_extended_attributes(&idl_type, &attrs)?;

    Ok(DictionaryMember {
        name,
        idl_type,
        extended_attributes: attrs,
        is_required: node.flag("REQUIRED"),
        default_value,
        value_only,
        exclude_id,
        numeric,
    })
}

/// Repeated items collapse onto their first occurrence.
pub(super) fn build_enumeration(node: &Node) -> Result<Enumeration> {
    let values: IndexSet<String> = node
        .children()
        .iter()
        .map(|item| item.name().unwrap_or_default().to_string())
        .collect();
    Ok(Enumeration {
        name: super::required_name(node, "enum name")?,
        values: values.into_iter().collect(),
    })
}

pub(super) fn build_typedef(node: &Node) -> Result<Typedef> {
    let name = super::required_name(node, "typedef name")?;
    let [child] = node.children() else {
        return Err(IdlError::child_count(format!("typedef {}", name), "exactly 1", node.children().len()));
    };
    super::expect_class(child, "Type", "typedef")?;
    Ok(Typedef::new(name, type_from_node(child)?))
}

pub(super) fn build_callback(node: &Node) -> Result<CallbackFunction> {
    let name = super::required_name(node, "callback name")?;
    let children = node.children();
    if children.len() < 2 || children.len() > 3 {
        return Err(IdlError::child_count(format!("callback {}", name), "2 or 3", children.len()));
    }
    let arguments_node = &children[1];
    super::expect_class(arguments_node, "Arguments", "callback arguments")?;

    Ok(CallbackFunction {
        idl_type: type_from_node(&children[0])?,
        arguments: arguments_from_node(Some(arguments_node))?,
        extended_attributes: match children.get(2) {
            Some(attrs) => extended_attributes(attrs)?,
            None => ExtendedAttributes::new(),
        },
        name,
    })
}

pub(super) fn build_include(node: &Node) -> Result<Include> {
    let interface = super::required_name(node, "includes target")?;
    let mixin = node
        .string_property("REFERENCE")
        .filter(|m| !m.is_empty())
        .ok_or_else(|| IdlError::malformed("includes mixin", ""))?;
    Ok(Include {
        interface,
        mixin: mixin.to_string(),
    })
}
