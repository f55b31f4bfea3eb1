//! Type grammar translation.
//!
//! ```text
//! Type [NULLABLE]
//!  ├── PrimitiveType | StringType | Typeref   leaf (UNRESTRICTED on floats)
//!  │   Any                                    leaf
//!  │   Sequence | FrozenArray [NULLABLE]      ── Type
//!  │   UnionType                              ── Type*
//!  │   Promise                                ── Type*
//!  │   Record                                 ── StringType, Type
//!  └── ExtAttributes?                         makes it Annotated
//! ```

use super::ext_attrs::extended_attributes;
use crate::error::{IdlError, Result};
use crate::ir::IdlType;
use idl_ast::Node;

/// Translate a `Type` node.
///
/// The inner type is built first, then wrapped in `Annotated` when an
/// `ExtAttributes` child follows it, then in `Nullable` when the node is
/// marked `NULLABLE`.
pub fn type_from_node(node: &Node) -> Result<IdlType> {
    let children = node.children();
    if children.is_empty() || children.len() > 2 {
        return Err(IdlError::child_count("Type", "1 or 2", children.len()));
    }

    let mut ty = inner_type_from_node(&children[0])?;
    if let Some(attrs_node) = children.get(1) {
        super::expect_class(attrs_node, "ExtAttributes", "annotated type")?;
        ty = IdlType::Annotated {
            inner: Box::new(ty),
            extended_attributes: extended_attributes(attrs_node)?,
        };
    }
    if node.flag("NULLABLE") {
        ty = IdlType::Nullable(Box::new(ty));
    }
    Ok(ty)
}

/// Translate the node inside a `Type` wrapper. Constants use this directly.
pub(super) fn inner_type_from_node(node: &Node) -> Result<IdlType> {
    match node.class() {
        "PrimitiveType" => Ok(IdlType::Primitive {
            name: leaf_name(node)?,
            unrestricted: node.flag("UNRESTRICTED"),
        }),
        "StringType" => Ok(IdlType::StringLike(leaf_name(node)?)),
        "Typeref" => Ok(IdlType::Typeref(leaf_name(node)?)),
        "Any" => Ok(IdlType::Any),
        "Sequence" | "FrozenArray" => sequence_from_node(node),
        "UnionType" => node
            .children()
            .iter()
            .map(type_from_node)
            .collect::<Result<Vec<_>>>()
            .map(IdlType::Union),
        "Promise" => node
            .children()
            .iter()
            .map(type_from_node)
            .collect::<Result<Vec<_>>>()
            .map(IdlType::Promise),
        "Record" => record_from_node(node),
        other => Err(IdlError::unexpected("type", other)),
    }
}

fn leaf_name(node: &Node) -> Result<String> {
    super::required_name(node, "type name")
}

fn sequence_from_node(node: &Node) -> Result<IdlType> {
    let element = match node.children() {
        [child] => child,
        children => {
            let context = format!("{} type", node.class());
            return Err(IdlError::child_count(context, "exactly 1", children.len()));
        }
    };
    super::expect_class(element, "Type", node.class())?;

    let element = Box::new(type_from_node(element)?);
    let ty = if node.class() == "Sequence" {
        IdlType::Sequence(element)
    } else {
        IdlType::FrozenArray(element)
    };
    if node.flag("NULLABLE") {
        Ok(IdlType::Nullable(Box::new(ty)))
    } else {
        Ok(ty)
    }
}

fn record_from_node(node: &Node) -> Result<IdlType> {
    let [key, value] = node.children() else {
        return Err(IdlError::child_count("record<K, V>", "exactly 2", node.children().len()));
    };
    super::expect_class(key, "StringType", "record<K, V> key")?;
    super::expect_class(value, "Type", "record<K, V> value")?;
    Ok(IdlType::Record {
        key: leaf_name(key)?,
        value: Box::new(type_from_node(value)?),
    })
}
