//! # IR Builder
//!
//! Translates an IDL syntax tree (`idl_ast::Node`, class `File`) into
//! [`Definitions`].
//!
//! ## Pipeline overview
//!
//! ```text
//! Node("File")
//!      │
//!      └─[build_definitions]───────────────────────────────────────┐
//!         for each child, by class:                                │
//!           Interface  ─► interface::build_interface()             │
//!                           ├── members::build_attribute()         │
//!                           ├── members::build_operation()         │
//!                           ├── members::build_constant()          │
//!                           ├── members::build_constructor()       │
//!                           ├── members::build_stringifier()       │
//!                           └── members::build_iterable()          │
//!           Dictionary ─► definitions::build_dictionary()          │
//!           Enum       ─► definitions::build_enumeration()         │
//!           Typedef    ─► definitions::build_typedef()             │
//!           Callback   ─► definitions::build_callback()            │
//!           Includes   ─► definitions::build_include()             │
//!                                                                  │
//!         every builder leans on the two leaf translators:         │
//!           types::type_from_node()          ─► IdlType            │
//!           ext_attrs::extended_attributes() ─► ExtendedAttributes │
//!                                                                  │
//! ◄────────────────────────────────────────────────────────────────┘
//!   Definitions
//! ```
//!
//! ## Architecture
//!
//! | Module          | Responsibility                                          |
//! |-----------------|---------------------------------------------------------|
//! | [`types`]       | Type grammar: `Type` nodes to [`IdlType`]               |
//! | [`ext_attrs`]   | `ExtAttributes` nodes to [`ExtendedAttributes`]         |
//! | [`members`]     | Attributes, operations, arguments, constants, defaults  |
//! | [`interface`]   | Interfaces and their invariants                         |
//! | [`definitions`] | Dictionaries, enums, typedefs, callbacks, includes      |
//!
//! Builders check their invariants before returning. The first failure
//! aborts the whole unit; nothing partially built escapes.
//!
//! [`IdlType`]: crate::ir::IdlType
//! [`ExtendedAttributes`]: crate::ir::ExtendedAttributes

mod definitions;
mod ext_attrs;
mod interface;
mod members;
mod types;

pub use ext_attrs::extended_attributes;
pub use types::type_from_node;

use super::Definitions;
use crate::error::{IdlError, Result};
use idl_ast::Node;
use tracing::{debug, trace};

/// Build every definition of one translation unit.
///
/// `root` must be a `File` node.
pub fn build_definitions(root: &Node) -> Result<Definitions> {
    if root.class() != "File" {
        return Err(IdlError::unexpected("translation unit root", root.class()));
    }

    let mut defs = Definitions {
        file_path: root.string_property("FILENAME").map(str::to_string),
        ..Definitions::default()
    };

    for child in root.children() {
        trace!(class = child.class(), name = child.name(), "dispatching definition");
        match child.class() {
            "Interface" => {
                let iface = interface::build_interface(child)?;
                if defs.first_name.is_none() {
                    defs.first_name = Some(iface.name.clone());
                }
                defs.interfaces.insert(iface.name.clone(), iface);
            }
            "Typedef" => {
                let typedef = definitions::build_typedef(child)?;
                defs.typedefs.insert(typedef.name.clone(), typedef);
            }
            "Enum" => {
                let enumeration = definitions::build_enumeration(child)?;
                defs.enumerations.insert(enumeration.name.clone(), enumeration);
            }
            "Callback" => {
                let callback = definitions::build_callback(child)?;
                defs.callback_functions.insert(callback.name.clone(), callback);
            }
            "Includes" => defs.includes.push(definitions::build_include(child)?),
            "Dictionary" => {
                let dictionary = definitions::build_dictionary(child)?;
                if defs.first_name.is_none() {
                    defs.first_name = Some(dictionary.name.clone());
                }
                defs.dictionaries.insert(dictionary.name.clone(), dictionary);
            }
            other => return Err(IdlError::unexpected("file", other)),
        }
    }

    debug!(
        file = defs.file_path.as_deref(),
        interfaces = defs.interfaces.len(),
        dictionaries = defs.dictionaries.len(),
        enumerations = defs.enumerations.len(),
        typedefs = defs.typedefs.len(),
        callbacks = defs.callback_functions.len(),
        includes = defs.includes.len(),
        "built definitions"
    );
    Ok(defs)
}

/// Declared name of a definition that must have one.
fn required_name(node: &Node, what: &'static str) -> Result<String> {
    match node.name() {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(IdlError::malformed(what, "")),
    }
}

fn expect_class(node: &Node, class: &str, context: &str) -> Result<()> {
    if node.class() == class {
        Ok(())
    } else {
        Err(IdlError::unexpected(context, node.class()))
    }
}
