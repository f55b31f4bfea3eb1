//! Interfaces and their interface-level declarations.

use super::extended_attributes::ExtendedAttributes;
use super::members::{Attribute, Constant, Operation, TypedObject};
use super::types::IdlType;
use indexmap::IndexMap;
use std::collections::HashSet;

/// A `stringifier` declaration. When it wraps an attribute or a named
/// operation, that member is also a regular member of the interface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stringifier {
    pub attribute: Option<Attribute>,
    pub operation: Option<Operation>,
    pub extended_attributes: ExtendedAttributes,
}

/// `iterable<V>`, `iterable<K, V>`, `maplike<K, V>` or `setlike<V>`.
#[derive(Debug, Clone, PartialEq)]
pub enum IterableDeclaration {
    Iterable {
        key_type: Option<IdlType>,
        value_type: IdlType,
        extended_attributes: ExtendedAttributes,
    },
    Maplike {
        key_type: IdlType,
        value_type: IdlType,
        is_read_only: bool,
        extended_attributes: ExtendedAttributes,
    },
    Setlike {
        value_type: IdlType,
        is_read_only: bool,
        extended_attributes: ExtendedAttributes,
    },
}

impl IterableDeclaration {
    pub fn keyword(&self) -> &'static str {
        match self {
            IterableDeclaration::Iterable { .. } => "iterable",
            IterableDeclaration::Maplike { .. } => "maplike",
            IterableDeclaration::Setlike { .. } => "setlike",
        }
    }

    pub fn key_type(&self) -> Option<&IdlType> {
        match self {
            IterableDeclaration::Iterable { key_type, .. } => key_type.as_ref(),
            IterableDeclaration::Maplike { key_type, .. } => Some(key_type),
            IterableDeclaration::Setlike { .. } => None,
        }
    }

    pub fn value_type(&self) -> &IdlType {
        match self {
            IterableDeclaration::Iterable { value_type, .. }
            | IterableDeclaration::Maplike { value_type, .. }
            | IterableDeclaration::Setlike { value_type, .. } => value_type,
        }
    }

    /// `iterable<V>`: iterates values by index.
    pub fn is_value_iterator(&self) -> bool {
        matches!(self, IterableDeclaration::Iterable { key_type: None, .. })
    }

    pub fn extended_attributes(&self) -> &ExtendedAttributes {
        match self {
            IterableDeclaration::Iterable {
                extended_attributes,
                ..
            }
            | IterableDeclaration::Maplike {
                extended_attributes,
                ..
            }
            | IterableDeclaration::Setlike {
                extended_attributes,
                ..
            } => extended_attributes,
        }
    }
}

impl TypedObject for IterableDeclaration {
    fn idl_types(&self) -> Vec<&IdlType> {
        self.key_type()
            .into_iter()
            .chain(std::iter::once(self.value_type()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Interface {
    pub name: String,
    pub is_partial: bool,
    pub is_mixin: bool,
    pub is_callback: bool,
    /// Key of the parent in the interface table.
    pub parent: Option<String>,
    attributes: Vec<Attribute>,
    attribute_index: IndexMap<String, usize>,
    attributes_by_type: IndexMap<String, Vec<usize>>,
    pub constants: Vec<Constant>,
    pub operations: Vec<Operation>,
    pub constructors: Vec<Operation>,
    pub custom_constructors: Vec<Operation>,
    pub extended_attributes: ExtendedAttributes,
    pub stringifier: Option<Stringifier>,
    pub iterable: Option<IterableDeclaration>,
    pub has_indexed_elements: bool,
    pub has_named_property_getter: bool,
    pub event_handlers: Vec<Attribute>,
    /// The `handleEvent` operation of a callback interface.
    pub handle_event: Option<Operation>,
    /// Partial fragments folded into this interface, in merge order.
    pub partial_interfaces: Vec<Interface>,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// The most recently added attribute called `name`.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attribute_index.get(name).map(|&i| &self.attributes[i])
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute_index.contains_key(name)
    }

    /// Attributes whose symbolic type name is `type_name`, in order.
    pub fn attributes_of_type<'a>(&'a self, type_name: &str) -> impl Iterator<Item = &'a Attribute> + 'a {
        self.attributes_by_type
            .get(type_name)
            .into_iter()
            .flatten()
            .map(move |&i| &self.attributes[i])
    }

    pub fn has_attribute_of_type(&self, type_name: &str) -> bool {
        self.attributes_by_type.contains_key(type_name)
    }

    /// Append an attribute and index it by name and type. An existing
    /// attribute with the same name stays in the list; the name index points
    /// at the new one.
    pub fn push_attribute(&mut self, attribute: Attribute) {
        let index = self.attributes.len();
        self.attribute_index.insert(attribute.name.clone(), index);
        self.attributes_by_type
            .entry(attribute.idl_type.name())
            .or_default()
            .push(index);
        self.attributes.push(attribute);
    }

    /// Named operations grouped into overload sets, in declaration order.
    /// Anonymous specials are not included.
    pub fn overloads(&self) -> IndexMap<&str, Vec<&Operation>> {
        let mut groups: IndexMap<&str, Vec<&Operation>> = IndexMap::new();
        for op in &self.operations {
            if let Some(name) = op.name() {
                groups.entry(name).or_default().push(op);
            }
        }
        groups
    }

    pub fn has_operation(&self, name: &str) -> bool {
        self.operations.iter().any(|op| op.name() == Some(name))
    }

    /// Whether `ancestor` is reachable by following parent keys through
    /// `table`. An interface is never its own ancestor; cycles terminate.
    pub fn is_subclass_of(&self, ancestor: &str, table: &IndexMap<String, Interface>) -> bool {
        if ancestor == self.name {
            return false;
        }
        let mut seen = HashSet::new();
        seen.insert(self.name.as_str());
        let mut current = self.parent.as_deref();
        while let Some(name) = current {
            if name == ancestor {
                return true;
            }
            if !seen.insert(name) {
                return false;
            }
            current = table.get(name).and_then(|i| i.parent.as_deref());
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::NumericConstraints;

    fn attribute(name: &str, idl_type: IdlType) -> Attribute {
        Attribute {
            name: name.to_string(),
            idl_type,
            extended_attributes: ExtendedAttributes::new(),
            is_read_only: false,
            is_static: false,
            is_event_handler: false,
            event_type: String::new(),
            numeric: NumericConstraints::default(),
            defined_in: None,
        }
    }

    fn with_parent(name: &str, parent: Option<&str>) -> Interface {
        let mut iface = Interface::new(name);
        iface.parent = parent.map(str::to_string);
        iface
    }

    #[test]
    fn attribute_indices_track_name_and_type() {
        let mut iface = Interface::new("Foo");
        iface.push_attribute(attribute("x", IdlType::primitive("long")));
        iface.push_attribute(attribute("y", IdlType::primitive("long")));
        iface.push_attribute(attribute("s", IdlType::string("DOMString")));

        assert!(iface.has_attribute("y"));
        assert!(!iface.has_attribute("z"));
        let longs: Vec<&str> = iface.attributes_of_type("Long").map(|a| a.name.as_str()).collect();
        assert_eq!(longs, ["x", "y"]);
        assert!(iface.has_attribute_of_type("String"));
    }

    #[test]
    fn duplicate_push_keeps_both_and_indexes_latest() {
        let mut iface = Interface::new("Foo");
        iface.push_attribute(attribute("x", IdlType::primitive("long")));
        iface.push_attribute(attribute("x", IdlType::string("DOMString")));
        assert_eq!(iface.attributes().len(), 2);
        assert!(iface.attribute("x").is_some_and(|a| a.idl_type.is_string()));
    }

    #[test]
    fn subclass_walks_parent_keys() {
        let mut table = IndexMap::new();
        for iface in [
            with_parent("EventTarget", None),
            with_parent("Node", Some("EventTarget")),
            with_parent("Element", Some("Node")),
        ] {
            table.insert(iface.name.clone(), iface);
        }
        let element = &table["Element"];
        assert!(element.is_subclass_of("Node", &table));
        assert!(element.is_subclass_of("EventTarget", &table));
        assert!(!element.is_subclass_of("Element", &table));
        assert!(!table["EventTarget"].is_subclass_of("Node", &table));
    }

    #[test]
    fn subclass_terminates_on_cycles() {
        let mut table = IndexMap::new();
        table.insert("A".to_string(), with_parent("A", Some("B")));
        table.insert("B".to_string(), with_parent("B", Some("A")));
        assert!(!table["A"].is_subclass_of("C", &table));
        assert!(table["A"].is_subclass_of("B", &table));
    }
}
