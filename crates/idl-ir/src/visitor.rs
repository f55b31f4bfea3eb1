//! Read-only traversal of built definitions.
//!
//! # Example
//!
//! ```
//! use idl_ir::ir::{Definitions, TypedObject};
//! use idl_ir::visitor::Visitor;
//!
//! #[derive(Default)]
//! struct TypeCounter { typed: usize }
//!
//! impl Visitor for TypeCounter {
//!     fn visit_typed_object(&mut self, _object: &dyn TypedObject) {
//!         self.typed += 1;
//!     }
//! }
//!
//! let mut counter = TypeCounter::default();
//! Definitions::default().accept(&mut counter);
//! assert_eq!(counter.typed, 0);
//! ```
//!
//! Order: the container, then interfaces (attributes, constants,
//! constructors, custom constructors, operations with their arguments, the
//! iterable declaration), callback functions with their arguments,
//! dictionaries with their members, enumerations, includes, typedefs.

use crate::ir::{
    Argument, Attribute, CallbackFunction, Constant, Definitions, Dictionary, DictionaryMember,
    Enumeration, Include, Interface, IterableDeclaration, Operation, TypedObject, Typedef,
};

/// One method per entity kind. Defaults do nothing except route typed
/// entities to [`Visitor::visit_typed_object`].
pub trait Visitor {
    fn visit_definitions(&mut self, _definitions: &Definitions) {}

    /// Called for every entity that carries a type.
    fn visit_typed_object(&mut self, _object: &dyn TypedObject) {}

    fn visit_interface(&mut self, _interface: &Interface) {}

    fn visit_attribute(&mut self, attribute: &Attribute) {
        self.visit_typed_object(attribute);
    }

    fn visit_constant(&mut self, constant: &Constant) {
        self.visit_typed_object(constant);
    }

    fn visit_operation(&mut self, operation: &Operation) {
        self.visit_typed_object(operation);
    }

    fn visit_argument(&mut self, argument: &Argument) {
        self.visit_typed_object(argument);
    }

    fn visit_iterable(&mut self, iterable: &IterableDeclaration) {
        self.visit_typed_object(iterable);
    }

    fn visit_callback_function(&mut self, callback: &CallbackFunction) {
        self.visit_typed_object(callback);
    }

    fn visit_dictionary(&mut self, _dictionary: &Dictionary) {}

    fn visit_dictionary_member(&mut self, member: &DictionaryMember) {
        self.visit_typed_object(member);
    }

    fn visit_enumeration(&mut self, _enumeration: &Enumeration) {}

    fn visit_include(&mut self, _include: &Include) {}

    fn visit_typedef(&mut self, typedef: &Typedef) {
        self.visit_typed_object(typedef);
    }
}

impl Definitions {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_definitions(self);
        for interface in self.interfaces.values() {
            interface.accept(visitor);
        }
        for callback in self.callback_functions.values() {
            visitor.visit_callback_function(callback);
            for argument in &callback.arguments {
                visitor.visit_argument(argument);
            }
        }
        for dictionary in self.dictionaries.values() {
            visitor.visit_dictionary(dictionary);
            for member in &dictionary.members {
                visitor.visit_dictionary_member(member);
            }
        }
        for enumeration in self.enumerations.values() {
            visitor.visit_enumeration(enumeration);
        }
        for include in &self.includes {
            visitor.visit_include(include);
        }
        for typedef in self.typedefs.values() {
            visitor.visit_typedef(typedef);
        }
    }
}

impl Interface {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_interface(self);
        for attribute in self.attributes() {
            visitor.visit_attribute(attribute);
        }
        for constant in &self.constants {
            visitor.visit_constant(constant);
        }
        for operation in self
            .constructors
            .iter()
            .chain(&self.custom_constructors)
            .chain(&self.operations)
        {
            visitor.visit_operation(operation);
            for argument in &operation.arguments {
                visitor.visit_argument(argument);
            }
        }
        if let Some(iterable) = &self.iterable {
            visitor.visit_iterable(iterable);
        }
    }
}
