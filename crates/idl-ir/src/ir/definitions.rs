//! Top-level definitions of one translation unit.

use super::extended_attributes::ExtendedAttributes;
use super::interface::Interface;
use super::literal::Literal;
use super::members::{Argument, TypedObject};
use super::numeric::NumericConstraints;
use super::types::IdlType;
use crate::seed::SeedSource;
use indexmap::{IndexMap, IndexSet};

/// Everything defined in one translation unit, keyed by name in declaration
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions {
    pub interfaces: IndexMap<String, Interface>,
    pub dictionaries: IndexMap<String, Dictionary>,
    pub enumerations: IndexMap<String, Enumeration>,
    pub typedefs: IndexMap<String, Typedef>,
    pub callback_functions: IndexMap<String, CallbackFunction>,
    pub includes: Vec<Include>,
    /// First interface or dictionary encountered.
    pub first_name: Option<String>,
    /// `FILENAME` of the root node, if the parser recorded one.
    pub file_path: Option<String>,
}

impl Definitions {
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
            && self.dictionaries.is_empty()
            && self.enumerations.is_empty()
            && self.typedefs.is_empty()
            && self.callback_functions.is_empty()
            && self.includes.is_empty()
    }
}

/// `A includes B;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    pub interface: String,
    pub mixin: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallbackFunction {
    pub name: String,
    pub idl_type: IdlType,
    pub arguments: Vec<Argument>,
    pub extended_attributes: ExtendedAttributes,
}

impl TypedObject for CallbackFunction {
    fn idl_types(&self) -> Vec<&IdlType> {
        vec![&self.idl_type]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    pub name: String,
    pub is_partial: bool,
    pub parent: Option<String>,
    pub members: Vec<DictionaryMember>,
    pub extended_attributes: ExtendedAttributes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryMember {
    pub name: String,
    pub idl_type: IdlType,
    pub extended_attributes: ExtendedAttributes,
    pub is_required: bool,
    pub default_value: Option<Literal>,
    /// `[BooleanOnly=true|false]`.
    pub value_only: Option<bool>,
    /// `[Exclude=...]`, empty when absent.
    pub exclude_id: String,
    pub numeric: NumericConstraints,
}

impl TypedObject for DictionaryMember {
    fn idl_types(&self) -> Vec<&IdlType> {
        vec![&self.idl_type]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    pub name: String,
    pub values: Vec<String>,
}

impl Enumeration {
    /// A value chosen by `rng`, or `None` for an empty enumeration.
    pub fn pick<R: SeedSource + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values[rng.next_index(self.values.len())].as_str())
    }

    /// Set union with `other`, without duplicates. First occurrences keep
    /// their position.
    pub fn merge(&mut self, other: &Enumeration) {
        let values: IndexSet<String> = self
            .values
            .drain(..)
            .chain(other.values.iter().cloned())
            .collect();
        self.values = values.into_iter().collect();
    }
}

/// A named type alias. The stored type is always a union so that later
/// declarations of the same name can extend it.
#[derive(Debug, Clone, PartialEq)]
pub struct Typedef {
    pub name: String,
    idl_type: IdlType,
}

impl Typedef {
    /// Wrap `idl_type` in a singleton union unless it already is one.
    pub fn new(name: impl Into<String>, idl_type: IdlType) -> Self {
        let idl_type = match idl_type {
            union @ IdlType::Union(_) => union,
            other => IdlType::Union(vec![other]),
        };
        Self {
            name: name.into(),
            idl_type,
        }
    }

    pub fn idl_type(&self) -> &IdlType {
        &self.idl_type
    }

    pub fn members(&self) -> &[IdlType] {
        match &self.idl_type {
            IdlType::Union(members) => members,
            _ => &[],
        }
    }

    /// Extend the union with the members of `other`.
    pub fn merge(&mut self, other: &Typedef) {
        if let IdlType::Union(members) = &mut self.idl_type {
            members.extend(other.members().iter().cloned());
        }
    }
}

impl TypedObject for Typedef {
    fn idl_types(&self) -> Vec<&IdlType> {
        vec![&self.idl_type]
    }
}
