//! Interface members and operation arguments.

use super::extended_attributes::ExtendedAttributes;
use super::literal::Literal;
use super::numeric::NumericConstraints;
use super::types::IdlType;

/// Default call weight of an operation.
pub const DEFAULT_WEIGHT: u32 = 10;

/// Anything that carries one or more types.
pub trait TypedObject {
    fn idl_types(&self) -> Vec<&IdlType>;
}

/// Where a consumer must source an argument's runtime value from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArgumentOrigin {
    #[default]
    None,
    /// `[FromThis]`: a prior call on the same object.
    This,
    /// `[FromOther]`: another instance of the same interface.
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub idl_type: IdlType,
    pub extended_attributes: ExtendedAttributes,
    pub is_optional: bool,
    pub is_variadic: bool,
    pub default_value: Option<Literal>,
    pub origin: ArgumentOrigin,
    pub numeric: NumericConstraints,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Special {
    Getter,
    Setter,
    Deleter,
}

impl Special {
    pub fn as_str(self) -> &'static str {
        match self {
            Special::Getter => "getter",
            Special::Setter => "setter",
            Special::Deleter => "deleter",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// `None` for anonymous specials such as `getter long (unsigned long i)`.
    pub name: Option<String>,
    /// Return type; `None` for constructors.
    pub idl_type: Option<IdlType>,
    pub arguments: Vec<Argument>,
    pub extended_attributes: ExtendedAttributes,
    pub specials: Vec<Special>,
    pub is_static: bool,
    pub is_constructor: bool,
    /// `GETTER` explicitly set to `true`.
    pub is_getter: bool,
    /// `SETTER` explicitly set to `true`.
    pub is_setter: bool,
    pub weight: u32,
    /// Operations that must run before this one (`[CallAfter=(a, b)]`).
    pub call_after: Vec<String>,
    /// Owned by an external scheduler; never read or written here.
    pub pending: bool,
    /// Name of the interface that declared the operation.
    pub defined_in: Option<String>,
}

impl Operation {
    /// A constructor named `Constructor`, `CustomConstructor` or
    /// `NamedConstructor`.
    pub fn constructor(name: &str, arguments: Vec<Argument>) -> Self {
        Self {
            name: Some(name.to_string()),
            idl_type: None,
            arguments,
            extended_attributes: ExtendedAttributes::new(),
            specials: Vec::new(),
            is_static: false,
            is_constructor: true,
            is_getter: false,
            is_setter: false,
            weight: DEFAULT_WEIGHT,
            call_after: Vec::new(),
            pending: false,
            defined_in: None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_special(&self, special: Special) -> bool {
        self.specials.contains(&special)
    }

    /// Whether any argument type is, or contains, `type_name`.
    pub fn has_argument_type(&self, type_name: &str) -> bool {
        self.arguments
            .iter()
            .any(|arg| arg.idl_type.contains_type(type_name))
    }

    /// Whether the return type is, or contains, `type_name`.
    pub fn has_return_type(&self, type_name: &str) -> bool {
        self.idl_type
            .as_ref()
            .is_some_and(|ty| ty.contains_type(type_name))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub idl_type: IdlType,
    pub extended_attributes: ExtendedAttributes,
    pub is_read_only: bool,
    pub is_static: bool,
    pub is_event_handler: bool,
    /// `[EventType=...]`, empty when not given.
    pub event_type: String,
    pub numeric: NumericConstraints,
    pub defined_in: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub name: String,
    pub idl_type: IdlType,
    /// Raw `VALUE` text.
    pub value: String,
    pub extended_attributes: ExtendedAttributes,
    pub numeric: NumericConstraints,
    pub defined_in: Option<String>,
}

impl TypedObject for Argument {
    fn idl_types(&self) -> Vec<&IdlType> {
        vec![&self.idl_type]
    }
}

impl TypedObject for Operation {
    fn idl_types(&self) -> Vec<&IdlType> {
        self.idl_type.iter().collect()
    }
}

impl TypedObject for Attribute {
    fn idl_types(&self) -> Vec<&IdlType> {
        vec![&self.idl_type]
    }
}

impl TypedObject for Constant {
    fn idl_types(&self) -> Vec<&IdlType> {
        vec![&self.idl_type]
    }
}
