//! The IDL type grammar.
//!
//! A type is a tagged tree. Leaves are primitives, string types, `any` and
//! unresolved references; inner nodes wrap (nullable, sequence, frozen array,
//! annotated) or combine (union, promise, record) other types. Nothing is
//! resolved or normalized here: `(A or (B or C))` stays nested, and a
//! `Typeref` is just a name that a later pass may bind.

use super::extended_attributes::ExtendedAttributes;
use std::fmt;

const INTEGER_TYPES: &[&str] = &[
    "byte",
    "octet",
    "short",
    "unsigned short",
    "long",
    "unsigned long",
    "long long",
    "unsigned long long",
];

const FLOATING_TYPES: &[&str] = &["float", "double"];

/// A type value.
#[derive(Debug, Clone, PartialEq)]
pub enum IdlType {
    /// Built-in non-string type: `long`, `unsigned long long`, `boolean`,
    /// `object`, ... `unrestricted` only applies to `float` and `double`.
    Primitive { name: String, unrestricted: bool },
    /// `DOMString`, `ByteString`, `USVString`.
    StringLike(String),
    Any,
    /// Reference by name to an interface, dictionary, enum, typedef or
    /// callback. Bound later by an external pass.
    Typeref(String),
    Nullable(Box<IdlType>),
    Sequence(Box<IdlType>),
    FrozenArray(Box<IdlType>),
    /// Ordered members, never flattened.
    Union(Vec<IdlType>),
    /// `record<K, V>`; `key` always names a string type.
    Record { key: String, value: Box<IdlType> },
    Promise(Vec<IdlType>),
    Annotated {
        inner: Box<IdlType>,
        extended_attributes: ExtendedAttributes,
    },
}

impl IdlType {
    pub fn primitive(name: impl Into<String>) -> Self {
        IdlType::Primitive {
            name: name.into(),
            unrestricted: false,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        IdlType::StringLike(name.into())
    }

    pub fn typeref(name: impl Into<String>) -> Self {
        IdlType::Typeref(name.into())
    }

    pub fn nullable(inner: IdlType) -> Self {
        IdlType::Nullable(Box::new(inner))
    }

    pub fn sequence(inner: IdlType) -> Self {
        IdlType::Sequence(Box::new(inner))
    }

    /// Strip `Nullable` and `Annotated` wrappers.
    pub fn inner(&self) -> &IdlType {
        match self {
            IdlType::Nullable(inner) => inner.inner(),
            IdlType::Annotated { inner, .. } => inner.inner(),
            other => other,
        }
    }

    /// Name of a leaf as written in IDL (`unrestricted double`, `DOMString`,
    /// `Node`). `None` for composite types.
    pub fn base_type(&self) -> Option<String> {
        match self {
            IdlType::Primitive { name, unrestricted } => Some(if *unrestricted {
                format!("unrestricted {}", name)
            } else {
                name.clone()
            }),
            IdlType::StringLike(name) | IdlType::Typeref(name) => Some(name.clone()),
            IdlType::Any => Some("any".to_string()),
            _ => None,
        }
    }

    /// The symbolic type name (`LongSequence`, `StringOrNull`, `NodeOrLong`).
    pub fn name(&self) -> String {
        match self {
            IdlType::Primitive { name, unrestricted } => {
                let base = primitive_type_name(name);
                if *unrestricted {
                    format!("Unrestricted{}", base)
                } else {
                    base
                }
            }
            IdlType::StringLike(name) => {
                if name == "DOMString" {
                    "String".to_string()
                } else {
                    name.clone()
                }
            }
            IdlType::Any => "Any".to_string(),
            IdlType::Typeref(name) => name.clone(),
            IdlType::Nullable(inner) => format!("{}OrNull", inner.name()),
            IdlType::Sequence(inner) => format!("{}Sequence", inner.name()),
            IdlType::FrozenArray(inner) => format!("{}Array", inner.name()),
            IdlType::Union(members) => members
                .iter()
                .map(IdlType::name)
                .collect::<Vec<_>>()
                .join("Or"),
            IdlType::Record { key, value } => {
                format!("{}{}Record", IdlType::string(key.clone()).name(), value.name())
            }
            IdlType::Promise(members) => {
                let inner: String = members.iter().map(IdlType::name).collect();
                format!("{}Promise", inner)
            }
            IdlType::Annotated { inner, .. } => inner.name(),
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            IdlType::Nullable(_) => true,
            IdlType::Annotated { inner, .. } => inner.is_nullable(),
            _ => false,
        }
    }

    pub fn is_union(&self) -> bool {
        matches!(self.inner(), IdlType::Union(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.inner(), IdlType::Sequence(_))
    }

    pub fn is_frozen_array(&self) -> bool {
        matches!(self.inner(), IdlType::FrozenArray(_))
    }

    pub fn is_record(&self) -> bool {
        matches!(self.inner(), IdlType::Record { .. })
    }

    pub fn is_promise(&self) -> bool {
        matches!(self.inner(), IdlType::Promise(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self.inner(), IdlType::Primitive { name, .. } if INTEGER_TYPES.contains(&name.as_str()))
    }

    pub fn is_floating(&self) -> bool {
        matches!(self.inner(), IdlType::Primitive { name, .. } if FLOATING_TYPES.contains(&name.as_str()))
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_floating()
    }

    pub fn is_string(&self) -> bool {
        matches!(self.inner(), IdlType::StringLike(_))
    }

    /// Whether this type, or any type nested inside it, has the given
    /// symbolic name or base type.
    pub fn contains_type(&self, type_name: &str) -> bool {
        if self.name() == type_name || self.base_type().as_deref() == Some(type_name) {
            return true;
        }
        match self {
            IdlType::Nullable(inner)
            | IdlType::Sequence(inner)
            | IdlType::FrozenArray(inner)
            | IdlType::Annotated { inner, .. } => inner.contains_type(type_name),
            IdlType::Record { value, .. } => value.contains_type(type_name),
            IdlType::Union(members) | IdlType::Promise(members) => {
                members.iter().any(|m| m.contains_type(type_name))
            }
            _ => false,
        }
    }
}

fn primitive_type_name(name: &str) -> String {
    let mapped = match name {
        "boolean" => "Boolean",
        "byte" => "Byte",
        "octet" => "Octet",
        "short" => "Short",
        "unsigned short" => "UnsignedShort",
        "long" => "Long",
        "unsigned long" => "UnsignedLong",
        "long long" => "LongLong",
        "unsigned long long" => "UnsignedLongLong",
        "float" => "Float",
        "double" => "Double",
        "object" => "Object",
        "void" => "Void",
        "undefined" => "Undefined",
        "bigint" => "BigInt",
        other => return other.to_string(),
    };
    mapped.to_string()
}

// Canonical IDL text; this is the `RawType` of the generator projection.
impl fmt::Display for IdlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdlType::Primitive { name, unrestricted } => {
                if *unrestricted {
                    write!(f, "unrestricted {}", name)
                } else {
                    write!(f, "{}", name)
                }
            }
            IdlType::StringLike(name) | IdlType::Typeref(name) => write!(f, "{}", name),
            IdlType::Any => write!(f, "any"),
            IdlType::Nullable(inner) => write!(f, "{}?", inner),
            IdlType::Sequence(inner) => write!(f, "sequence<{}>", inner),
            IdlType::FrozenArray(inner) => write!(f, "FrozenArray<{}>", inner),
            IdlType::Union(members) => {
                let parts: Vec<String> = members.iter().map(ToString::to_string).collect();
                write!(f, "({})", parts.join(" or "))
            }
            IdlType::Record { key, value } => write!(f, "record<{}, {}>", key, value),
            IdlType::Promise(members) => {
                if members.is_empty() {
                    write!(f, "Promise")
                } else {
                    let parts: Vec<String> = members.iter().map(ToString::to_string).collect();
                    write!(f, "Promise<{}>", parts.join(", "))
                }
            }
            IdlType::Annotated {
                inner,
                extended_attributes,
            } => write!(f, "[{}] {}", extended_attributes, inner),
        }
    }
}
