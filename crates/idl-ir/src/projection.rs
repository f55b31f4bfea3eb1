//! Generator-facing flattened records.
//!
//! Field names and nesting are what the downstream generators read; they are
//! serialized exactly as named here (`Type`, `RawType`, `Pos`, ...). `Type`
//! is the symbolic type name and `RawType` the canonical IDL text.

use crate::ir::{Argument, Definitions, IdlType, Interface};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Projection {
    pub includes: Vec<IncludeRecord>,
    pub callbacks: Vec<CallbackRecord>,
    pub typedefs: Vec<TypedefRecord>,
    pub enumerations: Vec<EnumerationRecord>,
    pub dictionaries: Vec<DictionaryRecord>,
    pub interfaces: Vec<InterfaceRecord>,
}

impl Projection {
    pub fn new(defs: &Definitions) -> Self {
        Self {
            includes: includes(defs),
            callbacks: callbacks(defs),
            typedefs: typedefs(defs),
            enumerations: enumerations(defs),
            dictionaries: dictionaries(defs),
            interfaces: interfaces(defs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IncludeRecord {
    pub name: String,
    pub mixin: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeRecord {
    #[serde(rename = "Type")]
    pub name: String,
    #[serde(rename = "RawType")]
    pub raw: String,
}

impl From<&IdlType> for TypeRecord {
    fn from(ty: &IdlType) -> Self {
        Self {
            name: ty.name(),
            raw: ty.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ArgumentRecord {
    #[serde(flatten)]
    pub idl_type: TypeRecord,
    pub default: Value,
    pub optional: bool,
    /// 1-based.
    pub pos: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallbackRecord {
    pub name: String,
    #[serde(rename = "Return")]
    pub return_type: TypeRecord,
    pub arguments: Vec<ArgumentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TypedefRecord {
    pub name: String,
    #[serde(flatten)]
    pub idl_type: TypeRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnumerationRecord {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DictionaryRecord {
    pub name: String,
    pub members: Vec<MemberRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MemberRecord {
    pub name: String,
    #[serde(flatten)]
    pub idl_type: TypeRecord,
    pub required: bool,
    pub default: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExposureRecord {
    pub name: String,
    pub runtime_enabled: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConstructorRecord {
    pub name: String,
    pub arguments: Vec<ArgumentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeRecord {
    pub name: String,
    #[serde(flatten)]
    pub idl_type: TypeRecord,
    pub readonly: bool,
    #[serde(rename = "Static")]
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MethodRecord {
    pub name: Option<String>,
    pub getter: bool,
    pub setter: bool,
    #[serde(rename = "Return")]
    pub return_type: Option<TypeRecord>,
    pub arguments: Vec<ArgumentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InterfaceRecord {
    pub name: String,
    pub exposed: Vec<ExposureRecord>,
    /// Empty when there is no parent.
    pub parent: String,
    /// Always empty; inclusion is reported through `Includes` records.
    pub includes: Vec<String>,
    pub constructors: Vec<ConstructorRecord>,
    pub attributes: Vec<AttributeRecord>,
    pub methods: Vec<MethodRecord>,
    pub is_mixin: bool,
    pub implemented_as: Option<String>,
    pub no_interface_object: bool,
    /// Empty when there is no `[LegacyWindowAlias]`.
    pub legacy_alias: String,
}

fn arguments(args: &[Argument]) -> Vec<ArgumentRecord> {
    args.iter()
        .enumerate()
        .map(|(i, arg)| ArgumentRecord {
            idl_type: TypeRecord::from(&arg.idl_type),
            default: arg.default_value.as_ref().map_or(Value::Null, |lit| lit.to_json()),
            optional: arg.is_optional,
            pos: i + 1,
        })
        .collect()
}

pub fn includes(defs: &Definitions) -> Vec<IncludeRecord> {
    defs.includes
        .iter()
        .map(|include| IncludeRecord {
            name: include.interface.clone(),
            mixin: vec![include.mixin.clone()],
        })
        .collect()
}

pub fn callbacks(defs: &Definitions) -> Vec<CallbackRecord> {
    defs.callback_functions
        .values()
        .map(|callback| CallbackRecord {
            name: callback.name.clone(),
            return_type: TypeRecord::from(&callback.idl_type),
            arguments: arguments(&callback.arguments),
        })
        .collect()
}

pub fn typedefs(defs: &Definitions) -> Vec<TypedefRecord> {
    defs.typedefs
        .values()
        .map(|typedef| TypedefRecord {
            name: typedef.name.clone(),
            idl_type: TypeRecord::from(typedef.idl_type()),
        })
        .collect()
}

pub fn enumerations(defs: &Definitions) -> Vec<EnumerationRecord> {
    defs.enumerations
        .values()
        .map(|enumeration| EnumerationRecord {
            name: enumeration.name.clone(),
            values: enumeration.values.clone(),
        })
        .collect()
}

pub fn dictionaries(defs: &Definitions) -> Vec<DictionaryRecord> {
    defs.dictionaries
        .iter()
        .map(|(name, dictionary)| DictionaryRecord {
            name: name.clone(),
            members: dictionary
                .members
                .iter()
                .map(|member| MemberRecord {
                    name: member.name.clone(),
                    idl_type: TypeRecord::from(&member.idl_type),
                    required: member.is_required,
                    default: member.default_value.as_ref().map_or(Value::Null, |lit| lit.to_json()),
                })
                .collect(),
        })
        .collect()
}

pub fn interfaces(defs: &Definitions) -> Vec<InterfaceRecord> {
    defs.interfaces
        .iter()
        .map(|(name, iface)| interface(name, iface))
        .collect()
}

fn interface(name: &str, iface: &Interface) -> InterfaceRecord {
    let attrs = &iface.extended_attributes;
    let no_interface_object = attrs.contains("NoInterfaceObject");
    let legacy_alias = if attrs.is_set("LegacyWindowAlias") {
        attrs.get("LegacyWindowAlias").map(ToString::to_string).unwrap_or_default()
    } else {
        String::new()
    };

    let constructor_name = |ctor_name: Option<&str>| -> String {
        if ctor_name == Some("NamedConstructor") {
            attrs
                .get("NamedConstructor")
                .map(ToString::to_string)
                .unwrap_or_default()
        } else if no_interface_object && !legacy_alias.is_empty() {
            legacy_alias.clone()
        } else {
            iface.name.clone()
        }
    };

    InterfaceRecord {
        name: name.to_string(),
        exposed: attrs
            .exposures()
            .iter()
            .map(|e| ExposureRecord {
                name: e.exposed.clone(),
                runtime_enabled: e.runtime_enabled.clone(),
            })
            .collect(),
        parent: iface.parent.clone().unwrap_or_default(),
        includes: Vec::new(),
        constructors: iface
            .constructors
            .iter()
            .map(|ctor| ConstructorRecord {
                name: constructor_name(ctor.name()),
                arguments: arguments(&ctor.arguments),
            })
            .collect(),
        attributes: iface
            .attributes()
            .iter()
            .map(|attr| AttributeRecord {
                name: attr.name.clone(),
                idl_type: TypeRecord::from(&attr.idl_type),
                readonly: attr.is_read_only,
                is_static: attr.is_static,
            })
            .collect(),
        methods: iface
            .operations
            .iter()
            .map(|op| MethodRecord {
                name: op.name.clone(),
                getter: op.is_getter,
                setter: op.is_setter,
                return_type: op.idl_type.as_ref().map(TypeRecord::from),
                arguments: arguments(&op.arguments),
            })
            .collect(),
        is_mixin: iface.is_mixin,
        implemented_as: attrs.string("ImplementedAs").map(str::to_string),
        no_interface_object,
        legacy_alias,
    }
}
