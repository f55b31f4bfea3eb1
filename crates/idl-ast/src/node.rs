//! Syntax-tree node and property values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A property value attached to a node.
///
/// The parser emits three shapes: flags (`PARTIAL: true`), scalars
/// (`VALUE: "Window"`) and lists (`VALUE: ["Window", "Worker"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    String(String),
    List(Vec<String>),
}

impl PropertyValue {
    /// Truthiness as seen by the builders: `true`, a non-empty string or a
    /// non-empty list.
    pub fn is_truthy(&self) -> bool {
        match self {
            PropertyValue::Bool(b) => *b,
            PropertyValue::String(s) => !s.is_empty(),
            PropertyValue::List(items) => !items.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            PropertyValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::String(s) => write!(f, "{}", s),
            PropertyValue::List(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        PropertyValue::List(value)
    }
}

impl From<Vec<&str>> for PropertyValue {
    fn from(value: Vec<&str>) -> Self {
        PropertyValue::List(value.into_iter().map(str::to_string).collect())
    }
}

/// One node of the IDL syntax tree.
///
/// Nodes are immutable once built; the `with_*` methods exist so that tests
/// and adapters can assemble trees without going through JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    properties: IndexMap<String, PropertyValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
}

impl Node {
    /// Create a node of the given kind with no name, properties or children.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            name: None,
            properties: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Kind label, e.g. `"Interface"`.
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn properties(&self) -> &IndexMap<String, PropertyValue> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Whether the property is present at all, whatever its value.
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Truthiness of a property; absent properties are `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.property(key).is_some_and(PropertyValue::is_truthy)
    }

    /// String value of a property, if it is a scalar string.
    pub fn string_property(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(PropertyValue::as_str)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// The only child of this node, or `None` when there are none.
    ///
    /// Returns `Err(count)` when there is more than one child.
    pub fn single_child(&self) -> Result<Option<&Node>, usize> {
        match self.children.as_slice() {
            [] => Ok(None),
            [child] => Ok(Some(child)),
            many => Err(many.len()),
        }
    }
}
