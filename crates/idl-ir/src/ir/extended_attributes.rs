//! Extended attributes: `[Exposed=Window, NamedConstructor=Image(), Clamp]`.

use super::members::Argument;
use indexmap::IndexMap;
use std::fmt;

/// One exposure condition. `[Exposed=Window]` has no runtime flag,
/// `[Exposed(Window FeatureFlag)]` gates `Window` on `FeatureFlag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exposure {
    pub exposed: String,
    pub runtime_enabled: Option<String>,
}

impl Exposure {
    pub fn new(exposed: impl Into<String>) -> Self {
        Self {
            exposed: exposed.into(),
            runtime_enabled: None,
        }
    }

    pub fn with_runtime_flag(exposed: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            exposed: exposed.into(),
            runtime_enabled: Some(flag.into()),
        }
    }
}

/// `[NamedConstructor=Name(args)]` before interface construction turns it
/// into a constructor operation.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedConstructorCall {
    pub name: String,
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExtAttrValue {
    /// `[Foo]`
    None,
    /// `[Foo=Bar]`
    String(String),
    /// `[Foo=(A, B)]`
    List(Vec<String>),
    Exposures(Vec<Exposure>),
    Call(NamedConstructorCall),
}

impl ExtAttrValue {
    /// Whether the value counts as set. `None` and empty strings or lists do
    /// not.
    pub fn is_set(&self) -> bool {
        match self {
            ExtAttrValue::None => false,
            ExtAttrValue::String(s) => !s.is_empty(),
            ExtAttrValue::List(items) => !items.is_empty(),
            ExtAttrValue::Exposures(items) => !items.is_empty(),
            ExtAttrValue::Call(_) => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExtAttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_exposures(&self) -> Option<&[Exposure]> {
        match self {
            ExtAttrValue::Exposures(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for ExtAttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtAttrValue::None => Ok(()),
            ExtAttrValue::String(s) => write!(f, "{}", s),
            ExtAttrValue::List(items) => write!(f, "({})", items.join(", ")),
            ExtAttrValue::Exposures(items) => {
                let parts: Vec<&str> = items.iter().map(|e| e.exposed.as_str()).collect();
                write!(f, "({})", parts.join(", "))
            }
            ExtAttrValue::Call(call) => write!(f, "{}()", call.name),
        }
    }
}

/// Insertion-ordered extended-attribute mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtendedAttributes {
    entries: IndexMap<String, ExtAttrValue>,
}

impl ExtendedAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ExtAttrValue) -> Option<ExtAttrValue> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&ExtAttrValue> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Present with a set value.
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(ExtAttrValue::is_set)
    }

    /// Scalar string value of `key`.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ExtAttrValue::as_str)
    }

    pub fn exposures(&self) -> &[Exposure] {
        self.get("Exposed")
            .and_then(ExtAttrValue::as_exposures)
            .unwrap_or(&[])
    }

    pub fn remove(&mut self, key: &str) -> Option<ExtAttrValue> {
        self.entries.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtAttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrite with every entry of `other`.
    pub fn extend(&mut self, other: ExtendedAttributes) {
        self.entries.extend(other.entries);
    }

    /// Fold `other` in with first-writer-wins semantics.
    ///
    /// A key missing (or unset) here is taken from `other`. `Exposed` lists
    /// are unioned, keeping this side's order. Any other conflicting value is
    /// dropped in favour of the value already present.
    pub fn absorb(&mut self, other: &ExtendedAttributes) {
        for (key, value) in &other.entries {
            match self.entries.get_mut(key) {
                Some(existing) if existing.is_set() => {
                    if let (ExtAttrValue::Exposures(mine), ExtAttrValue::Exposures(theirs)) =
                        (existing, value)
                    {
                        for exposure in theirs {
                            if !mine.contains(exposure) {
                                mine.push(exposure.clone());
                            }
                        }
                    }
                }
                _ => {
                    self.entries.insert(key.clone(), value.clone());
                }
            }
        }
    }
}

impl fmt::Display for ExtendedAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                ExtAttrValue::None => write!(f, "{}", key)?,
                other => write!(f, "{}={}", key, other)?,
            }
        }
        Ok(())
    }
}

impl FromIterator<(String, ExtAttrValue)> for ExtendedAttributes {
    fn from_iter<I: IntoIterator<Item = (String, ExtAttrValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exposed(names: &[&str]) -> ExtAttrValue {
        ExtAttrValue::Exposures(names.iter().map(|n| Exposure::new(*n)).collect())
    }

    #[test]
    fn absorb_adds_missing_keys_and_keeps_existing() {
        let mut base = ExtendedAttributes::new();
        base.insert("ImplementedAs", ExtAttrValue::String("Base".into()));

        let mut partial = ExtendedAttributes::new();
        partial.insert("ImplementedAs", ExtAttrValue::String("Other".into()));
        partial.insert("SecureContext", ExtAttrValue::None);

        base.absorb(&partial);
        assert_eq!(base.string("ImplementedAs"), Some("Base"));
        assert!(base.contains("SecureContext"));
    }

    #[test]
    fn absorb_unions_exposure_sets() {
        let mut base = ExtendedAttributes::new();
        base.insert("Exposed", exposed(&["Window", "Worker"]));
        let mut partial = ExtendedAttributes::new();
        partial.insert("Exposed", exposed(&["Worker", "ServiceWorker"]));

        base.absorb(&partial);
        let names: Vec<&str> = base.exposures().iter().map(|e| e.exposed.as_str()).collect();
        assert_eq!(names, ["Window", "Worker", "ServiceWorker"]);
    }

    #[test]
    fn absorb_fills_unset_values() {
        let mut base = ExtendedAttributes::new();
        base.insert("Measure", ExtAttrValue::None);
        let mut other = ExtendedAttributes::new();
        other.insert("Measure", ExtAttrValue::String("Counter".into()));

        base.absorb(&other);
        assert_eq!(base.string("Measure"), Some("Counter"));
    }

    #[test]
    fn display_matches_idl_syntax() {
        let mut attrs = ExtendedAttributes::new();
        attrs.insert("Clamp", ExtAttrValue::None);
        attrs.insert("Exposed", exposed(&["Window", "Worker"]));
        attrs.insert("ImplementedAs", ExtAttrValue::String("Impl".into()));
        assert_eq!(attrs.to_string(), "Clamp, Exposed=(Window, Worker), ImplementedAs=Impl");
    }
}
