//! Numeric constraints: `[NumberRange=[0, 255]]` and `[NumberEnum=(1, 2, 4)]`.
//!
//! Both only mean something downstream when the annotated type is numeric;
//! when both are present the enumeration wins for value generation.

use super::extended_attributes::{ExtAttrValue, ExtendedAttributes};
use super::types::IdlType;
use crate::error::{IdlError, Result};
use std::ops::Bound;
use std::str::FromStr;

/// An interval with independently open, closed or missing endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval<T> {
    pub lower: Bound<T>,
    pub upper: Bound<T>,
}

impl<T: PartialOrd> Interval<T> {
    pub fn contains(&self, value: &T) -> bool {
        let above = match &self.lower {
            Bound::Included(lo) => value >= lo,
            Bound::Excluded(lo) => value > lo,
            Bound::Unbounded => true,
        };
        let below = match &self.upper {
            Bound::Included(hi) => value <= hi,
            Bound::Excluded(hi) => value < hi,
            Bound::Unbounded => true,
        };
        above && below
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NumberRange {
    Integer(Interval<i128>),
    Floating(Interval<f64>),
}

impl NumberRange {
    /// Parse `[a, b]`, `(a, b)`, `[a, b)` or `(a, b]`. An empty endpoint is
    /// unbounded.
    pub fn parse(text: &str, floating: bool) -> Result<Self> {
        if floating {
            parse_interval::<f64>(text).map(NumberRange::Floating)
        } else {
            parse_interval::<i128>(text).map(NumberRange::Integer)
        }
    }

    pub fn contains_integer(&self, value: i128) -> bool {
        match self {
            NumberRange::Integer(interval) => interval.contains(&value),
            NumberRange::Floating(interval) => interval.contains(&(value as f64)),
        }
    }

    pub fn contains_float(&self, value: f64) -> bool {
        match self {
            NumberRange::Integer(interval) => {
                value.fract() == 0.0 && interval.contains(&(value as i128))
            }
            NumberRange::Floating(interval) => interval.contains(&value),
        }
    }
}

fn parse_interval<T: FromStr>(text: &str) -> Result<Interval<T>> {
    let malformed = || IdlError::malformed("NumberRange", text);
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    let open = chars.next().ok_or_else(malformed)?;
    let close = chars.next_back().ok_or_else(malformed)?;
    let body = chars.as_str();

    let (lo, hi) = body.split_once(',').ok_or_else(malformed)?;
    if hi.contains(',') {
        return Err(malformed());
    }

    let endpoint = |raw: &str| -> Result<Option<T>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<T>().map(Some).map_err(|_| malformed())
    };
    let lo = endpoint(lo)?;
    let hi = endpoint(hi)?;

    let lower = match (open, lo) {
        (_, None) if open == '[' || open == '(' => Bound::Unbounded,
        ('[', Some(v)) => Bound::Included(v),
        ('(', Some(v)) => Bound::Excluded(v),
        _ => return Err(malformed()),
    };
    let upper = match (close, hi) {
        (_, None) if close == ']' || close == ')' => Bound::Unbounded,
        (']', Some(v)) => Bound::Included(v),
        (')', Some(v)) => Bound::Excluded(v),
        _ => return Err(malformed()),
    };
    Ok(Interval { lower, upper })
}

#[derive(Debug, Clone, PartialEq)]
pub enum NumberEnum {
    Integer(Vec<i128>),
    Floating(Vec<f64>),
}

impl NumberEnum {
    /// Parse `(1, 2, 3)`, or the already split list form.
    pub fn parse(value: &ExtAttrValue, integer: bool) -> Result<Self> {
        let items: Vec<String> = match value {
            ExtAttrValue::String(text) => {
                let inner = text
                    .trim()
                    .strip_prefix('(')
                    .and_then(|t| t.strip_suffix(')'))
                    .ok_or_else(|| IdlError::malformed("NumberEnum", text.as_str()))?;
                inner
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            ExtAttrValue::List(items) => items.iter().map(|s| s.trim().to_string()).collect(),
            other => return Err(IdlError::malformed("NumberEnum", other.to_string())),
        };

        if integer {
            items
                .iter()
                .map(|s| s.parse::<i128>().map_err(|_| IdlError::malformed("NumberEnum", s.as_str())))
                .collect::<Result<Vec<_>>>()
                .map(NumberEnum::Integer)
        } else {
            items
                .iter()
                .map(|s| s.parse::<f64>().map_err(|_| IdlError::malformed("NumberEnum", s.as_str())))
                .collect::<Result<Vec<_>>>()
                .map(NumberEnum::Floating)
        }
    }

    pub fn len(&self) -> usize {
        match self {
            NumberEnum::Integer(values) => values.len(),
            NumberEnum::Floating(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Range and enumeration attached to a typed member.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericConstraints {
    pub range: Option<NumberRange>,
    pub enumeration: Option<NumberEnum>,
}

impl NumericConstraints {
    /// Read `NumberRange` / `NumberEnum` from a member's extended attributes.
    ///
    /// `NumberRange` is ignored on non-numeric types. `NumberEnum` is read
    /// as floats unless the type is integral.
    pub fn from_extended_attributes(ty: &IdlType, attrs: &ExtendedAttributes) -> Result<Self> {
        let range = match attrs.get("NumberRange") {
            Some(value) if ty.is_numeric() => {
                let text = value
                    .as_str()
                    .ok_or_else(|| IdlError::malformed("NumberRange", value.to_string()))?;
                Some(NumberRange::parse(text, ty.is_floating())?)
            }
            _ => None,
        };
        let enumeration = attrs
            .get("NumberEnum")
            .map(|value| NumberEnum::parse(value, ty.is_integer()))
            .transpose()?;
        Ok(Self { range, enumeration })
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_none() && self.enumeration.is_none()
    }
}
