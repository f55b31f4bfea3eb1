//! Default-value literals.

use crate::error::{unsupported, IdlError, Result};
use std::fmt;

/// Rendering of an empty string literal.
pub const EMPTY_STRING: &str = "g_empty_string";

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Integer(i128),
    Float(f64),
    Boolean(bool),
    Null,
    /// Raw source text, e.g. `{}`.
    Dictionary(String),
    /// Raw source text, e.g. `[]`.
    Sequence(String),
}

impl Literal {
    /// A string literal. Quotes and backslashes are not supported.
    pub fn string(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.contains('"') || value.contains('\\') {
            unsupported!("unsupported string value: {:?}", value);
        }
        Ok(Literal::String(value))
    }

    /// Integer literal text: `0x`/`0X` hex, leading-`0` octal or decimal,
    /// optionally signed.
    pub fn parse_integer(text: &str) -> Result<Self> {
        parse_integer(text)
            .map(Literal::Integer)
            .ok_or_else(|| IdlError::malformed("integer literal", text))
    }

    pub fn parse_float(text: &str) -> Result<Self> {
        text.trim()
            .parse::<f64>()
            .map(Literal::Float)
            .map_err(|_| IdlError::malformed("float literal", text))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }

    /// The literal's value as plain JSON (not its rendering): strings stay
    /// unquoted, null is `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            Literal::String(s) | Literal::Dictionary(s) | Literal::Sequence(s) => {
                Value::String(s.clone())
            }
            Literal::Integer(i) => i64::try_from(*i)
                .map(Value::from)
                .or_else(|_| u64::try_from(*i).map(Value::from))
                .unwrap_or_else(|_| Value::String(i.to_string())),
            // JSON has no non-finite numbers; use the IDL spelling.
            Literal::Float(f) if f.is_nan() => Value::String("NaN".into()),
            Literal::Float(f) if f.is_infinite() => {
                Value::String(if *f > 0.0 { "Infinity" } else { "-Infinity" }.into())
            }
            Literal::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Literal::Boolean(b) => Value::Bool(*b),
            Literal::Null => Value::Null,
        }
    }
}

fn parse_integer(text: &str) -> Option<i128> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    // `from_str_radix` and `parse` take their own sign; only the one above is allowed.
    let (radix, body) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, hex)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };
    if body.is_empty() || body.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = i128::from_str_radix(body, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) if s.is_empty() => write!(f, "{}", EMPTY_STRING),
            Literal::String(s) => write!(f, "\"{}\"", s),
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Float(v) => write!(f, "{}", v),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Null => write!(f, "null"),
            Literal::Dictionary(raw) | Literal::Sequence(raw) => write!(f, "{}", raw),
        }
    }
}
