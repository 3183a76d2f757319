//! Typed attribute values: decode attribute text, encode it back.
//!
//! Element attributes are untyped text; component properties are typed. A
//! [`ValueKind`] names the declared type of a property and knows how to decode
//! an attribute's raw text (or its absence) into an optional [`Value`], and how
//! to encode a value back into an [`AttrWrite`] instruction for the element.
//!
//! Decoding never fails outward: malformed numeric text falls back to the
//! type default (`0.0`), with a debug log. Attribute text is free-form input.

use std::fmt;

use tracing::debug;

// ---------------------------------------------------------------------------
// ValueKind
// ---------------------------------------------------------------------------

/// The declared type of a component property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Free text. Absent attribute decodes to null.
    Str,
    /// Presence flag. Present (any text) decodes to `true`, absent to `false`.
    Bool,
    /// `f64` value. Malformed text decodes to `0.0`; absent decodes to null.
    Num,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Str => "string",
            ValueKind::Bool => "boolean",
            ValueKind::Num => "number",
        };
        f.write_str(name)
    }
}

impl ValueKind {
    /// Decode an attribute's raw text into a typed value.
    ///
    /// `raw` is `None` when the attribute is absent (never set, or removed).
    /// Booleans use presence semantics: the attribute's text is ignored, only
    /// its existence matters. Numbers that fail to parse fall back to `0.0`
    /// rather than propagating an error — attribute text is untrusted.
    pub fn decode(self, raw: Option<&str>) -> Option<Value> {
        match (self, raw) {
            (ValueKind::Bool, Some(_)) => Some(Value::Bool(true)),
            (ValueKind::Bool, None) => Some(Value::Bool(false)),
            (ValueKind::Str, Some(text)) => Some(Value::Str(text.to_owned())),
            (ValueKind::Num, Some(text)) => {
                let parsed = text.trim().parse::<f64>().ok().filter(|n| !n.is_nan());
                if parsed.is_none() {
                    debug!(text, "attribute text is not a number, using default");
                }
                Some(Value::Num(parsed.unwrap_or(0.0)))
            }
            (ValueKind::Str, None) | (ValueKind::Num, None) => None,
        }
    }

    /// The fallback value used when decoding fails or no default is declared.
    pub fn default_value(self) -> Value {
        match self {
            ValueKind::Str => Value::Str(String::new()),
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Num => Value::Num(0.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A typed property value.
///
/// Numbers compare by bit-exact `f64` equality; `NaN` is rejected at the
/// decode boundary so slot comparisons stay reflexive.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bool(bool),
    Num(f64),
}

impl Value {
    /// The kind this value belongs to.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Str(_) => ValueKind::Str,
            Value::Bool(_) => ValueKind::Bool,
            Value::Num(_) => ValueKind::Num,
        }
    }

    /// Borrow the string payload, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean payload, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The numeric payload, if this is a `Num`.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// Encode into an attribute write instruction.
    ///
    /// `None` (a null value) and `Bool(false)` both remove the attribute;
    /// `Bool(true)` sets it with empty text (presence semantics); strings and
    /// numbers carry their textual form.
    pub fn encode(value: Option<&Value>) -> AttrWrite {
        match value {
            None => AttrWrite::Remove,
            Some(Value::Bool(true)) => AttrWrite::Set(String::new()),
            Some(Value::Bool(false)) => AttrWrite::Remove,
            Some(Value::Str(s)) => AttrWrite::Set(s.clone()),
            Some(Value::Num(n)) => AttrWrite::Set(format_num(*n)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

// ---------------------------------------------------------------------------
// AttrWrite
// ---------------------------------------------------------------------------

/// Instruction produced by encoding: how to apply a value to the element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrWrite {
    /// Set the attribute to this text.
    Set(String),
    /// Remove the attribute entirely.
    Remove,
}

/// Canonical text for a numeric attribute.
///
/// Integral values render without a fraction part so `Num(3.0)` round-trips
/// as `"3"`.
fn format_num(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

// ===========================================================================
// Tests
// ===========================================================================
