// ── Field values ──
//
// Every value the device prints is text. Decoders turn it into a
// `FieldValue` through a per-field `FieldKind`; anything that does not
// coerce cleanly becomes `Absent` instead of an error.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single decoded value.
///
/// `Absent` covers both the textual sentinels (`N/A`, `default`, empty) and
/// values that failed to coerce. It is never equal to `Int(0)` or
/// `Bool(false)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    #[default]
    Absent,
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Absent => f.write_str("-"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u16> for FieldValue {
    fn from(v: u16) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u8> for FieldValue {
    fn from(v: u8) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Coercion policy for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    #[default]
    Str,
    Int,
    Float,
    Bool,
}

/// Decoder-owned field→kind table. Fields not listed decode as strings.
#[derive(Debug, Clone, Copy)]
pub struct FieldTable(&'static [(&'static str, FieldKind)]);

impl FieldTable {
    /// Every field is a sentinel-normalized string.
    pub const STRINGS: Self = Self(&[]);

    pub const fn new(entries: &'static [(&'static str, FieldKind)]) -> Self {
        Self(entries)
    }

    pub fn kind_of(&self, field: &str) -> FieldKind {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map_or(FieldKind::Str, |(_, kind)| *kind)
    }

    /// Coerce `raw` according to the kind registered for `field`.
    pub fn coerce(&self, field: &str, raw: &str) -> FieldValue {
        coerce(self.kind_of(field), raw)
    }
}

/// Sentinel normalization: trimmed text, or `None` for empty/`n/a`/`default`.
pub fn normalize(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("default")
    {
        None
    } else {
        Some(trimmed)
    }
}

/// Apply `kind` to `raw`. Never fails: a bad value is `Absent`.
pub fn coerce(kind: FieldKind, raw: &str) -> FieldValue {
    let Some(text) = normalize(raw) else {
        return FieldValue::Absent;
    };
    match kind {
        FieldKind::Str => FieldValue::Str(text.to_owned()),
        FieldKind::Int => text.parse().map_or(FieldValue::Absent, FieldValue::Int),
        FieldKind::Float => text
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map_or(FieldValue::Absent, FieldValue::Float),
        FieldKind::Bool => {
            if text.eq_ignore_ascii_case("true") {
                FieldValue::Bool(true)
            } else if text.eq_ignore_ascii_case("false") {
                FieldValue::Bool(false)
            } else {
                FieldValue::Absent
            }
        }
    }
}
