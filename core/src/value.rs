//! Typed flag values.
//!
//! Every flag stores its default and current value as a [`FlagValue`], a
//! tagged union over the closed set of supported [`FlagType`]s. Typed access
//! goes through the [`FlagKind`] trait, which maps each supported Rust type
//! onto its tag so that mismatches are caught at runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of a flag.
///
/// # Examples
///
/// ```
/// use chainargs_core::{FlagType, FlagValue};
///
/// assert_eq!(FlagValue::Int(3).flag_type(), FlagType::Int);
/// assert_eq!(FlagType::Double.to_string(), "double");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagType {
    /// `true` / `false`; presence on the command line means `true`.
    Bool,
    /// Signed 64-bit integer.
    Int,
    /// 64-bit floating point number.
    Double,
    /// Raw string.
    String,
}

impl fmt::Display for FlagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Double => "double",
            Self::String => "string",
        };
        f.write_str(name)
    }
}

/// A flag value tagged with its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
}

impl FlagValue {
    /// Returns the type tag of this value.
    pub fn flag_type(&self) -> FlagType {
        match self {
            Self::Bool(_) => FlagType::Bool,
            Self::Int(_) => FlagType::Int,
            Self::Double(_) => FlagType::Double,
            Self::String(_) => FlagType::String,
        }
    }

    /// Parses command-line text as a value of `flag_type`.
    ///
    /// Booleans accept exactly `true` and `false`; integers and doubles use
    /// Rust's literal parsing; strings are taken verbatim. Returns `None` for
    /// malformed text.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainargs_core::{FlagType, FlagValue};
    ///
    /// assert_eq!(FlagValue::parse_as(FlagType::Int, "7"), Some(FlagValue::Int(7)));
    /// assert_eq!(FlagValue::parse_as(FlagType::Bool, "yes"), None);
    /// assert_eq!(
    ///     FlagValue::parse_as(FlagType::String, "--odd"),
    ///     Some(FlagValue::String("--odd".into()))
    /// );
    /// ```
    pub fn parse_as(flag_type: FlagType, text: &str) -> Option<Self> {
        match flag_type {
            FlagType::Bool => match text {
                "true" => Some(Self::Bool(true)),
                "false" => Some(Self::Bool(false)),
                _ => None,
            },
            FlagType::Int => text.parse().ok().map(Self::Int),
            FlagType::Double => text.parse().ok().map(Self::Double),
            FlagType::String => Some(Self::String(text.to_string())),
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
        }
    }
}

/// Rust types that can be stored in a flag.
///
/// Implemented for `bool`, `i64`, `f64` and `String`, one per [`FlagType`].
pub trait FlagKind: Clone + 'static {
    /// Tag stored alongside values of this type.
    const TYPE: FlagType;

    /// Wraps `self` in a [`FlagValue`].
    fn into_value(self) -> FlagValue;

    /// Extracts a copy of the value when the tag matches.
    fn from_value(value: &FlagValue) -> Option<Self>;
}

impl FlagKind for bool {
    const TYPE: FlagType = FlagType::Bool;

    fn into_value(self) -> FlagValue {
        FlagValue::Bool(self)
    }

    fn from_value(value: &FlagValue) -> Option<Self> {
        match value {
            FlagValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FlagKind for i64 {
    const TYPE: FlagType = FlagType::Int;

    fn into_value(self) -> FlagValue {
        FlagValue::Int(self)
    }

    fn from_value(value: &FlagValue) -> Option<Self> {
        match value {
            FlagValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FlagKind for f64 {
    const TYPE: FlagType = FlagType::Double;

    fn into_value(self) -> FlagValue {
        FlagValue::Double(self)
    }

    fn from_value(value: &FlagValue) -> Option<Self> {
        match value {
            FlagValue::Double(v) => Some(*v),
            _ => None,
        }
    }
}

impl FlagKind for String {
    const TYPE: FlagType = FlagType::String;

    fn into_value(self) -> FlagValue {
        FlagValue::String(self)
    }

    fn from_value(value: &FlagValue) -> Option<Self> {
        match value {
            FlagValue::String(v) => Some(v.clone()),
            _ => None,
        }
    }
}
