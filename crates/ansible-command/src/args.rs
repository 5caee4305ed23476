//! Module arguments and their rendering into a single `-a` value

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar module argument value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// Boolean, rendered as `true` / `false`
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text, rendered verbatim
    Str(String),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for ArgValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Structured `key=value` module arguments, kept in insertion order
pub type Args = IndexMap<String, ArgValue>;

/// Arguments handed to `AdHoc::args`
///
/// A plain string is the freeform argument; a map is structured arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleArgs {
    /// Structured `key=value` pairs
    Structured(Args),
    /// Unstructured text passed to the module as is
    Freeform(String),
}

impl From<&str> for ModuleArgs {
    fn from(value: &str) -> Self {
        Self::Freeform(value.to_string())
    }
}

impl From<String> for ModuleArgs {
    fn from(value: String) -> Self {
        Self::Freeform(value)
    }
}

impl From<Args> for ModuleArgs {
    fn from(value: Args) -> Self {
        Self::Structured(value)
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for ModuleArgs
where
    K: Into<String>,
    V: Into<ArgValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        Self::Structured(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Render freeform text and structured arguments as one argument string
///
/// Freeform text comes first and is emitted verbatim, followed by each
/// structured pair as `key=value` in insertion order, all joined by single
/// spaces. Returns `None` when there is nothing to render, in which case the
/// caller omits the `-a` flag.
pub fn format_args(args: Option<&Args>, freeform: Option<&str>) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    if let Some(text) = freeform.filter(|text| !text.is_empty()) {
        parts.push(text.to_string());
    }

    if let Some(args) = args {
        parts.extend(args.iter().map(|(key, value)| format!("{}={}", key, value)));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
