//! Shared types for filtering and composing task results.
//!
//! A result object is a `serde_json::Value` rooted at a mapping. These types
//! carry what the filter extracts from it to the composer and must stay
//! deterministic across runs.

use serde_json::{Map, Value};

/// Caller-supplied switches resolved once at the process boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Display verbosity; `0` is the quietest.
    pub verbosity: u8,
    /// Keep the `invocation` key even below the verbose threshold.
    pub keep_invocation: bool,
}

/// Leading status flags pulled out of a result body, in render order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flags {
    entries: Vec<(String, Value)>,
}

impl Flags {
    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        self.entries.push((key.into(), value));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

/// Outcome of filtering one result.
#[derive(Debug, Clone, PartialEq)]
pub enum FilteredResult {
    /// The result asked for no logging; only the marker may be shown.
    Censored(Value),
    /// Flags and the remaining body to dump.
    Visible {
        flags: Flags,
        body: Map<String, Value>,
    },
}

impl FilteredResult {
    /// Reassemble a single object (flags merged back into the body).
    pub fn into_value(self) -> Value {
        match self {
            FilteredResult::Censored(marker) => marker,
            FilteredResult::Visible { flags, mut body } => {
                for (key, value) in flags.entries {
                    body.insert(key, value);
                }
                Value::Object(body)
            }
        }
    }
}

/// Human name of a value's kind, for error messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Loose truthiness used for flags such as `no_log` and `failed`.
///
/// `false`, `null`, zero, and empty strings or collections are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
