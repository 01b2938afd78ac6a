//! Reading task results from files or stdin.
//!
//! Input is JSON: a single document, a top-level array of records, or a
//! stream of concatenated documents (JSON lines). Bytes must be valid UTF-8;
//! anything else is rejected rather than repaired.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// One record to render, optionally addressed to a host.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskEvent {
    pub host: Option<String>,
    pub result: Value,
}

impl TaskEvent {
    /// Accept either a bare result or a `{"host": .., "result": ..}` envelope.
    ///
    /// An object is an envelope only when it has exactly those two keys and
    /// `host` is a string; a result with that shape of its own is therefore
    /// read as an envelope.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map)
                if map.len() == 2
                    && map.get("host").is_some_and(Value::is_string)
                    && map.contains_key("result") =>
            {
                let host = map
                    .remove("host")
                    .and_then(|host| host.as_str().map(str::to_string));
                let result = map.remove("result").unwrap_or(Value::Null);
                Self { host, result }
            }
            other => Self {
                host: None,
                result: other,
            },
        }
    }
}

/// Read the whole input: a file path, or stdin for `None` / `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    let bytes = match path {
        Some(path) if path != Path::new("-") => {
            fs::read(path).with_context(|| format!("read {}", path.display()))?
        }
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("read stdin")?;
            buf
        }
    };
    String::from_utf8(bytes).context("input is not valid UTF-8")
}

/// Split raw input into JSON documents, in input order.
pub fn parse_documents(raw: &str) -> Result<Vec<Value>> {
    let mut values = Vec::new();
    let stream = serde_json::Deserializer::from_str(raw).into_iter::<Value>();
    for (index, value) in stream.enumerate() {
        let value = value.with_context(|| format!("parse input document {}", index + 1))?;
        values.push(value);
    }
    Ok(values)
}

/// Split raw input into result records; a lone top-level array is a list of
/// records.
pub fn parse_values(raw: &str) -> Result<Vec<Value>> {
    let mut values = parse_documents(raw)?;
    if let [Value::Array(items)] = values.as_mut_slice() {
        return Ok(std::mem::take(items));
    }
    Ok(values)
}

/// Parse input into task events.
pub fn parse_events(raw: &str) -> Result<Vec<TaskEvent>> {
    Ok(parse_values(raw)?
        .into_iter()
        .map(TaskEvent::from_value)
        .collect())
}
