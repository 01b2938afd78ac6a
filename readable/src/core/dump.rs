//! Tree-to-text rendering of result values.
//!
//! Output is YAML-shaped and meant for people: mappings are sorted by key,
//! lines are never wrapped and there is no trailing newline. How each string
//! looks is delegated to the [`ScalarPolicy`] the dumper is built with.

use std::sync::LazyLock;

use anyhow::{Result, anyhow};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::style::{FlowPolicy, ReadablePolicy, ScalarPolicy, ScalarStyle, select_style};

/// Spaces per nesting level unless configured otherwise.
pub const DEFAULT_INDENT: usize = 2;

/// Width of the `- ` sequence marker; item content nests this far in.
const SEQ_MARKER_WIDTH: usize = 2;

/// Plain scalars a YAML 1.1 reader resolves to a boolean, timestamp or merge
/// key, which the YAML 1.2 emitter leaves unquoted.
static YAML11_PLAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)^(?:
            y | Y | yes | Yes | YES | n | N | no | No | NO
          | on | On | ON | off | Off | OFF
          | [0-9]{4}-[0-9]{1,2}-[0-9]{1,2}(?:[Tt\x20].*)?
          | = | <<
        )$",
    )
    .unwrap()
});

/// Renders mapping/sequence/scalar trees with an injected scalar policy.
#[derive(Debug, Clone)]
pub struct Dumper<P> {
    policy: P,
    indent: usize,
}

/// Scalar output: either fits on the owning line or opens a literal block.
enum Scalar {
    Inline(String),
    Block { header: String, body: String },
}

impl Dumper<ReadablePolicy> {
    /// Block style for multi-line strings, everything sanitized.
    pub fn readable(indent: usize) -> Self {
        Self::new(ReadablePolicy, indent)
    }
}

impl Dumper<FlowPolicy> {
    /// Inline-only rendering for structural diffs.
    pub fn flow(indent: usize) -> Self {
        Self::new(FlowPolicy, indent)
    }
}

impl<P: ScalarPolicy> Dumper<P> {
    pub fn new(policy: P, indent: usize) -> Self {
        Self {
            policy,
            indent: indent.max(1),
        }
    }

    /// Render `value` to text. The input is only borrowed.
    pub fn dump(&self, value: &Value) -> String {
        let mut lines = Vec::new();
        self.emit(value, 0, &mut lines);
        lines.join("\n")
    }

    /// Render any serializable value that maps onto mappings, sequences and
    /// scalars.
    pub fn dump_serializable<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let value = serde_json::to_value(value)
            .map_err(|err| anyhow!("unsupported value kind: {err}"))?;
        Ok(self.dump(&value))
    }

    /// Emit `value` starting at `column`, without a key or marker in front.
    fn emit(&self, value: &Value, column: usize, lines: &mut Vec<String>) {
        match value {
            Value::Object(map) if !map.is_empty() => self.emit_mapping(map, column, lines),
            Value::Array(items) if !items.is_empty() => self.emit_sequence(items, column, lines),
            scalar => self.emit_scalar(String::new(), scalar, column, lines),
        }
    }

    fn emit_mapping(&self, map: &Map<String, Value>, column: usize, lines: &mut Vec<String>) {
        let mut entries: Vec<(&String, &Value)> = map.iter().collect();
        entries.sort_by(|left, right| left.0.cmp(right.0));

        let pad = " ".repeat(column);
        for (key, value) in entries {
            let head = format!("{pad}{}:", flow_string(key));
            match value {
                Value::Object(nested) if !nested.is_empty() => {
                    lines.push(head);
                    self.emit_mapping(nested, column + self.indent, lines);
                }
                Value::Array(items) if !items.is_empty() => {
                    lines.push(head);
                    self.emit_sequence(items, column + self.indent, lines);
                }
                scalar => self.emit_scalar(head, scalar, column, lines),
            }
        }
    }

    fn emit_sequence(&self, items: &[Value], column: usize, lines: &mut Vec<String>) {
        let pad = " ".repeat(column);
        let content_column = column + SEQ_MARKER_WIDTH;
        for item in items {
            match item {
                Value::Object(map) if !map.is_empty() => {
                    let start = lines.len();
                    self.emit_mapping(map, content_column, lines);
                    attach_marker(&mut lines[start], &pad, content_column);
                }
                Value::Array(nested) if !nested.is_empty() => {
                    let start = lines.len();
                    self.emit_sequence(nested, content_column, lines);
                    attach_marker(&mut lines[start], &pad, content_column);
                }
                scalar => self.emit_scalar(format!("{pad}-"), scalar, column, lines),
            }
        }
    }

    /// Push `head` followed by the scalar; block bodies go one level below
    /// `column`.
    fn emit_scalar(&self, head: String, value: &Value, column: usize, lines: &mut Vec<String>) {
        match self.render_scalar(value) {
            Scalar::Inline(text) => lines.push(join_head(head, &text)),
            Scalar::Block { header, body } => {
                lines.push(join_head(head, &header));
                let pad = " ".repeat(column + self.indent);
                for line in body.split(is_line_break) {
                    if line.is_empty() {
                        lines.push(String::new());
                    } else {
                        lines.push(format!("{pad}{line}"));
                    }
                }
            }
        }
    }

    fn render_scalar(&self, value: &Value) -> Scalar {
        match value {
            Value::Null => Scalar::Inline("null".to_string()),
            Value::Bool(flag) => Scalar::Inline(flag.to_string()),
            Value::Number(number) => Scalar::Inline(number.to_string()),
            Value::String(text) => {
                let decision = self.policy.decide(text, select_style(value));
                match decision.style {
                    ScalarStyle::Block if !decision.value.is_empty() => {
                        self.block(decision.value)
                    }
                    _ => Scalar::Inline(flow_string(&decision.value)),
                }
            }
            // Only reached for empty collections.
            Value::Array(_) => Scalar::Inline("[]".to_string()),
            Value::Object(_) => Scalar::Inline("{}".to_string()),
        }
    }

    fn block(&self, value: String) -> Scalar {
        let mut body = value;
        let chomp = if body.ends_with("\n\n") {
            "+"
        } else if body.ends_with('\n') {
            ""
        } else {
            "-"
        };
        if chomp != "-" {
            body.pop();
        }
        let needs_indicator = body.starts_with(|c: char| c == ' ' || is_line_break(c));
        let header = if needs_indicator {
            format!("|{}{chomp}", self.indent)
        } else {
            format!("|{chomp}")
        };
        Scalar::Block { header, body }
    }
}

/// Render with the readable policy and default indentation.
pub fn dump(value: &Value) -> String {
    Dumper::readable(DEFAULT_INDENT).dump(value)
}

/// Render without block expansion, for structural diffs.
pub fn dump_diff(value: &Value) -> String {
    Dumper::flow(DEFAULT_INDENT).dump(value)
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\u{2028}' | '\u{2029}')
}

fn join_head(head: String, text: &str) -> String {
    if head.is_empty() {
        text.to_string()
    } else {
        format!("{head} {text}")
    }
}

/// Replace the leading indentation of a nested collection's first line with
/// the sequence marker.
fn attach_marker(line: &mut String, pad: &str, content_column: usize) {
    let content = line.split_off(content_column.min(line.len()));
    *line = format!("{pad}- {content}");
}

/// Inline form of a string: plain when unambiguous, quoted otherwise.
///
/// Single-line printable text is quoted by `serde_yaml`. Text with control
/// characters or line breaks is double-quoted here, since the emitter would
/// turn it into a literal block.
pub fn flow_string(text: &str) -> String {
    if text.is_empty() {
        return "''".to_string();
    }
    if text.chars().any(needs_escape) {
        return double_quoted(text);
    }
    match serde_yaml::to_string(text) {
        Ok(emitted) => {
            let emitted = emitted.trim_end_matches('\n');
            if emitted.contains('\n') || YAML11_PLAIN.is_match(emitted) {
                single_quoted(text)
            } else {
                emitted.to_string()
            }
        }
        Err(_) => single_quoted(text),
    }
}

fn needs_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}')
}

fn single_quoted(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\x0b' => out.push_str("\\v"),
            '\x0c' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\x1b' => out.push_str("\\e"),
            '\u{85}' => out.push_str("\\N"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            c if needs_escape(c) && (c as u32) <= 0xff => {
                out.push_str(&format!("\\x{:02X}", c as u32));
            }
            c if needs_escape(c) => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
