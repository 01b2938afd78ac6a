//! Per-scalar style decisions and the policies the dumper is built with.
//!
//! The dumper does not know how a string should look. It selects a style
//! with [`select_style`], hands both to a [`ScalarPolicy`] and renders the
//! [`ScalarRenderDecision`] that comes back. [`ReadablePolicy`] expands multi-line text into literal blocks,
//! [`FlowPolicy`] keeps everything inline.

use serde_json::Value;

use crate::core::sanitize::sanitize;

/// Characters that mark a string as multi-line content.
pub const BLOCK_TRIGGERS: [char; 8] = [
    '\n', '\r', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}', '\u{2029}',
];

/// How a single scalar is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    /// Literal block on its own indented lines, line breaks preserved.
    Block,
    /// Inline, quoted only when needed.
    Flow,
}

/// Ephemeral per-scalar result of a policy: never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarRenderDecision {
    pub style: ScalarStyle,
    pub value: String,
}

impl ScalarRenderDecision {
    pub fn flow(value: impl Into<String>) -> Self {
        Self {
            style: ScalarStyle::Flow,
            value: value.into(),
        }
    }

    pub fn block(value: impl Into<String>) -> Self {
        Self {
            style: ScalarStyle::Block,
            value: value.into(),
        }
    }
}

/// Decide the style of any scalar.
///
/// Only strings containing one of [`BLOCK_TRIGGERS`] are rendered as blocks.
pub fn select_style(value: &Value) -> ScalarStyle {
    match value {
        Value::String(text) => select_str_style(text),
        _ => ScalarStyle::Flow,
    }
}

fn select_str_style(text: &str) -> ScalarStyle {
    if text.contains(&BLOCK_TRIGGERS[..]) {
        ScalarStyle::Block
    } else {
        ScalarStyle::Flow
    }
}

/// Strategy injected into the dumper for every string scalar.
///
/// `selected` is what [`select_style`] chose for `text`; a policy may keep it
/// or override it.
pub trait ScalarPolicy: Send + Sync {
    fn decide(&self, text: &str, selected: ScalarStyle) -> ScalarRenderDecision;
}

/// Block style for multi-line text, every value sanitized.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadablePolicy;

impl ScalarPolicy for ReadablePolicy {
    fn decide(&self, text: &str, selected: ScalarStyle) -> ScalarRenderDecision {
        let value = sanitize(text);
        match selected {
            // Nothing left to put in a block.
            ScalarStyle::Block if value.is_empty() => ScalarRenderDecision::flow(value),
            ScalarStyle::Block => ScalarRenderDecision::block(value),
            ScalarStyle::Flow => ScalarRenderDecision::flow(value),
        }
    }
}

/// Inline rendering only, values passed through untouched.
///
/// Used for structural diffs, where expanding blocks would hide the shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowPolicy;

impl ScalarPolicy for FlowPolicy {
    fn decide(&self, text: &str, _selected: ScalarStyle) -> ScalarRenderDecision {
        ScalarRenderDecision::flow(text)
    }
}
