//! Final assembly of flag tokens and the dumped body.

use serde_json::Value;

use crate::core::sanitize::sanitize;
use crate::core::types::Flags;

/// Spaces each body line is shifted right under the flag line.
pub const DEFAULT_BODY_INDENT: usize = 2;

/// Join flags as `key=value` tokens, then the body with every non-blank line
/// indented by `indent` spaces. The result is right-trimmed.
///
/// Blank body lines stay empty rather than getting the indent, so the output
/// never carries trailing spaces. This is the one departure from indenting
/// every body line.
///
/// When there is a body it always starts on a new line, even without flags,
/// so the caller can prefix the text with its own headline.
pub fn compose(flags: &Flags, body_text: &str, indent: usize) -> String {
    let mut out = flags
        .iter()
        .map(|(key, value)| format!("{key}={}", flag_text(value)))
        .collect::<Vec<_>>()
        .join(" ");

    if !body_text.is_empty() {
        let pad = " ".repeat(indent);
        for line in body_text.split('\n') {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&pad);
                out.push_str(line);
            }
        }
    }

    out.truncate(out.trim_end().len());
    out
}

/// Lower-cased single-line text of a flag value.
fn flag_text(value: &Value) -> String {
    match value {
        Value::String(text) => sanitize(text).replace('\n', " ").to_lowercase(),
        other => other.to_string().to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flags(entries: &[(&str, Value)]) -> Flags {
        let mut flags = Flags::default();
        for (key, value) in entries {
            flags.push(*key, value.clone());
        }
        flags
    }

    #[test]
    fn flags_only() {
        let out = compose(&flags(&[("changed", json!(false))]), "", 2);
        assert_eq!(out, "changed=false");
    }

    #[test]
    fn flags_then_indented_body() {
        let out = compose(
            &flags(&[("changed", json!(true)), ("skipped", json!(false))]),
            "msg: |-\n  line1\n  line2",
            2,
        );
        assert_eq!(out, "changed=true skipped=false\n  msg: |-\n    line1\n    line2");
    }

    #[test]
    fn body_without_flags_starts_on_new_line() {
        let out = compose(&Flags::default(), "msg: hi", 4);
        assert_eq!(out, "\n    msg: hi");
    }

    #[test]
    fn blank_body_lines_stay_blank() {
        let out = compose(&Flags::default(), "a: |-\n  x\n\n  y", 2);
        assert_eq!(out, "\n  a: |-\n    x\n\n    y");
    }

    #[test]
    fn non_boolean_flags_are_lower_cased() {
        let out = compose(
            &flags(&[("changed", json!("Yes")), ("skipped", Value::Null)]),
            "",
            2,
        );
        assert_eq!(out, "changed=yes skipped=null");
    }

    #[test]
    fn nothing_to_show_is_empty() {
        assert_eq!(compose(&Flags::default(), "", 2), "");
    }

    #[test]
    fn result_is_right_trimmed() {
        let out = compose(&flags(&[("changed", json!(true))]), "msg: x\n", 2);
        assert_eq!(out, "changed=true\n  msg: x");
    }
}
