//! Normalization of string scalars before they are embedded in rendered text.

/// Width of a tab stop when expanding tabs.
const TAB_WIDTH: usize = 8;

/// Normalize `text` so it can be embedded inside a literal block without
/// corrupting line-oriented output.
///
/// Steps, in order:
/// 1. trim trailing whitespace
/// 2. drop characters that are neither ASCII-printable nor `>= U+00A0`
/// 3. expand tabs to fixed tab stops
/// 4. strip vertical-tab, form-feed and carriage-return
/// 5. collapse spaces immediately before a line break
///
/// Removals in steps 2 and 4 can expose trailing blanks, so the result is
/// trimmed once more. The output is a fixed point: `sanitize(sanitize(x)) ==
/// sanitize(x)`.
pub fn sanitize(text: &str) -> String {
    let trimmed = text.trim_end();
    let kept: String = trimmed.chars().filter(|&c| is_kept(c)).collect();
    let expanded = expand_tabs(&kept);
    let stripped: String = expanded
        .chars()
        .filter(|c| !matches!(c, '\x0b' | '\x0c' | '\r'))
        .collect();
    let collapsed = collapse_spaces_before_newline(&stripped);
    collapsed.trim_end().to_string()
}

/// ASCII printable (including ASCII whitespace) or at least U+00A0.
fn is_kept(c: char) -> bool {
    matches!(c, ' '..='~' | '\t' | '\n' | '\r' | '\x0b' | '\x0c') || c >= '\u{a0}'
}

fn expand_tabs(text: &str) -> String {
    if !text.contains('\t') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut column = 0usize;
    for c in text.chars() {
        match c {
            '\t' => {
                let pad = TAB_WIDTH - column % TAB_WIDTH;
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

fn collapse_spaces_before_newline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_spaces = 0usize;
    for c in text.chars() {
        match c {
            ' ' => pending_spaces += 1,
            '\n' => {
                pending_spaces = 0;
                out.push('\n');
            }
            _ => {
                out.extend(std::iter::repeat_n(' ', pending_spaces));
                pending_spaces = 0;
                out.push(c);
            }
        }
    }
    out.extend(std::iter::repeat_n(' ', pending_spaces));
    out
}
