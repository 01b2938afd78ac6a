//! Test-only helpers for building task results and input files.

use std::io::Write;

use serde_json::{Value, json};
use tempfile::NamedTempFile;

/// A command result with every field the filter has a rule for.
pub fn command_result() -> Value {
    json!({
        "changed": true,
        "cmd": ["echo", "hello"],
        "rc": 0,
        "stdout": "hello\nworld",
        "stdout_lines": ["hello", "world"],
        "stderr": "",
        "stderr_lines": [],
        "invocation": {"module_args": {"_raw_params": "echo hello"}},
        "_ansible_no_log": false,
        "_ansible_verbose_always": true,
    })
}

/// Same as [`command_result`] with logging suppressed.
pub fn no_log_result() -> Value {
    let mut result = command_result();
    result["_ansible_no_log"] = json!(true);
    result
}

/// Write `contents` to a temporary file that lives as long as the handle.
pub fn input_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp input");
    file.write_all(contents.as_bytes()).expect("write temp input");
    file.flush().expect("flush temp input");
    file
}
