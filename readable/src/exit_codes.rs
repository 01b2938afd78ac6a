//! Stable exit codes for `readable` CLI commands.

/// Every record rendered, or the command finished its output.
pub const OK: i32 = 0;
/// Invalid input, config, or any other error.
pub const INVALID: i32 = 1;
