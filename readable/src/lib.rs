//! Human-readable rendering of task results.
//!
//! A finished task hands back a nested result object. This crate filters it
//! (no-log censoring, internal and verbose keys, duplicated output) and
//! renders what is left as YAML-shaped text meant for people:
//!
//! - **[`core`]**: Pure, deterministic logic (sanitizing, style selection,
//!   dumping, filtering, composition). No I/O, safe to call from any thread.
//! - **[`io`]**: Config files and input streams.
//!
//! [`render`] ties the two together for the CLI and library callers.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod render;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
