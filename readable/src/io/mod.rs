//! I/O helpers for `readable` commands.

pub mod config;
pub mod input;
