//! Deterministic, pure logic behind result rendering.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! values and return deterministic outputs suitable for tests.

pub mod compose;
pub mod dump;
pub mod filter;
pub mod sanitize;
pub mod status;
pub mod style;
pub mod types;
