//! srcaudit-core
//!
//! Core library for auditing function records taken from compiled-binary
//! debug information against the C source tree they reference.
//!
//! This crate defines the record model, source location rules, the syntax
//! and line-oriented matchers, alias resolution, the verification
//! orchestrator, and a small SQLite store for pass history.
//!
//! All substantive logic lives here so it is fully testable and reusable
//! from multiple frontends (CLI, batch pipelines, etc.).

pub mod config;
pub mod db;
pub mod locate;
pub mod matching;
pub mod model;
pub mod records;
pub mod services;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
