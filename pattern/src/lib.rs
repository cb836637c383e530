//! Magic Pattern
//!
//! Glob matching and handler registries keyed by member-name patterns.
//!
//! Responsibilities:
//! - Compile shell-style globs (`*`, `?`, `[...]`) into anchored matchers
//! - Group handlers into buckets by pattern, in first-registration order
//! - Find every handler whose pattern matches a member name

mod glob;
mod registry;

pub use glob::Glob;
pub use registry::PatternRegistry;
