//! Magic Dispatch
//!
//! Routes every get, set and call on a host through before/on/after
//! handler chains.
//!
//! Responsibilities:
//! - Own the per-instance pattern registries and behavior side tables
//! - Boot the installers declared by the class table in priority order
//! - Expose the `Magic` accessor facade hosts implement

mod boot;
mod dispatcher;
mod magic;

pub use boot::{boot, boot_plan, bootstrap};
pub use dispatcher::{dispatch, handler, Dispatcher, Handler, Stage, Triad};
pub use magic::Magic;

pub use magic_core::{AccessKind, Args, MagicError, MagicEvent, MagicResult, Value};
pub use magic_registry::{ClassMeta, MetaCell};
