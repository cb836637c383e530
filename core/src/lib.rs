//! Magic Core Types
//!
//! This crate provides the foundational types shared by every magic crate:
//! - Value types (the Value enum carried by access events)
//! - Named objects (Object) used for class-typed values
//! - Access kinds (get, set, call)
//! - The access event passed through handler chains
//! - The error taxonomy raised by dispatch, boot and coercion

mod error;
mod event;
pub mod messages;
mod value;

pub use error::*;
pub use event::{EventKind, MagicEvent, Phase};
pub use value::*;
