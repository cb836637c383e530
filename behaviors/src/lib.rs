//! Magic Behaviors
//!
//! Each behavior reads the class table at boot and registers handlers on
//! the host's dispatcher. Compose a behavior by passing its installer to
//! `ClassMetaBuilder::uses`.
//!
//! Responsibilities:
//! - Computed properties from methods, with memoization (getters)
//! - Magic properties, doc-tag properties and unbound storage (properties)
//! - Get/set transformer pipelines (transforms)
//! - Per-property change history (tracks_changes)
//! - Property accessors as chainable methods (fluency)
//! - Type-directed method overloading (overloaded)

pub mod fluency;
pub mod functions;
pub mod getters;
pub mod overloaded;
pub mod properties;
pub mod tracks_changes;
pub mod transforms;

pub use functions::apply_transformers;
pub use getters::ComputeCache;
pub use properties::{raw_value, UnboundProperties};
pub use tracks_changes::{ChangeLog, TracksChanges};
