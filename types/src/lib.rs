//! Magic Types
//!
//! Coerce values to doc-declared types.
//!
//! Responsibilities:
//! - Lenient scalar conversion for builtin types (`int`, `string`, ...)
//! - Ranged integers (`positive-int`, `int<0, 100>`)
//! - Typed arrays and collections, recursively (`array<string, int[]>`)
//! - Class-typed values
//! - An ordered, extensible caster list where the first supporter wins

mod builtin;
mod caster;
mod class;
mod error;
mod int_range;
mod typed_array;

pub use builtin::BuiltinCaster;
pub use caster::{cast, CastsType, MixedCaster, TypeCaster};
pub use class::ClassCaster;
pub use error::{CastError, CastResult};
pub use int_range::IntRangeCaster;
pub use typed_array::{TypedArrayCaster, TypedArrayType};
