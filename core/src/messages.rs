//! Common error messages used across magic behaviors.
//!
//! These constants keep configuration errors consistent between behaviors
//! that reject the same misconfiguration.

/// Error: interception never happens for public properties.
pub const ERR_PUBLIC_PROPERTY: &str = "Magic is not available for public properties";

/// Error: transforms require a property that is intercepted.
pub const ERR_PUBLIC_TRANSFORM: &str = "Properties with transforms must be protected or private";

/// Error: change tracking only applies to protected properties.
pub const ERR_TRACKED_VISIBILITY: &str = "Properties with track changes must be protected";

/// Error: computed methods cannot carry transformer lists.
pub const ERR_COMPUTED_TRANSFORMS: &str = "Cannot use on_get or on_set with a magic method";

/// Error: each overloaded method maps to exactly one name.
pub const ERR_OVERLOAD_COUNT: &str = "Overloaded methods must have exactly one Overloaded attribute";

/// Error: handlers registered before the dispatcher booted.
pub const ERR_NOT_BOOTED: &str = "The magic dispatcher has not been booted";
