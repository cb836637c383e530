//! Error types shared by all magic crates.

use std::fmt;
use thiserror::Error;

/// The kind of member access being intercepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// Reading a property.
    Get,
    /// Writing a property.
    Set,
    /// Calling a method.
    Call,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessKind::Get => write!(f, "get"),
            AccessKind::Set => write!(f, "set"),
            AccessKind::Call => write!(f, "call"),
        }
    }
}

/// Errors raised by dispatch, boot and type coercion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MagicError {
    /// No primary handler and no fallback for the accessed member.
    #[error("No {kind} handler found for {class}::{name}")]
    UnhandledMember {
        class: String,
        kind: AccessKind,
        name: String,
    },

    /// A computed member's parameter does not name a host member.
    #[error("Could not find class member '{parameter}' for use as a parameter of '{member}'")]
    MemberResolution { member: String, parameter: String },

    /// Mutually exclusive or invalid behavior configuration, raised at boot.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A value could not be converted to the requested type.
    #[error("Invalid value for type {type_name}: {message}")]
    InvalidValue { type_name: String, message: String },

    /// A converted value fell outside the range of the requested type.
    #[error("Value {value} is outside the valid range for type {type_name}")]
    OutOfRange { type_name: String, value: String },

    /// A call used an argument count the member cannot accept.
    #[error("Invalid number of arguments for {name}: {message}")]
    Arity { name: String, message: String },

    /// No overloaded method accepts the passed arguments.
    #[error("No overloaded method found for '{name}' that matches the arguments passed")]
    NoMatchingOverload { name: String },

    /// More than one overloaded method accepts the passed arguments.
    #[error("Multiple overloaded methods ({}) found for '{name}' that match the arguments passed", .candidates.join(", "))]
    AmbiguousOverload {
        name: String,
        candidates: Vec<String>,
    },

    /// Change history was requested for a member that is not tracked.
    #[error("No changes have been tracked for the property '{name}'")]
    NotTracked { name: String },

    /// A user supplied handler or method body failed.
    #[error("{message}")]
    Handler { message: String },
}

impl MagicError {
    pub fn unhandled_member(
        class: impl Into<String>,
        kind: AccessKind,
        name: impl Into<String>,
    ) -> Self {
        Self::UnhandledMember {
            class: class.into(),
            kind,
            name: name.into(),
        }
    }

    pub fn member_resolution(member: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::MemberResolution {
            member: member.into(),
            parameter: parameter.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn invalid_value(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    pub fn out_of_range(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::OutOfRange {
            type_name: type_name.into(),
            value: value.into(),
        }
    }

    pub fn arity(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Arity {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn no_matching_overload(name: impl Into<String>) -> Self {
        Self::NoMatchingOverload { name: name.into() }
    }

    pub fn ambiguous_overload(name: impl Into<String>, candidates: Vec<String>) -> Self {
        Self::AmbiguousOverload {
            name: name.into(),
            candidates,
        }
    }

    pub fn not_tracked(name: impl Into<String>) -> Self {
        Self::NotTracked { name: name.into() }
    }

    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler {
            message: message.into(),
        }
    }

    /// Returns true for errors that indicate a misconfigured class rather than a bad access.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

impl From<std::convert::Infallible> for MagicError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

/// Result type for magic operations.
pub type MagicResult<T> = Result<T, MagicError>;
