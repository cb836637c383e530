//! Coercion error types.

use magic_core::MagicError;
use thiserror::Error;

/// Errors raised while coercing a value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CastError {
    /// The value has no sensible form in the requested type.
    #[error("Value cannot convert to {type_name} type: {message}")]
    InvalidValue { type_name: String, message: String },

    /// The converted value violates the type's range.
    #[error("Value {value} is outside the valid range for type {type_name}")]
    OutOfRange { type_name: String, value: String },

    /// No caster supports the type.
    #[error("Unsupported type: '{0}'")]
    UnsupportedType(String),
}

impl CastError {
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
}

impl From<CastError> for MagicError {
    fn from(err: CastError) -> Self {
        match err {
            CastError::InvalidValue { type_name, message } => {
                MagicError::invalid_value(type_name, message)
            }
            CastError::OutOfRange { type_name, value } => MagicError::out_of_range(type_name, value),
            CastError::UnsupportedType(type_name) => {
                MagicError::invalid_value(type_name, "unsupported type")
            }
        }
    }
}

/// Result type for coercion.
pub type CastResult<T> = Result<T, CastError>;
