//! Error types for payload-types crate.

use thiserror::Error;

/// Errors that can occur during payload conversion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadTypesError {
    /// The payload does not match the message type's shape.
    ///
    /// The message follows the `field: <kind> expected` convention.
    #[error("{0}")]
    Verification(String),

    #[error("Type conversion error: {0}")]
    TypeConversion(String),
}

/// Result type alias for payload-types operations.
pub type Result<T> = std::result::Result<T, PayloadTypesError>;
