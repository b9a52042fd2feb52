//! Payload conversion library for proto-payload.
//!
//! This crate provides bidirectional conversion between plain payloads (open
//! JSON-like maps) and dynamic protobuf messages described at runtime, plus the
//! extraction utility that rebuilds nested structures without shared containers.
//!
//! # Architecture
//!
//! ```text
//! Forward (Encoder):  Payload → verify → dynamic message → encoded bytes
//! Reverse (Decoder):  encoded bytes → dynamic message → Payload
//! ```
//!
//! # Modules
//!
//! - [`forward`] - Payload → dynamic message (verify and create)
//! - [`reverse`] - dynamic message → Payload (to-object conversion)
//! - [`extract`] - reference-independent copy of nested values
//! - [`options`] - to-object conversion options
//! - [`error`] - Error types for conversion operations
//!
//! # Examples
//!
//! ```ignore
//! use payload_types::{create_message, verify_payload, message_to_payload, ConversionOptions};
//!
//! if let Some(violation) = verify_payload(&descriptor, &payload) {
//!     return Err(violation);
//! }
//! let message = create_message(&descriptor, &payload)?;
//! let plain = message_to_payload(&*message, &ConversionOptions::default());
//! ```

pub mod error;
pub mod extract;
pub mod forward;
pub mod options;
pub mod reverse;

#[cfg(test)]
pub(crate) mod test_support;

/// A plain, dynamically keyed message representation.
///
/// Keys are protobuf field names; values are checked against the message
/// type's field descriptors only at runtime.
pub type Payload = serde_json::Map<String, serde_json::Value>;

// Re-export main types for convenient access
pub use error::{PayloadTypesError, Result};
pub use extract::extract_data;
pub use forward::{create_message, verify_payload};
pub use options::{BytesFormat, ConversionOptions, EnumFormat, LongFormat};
pub use reverse::message_to_payload;
