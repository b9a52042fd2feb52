//! Protobuf payload codec for `proto-payload`: encode plain payloads to protobuf
//! bytes and decode protobuf bytes back into plain payloads, against `.proto`
//! schemas parsed at runtime.
//!
//! Features:
//!
//! - Runtime Protobuf Support: Parse `.proto` files at runtime and encode/decode messages without code generation
//! - Verification: Payloads are checked against the message type before anything is encoded
//! - Plain Payloads: Decoded messages are rendered as JSON-like maps (longs, enums and bytes as strings)
//!
//! Every call loads its schema fresh; nothing is cached between calls.
//!
//! ```rust,no_run
//! use proto_payload_codec::{decode_buffer, load_and_encode_message};
//! use serde_json::json;
//!
//! # async fn run() -> proto_payload_codec::Result<()> {
//! let payload = json!({"name": "Alice", "age": 30});
//! let payload = payload.as_object().cloned().unwrap_or_default();
//!
//! let bytes = load_and_encode_message("user.proto", "User", &payload).await?;
//! let decoded = decode_buffer(&bytes, "user.proto", "User").await?;
//! assert_eq!(decoded["name"], "Alice");
//! # Ok(())
//! # }
//! ```

/// Decode path: bytes → plain payload
pub mod decode;

/// Encode path: plain payload → verified message → bytes
pub mod encode;
pub mod error;
pub mod proto;

// Re-export main types for easy access
pub use decode::{decode_buffer, decode_buffer_with};
pub use encode::{load_and_encode_message, load_and_encode_message_with};
pub use error::{Error, Result};
pub use proto::{LoadOptions, MessageType, SchemaPaths, SchemaRoot, TypeName};

// Re-export from payload-types for convenience
pub use payload_types::{
    extract_data, BytesFormat, ConversionOptions, EnumFormat, LongFormat, Payload,
};
