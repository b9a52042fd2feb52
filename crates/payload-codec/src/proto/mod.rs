//! Protobuf schema loading and type resolution.
//!
//! This module provides:
//! - Schema parsing from .proto files at runtime (no code generation)
//! - Message type lookup by dotted name or name segments
//! - The per-type verify / create / encode / decode / to-object operations
//!
//! Payload conversion itself lives in payload-types.

pub mod message_type;
pub mod names;
pub mod parser;

pub use message_type::MessageType;
pub use names::{SchemaPaths, TypeName};
pub use parser::{LoadOptions, SchemaRoot};
