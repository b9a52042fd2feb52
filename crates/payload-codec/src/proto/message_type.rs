//! A resolved message type and the operations it supports.

use crate::error::{Error, Result};
use payload_types::{create_message, message_to_payload, verify_payload};
use payload_types::{ConversionOptions, Payload};
use protobuf::reflect::MessageDescriptor;
use protobuf::MessageDyn;

/// A message type resolved from a [`SchemaRoot`](crate::SchemaRoot).
///
/// Wraps the runtime descriptor and exposes the verify / create / encode /
/// decode / to-object operations the encoder and decoder are built from.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageType {
    descriptor: MessageDescriptor,
}

impl MessageType {
    pub(crate) fn new(descriptor: MessageDescriptor) -> Self {
        Self { descriptor }
    }

    /// Fully qualified name (e.g., "mypackage.MyMessage")
    pub fn full_name(&self) -> &str {
        self.descriptor.full_name()
    }

    pub fn descriptor(&self) -> &MessageDescriptor {
        &self.descriptor
    }

    /// Field names in definition order
    pub fn field_names(&self) -> Vec<String> {
        self.descriptor
            .fields()
            .map(|f| f.name().to_string())
            .collect()
    }

    /// Check `payload` against this type's fields.
    ///
    /// Returns the first violation, or `None` when the payload is valid.
    pub fn verify(&self, payload: &Payload) -> Option<String> {
        verify_payload(&self.descriptor, payload)
    }

    /// Build a message instance from a payload.
    pub fn create(&self, payload: &Payload) -> Result<Box<dyn MessageDyn>> {
        Ok(create_message(&self.descriptor, payload)?)
    }

    /// Serialize a message instance of this type.
    pub fn encode(&self, message: &dyn MessageDyn) -> Result<Vec<u8>> {
        let actual = message.descriptor_dyn();
        if actual != self.descriptor {
            return Err(Error::Codec(format!(
                "Cannot encode {} as {}",
                actual.full_name(),
                self.full_name()
            )));
        }
        message
            .write_to_bytes_dyn()
            .map_err(|e| Error::Codec(e.to_string()))
    }

    /// Parse a wire buffer as this type.
    pub fn decode(&self, buffer: &[u8]) -> Result<Box<dyn MessageDyn>> {
        self.descriptor
            .parse_from_bytes(buffer)
            .map_err(|e| Error::Codec(e.to_string()))
    }

    /// Render a decoded message as a plain payload.
    pub fn to_object(&self, message: &dyn MessageDyn, options: &ConversionOptions) -> Payload {
        message_to_payload(message, options)
    }
}
