use crate::error::{Error, Result};
use crate::proto::{LoadOptions, MessageType, SchemaPaths, SchemaRoot, TypeName};
use payload_types::Payload;
use protobuf::MessageDyn;
use tracing::{debug, warn};

/// Load the schema at `schema_paths` and encode `payload` as `type_name`.
///
/// The payload is verified against the message type first; a payload that
/// fails verification is rejected with [`Error::Validation`] and nothing is
/// encoded.
pub async fn load_and_encode_message(
    schema_paths: impl Into<SchemaPaths>,
    type_name: impl Into<TypeName>,
    payload: &Payload,
) -> Result<Vec<u8>> {
    load_and_encode_message_with(schema_paths, type_name, payload, &LoadOptions::default()).await
}

/// [`load_and_encode_message`] with explicit loader options.
pub async fn load_and_encode_message_with(
    schema_paths: impl Into<SchemaPaths>,
    type_name: impl Into<TypeName>,
    payload: &Payload,
    load_options: &LoadOptions,
) -> Result<Vec<u8>> {
    let type_name = type_name.into();
    let root = SchemaRoot::load(schema_paths, load_options).await?;
    let message_type = root.lookup_type(type_name)?;
    process_message(&message_type, payload)
}

/// Verify, create and serialize one message.
fn process_message(message_type: &MessageType, payload: &Payload) -> Result<Vec<u8>> {
    let message = verify_and_create_message(message_type, payload)?;
    let bytes = message_type.encode(&*message)?;
    debug!(
        "Encoded {} into {} bytes",
        message_type.full_name(),
        bytes.len()
    );
    Ok(bytes)
}

fn verify_and_create_message(
    message_type: &MessageType,
    payload: &Payload,
) -> Result<Box<dyn MessageDyn>> {
    if let Some(violation) = message_type.verify(payload) {
        warn!(
            "Payload rejected for {}: {}",
            message_type.full_name(),
            violation
        );
        return Err(Error::Validation(violation));
    }
    message_type.create(payload)
}
