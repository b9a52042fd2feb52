use crate::error::{Error, Result};
use crate::proto::{LoadOptions, SchemaPaths, SchemaRoot, TypeName};
use payload_types::{ConversionOptions, Payload};
use tracing::debug;

/// Decode `buffer` as `type_name` from the schema at `schema_paths`.
///
/// 64-bit integers render as decimal strings, enums as their names and bytes
/// as base64 strings. Any failure (schema, lookup or wire format) is reported
/// as [`Error::Decode`] wrapping the original error.
pub async fn decode_buffer(
    buffer: &[u8],
    schema_paths: impl Into<SchemaPaths>,
    type_name: impl Into<TypeName>,
) -> Result<Payload> {
    decode_buffer_with(
        buffer,
        schema_paths,
        type_name,
        &LoadOptions::default(),
        &ConversionOptions::default(),
    )
    .await
}

/// [`decode_buffer`] with explicit loader and conversion options.
pub async fn decode_buffer_with(
    buffer: &[u8],
    schema_paths: impl Into<SchemaPaths>,
    type_name: impl Into<TypeName>,
    load_options: &LoadOptions,
    conversion: &ConversionOptions,
) -> Result<Payload> {
    let schema_paths = schema_paths.into();
    let type_name = type_name.into();
    decode_message(buffer, schema_paths, type_name, load_options, conversion)
        .await
        .map_err(|e| Error::Decode(Box::new(e)))
}

async fn decode_message(
    buffer: &[u8],
    schema_paths: SchemaPaths,
    type_name: TypeName,
    load_options: &LoadOptions,
    conversion: &ConversionOptions,
) -> Result<Payload> {
    let root = SchemaRoot::load(schema_paths, load_options).await?;
    let message_type = root.lookup_type(type_name)?;
    let message = message_type.decode(buffer)?;
    debug!(
        "Decoded {} bytes as {}",
        buffer.len(),
        message_type.full_name()
    );
    Ok(message_type.to_object(&*message, conversion))
}
