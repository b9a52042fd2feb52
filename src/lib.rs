//! proto-payload Library
//!
//! Command implementations behind the `proto-payload` CLI. The CLI is a thin
//! caller of `proto_payload_codec` (encode / decode) and `payload_types`
//! (extraction); all configuration arrives through the option structs below.
//!
//! # CLI Usage
//!
//! ```bash
//! # Encode a JSON payload
//! proto-payload encode --proto user.proto --type accounts.v1.User --input user.json --output user.bin
//!
//! # Decode it back, rendering 64-bit integers as numbers
//! proto-payload decode --proto user.proto --type accounts.v1.User --input user.bin --longs number
//!
//! # Extract a nested structure
//! echo '{"x": [1, {"y": 2}]}' | proto-payload extract
//! ```

use anyhow::Context;
use clap::{Parser, ValueEnum};
use payload_types::{BytesFormat, ConversionOptions, EnumFormat, LongFormat, Payload};
use proto_payload_codec::{LoadOptions, SchemaPaths, SchemaRoot};
use serde_json::Value;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Clone, Debug)]
pub struct SchemaOpts {
    /// Path(s) to the .proto schema file(s)
    #[arg(
        long = "proto",
        env = "PROTO_PAYLOAD_PROTO",
        value_delimiter = ',',
        required = true
    )]
    pub proto: Vec<PathBuf>,

    /// Extra directories searched for imported .proto files
    #[arg(long = "include", env = "PROTO_PAYLOAD_INCLUDE", value_delimiter = ',')]
    pub include: Vec<PathBuf>,
}

impl SchemaOpts {
    pub fn schema_paths(&self) -> SchemaPaths {
        SchemaPaths::from(self.proto.clone())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            include_paths: self.include.clone(),
        }
    }
}

#[derive(Parser, Clone, Debug)]
pub struct TypeOpts {
    /// Message type name (e.g. "mypackage.MyMessage" or "MyMessage")
    #[arg(long = "type", env = "PROTO_PAYLOAD_TYPE")]
    pub type_name: String,
}

#[derive(Parser, Clone, Debug)]
pub struct IoOpts {
    /// Input file ("-" for stdin)
    #[arg(long, default_value = "-")]
    pub input: PathBuf,

    /// Output file ("-" for stdout)
    #[arg(long, default_value = "-")]
    pub output: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LongsArg {
    String,
    Number,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnumsArg {
    String,
    Number,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BytesArg {
    Base64,
    Array,
}

#[derive(Parser, Clone, Debug)]
pub struct ConversionOpts {
    /// How 64-bit integer fields are rendered
    #[arg(long, value_enum, default_value = "string")]
    pub longs: LongsArg,

    /// How enum fields are rendered
    #[arg(long, value_enum, default_value = "string")]
    pub enums: EnumsArg,

    /// How bytes fields are rendered
    #[arg(long, value_enum, default_value = "base64")]
    pub bytes: BytesArg,

    /// Include default values for unset fields
    #[arg(long)]
    pub defaults: bool,

    /// Include empty arrays for unset repeated fields
    #[arg(long)]
    pub arrays: bool,

    /// Include empty objects for unset map fields
    #[arg(long)]
    pub objects: bool,

    /// Key fields by their proto names instead of lowerCamelCase JSON names
    #[arg(long)]
    pub proto_names: bool,
}

impl From<&ConversionOpts> for ConversionOptions {
    fn from(opts: &ConversionOpts) -> Self {
        Self {
            longs: match opts.longs {
                LongsArg::String => LongFormat::String,
                LongsArg::Number => LongFormat::Number,
            },
            enums: match opts.enums {
                EnumsArg::String => EnumFormat::String,
                EnumsArg::Number => EnumFormat::Number,
            },
            bytes: match opts.bytes {
                BytesArg::Base64 => BytesFormat::Base64,
                BytesArg::Array => BytesFormat::Array,
            },
            defaults: opts.defaults,
            arrays: opts.arrays,
            objects: opts.objects,
            proto_names: opts.proto_names,
        }
    }
}

/// Read a JSON payload from `input` and write its encoding to `output`
pub async fn run_encode(schema: &SchemaOpts, ty: &TypeOpts, io: &IoOpts) -> anyhow::Result<()> {
    let raw = read_input(&io.input)?;
    let payload = parse_payload(&raw)?;

    let bytes = proto_payload_codec::load_and_encode_message_with(
        schema.schema_paths(),
        ty.type_name.as_str(),
        &payload,
        &schema.load_options(),
    )
    .await
    .with_context(|| format!("Failed to encode payload as {}", ty.type_name))?;

    info!("Encoded {} as {} bytes", ty.type_name, bytes.len());
    write_output(&io.output, &bytes)
}

/// Read a wire buffer from `input` and write the decoded payload as JSON to `output`
pub async fn run_decode(
    schema: &SchemaOpts,
    ty: &TypeOpts,
    io: &IoOpts,
    conversion: &ConversionOpts,
) -> anyhow::Result<()> {
    let buffer = read_input(&io.input)?;

    let payload = proto_payload_codec::decode_buffer_with(
        &buffer,
        schema.schema_paths(),
        ty.type_name.as_str(),
        &schema.load_options(),
        &ConversionOptions::from(conversion),
    )
    .await
    .with_context(|| format!("Failed to decode buffer as {}", ty.type_name))?;

    write_json(&io.output, &Value::Object(payload))
}

/// Read any JSON value from `input` and write its extraction to `output`
pub fn run_extract(io: &IoOpts) -> anyhow::Result<()> {
    let raw = read_input(&io.input)?;
    let value: Value = serde_json::from_slice(&raw).context("Input is not valid JSON")?;
    let extracted = payload_types::extract_data(&value);
    write_json(&io.output, &Value::Object(extracted))
}

/// List every message type in the schema, one full name per line
pub async fn run_list_types(schema: &SchemaOpts) -> anyhow::Result<Vec<String>> {
    let root = SchemaRoot::load(schema.schema_paths(), &schema.load_options())
        .await
        .context("Failed to load schema")?;
    Ok(root.list_types())
}

fn parse_payload(raw: &[u8]) -> anyhow::Result<Payload> {
    let value: Value = serde_json::from_slice(raw).context("Payload is not valid JSON")?;
    match value {
        Value::Object(payload) => Ok(payload),
        other => anyhow::bail!("Payload must be a JSON object, got {other}"),
    }
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if path.as_os_str() == "-" {
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read stdin")?;
    } else {
        buf = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
    }
    Ok(buf)
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if path.as_os_str() == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(bytes).context("Failed to write stdout")?;
        stdout.flush().context("Failed to flush stdout")?;
    } else {
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

fn write_json(path: &Path, value: &Value) -> anyhow::Result<()> {
    let mut rendered = serde_json::to_vec_pretty(value)?;
    rendered.push(b'\n');
    write_output(path, &rendered)
}
