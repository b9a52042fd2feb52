//! Options controlling how decoded messages are rendered as payloads.

/// How 64-bit integer fields are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LongFormat {
    /// Decimal string, so values beyond 2^53 survive JSON consumers.
    #[default]
    String,
    /// JSON number.
    Number,
}

/// How enum fields are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumFormat {
    /// Symbolic value name. Numbers without a defined name stay numeric.
    #[default]
    String,
    /// Numeric value.
    Number,
}

/// How bytes fields are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BytesFormat {
    /// Standard base64 with padding.
    #[default]
    Base64,
    /// Array of octets.
    Array,
}

/// Conversion options for message → payload rendering.
///
/// The defaults render longs, enums and bytes as strings, key fields by their
/// lowerCamelCase JSON names and omit unset fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversionOptions {
    pub longs: LongFormat,
    pub enums: EnumFormat,
    pub bytes: BytesFormat,
    /// Emit default values for unset singular fields (oneof members excluded),
    /// empty arrays for repeated fields and empty objects for map fields.
    pub defaults: bool,
    /// Emit empty arrays for unset repeated fields.
    pub arrays: bool,
    /// Emit empty objects for unset map fields.
    pub objects: bool,
    /// Key fields by their proto name (`created_at`) instead of the
    /// lowerCamelCase JSON name (`createdAt`).
    pub proto_names: bool,
}

impl ConversionOptions {
    /// Whether an empty repeated field should still be emitted.
    pub fn emit_empty_arrays(&self) -> bool {
        self.arrays || self.defaults
    }

    /// Whether an empty map field should still be emitted.
    pub fn emit_empty_objects(&self) -> bool {
        self.objects || self.defaults
    }
}
