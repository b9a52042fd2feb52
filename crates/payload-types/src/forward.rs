//! Forward conversion: Payload → dynamic protobuf message.
//!
//! Verification and creation share one walk over the message descriptor, so a
//! payload that verifies is exactly a payload that can be created. Violations
//! are reported as `field: <kind> expected`, prefixed with the dotted path of
//! enclosing message fields. Fields are named by their lowerCamelCase JSON name.

use crate::error::{PayloadTypesError, Result};
use crate::Payload;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use protobuf::reflect::{
    EnumDescriptor, FieldDescriptor, MessageDescriptor, ReflectValueBox, RuntimeFieldType,
    RuntimeType,
};
use protobuf::MessageDyn;
use serde_json::Value;
use tracing::debug;

/// Verify `payload` against the message type.
///
/// Returns the first violation found, or `None` if the payload is valid.
pub fn verify_payload(descriptor: &MessageDescriptor, payload: &Payload) -> Option<String> {
    build_message(descriptor, payload).err()
}

/// Create a dynamic message instance from `payload`.
///
/// Callers are expected to have verified the payload first; a violation found
/// here is reported as a type conversion error.
pub fn create_message(
    descriptor: &MessageDescriptor,
    payload: &Payload,
) -> Result<Box<dyn MessageDyn>> {
    build_message(descriptor, payload).map_err(PayloadTypesError::TypeConversion)
}

/// Why a single value could not be converted.
enum ValueError {
    /// The value is not of the expected kind (`"integer"`, `"string"`, ...).
    Expected(&'static str),
    /// A nested message rejected its payload with this message.
    Nested(String),
}

impl ValueError {
    fn describe(self, field: &str, expected: impl FnOnce(&str) -> String) -> String {
        match self {
            ValueError::Expected(kind) => format!("{field}: {}", expected(kind)),
            ValueError::Nested(message) => format!("{field}.{message}"),
        }
    }
}

fn build_message(
    descriptor: &MessageDescriptor,
    payload: &Payload,
) -> std::result::Result<Box<dyn MessageDyn>, String> {
    check_oneofs(descriptor, payload)?;

    let mut message = descriptor.new_instance();

    for field in descriptor.fields() {
        let name = field.json_name();
        let Some(value) = payload_value(payload, &field) else {
            if field.is_required() {
                return Err(format!("missing required '{name}'"));
            }
            continue;
        };

        match field.runtime_field_type() {
            RuntimeFieldType::Singular(runtime_type) => {
                let converted = convert_value(&runtime_type, value)
                    .map_err(|e| e.describe(name, |kind| format!("{kind} expected")))?;
                field.set_singular_field(&mut *message, converted);
            }
            RuntimeFieldType::Repeated(runtime_type) => {
                let Value::Array(items) = value else {
                    return Err(format!("{name}: array expected"));
                };
                let converted = items
                    .iter()
                    .map(|item| convert_value(&runtime_type, item))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| e.describe(name, |kind| format!("{kind}[] expected")))?;
                let mut repeated = field.mut_repeated(&mut *message);
                for item in converted {
                    repeated.push(item);
                }
            }
            RuntimeFieldType::Map(key_type, value_type) => {
                let Value::Object(entries) = value else {
                    return Err(format!("{name}: object expected"));
                };
                let key_name = runtime_type_name(&key_type);
                let mut converted = Vec::with_capacity(entries.len());
                for (key, entry) in entries {
                    let key_box = convert_map_key(&key_type, key).ok_or_else(|| {
                        let kind = kind_name(&key_type);
                        format!("{name}: {kind} key{{k:{key_name}}} expected")
                    })?;
                    let value_box = convert_value(&value_type, entry).map_err(|e| {
                        e.describe(name, |kind| format!("{kind}{{k:{key_name}}} expected"))
                    })?;
                    converted.push((key_box, value_box));
                }
                let mut map = field.mut_map(&mut *message);
                for (key, entry) in converted {
                    map.insert(key, entry);
                }
            }
        }
    }

    for key in payload.keys() {
        if descriptor.field_by_name(key).is_none()
            && !descriptor.fields().any(|f| f.json_name() == key)
        {
            debug!(
                "Ignoring payload key '{}' not declared in {}",
                key,
                descriptor.full_name()
            );
        }
    }

    Ok(message)
}

/// Find the payload value for `field`, by JSON name first and proto name second.
///
/// `null` is treated the same as an absent key.
fn payload_value<'a>(payload: &'a Payload, field: &FieldDescriptor) -> Option<&'a Value> {
    payload
        .get(field.json_name())
        .or_else(|| payload.get(field.name()))
        .filter(|value| !value.is_null())
}

fn check_oneofs(
    descriptor: &MessageDescriptor,
    payload: &Payload,
) -> std::result::Result<(), String> {
    for oneof in descriptor.oneofs() {
        if oneof.is_synthetic() {
            continue;
        }
        let set = oneof
            .fields()
            .filter(|field| payload_value(payload, field).is_some())
            .count();
        if set > 1 {
            return Err(format!("{}: multiple values", oneof.name()));
        }
    }
    Ok(())
}

fn convert_value(
    runtime_type: &RuntimeType,
    value: &Value,
) -> std::result::Result<ReflectValueBox, ValueError> {
    let expected = ValueError::Expected(kind_name(runtime_type));
    let converted = match runtime_type {
        RuntimeType::I32 => integer(value)
            .and_then(|n| i32::try_from(n).ok())
            .map(ReflectValueBox::I32),
        RuntimeType::U32 => integer(value)
            .and_then(|n| u32::try_from(n).ok())
            .map(ReflectValueBox::U32),
        RuntimeType::I64 => long(value).map(ReflectValueBox::I64),
        RuntimeType::U64 => unsigned_long(value).map(ReflectValueBox::U64),
        RuntimeType::F32 => float(value).map(|f| ReflectValueBox::F32(f as f32)),
        RuntimeType::F64 => float(value).map(ReflectValueBox::F64),
        RuntimeType::Bool => value.as_bool().map(ReflectValueBox::Bool),
        RuntimeType::String => value
            .as_str()
            .map(|s| ReflectValueBox::String(s.to_string())),
        RuntimeType::VecU8 => bytes(value).map(ReflectValueBox::Bytes),
        RuntimeType::Enum(enum_descriptor) => enum_number(enum_descriptor, value)
            .map(|n| ReflectValueBox::Enum(enum_descriptor.clone(), n)),
        RuntimeType::Message(message_descriptor) => {
            let Value::Object(fields) = value else {
                return Err(ValueError::Nested("object expected".to_string()));
            };
            return build_message(message_descriptor, fields)
                .map(ReflectValueBox::Message)
                .map_err(ValueError::Nested);
        }
    };
    converted.ok_or(expected)
}

fn convert_map_key(key_type: &RuntimeType, key: &str) -> Option<ReflectValueBox> {
    match key_type {
        RuntimeType::I32 => key.parse().ok().map(ReflectValueBox::I32),
        RuntimeType::U32 => key.parse().ok().map(ReflectValueBox::U32),
        RuntimeType::I64 => key.parse().ok().map(ReflectValueBox::I64),
        RuntimeType::U64 => key.parse().ok().map(ReflectValueBox::U64),
        RuntimeType::Bool => key.parse().ok().map(ReflectValueBox::Bool),
        RuntimeType::String => Some(ReflectValueBox::String(key.to_string())),
        _ => None,
    }
}

/// An integral JSON number. Floats with no fractional part count as integers.
fn integer(value: &Value) -> Option<i64> {
    let number = value.as_number()?;
    if let Some(n) = number.as_i64() {
        return Some(n);
    }
    let f = number.as_f64()?;
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}

/// A signed 64-bit integer given as a JSON number or a decimal string.
fn long(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        _ => integer(value),
    }
}

/// An unsigned 64-bit integer given as a JSON number or a decimal string.
fn unsigned_long(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n
            .as_u64()
            .or_else(|| integer(value).and_then(|i| u64::try_from(i).ok())),
        _ => None,
    }
}

fn float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => match s.as_str() {
            "NaN" => Some(f64::NAN),
            "Infinity" => Some(f64::INFINITY),
            "-Infinity" => Some(f64::NEG_INFINITY),
            _ => None,
        },
        _ => None,
    }
}

/// Bytes given as a base64 string or as an array of octets.
fn bytes(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::String(s) => STANDARD.decode(s).ok(),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
            .collect(),
        _ => None,
    }
}

/// An enum value given as a defined number or a defined symbolic name.
fn enum_number(descriptor: &EnumDescriptor, value: &Value) -> Option<i32> {
    match value {
        Value::String(name) => descriptor.value_by_name(name).map(|v| v.value()),
        Value::Number(_) => {
            let number = integer(value).and_then(|n| i32::try_from(n).ok())?;
            descriptor.value_by_number(number).map(|v| v.value())
        }
        _ => None,
    }
}

fn kind_name(runtime_type: &RuntimeType) -> &'static str {
    match runtime_type {
        RuntimeType::I32 | RuntimeType::U32 => "integer",
        RuntimeType::I64 | RuntimeType::U64 => "integer|Long",
        RuntimeType::F32 | RuntimeType::F64 => "number",
        RuntimeType::Bool => "boolean",
        RuntimeType::String => "string",
        RuntimeType::VecU8 => "buffer",
        RuntimeType::Enum(_) => "enum value",
        RuntimeType::Message(_) => "object",
    }
}

fn runtime_type_name(runtime_type: &RuntimeType) -> &'static str {
    match runtime_type {
        RuntimeType::I32 => "int32",
        RuntimeType::U32 => "uint32",
        RuntimeType::I64 => "int64",
        RuntimeType::U64 => "uint64",
        RuntimeType::F32 => "float",
        RuntimeType::F64 => "double",
        RuntimeType::Bool => "bool",
        RuntimeType::String => "string",
        RuntimeType::VecU8 => "bytes",
        RuntimeType::Enum(_) => "enum",
        RuntimeType::Message(_) => "message",
    }
}
