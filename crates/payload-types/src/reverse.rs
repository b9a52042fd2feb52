//! Reverse conversion: dynamic protobuf message → Payload.
//!
//! Renders a decoded message as a plain payload. By default 64-bit integers
//! become decimal strings, enums become their symbolic names and bytes become
//! base64 strings; see [`ConversionOptions`] for the alternatives.

use crate::options::{BytesFormat, ConversionOptions, EnumFormat, LongFormat};
use crate::Payload;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use protobuf::reflect::{ReflectValueRef, RuntimeFieldType, RuntimeType};
use protobuf::MessageDyn;
use serde_json::{Map, Number, Value};

/// Convert a decoded message to a plain payload.
///
/// Fields are emitted only when set, unless the options ask for defaults or
/// empty containers.
pub fn message_to_payload(message: &dyn MessageDyn, options: &ConversionOptions) -> Payload {
    let descriptor = message.descriptor_dyn();
    let mut payload = Payload::new();

    for field in descriptor.fields() {
        let key = if options.proto_names {
            field.name().to_string()
        } else {
            field.json_name().to_string()
        };

        match field.runtime_field_type() {
            RuntimeFieldType::Singular(runtime_type) => {
                if let Some(value) = field.get_singular(message) {
                    payload.insert(key, value_to_json(value, options));
                } else if options.defaults && field.containing_oneof().is_none() {
                    payload.insert(key, default_value(&runtime_type, options));
                }
            }
            RuntimeFieldType::Repeated(_) => {
                let repeated = field.get_repeated(message);
                if !repeated.is_empty() || options.emit_empty_arrays() {
                    let items = (0..repeated.len())
                        .map(|i| value_to_json(repeated.get(i), options))
                        .collect();
                    payload.insert(key, Value::Array(items));
                }
            }
            RuntimeFieldType::Map(..) => {
                let map = field.get_map(message);
                if !map.is_empty() || options.emit_empty_objects() {
                    let mut object = Map::new();
                    for (k, v) in &map {
                        object.insert(map_key(k, options), value_to_json(v, options));
                    }
                    payload.insert(key, Value::Object(object));
                }
            }
        }
    }

    payload
}

fn value_to_json(value: ReflectValueRef, options: &ConversionOptions) -> Value {
    match value {
        ReflectValueRef::U32(n) => Value::from(n),
        ReflectValueRef::I32(n) => Value::from(n),
        ReflectValueRef::U64(n) => match options.longs {
            LongFormat::String => Value::String(n.to_string()),
            LongFormat::Number => Value::from(n),
        },
        ReflectValueRef::I64(n) => match options.longs {
            LongFormat::String => Value::String(n.to_string()),
            LongFormat::Number => Value::from(n),
        },
        ReflectValueRef::F32(f) => float_to_json(f as f64),
        ReflectValueRef::F64(f) => float_to_json(f),
        ReflectValueRef::Bool(b) => Value::Bool(b),
        ReflectValueRef::String(s) => Value::String(s.to_string()),
        ReflectValueRef::Bytes(b) => bytes_to_json(b, options),
        ReflectValueRef::Enum(descriptor, number) => match options.enums {
            EnumFormat::String => descriptor
                .value_by_number(number)
                .map(|v| Value::String(v.name().to_string()))
                .unwrap_or_else(|| Value::from(number)),
            EnumFormat::Number => Value::from(number),
        },
        ReflectValueRef::Message(message) => Value::Object(message_to_payload(&*message, options)),
    }
}

/// Non-finite values have no JSON number form and render as their names.
fn float_to_json(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or_else(|| {
        let name = if f.is_nan() {
            "NaN"
        } else if f.is_sign_positive() {
            "Infinity"
        } else {
            "-Infinity"
        };
        Value::String(name.to_string())
    })
}

fn bytes_to_json(bytes: &[u8], options: &ConversionOptions) -> Value {
    match options.bytes {
        BytesFormat::Base64 => Value::String(STANDARD.encode(bytes)),
        BytesFormat::Array => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
    }
}

/// Object keys are the rendered key value, unquoted when it is a string.
fn map_key(key: ReflectValueRef, options: &ConversionOptions) -> String {
    match value_to_json(key, options) {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// The value an unset singular field renders as when defaults are requested.
fn default_value(runtime_type: &RuntimeType, options: &ConversionOptions) -> Value {
    match runtime_type {
        RuntimeType::I32 | RuntimeType::U32 => Value::from(0),
        RuntimeType::I64 | RuntimeType::U64 => match options.longs {
            LongFormat::String => Value::String("0".to_string()),
            LongFormat::Number => Value::from(0),
        },
        RuntimeType::F32 | RuntimeType::F64 => Value::from(0.0),
        RuntimeType::Bool => Value::Bool(false),
        RuntimeType::String => Value::String(String::new()),
        RuntimeType::VecU8 => bytes_to_json(&[], options),
        RuntimeType::Enum(descriptor) => {
            let first = descriptor.default_value();
            match options.enums {
                EnumFormat::String => Value::String(first.name().to_string()),
                EnumFormat::Number => Value::from(first.value()),
            }
        }
        RuntimeType::Message(_) => Value::Null,
    }
}
