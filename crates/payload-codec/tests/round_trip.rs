//! End-to-end tests for the encode and decode paths against .proto files on disk.

use proto_payload_codec::{
    decode_buffer, decode_buffer_with, load_and_encode_message, ConversionOptions, Error,
    LoadOptions, LongFormat, Payload,
};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const USER_PROTO: &str = r#"
syntax = "proto3";
package accounts.v1;

enum Role {
    ROLE_UNSPECIFIED = 0;
    ROLE_ADMIN = 1;
    ROLE_MEMBER = 2;
}

message Address {
    string street = 1;
    string city = 2;
}

message User {
    string id = 1;
    string name = 2;
    int32 age = 3;
    int64 account_balance = 4;
    bool active = 5;
    double score = 6;
    bytes avatar = 7;
    Role role = 8;
    Address address = 9;
    repeated string tags = 10;
    map<string, string> metadata = 11;
}
"#;

const ORDER_PROTO: &str = r#"
syntax = "proto2";
package shop;

message Order {
    required string order_id = 1;
    required uint32 quantity = 2;
    optional string note = 3;

    message Line {
        required string sku = 1;
        optional uint64 cents = 2;
    }
    repeated Line lines = 4;
}
"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn write_proto(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write proto file");
    path
}

fn payload(value: Value) -> Payload {
    value.as_object().cloned().expect("payload must be an object")
}

fn schema_dir() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let user = write_proto(dir.path(), "user.proto", USER_PROTO);
    let order = write_proto(dir.path(), "order.proto", ORDER_PROTO);
    (dir, user, order)
}

#[tokio::test]
async fn test_round_trip_with_documented_coercions() {
    init_tracing();
    let (_dir, user_proto, _) = schema_dir();

    let input = payload(json!({
        "id": "user_001",
        "name": "Alice Smith",
        "age": 30,
        "accountBalance": 9007199254740993i64,
        "active": true,
        "score": 95.5,
        "avatar": [104, 105],
        "role": 1,
        "address": {"street": "1 Main St", "city": "Springfield"},
        "tags": ["admin", "beta"],
        "metadata": {"plan": "pro"},
    }));

    let bytes = load_and_encode_message(&user_proto, "accounts.v1.User", &input)
        .await
        .expect("Failed to encode");
    let decoded = decode_buffer(&bytes, &user_proto, "accounts.v1.User")
        .await
        .expect("Failed to decode");

    assert_eq!(
        Value::Object(decoded),
        json!({
            "id": "user_001",
            "name": "Alice Smith",
            "age": 30,
            "accountBalance": "9007199254740993",
            "active": true,
            "score": 95.5,
            "avatar": "aGk=",
            "role": "ROLE_ADMIN",
            "address": {"street": "1 Main St", "city": "Springfield"},
            "tags": ["admin", "beta"],
            "metadata": {"plan": "pro"},
        })
    );
}

#[tokio::test]
async fn test_decoded_payload_encodes_back_identically() {
    let (_dir, user_proto, _) = schema_dir();

    let input = payload(json!({
        "name": "Bob",
        "accountBalance": "-12",
        "avatar": "AAEC",
        "role": "ROLE_MEMBER",
    }));

    let first = load_and_encode_message(&user_proto, "User", &input)
        .await
        .unwrap();
    let decoded = decode_buffer(&first, &user_proto, "User").await.unwrap();
    assert_eq!(Value::Object(decoded.clone()), Value::Object(input));

    let second = load_and_encode_message(&user_proto, "User", &decoded)
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_validation_gate() {
    let (_dir, user_proto, order_proto) = schema_dir();

    let missing_required = payload(json!({"quantity": 2}));
    let err = load_and_encode_message(&order_proto, "shop.Order", &missing_required)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(ref m) if m == "missing required 'orderId'"));

    let wrong_kind = payload(json!({"name": ["not", "a", "string"]}));
    let err = load_and_encode_message(&user_proto, "User", &wrong_kind)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(ref m) if m == "name: string expected"));

    let nested = payload(json!({
        "order_id": "o-1",
        "quantity": 1,
        "lines": [{"cents": 100}],
    }));
    let err = load_and_encode_message(&order_proto, "shop.Order", &nested)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "lines.missing required 'sku'");
}

#[tokio::test]
async fn test_nested_type_by_segments() {
    let (_dir, _, order_proto) = schema_dir();

    let line = payload(json!({"sku": "A-1", "cents": "250"}));
    let bytes = load_and_encode_message(&order_proto, ["shop", "Order", "Line"], &line)
        .await
        .unwrap();
    let decoded = decode_buffer(&bytes, &order_proto, "Order.Line")
        .await
        .unwrap();
    assert_eq!(Value::Object(decoded), json!({"sku": "A-1", "cents": "250"}));
}

#[tokio::test]
async fn test_unknown_type_fails_both_paths() {
    let (_dir, user_proto, _) = schema_dir();

    let err = load_and_encode_message(&user_proto, "Missing", &Payload::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TypeNotFound(ref name) if name == "Missing"));

    let err = decode_buffer(&[], &user_proto, "Missing").await.unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
    assert!(matches!(err.root(), Error::TypeNotFound(_)));
    assert_eq!(err.to_string(), "no such type: Missing");
}

#[tokio::test]
async fn test_schema_load_failures() {
    let err = load_and_encode_message("/no/such/schema.proto", "User", &Payload::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SchemaLoad(_)));

    let dir = tempfile::tempdir().unwrap();
    let broken = write_proto(dir.path(), "broken.proto", "syntax = \"proto3\"; message {");
    let err = decode_buffer(&[], &broken, "User").await.unwrap_err();
    assert!(matches!(err.root(), Error::SchemaLoad(_)));
}

#[tokio::test]
async fn test_malformed_buffer_is_a_decode_error() {
    let (_dir, user_proto, _) = schema_dir();

    // field 2 (name), length-delimited, length 5, only 2 bytes follow
    let err = decode_buffer(&[0x12, 0x05, b'h', b'i'], &user_proto, "User")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
    assert!(matches!(err.root(), Error::Codec(_)));
}

#[tokio::test]
async fn test_decode_with_options() {
    let (_dir, user_proto, _) = schema_dir();

    let bytes = load_and_encode_message(
        &user_proto,
        "User",
        &payload(json!({"accountBalance": 42})),
    )
    .await
    .unwrap();

    let options = ConversionOptions {
        longs: LongFormat::Number,
        arrays: true,
        ..Default::default()
    };
    let decoded = decode_buffer_with(
        &bytes,
        &user_proto,
        "User",
        &LoadOptions::default(),
        &options,
    )
    .await
    .unwrap();

    assert_eq!(decoded["accountBalance"], json!(42));
    assert_eq!(decoded["tags"], json!([]));
}

#[tokio::test]
async fn test_decoded_keys_follow_naming_option() {
    let (_dir, user_proto, _) = schema_dir();

    // proto-named input is accepted alongside JSON names
    let bytes = load_and_encode_message(
        &user_proto,
        "User",
        &payload(json!({"account_balance": 7, "name": "Dana"})),
    )
    .await
    .unwrap();

    let decoded = decode_buffer(&bytes, &user_proto, "User").await.unwrap();
    assert_eq!(
        Value::Object(decoded),
        json!({"name": "Dana", "accountBalance": "7"})
    );

    let options = ConversionOptions {
        proto_names: true,
        ..Default::default()
    };
    let decoded = decode_buffer_with(
        &bytes,
        &user_proto,
        "User",
        &LoadOptions::default(),
        &options,
    )
    .await
    .unwrap();
    assert_eq!(
        Value::Object(decoded),
        json!({"name": "Dana", "account_balance": "7"})
    );
}

#[tokio::test]
async fn test_multiple_schema_paths() {
    let (_dir, user_proto, order_proto) = schema_dir();
    let paths = vec![user_proto, order_proto];

    let order = payload(json!({"orderId": "o-9", "quantity": 3}));
    let bytes = load_and_encode_message(paths.clone(), "shop.Order", &order)
        .await
        .unwrap();
    let decoded = decode_buffer(&bytes, paths, "shop.Order").await.unwrap();
    assert_eq!(Value::Object(decoded), json!({"orderId": "o-9", "quantity": 3}));
}

#[tokio::test]
async fn test_payload_is_not_mutated() {
    let (_dir, user_proto, _) = schema_dir();
    let input = payload(json!({"name": "Carol", "unknown": {"nested": [1]}}));
    let snapshot = input.clone();

    load_and_encode_message(&user_proto, "User", &input)
        .await
        .unwrap();
    assert_eq!(input, snapshot);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_match_sequential() {
    let (dir, user_proto, order_proto) = schema_dir();

    let jobs: Vec<(PathBuf, &'static str, Payload)> = (0..16)
        .map(|i| {
            if i % 2 == 0 {
                (
                    user_proto.clone(),
                    "accounts.v1.User",
                    payload(json!({"id": format!("user_{i}"), "age": i})),
                )
            } else {
                (
                    order_proto.clone(),
                    "shop.Order",
                    payload(json!({"order_id": format!("order_{i}"), "quantity": i})),
                )
            }
        })
        .collect();

    let mut sequential = Vec::new();
    for (path, type_name, input) in &jobs {
        let bytes = load_and_encode_message(path, *type_name, input)
            .await
            .unwrap();
        let decoded = decode_buffer(&bytes, path, *type_name).await.unwrap();
        sequential.push((bytes, decoded));
    }

    let handles: Vec<_> = jobs
        .into_iter()
        .map(|(path, type_name, input)| {
            tokio::spawn(async move {
                let bytes = load_and_encode_message(&path, type_name, &input)
                    .await
                    .unwrap();
                let decoded = decode_buffer(&bytes, &path, type_name).await.unwrap();
                (bytes, decoded)
            })
        })
        .collect();

    let mut concurrent = Vec::new();
    for handle in handles {
        concurrent.push(handle.await.expect("task panicked"));
    }

    assert_eq!(concurrent, sequential);
    drop(dir);
}
