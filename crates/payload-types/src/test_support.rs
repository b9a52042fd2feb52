//! Helpers for building message descriptors from inline `.proto` text.

use protobuf::reflect::{FileDescriptor, MessageDescriptor};
use std::io::Write;

/// Parse `content` as a single `.proto` file and return its dynamic descriptor.
pub(crate) fn file_from_string(content: &str) -> FileDescriptor {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("test.proto");
    let mut file = std::fs::File::create(&path).expect("Failed to create proto file");
    file.write_all(content.as_bytes())
        .expect("Failed to write proto file");

    let mut parser = protobuf_parse::Parser::new();
    parser.pure();
    parser.include(dir.path());
    parser.input(&path);
    let parsed = parser.parse_and_typecheck().expect("Failed to parse proto");

    FileDescriptor::new_dynamic_fds(parsed.file_descriptors, &[])
        .expect("Failed to build descriptors")
        .pop()
        .expect("No file descriptor produced")
}

/// Look up a top-level message by its full name in inline `.proto` text.
pub(crate) fn message_from_string(content: &str, full_name: &str) -> MessageDescriptor {
    file_from_string(content)
        .messages()
        .find(|m| m.full_name() == full_name)
        .unwrap_or_else(|| panic!("{full_name} not found"))
}

pub(crate) const SAMPLE_PROTO: &str = r#"
    syntax = "proto3";
    package sample.v1;

    enum Status {
        UNKNOWN = 0;
        ACTIVE = 1;
        INACTIVE = 2;
    }

    message Address {
        string street = 1;
        string city = 2;
    }

    message User {
        string name = 1;
        int32 age = 2;
        int64 balance = 3;
        uint64 visits = 4;
        double score = 5;
        float ratio = 6;
        bool active = 7;
        bytes avatar = 8;
        Status status = 9;
        Address address = 10;
        repeated string tags = 11;
        repeated Address previous = 12;
        map<string, int32> counters = 13;
        map<int64, string> labels = 14;
        oneof contact {
            string email = 15;
            string phone = 16;
        }
        optional string nickname = 17;
        uint32 rank = 18;
    }
"#;

pub(crate) const LEGACY_PROTO: &str = r#"
    syntax = "proto2";
    package legacy;

    message Record {
        required string id = 1;
        optional int32 version = 2;
    }
"#;
