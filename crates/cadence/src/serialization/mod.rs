// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Self-describing tagged serialization.
//!
//! A payload is a flat sequence of records, one per visited field:
//!
//! ```text
//! record := tag (u32 LE) | kind (u8) | value
//! ```
//!
//! `tag` is the CRC32 of the field name ([`FieldTag`]), `kind` a [`WireKind`].
//! Nested composites are records whose value is another record stream. There
//! is no field count and no schema on the wire: a reader that knows the type
//! looks fields up by tag, and a reader that does not can still list them via
//! [`Deserializer::raw_fields`].

mod cursor;
mod deserializer;
mod factory;
mod field_tag;
mod payload;
mod serializer;
mod wire;

pub use cursor::{Cursor, CursorMut};
pub use deserializer::{Deserializer, FromRecord, RawField, Record, MAX_NESTING_DEPTH};
pub use factory::{SerializationFactory, WireFormat};
pub use field_tag::{crc32, FieldTag};
pub use payload::{Deserializable, Payload};
pub use serializer::Serializer;
pub use wire::WireKind;

use thiserror::Error;

/// Serialization and envelope errors.
#[derive(Debug, Error)]
pub enum SerError {
    #[error("truncated at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("unknown wire kind 0x{kind:02x} at offset {offset}")]
    UnknownKind { offset: usize, kind: u8 },

    #[error("field with tag 0x{tag:08x} is not valid UTF-8")]
    InvalidUtf8 { tag: u32 },

    #[error("field with tag 0x{tag:08x} holds invalid char 0x{value:x}")]
    InvalidChar { tag: u32, value: u32 },

    #[error("field with tag 0x{tag:08x}: expected {expected}, found {found}")]
    TypeMismatch {
        tag: u32,
        expected: WireKind,
        found: WireKind,
    },

    #[error("field with tag 0x{tag:08x} not present")]
    MissingField { tag: u32 },

    #[error("type {type_name}: fields '{first}' and '{second}' share tag 0x{tag:08x}")]
    TagCollision {
        type_name: &'static str,
        first: &'static str,
        second: &'static str,
        tag: u32,
    },

    #[error("type {type_name}: field '{name}' declared twice")]
    DuplicateField {
        type_name: &'static str,
        name: &'static str,
    },

    #[error("container holds type {found}, expected {expected}")]
    PayloadTypeMismatch { expected: u32, found: u32 },

    #[error("bad container magic 0x{found:04x}")]
    BadMagic { found: u16 },

    #[error("unsupported wire format {0}")]
    UnsupportedFormat(u8),

    #[error("length {length} does not fit a u32 prefix")]
    LengthOverflow { length: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
