// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tagged record stream reader.
//!
//! The whole stream is indexed up front: every record boundary is validated
//! before the first lookup, so a truncated or corrupt buffer fails once with
//! a [`SerError`] instead of half-way through a decode. Lookups are by tag, so
//! field order on the wire does not matter and unknown tags are ignored.

use super::cursor::Cursor;
use super::{Deserializable, FieldTag, SerError, WireKind};
use crate::reflection::{hex, FieldInfo};

/// Deepest composite level rendered field by field by [`Record::render`].
pub const MAX_NESTING_DEPTH: usize = 64;

/// One record of the stream, value bytes still encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub tag: FieldTag,
    pub kind: WireKind,
    /// Offset of the record header in the stream.
    pub offset: usize,
    /// Fixed-width value bytes, or the content behind a length prefix.
    pub value: &'a [u8],
}

impl<'a> Record<'a> {
    /// Decode the value as `T`, checking the wire kind first.
    pub fn decode<T: FromRecord<'a>>(&self) -> Result<T, SerError> {
        if self.kind != T::KIND {
            return Err(SerError::TypeMismatch {
                tag: self.tag.value(),
                expected: T::KIND,
                found: self.kind,
            });
        }
        T::from_record(self)
    }

    /// Human-readable rendering of the value without any type knowledge.
    ///
    /// Composites nested deeper than [`MAX_NESTING_DEPTH`] render as hex.
    pub fn render(&self) -> String {
        self.render_at(0)
    }

    fn render_at(&self, depth: usize) -> String {
        macro_rules! show {
            ($type:ty) => {
                match self.decode::<$type>() {
                    Ok(v) => v.to_string(),
                    Err(_) => hex(self.value),
                }
            };
        }
        match self.kind {
            WireKind::Bool => show!(bool),
            WireKind::U8 => show!(u8),
            WireKind::I8 => show!(i8),
            WireKind::U16 => show!(u16),
            WireKind::I16 => show!(i16),
            WireKind::U32 => show!(u32),
            WireKind::I32 => show!(i32),
            WireKind::U64 => show!(u64),
            WireKind::I64 => show!(i64),
            WireKind::F32 => show!(f32),
            WireKind::F64 => show!(f64),
            WireKind::Char => show!(char),
            WireKind::String => String::from_utf8_lossy(self.value).into_owned(),
            WireKind::Bytes => hex(self.value),
            WireKind::Composite if depth >= MAX_NESTING_DEPTH => hex(self.value),
            WireKind::Composite => match Deserializer::new(self.value) {
                Ok(nested) => {
                    let inner: Vec<String> = nested
                        .raw_fields_at(depth + 1)
                        .into_iter()
                        .map(|raw| format!("{}={}", raw.tag, raw.value))
                        .collect();
                    format!("{{{}}}", inner.join(", "))
                }
                Err(_) => hex(self.value),
            },
        }
    }
}

/// Descriptor-free view of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    pub tag: FieldTag,
    pub kind: WireKind,
    pub value: String,
}

/// Value types that can be decoded from a single record.
pub trait FromRecord<'a>: Sized {
    const KIND: WireKind;

    fn from_record(record: &Record<'a>) -> Result<Self, SerError>;
}

/// Value bytes of a fixed-width record as an array.
fn fixed<const N: usize>(record: &Record<'_>) -> Result<[u8; N], SerError> {
    record.value.try_into().map_err(|_| SerError::Truncated {
        offset: record.offset,
        needed: N,
        available: record.value.len(),
    })
}

macro_rules! impl_from_record_le {
    ($($type:ty => $kind:ident),* $(,)?) => {
        $(
            impl<'a> FromRecord<'a> for $type {
                const KIND: WireKind = WireKind::$kind;

                fn from_record(record: &Record<'a>) -> Result<Self, SerError> {
                    Ok(<$type>::from_le_bytes(fixed(record)?))
                }
            }
        )*
    };
}

impl_from_record_le!(
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f32 => F32,
    f64 => F64,
);

impl<'a> FromRecord<'a> for bool {
    const KIND: WireKind = WireKind::Bool;

    fn from_record(record: &Record<'a>) -> Result<Self, SerError> {
        let [byte] = fixed::<1>(record)?;
        Ok(byte != 0)
    }
}

impl<'a> FromRecord<'a> for char {
    const KIND: WireKind = WireKind::Char;

    fn from_record(record: &Record<'a>) -> Result<Self, SerError> {
        let raw = u32::from_le_bytes(fixed(record)?);
        char::from_u32(raw).ok_or(SerError::InvalidChar {
            tag: record.tag.value(),
            value: raw,
        })
    }
}

impl<'a> FromRecord<'a> for &'a str {
    const KIND: WireKind = WireKind::String;

    fn from_record(record: &Record<'a>) -> Result<Self, SerError> {
        std::str::from_utf8(record.value).map_err(|_| SerError::InvalidUtf8 {
            tag: record.tag.value(),
        })
    }
}

impl<'a> FromRecord<'a> for String {
    const KIND: WireKind = WireKind::String;

    fn from_record(record: &Record<'a>) -> Result<Self, SerError> {
        <&str>::from_record(record).map(str::to_owned)
    }
}

impl<'a> FromRecord<'a> for &'a [u8] {
    const KIND: WireKind = WireKind::Bytes;

    fn from_record(record: &Record<'a>) -> Result<Self, SerError> {
        Ok(record.value)
    }
}

impl<'a> FromRecord<'a> for Vec<u8> {
    const KIND: WireKind = WireKind::Bytes;

    fn from_record(record: &Record<'a>) -> Result<Self, SerError> {
        Ok(record.value.to_vec())
    }
}

/// Indexed reader over one record stream.
#[derive(Debug, Clone)]
pub struct Deserializer<'a> {
    records: Vec<Record<'a>>,
}

impl<'a> Deserializer<'a> {
    /// Index every record of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Result<Self, SerError> {
        let mut cursor = Cursor::new(bytes);
        let mut records = Vec::new();
        while !cursor.is_eof() {
            let offset = cursor.offset();
            let tag = FieldTag::from_raw(cursor.read_u32_le()?);
            let raw_kind = cursor.read_u8()?;
            let kind = WireKind::from_u8(raw_kind).ok_or(SerError::UnknownKind {
                offset: offset + 4,
                kind: raw_kind,
            })?;
            let value = match kind.fixed_width() {
                Some(width) => cursor.read_bytes(width)?,
                None => cursor.read_prefixed()?,
            };
            records.push(Record {
                tag,
                kind,
                offset,
                value,
            });
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record<'a>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, tag: FieldTag) -> bool {
        self.find(tag).is_some()
    }

    /// First record carrying `tag`.
    pub fn find(&self, tag: FieldTag) -> Option<&Record<'a>> {
        self.records.iter().find(|r| r.tag == tag)
    }

    /// Required field.
    pub fn read<T: FromRecord<'a>>(&self, tag: FieldTag) -> Result<T, SerError> {
        self.find(tag)
            .ok_or(SerError::MissingField { tag: tag.value() })?
            .decode()
    }

    pub fn read_field<T: FromRecord<'a>>(&self, field: &FieldInfo) -> Result<T, SerError> {
        self.read(field.tag)
    }

    /// Field that older producers may not write. A present record of the
    /// wrong kind is still an error.
    pub fn read_optional<T: FromRecord<'a>>(&self, tag: FieldTag) -> Result<Option<T>, SerError> {
        self.find(tag).map(Record::decode).transpose()
    }

    /// Every record carrying `tag`, in stream order.
    pub fn read_repeated<T: FromRecord<'a>>(&self, tag: FieldTag) -> Result<Vec<T>, SerError> {
        self.records
            .iter()
            .filter(|r| r.tag == tag)
            .map(Record::decode)
            .collect()
    }

    /// Required nested composite.
    pub fn read_nested<T: Deserializable>(&self, tag: FieldTag) -> Result<T, SerError> {
        let record = self
            .find(tag)
            .ok_or(SerError::MissingField { tag: tag.value() })?;
        Self::decode_nested(record)
    }

    pub fn read_nested_optional<T: Deserializable>(
        &self,
        tag: FieldTag,
    ) -> Result<Option<T>, SerError> {
        self.find(tag).map(Self::decode_nested).transpose()
    }

    pub fn read_repeated_nested<T: Deserializable>(&self, tag: FieldTag) -> Result<Vec<T>, SerError> {
        self.records
            .iter()
            .filter(|r| r.tag == tag)
            .map(Self::decode_nested)
            .collect()
    }

    fn decode_nested<T: Deserializable>(record: &Record<'_>) -> Result<T, SerError> {
        if record.kind != WireKind::Composite {
            return Err(SerError::TypeMismatch {
                tag: record.tag.value(),
                expected: WireKind::Composite,
                found: record.kind,
            });
        }
        T::deserialize(&Deserializer::new(record.value)?)
    }

    /// `(tag, kind, rendered value)` for every record.
    pub fn raw_fields(&self) -> Vec<RawField> {
        self.raw_fields_at(0)
    }

    fn raw_fields_at(&self, depth: usize) -> Vec<RawField> {
        self.records
            .iter()
            .map(|r| RawField {
                tag: r.tag,
                kind: r.kind,
                value: r.render_at(depth),
            })
            .collect()
    }
}
