// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::cursor::CursorMut;
use super::{FieldTag, SerError};
use crate::reflection::{FieldInfo, FieldRef, Visitable, Visitor};

/// Writes visited fields as tagged records.
///
/// A `Serializer` is a [`Visitor`]: pass it to [`Visitable::accept`] and each
/// field lands in the buffer in visit order. Nested composites are serialized
/// recursively into their own record stream and written length-prefixed.
///
/// Visiting cannot fail, so the first error (a value whose length does not
/// fit a `u32` prefix) is latched and reported by [`into_bytes`](Self::into_bytes).
#[derive(Debug, Default)]
pub struct Serializer {
    cursor: CursorMut,
    error: Option<SerError>,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize every field of `value`.
    pub fn serialize(value: &dyn Visitable) -> Result<Vec<u8>, SerError> {
        let mut serializer = Self::new();
        value.accept(&mut serializer);
        serializer.into_bytes()
    }

    /// Append one record.
    pub fn write(&mut self, tag: FieldTag, value: FieldRef<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.write_record(tag, value) {
            log::debug!("[Serializer::write] field {} rejected: {}", tag, err);
            self.error = Some(err);
        }
    }

    fn write_record(&mut self, tag: FieldTag, value: FieldRef<'_>) -> Result<(), SerError> {
        // Composites are built before the header so a failing child leaves
        // no partial record behind.
        let nested = match value {
            FieldRef::Nested(inner) => Some(Self::serialize(inner)?),
            _ => None,
        };

        let cursor = &mut self.cursor;
        cursor.write_u32_le(tag.value());
        cursor.write_u8(value.kind() as u8);
        match value {
            FieldRef::Bool(v) => cursor.write_u8(u8::from(v)),
            FieldRef::U8(v) => cursor.write_u8(v),
            FieldRef::I8(v) => cursor.write_i8(v),
            FieldRef::U16(v) => cursor.write_u16_le(v),
            FieldRef::I16(v) => cursor.write_i16_le(v),
            FieldRef::U32(v) => cursor.write_u32_le(v),
            FieldRef::I32(v) => cursor.write_i32_le(v),
            FieldRef::U64(v) => cursor.write_u64_le(v),
            FieldRef::I64(v) => cursor.write_i64_le(v),
            FieldRef::F32(v) => cursor.write_f32_le(v),
            FieldRef::F64(v) => cursor.write_f64_le(v),
            FieldRef::Char(v) => cursor.write_u32_le(u32::from(v)),
            FieldRef::Str(v) => cursor.write_prefixed(v.as_bytes())?,
            FieldRef::Bytes(v) => cursor.write_prefixed(v)?,
            FieldRef::Nested(_) => cursor.write_prefixed(nested.as_deref().unwrap_or_default())?,
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cursor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.is_empty()
    }

    /// Finished record stream, or the first error hit while writing.
    pub fn into_bytes(self) -> Result<Vec<u8>, SerError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.cursor.into_inner()),
        }
    }
}

impl Visitor for Serializer {
    fn visit(&mut self, field: &FieldInfo, value: FieldRef<'_>) {
        self.write(field.tag, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::WireKind;

    struct Sample {
        flag: bool,
        count: u16,
        label: String,
    }

    impl Visitable for Sample {
        fn long_name(&self) -> &'static str {
            "test.Sample"
        }

        fn accept(&self, visitor: &mut dyn Visitor) {
            visitor.visit(&FieldInfo::new("flag"), self.flag.into());
            visitor.visit(&FieldInfo::new("count"), self.count.into());
            visitor.visit(&FieldInfo::new("label"), (&self.label).into());
        }
    }

    #[test]
    fn test_record_layout() {
        let mut serializer = Serializer::new();
        serializer.write(FieldTag::from_raw(0x0102_0304), FieldRef::U16(0xBEEF));
        let bytes = serializer.into_bytes().expect("serialize");
        assert_eq!(
            bytes,
            vec![0x04, 0x03, 0x02, 0x01, WireKind::U16 as u8, 0xEF, 0xBE]
        );
    }

    #[test]
    fn test_fields_written_in_visit_order() {
        let sample = Sample {
            flag: true,
            count: 7,
            label: "hi".into(),
        };
        let bytes = Serializer::serialize(&sample).expect("serialize");

        // flag: 4 + 1 + 1, count: 4 + 1 + 2, label: 4 + 1 + 4 + 2
        assert_eq!(bytes.len(), 6 + 7 + 11);
        assert_eq!(&bytes[..4], &FieldTag::of("flag").value().to_le_bytes());
        assert_eq!(&bytes[6..10], &FieldTag::of("count").value().to_le_bytes());
        assert_eq!(&bytes[bytes.len() - 2..], b"hi");
    }

    #[test]
    fn test_nested_is_length_prefixed() {
        struct Wrapper(Sample);

        impl Visitable for Wrapper {
            fn long_name(&self) -> &'static str {
                "test.Wrapper"
            }

            fn accept(&self, visitor: &mut dyn Visitor) {
                visitor.visit(&FieldInfo::new("inner"), FieldRef::nested(&self.0));
            }
        }

        let inner = Sample {
            flag: false,
            count: 1,
            label: String::new(),
        };
        let inner_len = Serializer::serialize(&inner).expect("inner").len();
        let bytes = Serializer::serialize(&Wrapper(inner)).expect("outer");

        assert_eq!(bytes[4], WireKind::Composite as u8);
        assert_eq!(&bytes[5..9], &(inner_len as u32).to_le_bytes());
        assert_eq!(bytes.len(), 9 + inner_len);
    }
}
