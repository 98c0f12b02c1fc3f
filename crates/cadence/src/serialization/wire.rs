// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire kinds of the tagged record stream.
//!
//! ```text
//! +-----------+----------+---------------------------------------------+
//! | tag (u32) | kind (u8)| value                                       |
//! +-----------+----------+---------------------------------------------+
//!                         fixed width: little-endian scalar
//!                         String/Bytes/Composite: len (u32) | len bytes
//! ```
//!
//! The kind byte lets a reader without static knowledge of the type find the
//! end of every record, so unknown fields can be skipped.

use std::fmt;

/// Encoding kind of a single record value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireKind {
    Bool = 0x01,
    U8 = 0x02,
    I8 = 0x03,
    U16 = 0x04,
    I16 = 0x05,
    U32 = 0x06,
    I32 = 0x07,
    U64 = 0x08,
    I64 = 0x09,
    F32 = 0x0A,
    F64 = 0x0B,
    /// Unicode scalar value stored as u32.
    Char = 0x0C,
    /// UTF-8 text, length-prefixed.
    String = 0x0D,
    /// Opaque bytes, length-prefixed.
    Bytes = 0x0E,
    /// Nested record stream, length-prefixed.
    Composite = 0x0F,
}

impl WireKind {
    #[must_use]
    pub fn from_u8(raw: u8) -> Option<Self> {
        Some(match raw {
            0x01 => Self::Bool,
            0x02 => Self::U8,
            0x03 => Self::I8,
            0x04 => Self::U16,
            0x05 => Self::I16,
            0x06 => Self::U32,
            0x07 => Self::I32,
            0x08 => Self::U64,
            0x09 => Self::I64,
            0x0A => Self::F32,
            0x0B => Self::F64,
            0x0C => Self::Char,
            0x0D => Self::String,
            0x0E => Self::Bytes,
            0x0F => Self::Composite,
            _ => return None,
        })
    }

    /// Encoded width of the value, `None` for length-prefixed kinds.
    #[must_use]
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            Self::Bool | Self::U8 | Self::I8 => Some(1),
            Self::U16 | Self::I16 => Some(2),
            Self::U32 | Self::I32 | Self::F32 | Self::Char => Some(4),
            Self::U64 | Self::I64 | Self::F64 => Some(8),
            Self::String | Self::Bytes | Self::Composite => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::I8 => "i8",
            Self::U16 => "u16",
            Self::I16 => "i16",
            Self::U32 => "u32",
            Self::I32 => "i32",
            Self::U64 => "u64",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Composite => "composite",
        }
    }
}

impl fmt::Display for WireKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_byte_roundtrip() {
        for raw in 0x01..=0x0F {
            let kind = WireKind::from_u8(raw).expect("valid kind byte");
            assert_eq!(kind as u8, raw);
        }
        assert_eq!(WireKind::from_u8(0x00), None);
        assert_eq!(WireKind::from_u8(0x10), None);
    }

    #[test]
    fn test_fixed_widths() {
        assert_eq!(WireKind::Bool.fixed_width(), Some(1));
        assert_eq!(WireKind::Char.fixed_width(), Some(4));
        assert_eq!(WireKind::F64.fixed_width(), Some(8));
        assert_eq!(WireKind::Composite.fixed_width(), None);
    }
}
