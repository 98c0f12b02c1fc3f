// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Borrowed field values handed to visitors.

use std::fmt;

use super::Visitable;
use crate::serialization::WireKind;

/// Borrowed view of a single field value.
#[derive(Clone, Copy)]
pub enum FieldRef<'a> {
    Bool(bool),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    Str(&'a str),
    Bytes(&'a [u8]),
    /// Nested composite, visited recursively.
    Nested(&'a dyn Visitable),
}

impl<'a> FieldRef<'a> {
    pub fn nested(value: &'a dyn Visitable) -> Self {
        Self::Nested(value)
    }

    pub fn kind(&self) -> WireKind {
        match self {
            Self::Bool(_) => WireKind::Bool,
            Self::U8(_) => WireKind::U8,
            Self::I8(_) => WireKind::I8,
            Self::U16(_) => WireKind::U16,
            Self::I16(_) => WireKind::I16,
            Self::U32(_) => WireKind::U32,
            Self::I32(_) => WireKind::I32,
            Self::U64(_) => WireKind::U64,
            Self::I64(_) => WireKind::I64,
            Self::F32(_) => WireKind::F32,
            Self::F64(_) => WireKind::F64,
            Self::Char(_) => WireKind::Char,
            Self::Str(_) => WireKind::String,
            Self::Bytes(_) => WireKind::Bytes,
            Self::Nested(_) => WireKind::Composite,
        }
    }
}

/// Lowercase hex rendering used for byte blobs.
pub(crate) fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

impl fmt::Display for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::U8(v) => write!(f, "{}", v),
            Self::I8(v) => write!(f, "{}", v),
            Self::U16(v) => write!(f, "{}", v),
            Self::I16(v) => write!(f, "{}", v),
            Self::U32(v) => write!(f, "{}", v),
            Self::I32(v) => write!(f, "{}", v),
            Self::U64(v) => write!(f, "{}", v),
            Self::I64(v) => write!(f, "{}", v),
            Self::F32(v) => write!(f, "{}", v),
            Self::F64(v) => write!(f, "{}", v),
            Self::Char(v) => write!(f, "{}", v),
            Self::Str(v) => f.write_str(v),
            Self::Bytes(v) => f.write_str(&hex(v)),
            Self::Nested(v) => f.write_str(v.long_name()),
        }
    }
}

impl fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self)
    }
}

macro_rules! impl_from_scalar {
    ($($type:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$type> for FieldRef<'_> {
                fn from(value: $type) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool => Bool,
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
    char => Char,
);

impl<'a> From<&'a str> for FieldRef<'a> {
    fn from(value: &'a str) -> Self {
        Self::Str(value)
    }
}

impl<'a> From<&'a String> for FieldRef<'a> {
    fn from(value: &'a String) -> Self {
        Self::Str(value.as_str())
    }
}

impl<'a> From<&'a [u8]> for FieldRef<'a> {
    fn from(value: &'a [u8]) -> Self {
        Self::Bytes(value)
    }
}
