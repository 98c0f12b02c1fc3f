// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec selection by wire format version.

use std::fmt;

use super::{Deserializable, Deserializer, SerError, Serializer};
use crate::reflection::Visitable;

/// Wire format versions understood by this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum WireFormat {
    /// Tagged record stream (`tag u32 | kind u8 | value`).
    #[default]
    TaggedV1 = 1,
}

impl WireFormat {
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::TaggedV1),
            _ => None,
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TaggedV1 => f.write_str("tagged-v1"),
        }
    }
}

/// Hands out serializers for one output format and deserializers for any
/// supported input format.
///
/// Owned and passed explicitly; there is no process-wide instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializationFactory {
    format: WireFormat,
}

impl SerializationFactory {
    pub fn new(format: WireFormat) -> Self {
        Self { format }
    }

    /// Format written by [`serializer`](Self::serializer).
    pub fn format(&self) -> WireFormat {
        self.format
    }

    pub fn supports(&self, format: u8) -> bool {
        WireFormat::from_u8(format).is_some()
    }

    pub fn serializer(&self) -> Serializer {
        match self.format {
            WireFormat::TaggedV1 => Serializer::new(),
        }
    }

    pub fn encode(&self, value: &dyn Visitable) -> Result<Vec<u8>, SerError> {
        let mut serializer = self.serializer();
        value.accept(&mut serializer);
        serializer.into_bytes()
    }

    pub fn deserializer<'a>(&self, format: u8, bytes: &'a [u8]) -> Result<Deserializer<'a>, SerError> {
        match WireFormat::from_u8(format) {
            Some(WireFormat::TaggedV1) => Deserializer::new(bytes),
            None => Err(SerError::UnsupportedFormat(format)),
        }
    }

    pub fn decode<T: Deserializable>(&self, format: u8, bytes: &[u8]) -> Result<T, SerError> {
        T::deserialize(&self.deserializer(format, bytes)?)
    }
}
