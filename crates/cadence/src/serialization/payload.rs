// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{Deserializer, SerError};
use crate::reflection::{FieldInfo, Visitable};

/// Rebuild a value from an indexed record stream.
pub trait Deserializable: Sized {
    fn deserialize(de: &Deserializer<'_>) -> Result<Self, SerError>;
}

/// A message type that can travel in a container.
///
/// `ID` is the data-type id carried by the envelope; it must be unique among
/// the types registered in one `TypeRegistry`. `FIELDS` lists the fields in
/// the order [`Visitable::accept`] visits them.
pub trait Payload: Visitable + Deserializable + Send + Sync + 'static {
    const ID: u32;
    const LONG_NAME: &'static str;
    const FIELDS: &'static [FieldInfo];

    /// Decode a bare record stream.
    fn from_bytes(bytes: &[u8]) -> Result<Self, SerError> {
        Self::deserialize(&Deserializer::new(bytes)?)
    }
}
