// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! 32-bit field tags derived from field names.
//!
//! A tag is the CRC32 (IEEE 802.3, reflected, polynomial `0xEDB88320`) of the
//! field's literal name. The value is a pure function of the name: no seed,
//! no per-process randomization, so every build and every process agrees.
//!
//! Two entry points compute the same value:
//! - [`FieldTag::from_name`] is a `const fn`, so descriptor tables are baked
//!   into the binary (`const FIELDS: &[FieldInfo] = ...`).
//! - [`FieldTag::of`] uses `crc32fast` for names only known at runtime.

use std::fmt;

const CRC32_POLYNOMIAL: u32 = 0xEDB8_8320;

const CRC32_TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ CRC32_POLYNOMIAL
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Compile-time CRC32 over `bytes`.
#[must_use]
pub const fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    let mut i = 0;
    while i < bytes.len() {
        let index = ((crc ^ bytes[i] as u32) & 0xFF) as usize;
        crc = CRC32_TABLE[index] ^ (crc >> 8);
        i += 1;
    }
    !crc
}

/// Wire identifier of a serialized field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FieldTag(u32);

impl FieldTag {
    /// Tag for `name`, usable in `const` context.
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        Self(crc32(name.as_bytes()))
    }

    /// Tag for `name` computed at runtime.
    #[must_use]
    pub fn of(name: &str) -> Self {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(name.as_bytes());
        Self(hasher.finalize())
    }

    /// Wrap a raw tag read from the wire.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl From<FieldTag> for u32 {
    fn from(tag: FieldTag) -> Self {
        tag.0
    }
}
