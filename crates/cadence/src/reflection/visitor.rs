// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Visiting contract between payload types and the code that walks them.

use super::FieldRef;
use crate::serialization::FieldTag;

/// Static description of one field: literal name and its wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: &'static str,
    pub tag: FieldTag,
}

impl FieldInfo {
    /// Field whose tag is the CRC32 of `name`, computed at compile time.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            tag: FieldTag::from_name(name),
        }
    }

    /// Field with an explicit tag.
    pub const fn with_tag(name: &'static str, tag: u32) -> Self {
        Self {
            name,
            tag: FieldTag::from_raw(tag),
        }
    }
}

/// Receives every field of a [`Visitable`] in declared order.
pub trait Visitor {
    fn visit(&mut self, field: &FieldInfo, value: FieldRef<'_>);
}

/// A type that can present its fields to a [`Visitor`].
pub trait Visitable {
    /// Fully qualified name, e.g. `demo.geometry.Pose`.
    fn long_name(&self) -> &'static str;

    /// Last segment of [`long_name`](Self::long_name).
    fn short_name(&self) -> &'static str {
        short_name_of(self.long_name())
    }

    /// Present every field, in declared order, to `visitor`.
    fn accept(&self, visitor: &mut dyn Visitor);
}

/// Last dot-separated segment of a long name.
pub fn short_name_of(long_name: &str) -> &str {
    long_name.rsplit('.').next().unwrap_or(long_name)
}
