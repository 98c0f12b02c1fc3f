// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::fmt;

use crate::data::Container;
use crate::reflection::{short_name_of, FieldInfo, Message, MessageCollector, Visitable, Visitor};
use crate::serialization::{Deserializer, FieldTag, Payload, SerError};

/// Type-erased decoder stored in a descriptor.
pub type DecodeFn = fn(&Deserializer<'_>) -> Result<Box<dyn Visitable + Send>, SerError>;

fn decode_boxed<T: Payload>(de: &Deserializer<'_>) -> Result<Box<dyn Visitable + Send>, SerError> {
    Ok(Box::new(T::deserialize(de)?))
}

/// Everything the resolver knows about one data type id.
pub struct TypeDescriptor {
    id: u32,
    long_name: &'static str,
    fields: &'static [FieldInfo],
    decode: DecodeFn,
}

impl TypeDescriptor {
    /// Descriptor of a compiled payload type.
    pub fn of<T: Payload>() -> Result<Self, SerError> {
        Self::new(T::ID, T::LONG_NAME, T::FIELDS, decode_boxed::<T>)
    }

    /// Build a descriptor, rejecting duplicate field names and tag collisions.
    pub fn new(
        id: u32,
        long_name: &'static str,
        fields: &'static [FieldInfo],
        decode: DecodeFn,
    ) -> Result<Self, SerError> {
        for (i, first) in fields.iter().enumerate() {
            for second in &fields[i + 1..] {
                if first.name == second.name {
                    return Err(SerError::DuplicateField {
                        type_name: long_name,
                        name: first.name,
                    });
                }
                if first.tag == second.tag {
                    return Err(SerError::TagCollision {
                        type_name: long_name,
                        first: first.name,
                        second: second.name,
                        tag: first.tag.value(),
                    });
                }
            }
        }
        Ok(Self {
            id,
            long_name,
            fields,
            decode,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn long_name(&self) -> &'static str {
        self.long_name
    }

    pub fn short_name(&self) -> &'static str {
        short_name_of(self.long_name)
    }

    pub fn fields(&self) -> &'static [FieldInfo] {
        self.fields
    }

    pub fn field_name(&self, tag: FieldTag) -> Option<&'static str> {
        self.fields.iter().find(|f| f.tag == tag).map(|f| f.name)
    }

    /// Decode the container payload into a visitable value.
    pub fn decode(&self, container: &Container) -> Result<Box<dyn Visitable + Send>, SerError> {
        if container.data_type() != self.id {
            return Err(SerError::PayloadTypeMismatch {
                expected: self.id,
                found: container.data_type(),
            });
        }
        (self.decode)(&container.deserializer()?)
    }

    /// Decode, then walk every field through `visitor`.
    ///
    /// Nothing is visited when decoding fails.
    pub fn visit(&self, container: &Container, visitor: &mut dyn Visitor) -> Result<(), SerError> {
        let value = self.decode(container)?;
        value.accept(visitor);
        Ok(())
    }

    pub fn map(&self, container: &Container) -> Result<Message, SerError> {
        let value = self.decode(container)?;
        Ok(MessageCollector::collect(value.as_ref()))
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("id", &self.id)
            .field("long_name", &self.long_name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
