// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{FieldInfo, FieldRef, FieldValue, Message, MessageField, Visitable, Visitor};

/// Visitor that records every visited field into a [`Message`].
#[derive(Debug, Default)]
pub struct MessageCollector {
    message: Message,
}

impl MessageCollector {
    /// Empty collector labelled with the given names.
    pub fn for_type(long_name: &str, short_name: &str) -> Self {
        Self {
            message: Message::new(long_name, short_name),
        }
    }

    /// Walk `value` and return its generic form.
    pub fn collect(value: &dyn Visitable) -> Message {
        let mut collector = Self::for_type(value.long_name(), value.short_name());
        value.accept(&mut collector);
        collector.finish()
    }

    pub fn finish(self) -> Message {
        self.message
    }
}

impl Visitor for MessageCollector {
    fn visit(&mut self, field: &FieldInfo, value: FieldRef<'_>) {
        let rendered = match value {
            FieldRef::Nested(nested) => FieldValue::Message(Self::collect(nested)),
            other => FieldValue::Text(other.to_string()),
        };
        self.message.push(MessageField {
            name: field.name.to_string(),
            tag: field.tag,
            kind: value.kind(),
            value: rendered,
        });
    }
}
