// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic, type-erased reconstruction of a payload.

use std::fmt;

use crate::serialization::{FieldTag, WireKind};

/// Rendered value of a [`MessageField`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Message(Message),
}

/// One field of a [`Message`].
#[derive(Debug, Clone, PartialEq)]
pub struct MessageField {
    pub name: String,
    pub tag: FieldTag,
    pub kind: WireKind,
    pub value: FieldValue,
}

/// Ordered field list of a payload whose concrete type the holder may not know.
///
/// The default value is the empty message returned for unresolvable types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    long_name: String,
    short_name: String,
    fields: Vec<MessageField>,
}

impl Message {
    pub fn new(long_name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self {
            long_name: long_name.into(),
            short_name: short_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn fields(&self) -> &[MessageField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True for a message with no name and no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.long_name.is_empty()
    }

    pub fn push(&mut self, field: MessageField) {
        self.fields.push(field);
    }

    /// First field called `name`.
    pub fn field(&self, name: &str) -> Option<&MessageField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Rendered value at a dotted path (`pose.position.x`).
    pub fn value_of(&self, path: &str) -> Option<&str> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        match (&self.field(head)?.value, rest) {
            (FieldValue::Text(text), None) => Some(text),
            (FieldValue::Message(nested), Some(rest)) => nested.value_of(rest),
            _ => None,
        }
    }

    /// Flatten into `(dotted name, value)` pairs in field order.
    pub fn to_tuples(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(self.fields.len());
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        for field in &self.fields {
            let name = if prefix.is_empty() {
                field.name.clone()
            } else {
                format!("{}.{}", prefix, field.name)
            };
            match &field.value {
                FieldValue::Text(text) => out.push((name, text.clone())),
                FieldValue::Message(nested) => nested.flatten_into(&name, out),
            }
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for field in &self.fields {
            write!(f, "{:width$}{}", "", field.name, width = depth * 2)?;
            match &field.value {
                FieldValue::Text(text) => writeln!(f, " = {}", text)?,
                FieldValue::Message(nested) => {
                    writeln!(f, " ({}):", nested.long_name)?;
                    nested.fmt_indented(f, depth + 1)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.long_name)?;
        self.fmt_indented(f, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(name: &str, value: &str) -> MessageField {
        MessageField {
            name: name.into(),
            tag: FieldTag::of(name),
            kind: WireKind::String,
            value: FieldValue::Text(value.into()),
        }
    }

    fn sample() -> Message {
        let mut inner = Message::new("demo.Vec2", "Vec2");
        inner.push(text("x", "1"));
        inner.push(text("y", "2"));

        let mut outer = Message::new("demo.Pose", "Pose");
        outer.push(text("label", "robot"));
        outer.push(MessageField {
            name: "position".into(),
            tag: FieldTag::of("position"),
            kind: WireKind::Composite,
            value: FieldValue::Message(inner),
        });
        outer
    }

    #[test]
    fn test_default_message_is_empty() {
        let message = Message::default();
        assert!(message.is_empty());
        assert_eq!(message.len(), 0);
        assert!(message.to_tuples().is_empty());
    }

    #[test]
    fn test_to_tuples_flattens_nested() {
        let tuples = sample().to_tuples();
        assert_eq!(
            tuples,
            vec![
                ("label".to_string(), "robot".to_string()),
                ("position.x".to_string(), "1".to_string()),
                ("position.y".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_value_of_dotted_path() {
        let message = sample();
        assert_eq!(message.value_of("label"), Some("robot"));
        assert_eq!(message.value_of("position.y"), Some("2"));
        assert_eq!(message.value_of("position"), None);
        assert_eq!(message.value_of("missing"), None);
    }

    #[test]
    fn test_display_indents_nested() {
        let rendered = sample().to_string();
        assert!(rendered.starts_with("demo.Pose:\n"));
        assert!(rendered.contains("  position (demo.Vec2):\n"));
        assert!(rendered.contains("    x = 1\n"));
    }
}
