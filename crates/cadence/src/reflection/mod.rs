// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Visiting contract and generic message reconstruction.
//!
//! Payload types describe themselves by walking their fields through a
//! [`Visitor`]. The same walk drives serialization (the `Serializer` is a
//! visitor) and reflection ([`MessageCollector`] builds a [`Message`] that a
//! consumer can inspect without knowing the concrete type).

mod collector;
mod message;
mod value;
mod visitor;

pub use collector::MessageCollector;
pub use message::{FieldValue, Message, MessageField};
pub(crate) use value::hex;
pub use value::FieldRef;
pub use visitor::{short_name_of, FieldInfo, Visitable, Visitor};
