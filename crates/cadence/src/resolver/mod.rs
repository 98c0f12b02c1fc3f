// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type resolution for containers.
//!
//! A consumer that receives a [`Container`] only knows its data type id. The
//! [`TypeRegistry`] turns that id into a [`TypeDescriptor`] (or asks an
//! external [`Helper`]) and produces either a visit of the decoded payload or
//! a generic [`Message`]. Unknown types yield an empty message and `false`.

mod descriptor;
mod registry;

pub use descriptor::{DecodeFn, TypeDescriptor};
pub use registry::TypeRegistry;

use crate::data::Container;
use crate::reflection::{short_name_of, Message, MessageCollector, Visitor};

/// Externally supplied descriptor module.
///
/// Implementations must not call the visitor at all when they return `false`.
pub trait Helper: Send + Sync {
    /// Visit the payload of `container` if its type is known here.
    fn delegate_visit(&self, container: &Container, visitor: &mut dyn Visitor) -> bool;

    fn long_name(&self, data_type: u32) -> Option<&'static str>;

    /// Generic message for `container`, or `(empty, false)`.
    fn map(&self, container: &Container) -> (Message, bool) {
        let Some(long_name) = self.long_name(container.data_type()) else {
            return (Message::default(), false);
        };
        let mut collector = MessageCollector::for_type(long_name, short_name_of(long_name));
        if self.delegate_visit(container, &mut collector) {
            (collector.finish(), true)
        } else {
            (Message::default(), false)
        }
    }
}
