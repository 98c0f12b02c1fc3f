// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;

use super::{Helper, TypeDescriptor};
use crate::data::Container;
use crate::error::{Error, Result};
use crate::reflection::{Message, Visitor};
use crate::serialization::{FieldTag, Payload};

/// Maps data type ids to descriptors, falling back to external helpers.
///
/// Compiled types are registered with [`register`](Self::register); helpers
/// added with [`add_helper`](Self::add_helper) cover types this process was
/// not built with. Lookups try descriptors first, then helpers in insertion
/// order.
#[derive(Default)]
pub struct TypeRegistry {
    descriptors: DashMap<u32, Arc<TypeDescriptor>>,
    helpers: RwLock<Vec<Arc<dyn Helper>>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Payload>(&self) -> Result<()> {
        self.register_descriptor(TypeDescriptor::of::<T>()?)
    }

    /// Re-registering the same id and name is a no-op.
    pub fn register_descriptor(&self, descriptor: TypeDescriptor) -> Result<()> {
        match self.descriptors.entry(descriptor.id()) {
            Entry::Occupied(existing) => {
                if existing.get().long_name() == descriptor.long_name() {
                    return Ok(());
                }
                Err(Error::DuplicateTypeId {
                    id: descriptor.id(),
                    existing: existing.get().long_name(),
                    requested: descriptor.long_name(),
                })
            }
            Entry::Vacant(slot) => {
                log::debug!(
                    "[TypeRegistry::register] id={} name={}",
                    descriptor.id(),
                    descriptor.long_name()
                );
                slot.insert(Arc::new(descriptor));
                Ok(())
            }
        }
    }

    pub fn add_helper(&self, helper: Arc<dyn Helper>) {
        self.helpers.write().push(helper);
    }

    pub fn descriptor(&self, id: u32) -> Option<Arc<TypeDescriptor>> {
        self.descriptors.get(&id).map(|d| Arc::clone(d.value()))
    }

    pub fn contains(&self, id: u32) -> bool {
        self.long_name(id).is_some()
    }

    /// Number of registered descriptors (helpers not counted).
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn long_name(&self, id: u32) -> Option<&'static str> {
        if let Some(descriptor) = self.descriptors.get(&id) {
            return Some(descriptor.long_name());
        }
        self.helpers.read().iter().find_map(|h| h.long_name(id))
    }

    pub fn field_name(&self, id: u32, tag: FieldTag) -> Option<&'static str> {
        self.descriptors.get(&id)?.field_name(tag)
    }

    /// Generic form of the container payload, `false` when the type is
    /// unknown or the payload does not decode.
    pub fn resolve(&self, container: &Container) -> (Message, bool) {
        if let Some(descriptor) = self.descriptor(container.data_type()) {
            return match descriptor.map(container) {
                Ok(message) => (message, true),
                Err(err) => {
                    log::debug!(
                        "[TypeRegistry::resolve] type {} failed to decode: {}",
                        container.data_type(),
                        err
                    );
                    (Message::default(), false)
                }
            };
        }

        let helpers = self.helpers.read();
        for helper in helpers.iter() {
            let (message, found) = helper.map(container);
            if found {
                return (message, true);
            }
        }
        log::debug!(
            "[TypeRegistry::resolve] unknown type id {}",
            container.data_type()
        );
        (Message::default(), false)
    }

    /// Walk the payload through `visitor`; nothing is visited on `false`.
    pub fn delegate_visit(&self, container: &Container, visitor: &mut dyn Visitor) -> bool {
        if let Some(descriptor) = self.descriptor(container.data_type()) {
            return match descriptor.visit(container, visitor) {
                Ok(()) => true,
                Err(err) => {
                    log::debug!(
                        "[TypeRegistry::delegate_visit] type {} failed to decode: {}",
                        container.data_type(),
                        err
                    );
                    false
                }
            };
        }

        let helpers = self.helpers.read();
        helpers
            .iter()
            .any(|helper| helper.delegate_visit(container, visitor))
    }
}

impl Helper for TypeRegistry {
    fn delegate_visit(&self, container: &Container, visitor: &mut dyn Visitor) -> bool {
        TypeRegistry::delegate_visit(self, container, visitor)
    }

    fn long_name(&self, data_type: u32) -> Option<&'static str> {
        TypeRegistry::long_name(self, data_type)
    }

    fn map(&self, container: &Container) -> (Message, bool) {
        self.resolve(container)
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("descriptors", &self.descriptors.len())
            .field("helpers", &self.helpers.read().len())
            .finish()
    }
}
