// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::sync::Arc;

use parking_lot::Mutex;

use super::{FeedbackComponent, TimeTriggeredModule};

pub type SharedModule = Arc<Mutex<dyn TimeTriggeredModule>>;
pub type SharedFeedback = Arc<Mutex<dyn FeedbackComponent>>;

/// Components to run under a supervisor, in registration order.
///
/// Registration never fails and does not check for duplicates; the
/// supervisor runs each distinct component once.
#[derive(Default)]
pub struct RuntimeEnvironment {
    modules: Vec<SharedModule>,
    feedback: Vec<SharedFeedback>,
}

impl RuntimeEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module<M: TimeTriggeredModule + 'static>(&mut self, module: Arc<Mutex<M>>) {
        self.modules.push(module);
    }

    pub fn add_feedback<F: FeedbackComponent + 'static>(&mut self, component: Arc<Mutex<F>>) {
        self.feedback.push(component);
    }

    pub fn add_shared_module(&mut self, module: SharedModule) {
        self.modules.push(module);
    }

    pub fn add_shared_feedback(&mut self, component: SharedFeedback) {
        self.feedback.push(component);
    }

    pub fn modules(&self) -> &[SharedModule] {
        &self.modules
    }

    pub fn feedback_components(&self) -> &[SharedFeedback] {
        &self.feedback
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.feedback.is_empty()
    }
}

/// First occurrence of every distinct component, by pointer identity.
pub(crate) fn distinct<T: ?Sized>(items: &[Arc<Mutex<T>>]) -> Vec<Arc<Mutex<T>>> {
    let mut out: Vec<Arc<Mutex<T>>> = Vec::with_capacity(items.len());
    for item in items {
        if !out
            .iter()
            .any(|seen| std::ptr::addr_eq(Arc::as_ptr(seen), Arc::as_ptr(item)))
        {
            out.push(Arc::clone(item));
        }
    }
    out
}

impl std::fmt::Debug for RuntimeEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeEnvironment")
            .field("modules", &self.modules.len())
            .field("feedback", &self.feedback.len())
            .finish()
    }
}
