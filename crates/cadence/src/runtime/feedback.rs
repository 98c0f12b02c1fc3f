// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::data::{Container, TimeStamp};

/// Passive participant stepped by the supervisor at its own frequency.
///
/// Feedback components stand in for the environment of the modules under
/// test: they see every container published on the conference and answer
/// through the [`Outbox`] handed to `step`.
pub trait FeedbackComponent: Send {
    /// Step frequency in Hz.
    fn frequency(&self) -> f32;

    fn setup(&mut self) {}

    fn tear_down(&mut self) {}

    /// Called for every container received since the previous step, in
    /// arrival order, before `step`.
    fn next_container(&mut self, _container: &Container) {}

    fn step(&mut self, time: &TimeStamp, outbox: &mut Outbox);
}

/// Containers a feedback component publishes after its step.
#[derive(Debug, Default)]
pub struct Outbox {
    containers: Vec<Container>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, container: Container) {
        self.containers.push(container);
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, Container> {
        self.containers.drain(..)
    }
}
