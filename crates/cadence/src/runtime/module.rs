// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Module execution contract.

use crossbeam::channel::{Receiver, Sender};

use super::{ConferenceEndpoint, ExitCode, ModuleIdentity, ModuleState};
use crate::config::KeyValueConfiguration;
use crate::data::{Container, TimeStamp};

/// Supervisor to module thread.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Signal {
    Tick(TimeStamp),
    Stop,
}

/// Cyclic unit of work driven by a [`Supervisor`](super::Supervisor).
///
/// The supervisor runs `set_up`, `body` and `tear_down` on a dedicated
/// thread. `body` is expected to loop on
/// [`ModuleContext::state_and_wait_for_remaining_time_in_timeslice`]:
///
/// ```rust,ignore
/// fn body(&mut self, ctx: &mut ModuleContext) -> ExitCode {
///     let limit: u32 = ctx.key_value_configuration().get_value("counter.limit");
///     while ctx.state_and_wait_for_remaining_time_in_timeslice() == ModuleState::Running {
///         self.cycles += 1;
///     }
///     ExitCode::Okay
/// }
/// ```
pub trait TimeTriggeredModule: Send {
    fn identity(&self) -> &ModuleIdentity;

    fn set_up(&mut self, _ctx: &mut ModuleContext) {}

    fn body(&mut self, ctx: &mut ModuleContext) -> ExitCode;

    fn tear_down(&mut self, _ctx: &mut ModuleContext) {}
}

/// A module's view of the runtime while it runs.
pub struct ModuleContext {
    identity: ModuleIdentity,
    config: KeyValueConfiguration,
    signals: Receiver<Signal>,
    done: Sender<()>,
    endpoint: ConferenceEndpoint,
    state: ModuleState,
    cycle: u64,
    time: TimeStamp,
}

impl ModuleContext {
    pub(crate) fn new(
        identity: ModuleIdentity,
        config: KeyValueConfiguration,
        signals: Receiver<Signal>,
        done: Sender<()>,
        endpoint: ConferenceEndpoint,
    ) -> Self {
        Self {
            identity,
            config,
            signals,
            done,
            endpoint,
            state: ModuleState::Running,
            cycle: 0,
            time: TimeStamp::default(),
        }
    }

    /// Configuration resolved for this module's namespace.
    pub fn key_value_configuration(&self) -> &KeyValueConfiguration {
        &self.config
    }

    pub fn identity(&self) -> &ModuleIdentity {
        &self.identity
    }

    /// Ticks received so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Time of the current tick.
    pub fn time(&self) -> TimeStamp {
        self.time
    }

    /// Report the current slice as finished and block until the next one.
    ///
    /// Returns `Running` for a new slice, `NotRunning` once the supervisor
    /// stops (or vanishes); after that it returns `NotRunning` immediately.
    pub fn state_and_wait_for_remaining_time_in_timeslice(&mut self) -> ModuleState {
        if self.state == ModuleState::NotRunning {
            return ModuleState::NotRunning;
        }
        if self.done.send(()).is_err() {
            log::debug!(
                "[ModuleContext::wait] {} lost its supervisor",
                self.identity.name()
            );
            self.state = ModuleState::NotRunning;
            return self.state;
        }
        self.state = match self.signals.recv() {
            Ok(Signal::Tick(time)) => {
                self.cycle += 1;
                self.time = time;
                ModuleState::Running
            }
            Ok(Signal::Stop) | Err(_) => ModuleState::NotRunning,
        };
        self.state
    }

    /// Publish on the conference, stamping this module's identifier when the
    /// container carries none.
    pub fn send(&self, container: Container) {
        let container = if container.sender_stamp() == 0 {
            container.with_sender_stamp(self.identity.sender_stamp())
        } else {
            container
        };
        self.endpoint.send(container);
    }

    /// Containers published by others since the last call.
    pub fn receive(&self) -> Vec<Container> {
        self.endpoint.receive()
    }
}
