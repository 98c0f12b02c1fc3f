// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Module lifecycle supervisor and execution contracts.
//!
//! - [`Supervisor`] enforces `setup -> run -> tear_down` and drives cycles
//! - [`RuntimeEnvironment`] holds the registered components
//! - [`TimeTriggeredModule`] / [`ModuleContext`] define how modules run
//! - [`FeedbackComponent`] steps passive participants
//! - [`Conference`] delivers containers between them

mod conference;
mod environment;
mod feedback;
mod identity;
mod module;
mod state;
mod supervisor;

pub use conference::{Conference, ConferenceEndpoint, DEFAULT_INBOX_CAPACITY};
pub use environment::{RuntimeEnvironment, SharedFeedback, SharedModule};
pub use feedback::{FeedbackComponent, Outbox};
pub use identity::ModuleIdentity;
pub(crate) use module::Signal;
pub use module::{ModuleContext, TimeTriggeredModule};
pub use state::{Cycles, ExitCode, ModuleState, RunResult, SupervisorState};
pub use supervisor::{RunStatistics, StopHandle, Supervisor, DEFAULT_STARTUP_TIMEOUT};
