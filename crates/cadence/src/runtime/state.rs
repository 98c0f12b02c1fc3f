// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::fmt;

/// State a module observes at its suspension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModuleState {
    #[default]
    NotRunning,
    Running,
}

/// Value returned from a module body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitCode {
    Okay,
    /// The body panicked.
    ExceptionCaught,
    SeriousError,
    /// No supervisor answered the module.
    NoSupercomponent,
}

/// Outcome of [`Supervisor::run`](super::Supervisor::run).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunResult {
    Ok,
    /// `run` was called before `setup`; nothing was touched.
    SetupNotCalled,
    /// A component declared a frequency that is not finite and positive.
    InvalidFrequency,
    /// A module was started for another conference.
    ConferenceMismatch,
    /// At least one module exited with something other than `Okay`.
    ModuleFailed,
}

/// Number of ticks to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cycles {
    Bounded(u64),
    /// Until stopped through a [`StopHandle`](super::StopHandle).
    Unbounded,
}

impl Cycles {
    pub(crate) fn allows(self, executed: u64) -> bool {
        match self {
            Self::Bounded(limit) => executed < limit,
            Self::Unbounded => true,
        }
    }
}

impl From<u64> for Cycles {
    /// `0` means unbounded.
    fn from(n: u64) -> Self {
        if n == 0 {
            Self::Unbounded
        } else {
            Self::Bounded(n)
        }
    }
}

/// Supervisor lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SupervisorState {
    #[default]
    Idle,
    Ready,
    Running,
    Stopped,
}

macro_rules! impl_display_debug_name {
    ($($type:ty),*) => {
        $(
            impl fmt::Display for $type {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::Debug::fmt(self, f)
                }
            }
        )*
    };
}

impl_display_debug_name!(ModuleState, ExitCode, RunResult, SupervisorState);
