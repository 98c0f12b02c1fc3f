// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # cadence - Time-triggered publish/subscribe middleware runtime
//!
//! Modules exchange typed messages over a shared conference under supervised,
//! cyclic execution. Payloads travel in a self-describing, tag-labelled wire
//! format so that consumers without static knowledge of a type can still
//! introspect and route it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cadence::runtime::{Cycles, RuntimeEnvironment, RunResult, Supervisor};
//! use cadence::config::KeyValueConfiguration;
//!
//! let config = KeyValueConfiguration::parse("counter.limit = 10");
//! let mut supervisor = Supervisor::new(100, config);
//! let mut env = RuntimeEnvironment::new();
//! // env.add_module(...); env.add_feedback(...);
//!
//! supervisor.setup();
//! assert_eq!(supervisor.run(&mut env, Cycles::Bounded(10)), RunResult::Ok);
//! supervisor.tear_down();
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                       Runtime (Supervisor)                          |
//! |   RuntimeEnvironment -> module threads | feedback components        |
//! +---------------------------------------------------------------------+
//! |                     Conference (in-process)                         |
//! |   Container envelopes: type id | sender stamp | timestamps | bytes  |
//! +---------------------------------------------------------------------+
//! |               Serialization & Reflection                            |
//! |   FieldTag (CRC32) | Serializer/Deserializer | Visitor | Message    |
//! +---------------------------------------------------------------------+
//! |                       Type Resolver                                 |
//! |   TypeRegistry -> TypeDescriptor | Helper                          |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`runtime`] - Supervisor, module and feedback component contracts
//! - [`serialization`] - Tagged wire format and codec factory
//! - [`reflection`] - Visiting contract and generic messages
//! - [`resolver`] - Runtime type id to descriptor mapping
//! - [`data`] - Container envelope and timestamps
//! - [`config`] - Key/value configuration

/// Key/value configuration text parsing and namespaced lookup.
pub mod config;
/// Container envelope and timestamps.
pub mod data;
/// Crate-level error type.
pub mod error;
/// Visiting contract and generic message reconstruction.
pub mod reflection;
/// Runtime type resolution for containers.
pub mod resolver;
/// Module lifecycle supervisor and execution contracts.
pub mod runtime;
/// Tagged binary serialization.
pub mod serialization;

pub use config::KeyValueConfiguration;
pub use data::{Container, TimeStamp};
pub use error::{Error, Result};
pub use reflection::{FieldInfo, FieldRef, Message, MessageCollector, Visitable, Visitor};
pub use resolver::{Helper, TypeDescriptor, TypeRegistry};
pub use runtime::{
    Cycles, ExitCode, FeedbackComponent, ModuleContext, ModuleState, RunResult,
    RuntimeEnvironment, Supervisor, TimeTriggeredModule,
};
pub use serialization::{
    Deserializable, Deserializer, FieldTag, Payload, SerError, SerializationFactory, Serializer,
};

/// cadence version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
