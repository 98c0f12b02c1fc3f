// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Demo participants: a heartbeat module, a monitor that answers with
//! status reports, and a recorder that appends every container to a file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use cadence::reflection::{FieldInfo, FieldRef, Visitable, Visitor};
use cadence::runtime::{
    ExitCode, FeedbackComponent, ModuleContext, ModuleIdentity, ModuleState, Outbox,
    TimeTriggeredModule,
};
use cadence::serialization::{Deserializable, Deserializer, Payload, SerError};
use cadence::{Container, TimeStamp, TypeRegistry};

/// Published by [`HeartbeatModule`] once per cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Heartbeat {
    pub sequence: u64,
    pub label: String,
    pub taken: TimeStamp,
}

impl Heartbeat {
    const SEQUENCE: FieldInfo = FieldInfo::new("sequence");
    const LABEL: FieldInfo = FieldInfo::new("label");
    const TAKEN: FieldInfo = FieldInfo::new("taken");
}

impl Visitable for Heartbeat {
    fn long_name(&self) -> &'static str {
        Self::LONG_NAME
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit(&Self::SEQUENCE, self.sequence.into());
        visitor.visit(&Self::LABEL, (&self.label).into());
        visitor.visit(&Self::TAKEN, FieldRef::nested(&self.taken));
    }
}

impl Deserializable for Heartbeat {
    fn deserialize(de: &Deserializer<'_>) -> Result<Self, SerError> {
        Ok(Self {
            sequence: de.read_field(&Self::SEQUENCE)?,
            label: de.read_field(&Self::LABEL)?,
            taken: de.read_nested(Self::TAKEN.tag)?,
        })
    }
}

impl Payload for Heartbeat {
    const ID: u32 = 100;
    const LONG_NAME: &'static str = "cadence.demo.Heartbeat";
    const FIELDS: &'static [FieldInfo] = &[Self::SEQUENCE, Self::LABEL, Self::TAKEN];
}

/// Published by [`Monitor`] after each step.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub heartbeats: u32,
    pub last_sequence: u64,
    pub latency_us: i64,
}

impl StatusReport {
    const HEARTBEATS: FieldInfo = FieldInfo::new("heartbeats");
    const LAST_SEQUENCE: FieldInfo = FieldInfo::new("last_sequence");
    const LATENCY_US: FieldInfo = FieldInfo::new("latency_us");
}

impl Visitable for StatusReport {
    fn long_name(&self) -> &'static str {
        Self::LONG_NAME
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit(&Self::HEARTBEATS, self.heartbeats.into());
        visitor.visit(&Self::LAST_SEQUENCE, self.last_sequence.into());
        visitor.visit(&Self::LATENCY_US, self.latency_us.into());
    }
}

impl Deserializable for StatusReport {
    fn deserialize(de: &Deserializer<'_>) -> Result<Self, SerError> {
        Ok(Self {
            heartbeats: de.read_field(&Self::HEARTBEATS)?,
            last_sequence: de.read_field(&Self::LAST_SEQUENCE)?,
            latency_us: de.read_optional(Self::LATENCY_US.tag)?.unwrap_or_default(),
        })
    }
}

impl Payload for StatusReport {
    const ID: u32 = 101;
    const LONG_NAME: &'static str = "cadence.demo.StatusReport";
    const FIELDS: &'static [FieldInfo] = &[Self::HEARTBEATS, Self::LAST_SEQUENCE, Self::LATENCY_US];
}

/// Registry with every payload the demo produces.
pub fn registry() -> Result<TypeRegistry, cadence::Error> {
    let registry = TypeRegistry::new();
    registry.register::<Heartbeat>()?;
    registry.register::<StatusReport>()?;
    registry.register::<TimeStamp>()?;
    Ok(registry)
}

pub struct HeartbeatModule {
    identity: ModuleIdentity,
    sequence: u64,
    reports: u64,
}

impl HeartbeatModule {
    pub fn new(identity: ModuleIdentity) -> Self {
        Self {
            identity,
            sequence: 0,
            reports: 0,
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn reports(&self) -> u64 {
        self.reports
    }
}

impl TimeTriggeredModule for HeartbeatModule {
    fn identity(&self) -> &ModuleIdentity {
        &self.identity
    }

    fn set_up(&mut self, ctx: &mut ModuleContext) {
        log::info!(
            "[HeartbeatModule::set_up] {} id={:?} freq={} Hz",
            self.identity.name(),
            self.identity.identifier(),
            self.identity.frequency()
        );
        log::debug!(
            "[HeartbeatModule::set_up] configuration:\n{}",
            ctx.key_value_configuration()
        );
    }

    fn body(&mut self, ctx: &mut ModuleContext) -> ExitCode {
        let label: String = ctx
            .key_value_configuration()
            .get_value_or("heartbeat.label", "heartbeat".to_string());

        while ctx.state_and_wait_for_remaining_time_in_timeslice() == ModuleState::Running {
            for container in ctx.receive() {
                if let Ok(report) = container.data::<StatusReport>() {
                    self.reports += 1;
                    log::trace!(
                        "[HeartbeatModule::body] monitor saw {} heartbeats",
                        report.heartbeats
                    );
                }
            }

            self.sequence += 1;
            let beat = Heartbeat {
                sequence: self.sequence,
                label: label.clone(),
                taken: ctx.time(),
            };
            match Container::new(&beat) {
                Ok(container) => ctx.send(container.with_sample_time_stamp(ctx.time())),
                Err(e) => {
                    log::error!("[HeartbeatModule::body] encode failed: {}", e);
                    return ExitCode::SeriousError;
                }
            }
        }
        ExitCode::Okay
    }

    fn tear_down(&mut self, _ctx: &mut ModuleContext) {
        log::info!(
            "[HeartbeatModule::tear_down] sent {} heartbeats, got {} reports",
            self.sequence,
            self.reports
        );
    }
}

/// Counts heartbeats and answers with a [`StatusReport`] every step.
pub struct Monitor {
    frequency: f32,
    heartbeats: u32,
    last_sequence: u64,
    latency_us: i64,
}

impl Monitor {
    pub fn new(frequency: f32) -> Self {
        Self {
            frequency,
            heartbeats: 0,
            last_sequence: 0,
            latency_us: 0,
        }
    }

    pub fn heartbeats(&self) -> u32 {
        self.heartbeats
    }
}

impl FeedbackComponent for Monitor {
    fn frequency(&self) -> f32 {
        self.frequency
    }

    fn next_container(&mut self, container: &Container) {
        if let Ok(beat) = container.data::<Heartbeat>() {
            self.heartbeats += 1;
            self.last_sequence = beat.sequence;
            self.latency_us = container.received_time_stamp().to_micros()
                - container.sample_time_stamp().to_micros();
        }
    }

    fn step(&mut self, _time: &TimeStamp, outbox: &mut Outbox) {
        let report = StatusReport {
            heartbeats: self.heartbeats,
            last_sequence: self.last_sequence,
            latency_us: self.latency_us,
        };
        match Container::new(&report) {
            Ok(container) => outbox.send(container),
            Err(e) => log::warn!("[Monitor::step] encode failed: {}", e),
        }
    }
}

/// Appends every container seen on the conference to a recording file.
pub struct Recorder {
    frequency: f32,
    out: BufWriter<File>,
    written: u64,
    failed: bool,
}

impl Recorder {
    pub fn create(path: &Path, frequency: f32) -> std::io::Result<Self> {
        Ok(Self {
            frequency,
            out: BufWriter::new(File::create(path)?),
            written: 0,
            failed: false,
        })
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FeedbackComponent for Recorder {
    fn frequency(&self) -> f32 {
        self.frequency
    }

    fn next_container(&mut self, container: &Container) {
        if self.failed {
            return;
        }
        match container.write_to(&mut self.out) {
            Ok(()) => self.written += 1,
            Err(e) => {
                log::error!("[Recorder::next_container] write failed, recording stops: {}", e);
                self.failed = true;
            }
        }
    }

    fn step(&mut self, _time: &TimeStamp, _outbox: &mut Outbox) {}

    fn tear_down(&mut self) {
        if let Err(e) = self.out.flush() {
            log::error!("[Recorder::tear_down] flush failed: {}", e);
        }
        log::info!("[Recorder::tear_down] {} containers recorded", self.written);
    }
}
