// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Module lifecycle supervisor.
//!
//! # Run Loop
//!
//! ```text
//!  setup()            run(env, cycles)                          tear_down()
//!  Idle -> Ready ---> guards -> feedback.setup -> spawn modules --> Idle
//!                        |      wait first suspension
//!                        |      tick 0..n:
//!                        |        modules:  collect done of due slices
//!                        |        feedback: next_container*, step, publish
//!                        |        modules:  Tick (no wait)
//!                        |      Stop -> join -> feedback.tear_down
//!                        v                         -> Stopped
//!                   RunResult (no side effects on guard failure)
//! ```
//!
//! The tick period is the inverse of the highest declared frequency; a
//! component running at `f` is due every `d = round(max_f / f)` ticks. A
//! module signalled at tick `t` has until the start of tick `t + d` to report
//! back. A module that has not reported by then counts a deadline miss and is
//! skipped until it does; the tick loop never waits past a tick boundary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};

use super::environment::distinct;
use super::{
    Conference, ConferenceEndpoint, Cycles, ExitCode, ModuleContext, ModuleIdentity, Outbox,
    RunResult, RuntimeEnvironment, SharedFeedback, SharedModule, Signal, SupervisorState,
};
use crate::config::KeyValueConfiguration;
use crate::data::TimeStamp;

/// Default wait for a module to reach its first suspension point.
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Cooperative stop signal for a running supervisor.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

/// Counters of the last run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStatistics {
    pub cycles: u64,
    pub deadline_misses: u64,
    /// Module name and exit code, in registration order.
    pub exit_codes: Vec<(String, ExitCode)>,
}

/// Supervisor side of one module thread.
struct ModuleSlot {
    name: String,
    divisor: u64,
    signals: Sender<Signal>,
    done: Receiver<()>,
    handle: Option<JoinHandle<ExitCode>>,
    /// Signalled and not reported back yet.
    busy: bool,
    /// End of the slice the module is working on.
    deadline: Instant,
    exited: bool,
}

struct FeedbackSlot {
    component: SharedFeedback,
    divisor: u64,
    endpoint: ConferenceEndpoint,
    outbox: Outbox,
}

/// Drives registered modules and feedback components through their lifecycle.
///
/// The supervisor owns none of the components; it borrows the environment for
/// the duration of [`run`](Self::run).
pub struct Supervisor {
    cid: u32,
    config: KeyValueConfiguration,
    state: SupervisorState,
    conference: Conference,
    startup_timeout: Duration,
    stop: StopHandle,
    statistics: RunStatistics,
}

impl Supervisor {
    pub fn new(cid: u32, config: KeyValueConfiguration) -> Self {
        Self {
            cid,
            config,
            state: SupervisorState::Idle,
            conference: Conference::new(cid),
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
            stop: StopHandle::default(),
            statistics: RunStatistics::default(),
        }
    }

    #[must_use]
    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    pub fn cid(&self) -> u32 {
        self.cid
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    pub fn configuration(&self) -> &KeyValueConfiguration {
        &self.config
    }

    /// The conference the supervised components share; join it to observe
    /// or inject traffic.
    pub fn conference(&self) -> &Conference {
        &self.conference
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn statistics(&self) -> &RunStatistics {
        &self.statistics
    }

    /// Arm the supervisor for the next `run`.
    pub fn setup(&mut self) {
        log::debug!("[Supervisor::setup] cid={} {} -> Ready", self.cid, self.state);
        self.stop.reset();
        self.state = SupervisorState::Ready;
    }

    /// Return to `Idle`. Safe to call in any state, any number of times.
    pub fn tear_down(&mut self) {
        log::debug!("[Supervisor::tear_down] cid={} {} -> Idle", self.cid, self.state);
        self.state = SupervisorState::Idle;
    }

    pub fn run(&mut self, env: &mut RuntimeEnvironment, cycles: Cycles) -> RunResult {
        if self.state != SupervisorState::Ready {
            log::warn!(
                "[Supervisor::run] setup() not called (state {}), nothing started",
                self.state
            );
            return RunResult::SetupNotCalled;
        }

        let modules = distinct(env.modules());
        let feedback = distinct(env.feedback_components());
        if modules.len() < env.modules().len() || feedback.len() < env.feedback_components().len()
        {
            log::warn!(
                "[Supervisor::run] duplicate registrations ignored ({} modules, {} feedback components distinct)",
                modules.len(),
                feedback.len()
            );
        }

        let identities: Vec<ModuleIdentity> =
            modules.iter().map(|m| m.lock().identity().clone()).collect();
        let frequencies: Vec<f32> = feedback.iter().map(|f| f.lock().frequency()).collect();

        if let Some(identity) = identities.iter().find(|i| i.cid() != self.cid) {
            log::warn!(
                "[Supervisor::run] module {} belongs to conference {}, supervisor runs {}",
                identity.name(),
                identity.cid(),
                self.cid
            );
            return RunResult::ConferenceMismatch;
        }

        let all_frequencies: Vec<f32> = identities
            .iter()
            .map(ModuleIdentity::frequency)
            .chain(frequencies.iter().copied())
            .collect();
        if let Some(bad) = all_frequencies
            .iter()
            .find(|f| !f.is_finite() || **f <= 0.0)
        {
            log::warn!("[Supervisor::run] invalid frequency {}", bad);
            return RunResult::InvalidFrequency;
        }

        let max_frequency = all_frequencies
            .iter()
            .copied()
            .fold(0.0f32, f32::max)
            .max(f32::MIN_POSITIVE);
        let period = if all_frequencies.is_empty() {
            Duration::from_secs(1)
        } else {
            Duration::from_secs_f64(1.0 / f64::from(max_frequency))
        };
        let divisor_for = |f: f32| -> u64 { ((max_frequency / f).round() as u64).max(1) };

        self.state = SupervisorState::Running;
        self.statistics = RunStatistics::default();
        log::info!(
            "[Supervisor::run] cid={} modules={} feedback={} period={:?} cycles={:?}",
            self.cid,
            modules.len(),
            feedback.len(),
            period,
            cycles
        );

        for component in &feedback {
            component.lock().setup();
        }
        let mut feedback_slots: Vec<FeedbackSlot> = feedback
            .into_iter()
            .zip(frequencies)
            .map(|(component, f)| FeedbackSlot {
                component,
                divisor: divisor_for(f),
                endpoint: self.conference.join(),
                outbox: Outbox::new(),
            })
            .collect();

        let mut module_slots: Vec<ModuleSlot> = modules
            .into_iter()
            .zip(identities)
            .map(|(module, identity)| {
                let divisor = divisor_for(identity.frequency());
                self.spawn_module(module, identity, divisor)
            })
            .collect();

        self.await_first_suspension(&mut module_slots);

        let mut tick_start = Instant::now();
        let mut tick: u64 = 0;
        while cycles.allows(tick) && !self.stop.is_stopped() {
            self.collect_modules(&mut module_slots, tick);
            let now = Instant::now();
            if tick_start > now {
                thread::sleep(tick_start - now);
            }
            let time = TimeStamp::now();

            for slot in feedback_slots.iter_mut().filter(|s| tick % s.divisor == 0) {
                Self::step_feedback(slot, &time);
            }
            Self::signal_modules(&mut module_slots, tick, time, tick_start, period);
            tick += 1;
            tick_start += period;
        }
        self.statistics.cycles = tick;
        self.collect_last_slices(&mut module_slots, tick);

        let codes = self.stop_modules(module_slots);
        for slot in &feedback_slots {
            slot.component.lock().tear_down();
        }
        feedback_slots.clear();

        self.state = SupervisorState::Stopped;
        let failed = codes.iter().filter(|(_, c)| *c != ExitCode::Okay).count();
        self.statistics.exit_codes = codes;
        log::info!(
            "[Supervisor::run] finished cycles={} deadline_misses={} failed_modules={}",
            self.statistics.cycles,
            self.statistics.deadline_misses,
            failed
        );
        if failed == 0 {
            RunResult::Ok
        } else {
            RunResult::ModuleFailed
        }
    }

    fn spawn_module(
        &self,
        module: SharedModule,
        identity: ModuleIdentity,
        divisor: u64,
    ) -> ModuleSlot {
        let (signal_tx, signal_rx) = channel::unbounded();
        let (done_tx, done_rx) = channel::unbounded();
        let name = identity.name().to_string();
        let config = self.config.for_module(identity.name(), identity.identifier());
        let mut ctx = ModuleContext::new(
            identity,
            config,
            signal_rx,
            done_tx,
            self.conference.join(),
        );

        let spawned = thread::Builder::new()
            .name(format!("cadence-{}", name))
            .spawn(move || {
                let mut module = module.lock();
                module.set_up(&mut ctx);
                let code = module.body(&mut ctx);
                module.tear_down(&mut ctx);
                code
            });

        let (handle, exited) = match spawned {
            Ok(handle) => (Some(handle), false),
            Err(e) => {
                log::error!("[Supervisor::spawn_module] {}: {}", name, e);
                (None, true)
            }
        };
        ModuleSlot {
            name,
            divisor,
            signals: signal_tx,
            done: done_rx,
            handle,
            busy: false,
            deadline: Instant::now(),
            exited,
        }
    }

    fn await_first_suspension(&self, slots: &mut [ModuleSlot]) {
        for slot in slots.iter_mut().filter(|s| !s.exited) {
            match slot.done.recv_timeout(self.startup_timeout) {
                Ok(()) => {}
                Err(RecvTimeoutError::Timeout) => {
                    log::warn!(
                        "[Supervisor::run] {} not ready after {:?}",
                        slot.name,
                        self.startup_timeout
                    );
                    slot.busy = true;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    log::debug!("[Supervisor::run] {} returned before its first cycle", slot.name);
                    slot.exited = true;
                }
            }
        }
    }

    fn step_feedback(slot: &mut FeedbackSlot, time: &TimeStamp) {
        let mut component = slot.component.lock();
        for container in slot.endpoint.receive() {
            component.next_container(&container);
        }
        component.step(time, &mut slot.outbox);
        drop(component);
        for container in slot.outbox.drain() {
            slot.endpoint.send(container);
        }
    }

    /// Wait for modules due at `tick` to report the slice they were given,
    /// each at most until the end of that slice.
    fn collect_modules(&mut self, slots: &mut [ModuleSlot], tick: u64) {
        for slot in slots
            .iter_mut()
            .filter(|s| s.busy && !s.exited && tick % s.divisor == 0)
        {
            self.collect(slot, tick);
        }
    }

    /// Final slices of a finished run, which have no next tick.
    fn collect_last_slices(&mut self, slots: &mut [ModuleSlot], tick: u64) {
        for slot in slots.iter_mut().filter(|s| s.busy && !s.exited) {
            self.collect(slot, tick);
        }
    }

    fn collect(&mut self, slot: &mut ModuleSlot, tick: u64) {
        match slot.done.recv_deadline(slot.deadline) {
            Ok(()) => slot.busy = false,
            Err(RecvTimeoutError::Timeout) => {
                self.statistics.deadline_misses += 1;
                log::warn!(
                    "[Supervisor::run] {} overran its slice, skipped at tick {}",
                    slot.name,
                    tick
                );
            }
            Err(RecvTimeoutError::Disconnected) => slot.exited = true,
        }
    }

    fn signal_modules(
        slots: &mut [ModuleSlot],
        tick: u64,
        time: TimeStamp,
        tick_start: Instant,
        period: Duration,
    ) {
        for slot in slots.iter_mut() {
            if slot.exited || slot.busy || tick % slot.divisor != 0 {
                continue;
            }
            if slot.signals.send(Signal::Tick(time)).is_err() {
                slot.exited = true;
                continue;
            }
            slot.busy = true;
            slot.deadline = tick_start + slice_length(period, slot.divisor);
        }
    }

    fn stop_modules(&self, slots: Vec<ModuleSlot>) -> Vec<(String, ExitCode)> {
        for slot in &slots {
            let _ = slot.signals.send(Signal::Stop);
        }
        slots
            .into_iter()
            .map(|slot| {
                let ModuleSlot {
                    name,
                    signals,
                    handle,
                    ..
                } = slot;
                drop(signals);
                let code = match handle {
                    Some(handle) => handle.join().unwrap_or_else(|_| {
                        log::error!("[Supervisor::run] {} panicked", name);
                        ExitCode::ExceptionCaught
                    }),
                    None => ExitCode::SeriousError,
                };
                log::debug!("[Supervisor::run] {} exited with {}", name, code);
                (name, code)
            })
            .collect()
    }
}

/// Time a component due every `divisor` ticks has for one slice.
fn slice_length(period: Duration, divisor: u64) -> Duration {
    period.saturating_mul(u32::try_from(divisor).unwrap_or(u32::MAX))
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("cid", &self.cid)
            .field("state", &self.state)
            .field("statistics", &self.statistics)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{FeedbackComponent, ModuleState, TimeTriggeredModule};
    use parking_lot::Mutex;

    struct Ticker {
        identity: ModuleIdentity,
        cycles: u64,
    }

    impl Ticker {
        fn shared(cid: u32, freq: f32) -> Arc<Mutex<Self>> {
            Arc::new(Mutex::new(Self {
                identity: ModuleIdentity::new("ticker", cid).with_frequency(freq),
                cycles: 0,
            }))
        }
    }

    impl TimeTriggeredModule for Ticker {
        fn identity(&self) -> &ModuleIdentity {
            &self.identity
        }

        fn body(&mut self, ctx: &mut ModuleContext) -> ExitCode {
            while ctx.state_and_wait_for_remaining_time_in_timeslice() == ModuleState::Running {
                self.cycles += 1;
            }
            ExitCode::Okay
        }
    }

    /// Spends `work` of every slice before reporting back.
    struct Worker {
        identity: ModuleIdentity,
        work: Duration,
        cycles: u64,
    }

    impl Worker {
        fn shared(freq: f32, work: Duration) -> Arc<Mutex<Self>> {
            Arc::new(Mutex::new(Self {
                identity: ModuleIdentity::new("worker", 1).with_frequency(freq),
                work,
                cycles: 0,
            }))
        }
    }

    impl TimeTriggeredModule for Worker {
        fn identity(&self) -> &ModuleIdentity {
            &self.identity
        }

        fn body(&mut self, ctx: &mut ModuleContext) -> ExitCode {
            while ctx.state_and_wait_for_remaining_time_in_timeslice() == ModuleState::Running {
                self.cycles += 1;
                thread::sleep(self.work);
            }
            ExitCode::Okay
        }
    }

    struct Panicker(ModuleIdentity);

    impl TimeTriggeredModule for Panicker {
        fn identity(&self) -> &ModuleIdentity {
            &self.0
        }

        fn body(&mut self, _ctx: &mut ModuleContext) -> ExitCode {
            panic!("module failure");
        }
    }

    #[derive(Default)]
    struct Probe {
        freq: f32,
        setups: u32,
        teardowns: u32,
        steps: u32,
    }

    impl FeedbackComponent for Probe {
        fn frequency(&self) -> f32 {
            self.freq
        }

        fn setup(&mut self) {
            self.setups += 1;
        }

        fn tear_down(&mut self) {
            self.teardowns += 1;
        }

        fn step(&mut self, _time: &TimeStamp, _outbox: &mut Outbox) {
            self.steps += 1;
        }
    }

    #[test]
    fn test_guards_leave_state_untouched() {
        let mut supervisor = Supervisor::new(5, KeyValueConfiguration::new());
        let mut env = RuntimeEnvironment::new();
        let probe = Arc::new(Mutex::new(Probe {
            freq: 0.0,
            ..Probe::default()
        }));
        env.add_feedback(Arc::clone(&probe));

        assert_eq!(
            supervisor.run(&mut env, Cycles::Bounded(1)),
            RunResult::SetupNotCalled
        );
        supervisor.setup();
        assert_eq!(
            supervisor.run(&mut env, Cycles::Bounded(1)),
            RunResult::InvalidFrequency
        );
        assert_eq!(supervisor.state(), SupervisorState::Ready);
        assert_eq!(probe.lock().setups, 0);

        probe.lock().freq = 10.0;
        env.add_module(Ticker::shared(6, 10.0));
        assert_eq!(
            supervisor.run(&mut env, Cycles::Bounded(1)),
            RunResult::ConferenceMismatch
        );
        assert_eq!(probe.lock().setups, 0);
    }

    #[test]
    fn test_divisor_schedules_slower_components() {
        let mut supervisor = Supervisor::new(1, KeyValueConfiguration::new());
        let mut env = RuntimeEnvironment::new();
        let fast = Ticker::shared(1, 100.0);
        let slow = Arc::new(Mutex::new(Probe {
            freq: 25.0,
            ..Probe::default()
        }));
        env.add_module(Arc::clone(&fast));
        env.add_feedback(Arc::clone(&slow));

        supervisor.setup();
        assert_eq!(supervisor.run(&mut env, Cycles::Bounded(8)), RunResult::Ok);
        assert_eq!(fast.lock().cycles, 8);
        // due at ticks 0 and 4
        assert_eq!(slow.lock().steps, 2);
        assert_eq!(supervisor.statistics().cycles, 8);
        assert_eq!(supervisor.state(), SupervisorState::Stopped);
    }

    #[test]
    fn test_panicking_module_reports_exception() {
        let mut supervisor = Supervisor::new(1, KeyValueConfiguration::new());
        let mut env = RuntimeEnvironment::new();
        env.add_module(Arc::new(Mutex::new(Panicker(
            ModuleIdentity::new("panicker", 1).with_frequency(100.0),
        ))));
        supervisor.setup();
        assert_eq!(
            supervisor.run(&mut env, Cycles::Bounded(2)),
            RunResult::ModuleFailed
        );
        assert_eq!(
            supervisor.statistics().exit_codes,
            vec![("panicker".to_string(), ExitCode::ExceptionCaught)]
        );
    }

    #[test]
    fn test_stop_handle_ends_unbounded_run() {
        let mut supervisor = Supervisor::new(1, KeyValueConfiguration::new());
        let mut env = RuntimeEnvironment::new();
        env.add_module(Ticker::shared(1, 200.0));
        supervisor.setup();

        let handle = supervisor.stop_handle();
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            handle.stop();
        });
        assert_eq!(supervisor.run(&mut env, Cycles::Unbounded), RunResult::Ok);
        stopper.join().expect("stopper thread");
        assert!(supervisor.statistics().cycles > 0);
    }

    #[test]
    fn test_tear_down_is_idempotent() {
        let mut supervisor = Supervisor::new(1, KeyValueConfiguration::new());
        supervisor.tear_down();
        supervisor.tear_down();
        assert_eq!(supervisor.state(), SupervisorState::Idle);
        supervisor.setup();
        supervisor.tear_down();
        let mut env = RuntimeEnvironment::new();
        assert_eq!(
            supervisor.run(&mut env, Cycles::Bounded(1)),
            RunResult::SetupNotCalled
        );
    }

    #[test]
    fn test_slower_module_gets_its_own_slice() {
        let mut supervisor = Supervisor::new(1, KeyValueConfiguration::new());
        let mut env = RuntimeEnvironment::new();
        // 100 ms slice, 20 ms of work.
        let worker = Worker::shared(10.0, Duration::from_millis(20));
        let fast = Arc::new(Mutex::new(Probe {
            freq: 100.0,
            ..Probe::default()
        }));
        env.add_module(Arc::clone(&worker));
        env.add_feedback(Arc::clone(&fast));

        supervisor.setup();
        let started = Instant::now();
        assert_eq!(supervisor.run(&mut env, Cycles::Bounded(50)), RunResult::Ok);
        let elapsed = started.elapsed();

        assert_eq!(supervisor.statistics().deadline_misses, 0);
        assert_eq!(worker.lock().cycles, 5);
        assert_eq!(fast.lock().steps, 50);
        assert!(elapsed < Duration::from_secs(2), "run took {:?}", elapsed);
    }

    #[test]
    fn test_overrunning_module_does_not_stall_ticks() {
        let mut supervisor = Supervisor::new(1, KeyValueConfiguration::new());
        let mut env = RuntimeEnvironment::new();
        // 20 ms slice, 70 ms of work.
        let worker = Worker::shared(50.0, Duration::from_millis(70));
        let fast = Arc::new(Mutex::new(Probe {
            freq: 100.0,
            ..Probe::default()
        }));
        env.add_module(Arc::clone(&worker));
        env.add_feedback(Arc::clone(&fast));

        supervisor.setup();
        let started = Instant::now();
        assert_eq!(supervisor.run(&mut env, Cycles::Bounded(20)), RunResult::Ok);
        let elapsed = started.elapsed();

        assert!(supervisor.statistics().deadline_misses > 0);
        assert!(worker.lock().cycles < 10);
        assert_eq!(fast.lock().steps, 20);
        assert!(elapsed < Duration::from_secs(2), "run took {:?}", elapsed);
    }
}
