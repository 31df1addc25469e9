//! Test utilities for deterministic simulation testing
//!
//! Provides a controllable clock and a single-threaded timer driver so
//! time-dependent scenarios run deterministically and instantly.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bluebridge_core::{
    Command, SessionController, SimulatorConfig, TimeSource, TimerEvent, Timestamp,
};

// ----------------------------------------------------------------------------
// Mock Time Source
// ----------------------------------------------------------------------------

/// Mock time source for deterministic testing
#[derive(Debug, Clone)]
pub struct MockTimeSource {
    current_time: Arc<AtomicU64>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn set_time(&self, millis: u64) {
        self.current_time.store(millis, Ordering::SeqCst);
    }

    pub fn current_time(&self) -> u64 {
        self.current_time.load(Ordering::SeqCst)
    }
}

impl Default for MockTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.current_time.load(Ordering::SeqCst))
    }
}

// ----------------------------------------------------------------------------
// Simulation Driver
// ----------------------------------------------------------------------------

/// Pending timer ordered by due time, with a sequence number breaking ties
/// in schedule order
#[derive(Debug, PartialEq, Eq)]
struct PendingTimer {
    due: u64,
    seq: u64,
    event: TimerEvent,
}

impl Ord for PendingTimer {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

impl PartialOrd for PendingTimer {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Drives a [`SessionController`] with a manual scheduler and mock clock
///
/// Commands are applied immediately; the timers they request are queued by
/// due time and fired as the clock is advanced, mirroring how the runtime
/// feeds fired timers back into the core.
pub struct SimulationDriver {
    pub controller: SessionController<MockTimeSource, ChaCha8Rng>,
    clock: MockTimeSource,
    queue: BinaryHeap<Reverse<PendingTimer>>,
    seq: u64,
}

impl SimulationDriver {
    pub fn new() -> Self {
        Self::with_config(SimulatorConfig::default())
    }

    pub fn with_config(config: SimulatorConfig) -> Self {
        let clock = MockTimeSource::new();
        let controller =
            SessionController::new(config, clock.clone(), ChaCha8Rng::from_seed([42u8; 32]))
                .expect("default test config must validate");
        Self {
            controller,
            clock,
            queue: BinaryHeap::new(),
            seq: 0,
        }
    }

    /// Current mock time in milliseconds
    pub fn now(&self) -> u64 {
        self.clock.current_time()
    }

    /// Apply a command, queueing any timers it requests
    pub fn command(&mut self, command: Command) {
        let timers = self.controller.handle_command(command);
        for request in timers {
            self.seq += 1;
            self.queue.push(Reverse(PendingTimer {
                due: self.now() + request.delay.as_millis() as u64,
                seq: self.seq,
                event: request.event,
            }));
        }
    }

    /// Advance the clock to an absolute time, firing due timers in order
    pub fn advance_to(&mut self, millis: u64) {
        assert!(millis >= self.now(), "clock cannot move backwards");
        while let Some(Reverse(pending)) = self.queue.peek() {
            if pending.due > millis {
                break;
            }
            let Reverse(pending) = self.queue.pop().expect("peeked timer must pop");
            self.clock.set_time(pending.due);
            self.controller.handle_timer(pending.event);
        }
        self.clock.set_time(millis);
    }

    /// Advance the clock by a relative number of milliseconds
    pub fn advance(&mut self, millis: u64) {
        self.advance_to(self.now() + millis);
    }
}

impl Default for SimulationDriver {
    fn default() -> Self {
        Self::new()
    }
}
