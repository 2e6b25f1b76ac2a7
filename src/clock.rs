// 9.1 clock.rs: time source consulted by the deadline check.

use crate::types::Timestamp;

pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Clock that only moves when told to. Deterministic runs and tests.
#[derive(Debug, Clone, Copy)]
pub struct ManualClock {
    now: Timestamp,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self { now: start }
    }

    pub fn set(&mut self, timestamp: Timestamp) {
        self.now = timestamp;
    }

    pub fn advance(&mut self, millis: i64) {
        self.now = self.now.plus_millis(millis);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Timestamp::from_millis(0))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now
    }
}
