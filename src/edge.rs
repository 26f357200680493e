//! Bounded polling for a level on the data line.

use crate::line::{DataLine, PinLevel};
use crate::timer::{PrecisionTimer, Scheduler};

/// How often a long poll hands the CPU back to the scheduler.
///
/// The count is in polling iterations, one microsecond each, so the default
/// of 1000 yields roughly once per millisecond of waiting. That is well inside
/// the FreeRTOS task watchdog window; other schedulers may want a different
/// interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YieldPolicy {
    every: u32,
}

impl YieldPolicy {
    pub const DEFAULT_EVERY: u32 = 1000;

    /// `every` is clamped to at least one iteration.
    pub fn every(iterations: u32) -> Self {
        Self {
            every: iterations.max(1),
        }
    }

    pub fn iterations(&self) -> u32 {
        self.every
    }

    fn due(&self, elapsed: u32) -> bool {
        elapsed % self.every == 0
    }
}

impl Default for YieldPolicy {
    fn default() -> Self {
        Self::every(Self::DEFAULT_EVERY)
    }
}

/// Poll `line` once per microsecond until it reads `target`.
///
/// Returns `true` as soon as the level matches (immediately if it already
/// does) and `false` once `timeout_us` microseconds of polling have elapsed
/// without a match. Every `policy` iterations the scheduler gets one yield;
/// the elapsed count keeps running across it.
pub fn wait_for_level<L, T, S>(
    line: &mut L,
    timer: &mut T,
    scheduler: &mut S,
    policy: YieldPolicy,
    target: PinLevel,
    timeout_us: u32,
) -> bool
where
    L: DataLine + ?Sized,
    T: PrecisionTimer + ?Sized,
    S: Scheduler + ?Sized,
{
    let mut elapsed = 0u32;
    while line.read() != target {
        timer.delay_us(1);
        elapsed += 1;
        if elapsed >= timeout_us {
            return false;
        }
        if policy.due(elapsed) {
            scheduler.yield_now();
        }
    }
    true
}
