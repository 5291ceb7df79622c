//! Stopwatch engine: elapsed-time tracking and lap recording
//!
//! The engine never touches timers itself. Transitions that need the periodic
//! sampler started or stopped return a [`Sampling`] instruction for the owner
//! to carry out, so the whole state machine runs against any [`Clock`].

use crate::clock::{Clock, MonotonicClock};
use crate::format::{self, TimeParts};

/// Sampling side effect requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sampling {
    /// Arm the periodic sampler for this watch
    Begin,
    /// Cancel the periodic sampler for this watch
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Stopped,
    Running,
}

/// Snapshot of the elapsed time at the moment a lap was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LapRecord {
    parts: TimeParts,
}

impl LapRecord {
    pub fn parts(&self) -> TimeParts {
        self.parts
    }
}

pub struct StopwatchEngine<C: Clock = MonotonicClock> {
    clock: C,
    elapsed_ms: u64,
    /// Clock reading at which `elapsed_ms` was zero; `Some` only while running
    reference_ms: Option<u64>,
    laps: Vec<LapRecord>,
}

impl<C: Clock> StopwatchEngine<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            elapsed_ms: 0,
            reference_ms: None,
            laps: Vec::new(),
        }
    }

    pub fn state(&self) -> WatchState {
        if self.reference_ms.is_some() {
            WatchState::Running
        } else {
            WatchState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.reference_ms.is_some()
    }

    /// Elapsed time as of the last sample or transition
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn parts(&self) -> TimeParts {
        format::format(self.elapsed_ms)
    }

    pub fn laps(&self) -> &[LapRecord] {
        &self.laps
    }

    pub fn last_lap(&self) -> Option<&LapRecord> {
        self.laps.last()
    }

    /// Start from zero or resume with the carried-over elapsed time
    pub fn start(&mut self) -> Option<Sampling> {
        if self.is_running() {
            return None;
        }
        // Readings start at the clock origin, so elapsed never exceeds now.
        let now = self.clock.now_ms();
        self.reference_ms = Some(now.saturating_sub(self.elapsed_ms));
        Some(Sampling::Begin)
    }

    /// Freeze at the last sampled value
    pub fn stop(&mut self) -> Option<Sampling> {
        self.reference_ms.take()?;
        Some(Sampling::Cancel)
    }

    /// Space-bar behaviour: stop when running, otherwise start or resume
    pub fn toggle(&mut self) -> Option<Sampling> {
        if self.is_running() {
            self.stop()
        } else {
            self.start()
        }
    }

    /// Zero the elapsed time. A running watch keeps running from zero.
    /// Laps are kept.
    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
        if self.reference_ms.is_some() {
            self.reference_ms = Some(self.clock.now_ms());
        }
    }

    /// Recompute elapsed time from the clock. No-op while stopped.
    pub fn sample(&mut self) {
        if let Some(reference) = self.reference_ms {
            let elapsed = self.clock.now_ms().saturating_sub(reference);
            self.elapsed_ms = self.elapsed_ms.max(elapsed);
        }
    }

    /// Append a lap for the current elapsed time, running or not
    pub fn record_lap(&mut self) -> &LapRecord {
        self.laps.push(LapRecord {
            parts: self.parts(),
        });
        &self.laps[self.laps.len() - 1]
    }
}

impl Default for StopwatchEngine<MonotonicClock> {
    fn default() -> Self {
        Self::new(MonotonicClock::new())
    }
}
