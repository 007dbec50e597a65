// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Manually-stepped clocks and timing sources.

use parking_lot::Mutex;
use std::sync::Arc;

use scanout_core::time::{Duration, TickTime};
use scanout_core::timing::{ClockSource, TimingSource, VsyncTick};

/// A [`ClockSource`] whose time is set by the test.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<TickTime>,
}

impl ManualClock {
    /// Creates a clock reading `now`.
    #[must_use]
    pub fn new(now: TickTime) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: TickTime) {
        *self.now.lock() = now;
    }

    /// Advances the clock by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now = now.saturating_add(by);
    }
}

impl ClockSource for ManualClock {
    fn now(&self) -> TickTime {
        *self.now.lock()
    }
}

/// A [`TimingSource`] generating evenly spaced ticks on demand.
///
/// Each [`step`](ManualTimingSource::step) advances the timeline by one
/// interval and returns the new tick edge, which is what a vsync interrupt
/// handler would pass into the queues.
#[derive(Debug)]
pub struct ManualTimingSource {
    tick: Mutex<VsyncTick>,
    running: Mutex<bool>,
}

impl ManualTimingSource {
    /// Creates a running source whose first observed edge is `start`.
    #[must_use]
    pub fn new(start: TickTime, interval: Duration) -> Arc<Self> {
        Arc::new(Self {
            tick: Mutex::new(VsyncTick::new(start, interval)),
            running: Mutex::new(true),
        })
    }

    /// Advances to the next tick edge and returns it.
    pub fn step(&self) -> VsyncTick {
        let mut tick = self.tick.lock();
        tick.now = tick.now.saturating_add(tick.interval);
        *tick
    }

    /// Changes the tick interval, as a display mode switch would.
    pub fn set_interval(&self, interval: Duration) {
        self.tick.lock().interval = interval;
    }

    /// Stops the source; [`is_running`](TimingSource::is_running) reports
    /// `false` until [`start`](ManualTimingSource::start).
    pub fn stop(&self) {
        *self.running.lock() = false;
    }

    /// Restarts a stopped source.
    pub fn start(&self) {
        *self.running.lock() = true;
    }
}

impl TimingSource for ManualTimingSource {
    fn last_tick(&self) -> VsyncTick {
        *self.tick.lock()
    }

    fn is_running(&self) -> bool {
        *self.running.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_evenly_spaced() {
        let timing = ManualTimingSource::new(TickTime(100), Duration(10));
        assert_eq!(timing.step().now, TickTime(110));
        assert_eq!(timing.step().now, TickTime(120));
        assert_eq!(timing.last_tick().now, TickTime(120));
    }

    #[test]
    fn stop_and_start_toggle_running() {
        let timing = ManualTimingSource::new(TickTime(0), Duration(10));
        assert!(timing.is_running());
        timing.stop();
        assert!(!timing.is_running());
        timing.start();
        assert!(timing.is_running());
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(TickTime(5));
        clock.advance(Duration(10));
        assert_eq!(clock.now(), TickTime(15));
        clock.set(TickTime(100));
        assert_eq!(clock.now(), TickTime(100));
    }
}
