// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timing-source contracts.
//!
//! The queues never read a clock themselves. The driver's tick handler
//! observes a vsync edge, packages it as a [`VsyncTick`], and passes it into
//! [`FrameQueue::advance`](crate::frame_queue::FrameQueue::advance) and
//! [`MetadataQueue::pop_ready`](crate::metadata::MetadataQueue::pop_ready).
//!
//! [`TimingSource`] is the contract a display output's timing generator
//! exposes for callers that need the *latest* tick outside the tick handler —
//! in this core that is the metadata producer's timestamp-in-past test.
//! [`ClockSource`] is the free-running monotonic clock used when no timing
//! source is attached. Both are read-only from the queues' perspective.

use crate::time::{Duration, TickTime};

/// One observed vsync edge: its timestamp and the field/frame duration of
/// the active display mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VsyncTick {
    /// Timestamp of the tick edge.
    pub now: TickTime,
    /// Duration of one field or frame at the current mode.
    pub interval: Duration,
}

impl VsyncTick {
    /// Creates a tick from a timestamp and interval.
    #[inline]
    #[must_use]
    pub const fn new(now: TickTime, interval: Duration) -> Self {
        Self { now, interval }
    }
}

/// Read-only view of a display output's timing generator.
///
/// Implementations are supplied by the device layer; the queues only ever
/// read the two values and never mutate the source.
pub trait TimingSource {
    /// Returns the most recently observed tick edge.
    fn last_tick(&self) -> VsyncTick;

    /// Returns `true` while the timing generator is producing ticks.
    ///
    /// A stopped source (display off, mode switch in progress) makes
    /// deadline validation fall back to the [`ClockSource`].
    fn is_running(&self) -> bool;
}

/// A free-running monotonic clock on the same timeline as vsync timestamps.
pub trait ClockSource {
    /// Returns the current time.
    fn now(&self) -> TickTime;
}
