// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timestamped side-channel metadata queues.
//!
//! Display outputs carry more than pixels: picture aspect information,
//! audio clock packets, source-description and vendor frames all travel as
//! small payloads that must reach the output hardware on a particular tick.
//! Each [`MetadataQueue`] is a bounded FIFO for one [`MetadataKind`], with
//! the same deadline-plus-slack delivery rule as the frame queue and an
//! *early-ticks* bias that lets an item be handed over ahead of its deadline
//! for one-tick-ahead hardware programming.
//!
//! Items are reference counted: the queue holds one `Arc` clone from accept
//! until delivery (or flush), and dropping the returned `Arc` after
//! consumption is the caller's release. The producer/consumer handle split
//! mirrors the frame queue.

use std::sync::Arc;

use crate::error::{CreateError, MetadataEnqueueError};
use crate::registry::DeviceRegistry;
use crate::time::{Duration, TickTime};
use crate::timing::{ClockSource, TimingSource, VsyncTick};

/// The side-channel packet families an output can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetadataKind {
    /// Picture aspect and scan information.
    PictureInfo,
    /// Audio clock regeneration packets.
    AudioClock,
    /// Source product description frames.
    SourceDescription,
    /// Vendor-specific frames.
    VendorFrame,
    /// Colorimetry and dynamic-range signalling.
    Colorimetry,
}

/// One timestamped metadata payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataItem {
    /// Which packet family this payload belongs to.
    pub kind: MetadataKind,
    /// Earliest tick time at which the payload is valid to present;
    /// [`TickTime::ASAP`] means "as soon as possible".
    pub deadline: TickTime,
    /// Raw packet bytes, already laid out for the output hardware.
    pub payload: Box<[u8]>,
}

impl MetadataItem {
    /// Creates an item from a payload.
    #[must_use]
    pub fn new(kind: MetadataKind, deadline: TickTime, payload: impl Into<Box<[u8]>>) -> Self {
        Self {
            kind,
            deadline,
            payload: payload.into(),
        }
    }
}

/// Delivery knobs for one metadata queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MetadataQueueConfig {
    /// Number of ticks before an item's deadline at which delivery is
    /// already permitted, to allow for lookahead hardware programming.
    pub early_ticks: u32,
    /// Jitter slack as a fraction of the tick interval (`interval /
    /// slack_divisor`); zero disables the slack.
    pub slack_divisor: u32,
}

impl MetadataQueueConfig {
    /// No early bias, half a tick of slack.
    pub const DEFAULT: Self = Self {
        early_ticks: 0,
        slack_divisor: 2,
    };

    /// Early bias in tick units for a given interval.
    fn early_lead(&self, interval: Duration) -> Duration {
        interval.saturating_mul(u64::from(self.early_ticks))
    }

    fn slack(&self, interval: Duration) -> Duration {
        match self.slack_divisor {
            0 => Duration::ZERO,
            divisor => Duration(interval.ticks() / u64::from(divisor)),
        }
    }
}

impl Default for MetadataQueueConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

const MAX_RING_BYTES: usize = (isize::MAX as usize) / 2;

/// Producer-side handle for one metadata queue.
pub struct MetadataProducer {
    ring: rtrb::Producer<Arc<MetadataItem>>,
    kind: MetadataKind,
    config: MetadataQueueConfig,
    last_deadline: TickTime,
    timing: Option<Arc<dyn TimingSource + Send + Sync>>,
    clock: Arc<dyn ClockSource + Send + Sync>,
}

impl MetadataProducer {
    /// Queues an item for delivery, taking one reference on it.
    ///
    /// Rejections: [`TypeMismatch`] for a foreign kind; [`TimestampInPast`]
    /// when a non-zero deadline, less the early-delivery lead, is not in
    /// the future — or is not strictly later than the previously accepted
    /// non-zero deadline; [`QueueBusy`] when the ring slot at the write
    /// cursor is still occupied.
    ///
    /// "Now" for the deadline test is the attached timing source's last
    /// tick while it is running, else the device clock.
    ///
    /// [`TypeMismatch`]: MetadataEnqueueError::TypeMismatch
    /// [`TimestampInPast`]: MetadataEnqueueError::TimestampInPast
    /// [`QueueBusy`]: MetadataEnqueueError::QueueBusy
    pub fn enqueue(&mut self, item: &Arc<MetadataItem>) -> Result<(), MetadataEnqueueError> {
        if item.kind != self.kind {
            return Err(MetadataEnqueueError::TypeMismatch {
                queue: self.kind,
                item: item.kind,
            });
        }

        if !item.deadline.is_asap() {
            let (now, interval) = match self.timing.as_deref() {
                Some(timing) if timing.is_running() => {
                    let tick = timing.last_tick();
                    (tick.now, tick.interval)
                }
                // Detached or stopped: no tick duration is known, so the
                // early bias collapses to zero against the device clock.
                _ => (self.clock.now(), Duration::ZERO),
            };
            let lead = self.config.early_lead(interval);
            let earliest_use = item.deadline.checked_sub(lead).unwrap_or(TickTime::ASAP);
            if earliest_use <= now {
                return Err(MetadataEnqueueError::TimestampInPast);
            }
            if !self.last_deadline.is_asap() && item.deadline <= self.last_deadline {
                return Err(MetadataEnqueueError::TimestampInPast);
            }
        }

        match self.ring.push(Arc::clone(item)) {
            Ok(()) => {
                if !item.deadline.is_asap() {
                    self.last_deadline = item.deadline;
                }
                Ok(())
            }
            Err(rtrb::PushError::Full(_)) => Err(MetadataEnqueueError::QueueBusy),
        }
    }

    /// Binds the timing source used for the timestamp-in-past test.
    pub fn attach(&mut self, timing: Arc<dyn TimingSource + Send + Sync>) {
        self.timing = Some(timing);
    }

    /// Unbinds the timing source; deadline validation falls back to the
    /// device clock.
    pub fn detach(&mut self) {
        self.timing = None;
    }

    /// Number of free ring slots.
    #[must_use]
    pub fn free_slots(&self) -> usize {
        self.ring.slots()
    }
}

impl core::fmt::Debug for MetadataProducer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MetadataProducer")
            .field("kind", &self.kind)
            .field("last_deadline", &self.last_deadline)
            .field("attached", &self.timing.is_some())
            .finish_non_exhaustive()
    }
}

/// Consumer-side handle, drained once per tick by the tick handler.
pub struct MetadataQueue {
    ring: rtrb::Consumer<Arc<MetadataItem>>,
    kind: MetadataKind,
    config: MetadataQueueConfig,
    enabled: bool,
}

impl MetadataQueue {
    /// Creates a metadata queue pair for one packet family.
    ///
    /// The registry supplies the free-running clock used to validate
    /// deadlines while no timing source is attached. Fails with
    /// [`CreateError::ZeroCapacity`] or [`CreateError::OutOfMemory`]
    /// exactly like the frame queue.
    pub fn create(
        registry: &DeviceRegistry,
        kind: MetadataKind,
        capacity: usize,
        config: MetadataQueueConfig,
    ) -> Result<(Self, MetadataProducer), CreateError> {
        if capacity == 0 {
            return Err(CreateError::ZeroCapacity);
        }
        let footprint = capacity
            .checked_mul(size_of::<Arc<MetadataItem>>())
            .ok_or(CreateError::OutOfMemory)?;
        if footprint > MAX_RING_BYTES {
            return Err(CreateError::OutOfMemory);
        }

        let (producer, consumer) = rtrb::RingBuffer::new(capacity);
        let queue = Self {
            ring: consumer,
            kind,
            config,
            enabled: true,
        };
        let producer = MetadataProducer {
            ring: producer,
            kind,
            config,
            last_deadline: TickTime::ASAP,
            timing: None,
            clock: registry.clock(),
        };
        Ok((queue, producer))
    }

    /// Returns the head item if it is due at `tick`, advancing the read
    /// cursor.
    ///
    /// Returns `None` when the queue is disabled, empty, or the head's
    /// deadline (less the early bias and jitter slack) has not arrived.
    /// Items are delivered strictly in enqueue order; dropping the returned
    /// `Arc` after consumption releases the item.
    pub fn pop_ready(&mut self, tick: VsyncTick) -> Option<Arc<MetadataItem>> {
        if !self.enabled {
            return None;
        }
        let latest = tick
            .now
            .saturating_add(self.config.early_lead(tick.interval))
            .saturating_add(self.config.slack(tick.interval));
        let due = match self.ring.peek() {
            Ok(head) => head.deadline.is_asap() || head.deadline <= latest,
            Err(_) => false,
        };
        if due { self.ring.pop().ok() } else { None }
    }

    /// Disables the queue and releases every undelivered item.
    ///
    /// Returns the number of dropped items. The queue stays disabled until
    /// [`enable`](MetadataQueue::enable) re-arms it.
    pub fn flush(&mut self) -> usize {
        self.enabled = false;
        let mut dropped = 0;
        while self.ring.pop().is_ok() {
            dropped += 1;
        }
        dropped
    }

    /// Re-arms delivery after a flush.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Returns `true` while delivery is armed.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the packet family this queue carries.
    #[must_use]
    pub fn kind(&self) -> MetadataKind {
        self.kind
    }
}

impl core::fmt::Debug for MetadataQueue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MetadataQueue")
            .field("kind", &self.kind)
            .field("enabled", &self.enabled)
            .field("queued", &self.ring.slots())
            .finish_non_exhaustive()
    }
}
