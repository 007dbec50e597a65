// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-plane frame queue.
//!
//! A frame queue owns three presentation slots — *pending* (committed for
//! the next tick), *current* (visible now), *previous* (retained one extra
//! tick under the retain-history policy) — fed from a bounded
//! single-producer/single-consumer ring of not-yet-committed nodes.
//!
//! # Handles and contexts
//!
//! [`FrameQueue::create`] returns two handles. The [`FrameProducer`] is the
//! compile-time single-producer end: `enqueue` needs `&mut self`, so "at
//! most one concurrent enqueue" is enforced by ownership rather than by a
//! documented caller obligation. The [`FrameQueue`] is the consumer and
//! control end, driven once per tick by the driver's vsync handler
//! ([`advance`](FrameQueue::advance)) and by control tasks
//! (`pause`/`resume`/`flush`) under the driver's existing per-plane
//! serialization. Producer and consumer share no locks; the ring's cursors
//! publish with acquire/release ordering, and the advisory status word is
//! the only state touched from both sides.
//!
//! No method blocks or suspends; everything completes in bounded time and
//! is safe to call from a tick/interrupt-style context.
//!
//! # Tick anatomy
//!
//! Each [`advance`](FrameQueue::advance) runs four stages in order: refill
//! *pending* from the ring (one tick of hardware-programming lookahead plus
//! configurable jitter slack), hold a repeating frame, retire the node
//! leaving the display (firing `on_completed` in enqueue order), and promote
//! *pending* to *current* (firing `on_displayed`). A node pulled from the
//! ring while nothing is on display becomes visible in that same tick.

use std::sync::Arc;

use crate::error::{CreateError, EnqueueError};
use crate::node::{CompletionInfo, FrameNode};
use crate::presenter::{FramePresenter, PlaneCapabilities};
use crate::registry::{DeviceRegistry, OutputId, PlaneId};
use crate::status::{QueueStatus, StatusCell, StatusHandle};
use crate::time::TickTime;
use crate::timing::VsyncTick;

/// Scheduling knobs for one frame queue.
///
/// The defaults reproduce the classic one-tick hardware lookahead with half
/// a tick of interrupt-jitter slack. Both are tied to the latency profile of
/// the timing source driving the queue, so treat them as per-device
/// configuration rather than constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameQueueConfig {
    /// How many ticks ahead of visibility the hardware is programmed.
    pub lookahead_ticks: u32,
    /// Jitter slack as a fraction of the tick interval (`interval /
    /// slack_divisor`); zero disables the slack entirely.
    pub slack_divisor: u32,
    /// Keep a superseded node alive one extra tick for consumers that need
    /// the previous and current buffer simultaneously.
    pub retain_history: bool,
}

impl FrameQueueConfig {
    /// One tick of lookahead, half a tick of slack, no history.
    pub const DEFAULT: Self = Self {
        lookahead_ticks: 1,
        slack_divisor: 2,
        retain_history: false,
    };

    /// Latest deadline that still qualifies for programming at `tick`.
    fn deadline_window(&self, tick: VsyncTick) -> TickTime {
        let interval = tick.interval.ticks();
        let lookahead = interval.saturating_mul(u64::from(self.lookahead_ticks));
        let slack = match self.slack_divisor {
            0 => 0,
            divisor => interval / u64::from(divisor),
        };
        TickTime(
            tick.now
                .ticks()
                .saturating_add(lookahead)
                .saturating_add(slack),
        )
    }
}

impl Default for FrameQueueConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What one [`FrameQueue::advance`] call did, for driver bookkeeping and
/// trace emission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    /// A ring node was pulled into *pending* and programmed.
    pub programmed: bool,
    /// The tick ended early with *current* held on display.
    pub held: bool,
    /// A node became visible and fired `on_displayed`.
    pub displayed: bool,
    /// Number of nodes that fired `on_completed` this tick.
    pub retired: u32,
    /// The queue drained and the plane was turned off.
    pub deactivated: bool,
}

/// Producer-side handle: the single writer of the ring's write cursor.
pub struct FrameProducer<B> {
    ring: rtrb::Producer<FrameNode<B>>,
    status: Arc<StatusCell>,
}

impl<B> FrameProducer<B> {
    /// Enqueues a node for presentation.
    ///
    /// Never blocks. Accepting a node marks the queue active and clears any
    /// pause — new work always un-pauses. On [`EnqueueError::QueueFull`]
    /// the node is handed back untouched; back-pressure policy belongs to
    /// the caller.
    pub fn enqueue(&mut self, node: FrameNode<B>) -> Result<(), EnqueueError<B>> {
        match self.ring.push(node) {
            Ok(()) => {
                let mut set = QueueStatus::ACTIVE;
                if self.ring.slots() == 0 {
                    set = set.union(QueueStatus::FULL);
                }
                self.status.set_and_clear(set, QueueStatus::PAUSED);
                Ok(())
            }
            Err(rtrb::PushError::Full(node)) => {
                self.status.insert(QueueStatus::FULL);
                Err(EnqueueError::QueueFull(node))
            }
        }
    }

    /// Number of free ring slots.
    #[must_use]
    pub fn free_slots(&self) -> usize {
        self.ring.slots()
    }

    /// Returns a snapshot of the queue's advisory status.
    #[must_use]
    pub fn status(&self) -> QueueStatus {
        self.status.load()
    }

    /// Returns a cloneable status reader for other tasks.
    #[must_use]
    pub fn status_handle(&self) -> StatusHandle {
        StatusHandle::new(Arc::clone(&self.status))
    }
}

impl<B> core::fmt::Debug for FrameProducer<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameProducer")
            .field("free_slots", &self.ring.slots())
            .finish_non_exhaustive()
    }
}

/// Consumer and control handle for one plane's presentation schedule.
pub struct FrameQueue<B> {
    plane: PlaneId,
    ring: rtrb::Consumer<FrameNode<B>>,
    pending: Option<FrameNode<B>>,
    current: Option<FrameNode<B>>,
    previous: Option<FrameNode<B>>,
    status: Arc<StatusCell>,
    config: FrameQueueConfig,
    enabled: bool,
    output: Option<OutputId>,
    owner: Option<u64>,
}

// A node ring of this footprint cannot be a real request on any platform
// this driver targets; refusing it up front keeps `create` total.
const MAX_RING_BYTES: usize = (isize::MAX as usize) / 2;

impl<B> FrameQueue<B> {
    /// Creates a frame queue with a ring of `capacity` nodes, registering
    /// the plane with `registry`.
    ///
    /// Fails with [`CreateError::ZeroCapacity`] for an empty ring and
    /// [`CreateError::OutOfMemory`] when backing storage for the ring
    /// cannot be obtained.
    pub fn create(
        registry: &mut DeviceRegistry,
        capacity: usize,
        config: FrameQueueConfig,
    ) -> Result<(Self, FrameProducer<B>), CreateError> {
        if capacity == 0 {
            return Err(CreateError::ZeroCapacity);
        }
        let footprint = capacity
            .checked_mul(size_of::<FrameNode<B>>())
            .ok_or(CreateError::OutOfMemory)?;
        if footprint > MAX_RING_BYTES {
            return Err(CreateError::OutOfMemory);
        }

        let plane = registry.register_plane(PlaneCapabilities {
            max_queue_depth: capacity,
            retain_history: config.retain_history,
        });
        let (producer, consumer) = rtrb::RingBuffer::new(capacity);
        let status = StatusCell::new();

        let queue = Self {
            plane,
            ring: consumer,
            pending: None,
            current: None,
            previous: None,
            status: Arc::clone(&status),
            config,
            enabled: false,
            output: None,
            owner: None,
        };
        let producer = FrameProducer {
            ring: producer,
            status,
        };
        Ok((queue, producer))
    }

    /// Returns the plane this queue schedules.
    #[must_use]
    pub fn plane(&self) -> PlaneId {
        self.plane
    }

    /// Returns a snapshot of the queue's advisory status.
    #[must_use]
    pub fn status(&self) -> QueueStatus {
        self.status.load()
    }

    /// Returns a cloneable status reader for other tasks.
    #[must_use]
    pub fn status_handle(&self) -> StatusHandle {
        StatusHandle::new(Arc::clone(&self.status))
    }

    /// Runs one tick of the presentation schedule.
    ///
    /// Called exactly once per vsync from the tick context; never fails. A
    /// tick where nothing is due does nothing and that is the common case.
    pub fn advance<P: FramePresenter<B>>(
        &mut self,
        tick: VsyncTick,
        presenter: &mut P,
    ) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        let paused = self.status.load().contains(QueueStatus::PAUSED);

        // Refill: commit the next due ring node one tick ahead of its
        // visibility so the presenter can program hardware for it.
        if self.pending.is_none() && !paused {
            let window = self.config.deadline_window(tick);
            let due = match self.ring.peek() {
                Ok(head) => {
                    let deadline = head.presentation_deadline();
                    deadline.is_asap() || deadline <= window
                }
                Err(_) => false,
            };
            if due && let Ok(node) = self.ring.pop() {
                self.status.remove(QueueStatus::FULL);
                if !self.enabled {
                    presenter.enable();
                    self.enabled = true;
                    self.status.insert(QueueStatus::VISIBLE);
                }
                presenter.program(&node);
                self.pending = Some(node);
                report.programmed = true;
            }
        }

        // Hold: a repeating frame keeps the slot for this whole tick.
        if let Some(current) = self.current.as_mut()
            && current.repeat_count() > 0
        {
            current.decrement_repeat();
            report.held = true;
            return report;
        }

        // Retire: decide what happens to the node leaving the display.
        if self.current.is_some() {
            let mut deactivated = false;
            if self.pending.is_none() {
                let persistent = self.current.as_ref().is_some_and(FrameNode::is_persistent);
                if paused || persistent {
                    report.held = true;
                    return report;
                }
                // Nothing follows: the plane goes dark with this tick.
                if self.enabled {
                    presenter.disable();
                    self.enabled = false;
                }
                self.status
                    .remove(QueueStatus::ACTIVE.union(QueueStatus::VISIBLE));
                deactivated = true;
                report.deactivated = true;
            }

            let status = self.status.load();
            if let Some(previous) = self.previous.take() {
                previous.complete(Some(CompletionInfo {
                    retired_at: tick.now,
                    status,
                }));
                report.retired += 1;
            }
            if let Some(current) = self.current.take() {
                if !deactivated && self.config.retain_history {
                    self.previous = Some(current);
                } else {
                    current.complete(Some(CompletionInfo {
                        retired_at: tick.now,
                        status,
                    }));
                    report.retired += 1;
                }
            }
        }

        // Promote: the committed node becomes visible.
        if let Some(mut node) = self.pending.take() {
            if paused {
                // A node promoted into a paused queue must not linger for
                // its repeat count once playback resumes.
                node.clear_repeat();
            }
            node.fire_displayed(tick.now);
            self.current = Some(node);
            report.displayed = true;
        }

        report
    }

    /// Pauses presentation, optionally discarding all queued work.
    ///
    /// Idempotent; a queue with nothing on it ignores the call. With
    /// `flush_queue`, every held node is released as in [`flush`], but the
    /// pause is retained so presentation restarts only when new data
    /// arrives.
    ///
    /// [`flush`]: FrameQueue::flush
    pub fn pause<P: FramePresenter<B>>(&mut self, flush_queue: bool, presenter: &mut P) {
        if !self.status.load().contains(QueueStatus::ACTIVE) {
            return;
        }
        self.status.insert(QueueStatus::PAUSED);
        if flush_queue {
            self.release_all(presenter);
        }
    }

    /// Resumes a paused queue, but only if the ring holds at least one
    /// ready entry; otherwise the pause persists until new data arrives.
    pub fn resume(&mut self) {
        let status = self.status.load();
        if !status.contains(QueueStatus::ACTIVE) || !status.contains(QueueStatus::PAUSED) {
            return;
        }
        if self.ring.slots() > 0 {
            self.status.remove(QueueStatus::PAUSED);
        }
    }

    /// Discards all queued work, releasing every node in original order.
    ///
    /// *previous*, *current*, *pending*, then the ring oldest-first each
    /// fire `on_completed` with `None` ("did not reach display"). The call
    /// is synchronous and the queue accepts new enqueues immediately
    /// afterwards. Returns the number of released nodes.
    pub fn flush<P: FramePresenter<B>>(&mut self, presenter: &mut P) -> usize {
        self.status
            .remove(QueueStatus::ACTIVE.union(QueueStatus::PAUSED));
        self.release_all(presenter)
    }

    /// Binds the plane to a display output. Fails if already connected.
    pub fn connect_output(&mut self, output: OutputId) -> bool {
        if self.output.is_some() {
            return false;
        }
        self.output = Some(output);
        let mut set = QueueStatus::CONNECTED;
        if self.enabled {
            set = set.union(QueueStatus::VISIBLE);
        }
        self.status.insert(set);
        true
    }

    /// Unbinds the plane from its output.
    pub fn disconnect_output(&mut self) {
        self.output = None;
        self.status
            .remove(QueueStatus::CONNECTED.union(QueueStatus::VISIBLE));
    }

    /// Latches the plane for exclusive use by `owner`.
    ///
    /// Repeated calls by the same owner succeed; a second owner is refused
    /// until [`release`](FrameQueue::release).
    pub fn acquire(&mut self, owner: u64) -> bool {
        match self.owner {
            Some(current) => current == owner,
            None => {
                self.owner = Some(owner);
                self.status.insert(QueueStatus::LOCKED);
                true
            }
        }
    }

    /// Releases the exclusive-use latch, flushing any queued content so the
    /// next owner starts from an empty plane.
    pub fn release<P: FramePresenter<B>>(&mut self, owner: u64, presenter: &mut P) {
        if self.owner != Some(owner) {
            return;
        }
        self.flush(presenter);
        self.owner = None;
        self.status.remove(QueueStatus::LOCKED);
    }

    /// Marks the plane visible. Only meaningful while the plane is enabled
    /// and connected.
    pub fn show(&mut self) -> bool {
        if self.enabled && self.output.is_some() {
            self.status.insert(QueueStatus::VISIBLE);
            true
        } else {
            false
        }
    }

    /// Marks the plane hidden.
    pub fn hide(&mut self) -> bool {
        if self.enabled && self.output.is_some() {
            self.status.remove(QueueStatus::VISIBLE);
            true
        } else {
            false
        }
    }

    fn release_all<P: FramePresenter<B>>(&mut self, presenter: &mut P) -> usize {
        if self.enabled {
            presenter.disable();
            self.enabled = false;
        }
        self.status.remove(
            QueueStatus::ACTIVE
                .union(QueueStatus::VISIBLE)
                .union(QueueStatus::FULL),
        );
        presenter.reset_queue_state();

        let mut released = 0;
        for node in [
            self.previous.take(),
            self.current.take(),
            self.pending.take(),
        ]
        .into_iter()
        .flatten()
        {
            node.complete(None);
            released += 1;
        }
        while let Ok(node) = self.ring.pop() {
            node.complete(None);
            released += 1;
        }
        released
    }
}

impl<B> Drop for FrameQueue<B> {
    /// A dropped queue still owes every accepted node its completion
    /// notification; the buffers go back through `on_completed` with `None`.
    fn drop(&mut self) {
        for node in [
            self.previous.take(),
            self.current.take(),
            self.pending.take(),
        ]
        .into_iter()
        .flatten()
        {
            node.complete(None);
        }
        while let Ok(node) = self.ring.pop() {
            node.complete(None);
        }
    }
}

impl<B> core::fmt::Debug for FrameQueue<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameQueue")
            .field("plane", &self.plane)
            .field("status", &self.status.load())
            .field("pending", &self.pending.is_some())
            .field("current", &self.current.is_some())
            .field("previous", &self.previous.is_some())
            .finish_non_exhaustive()
    }
}
