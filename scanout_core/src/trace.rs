// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the presentation schedule.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! queue-driving code calls at each stage of the tick loop. All method
//! bodies default to no-ops, so a sink implements only the events it cares
//! about.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing; when
//! **on**, each method performs a single `Option` branch before
//! dispatching. The queues themselves stay instrumentation-free — the
//! driver (or the harness tick loop) owns the tracer and feeds it from
//! [`AdvanceReport`]s, which keeps the tick path identical whether or not
//! anyone is listening.

use crate::frame_queue::AdvanceReport;
use crate::metadata::MetadataKind;
use crate::registry::PlaneId;
use crate::time::TickTime;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a producer commits a node to a plane's ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnqueueEvent {
    /// Plane the node was queued on.
    pub plane: PlaneId,
    /// The node's presentation deadline.
    pub deadline: TickTime,
    /// The node's repeat count.
    pub repeat_count: u32,
}

/// Emitted after each `advance`, carrying the tick's outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickEvent {
    /// Plane that was advanced.
    pub plane: PlaneId,
    /// Timestamp of the tick edge.
    pub now: TickTime,
    /// What the tick did.
    pub report: AdvanceReport,
}

/// Emitted when presentation is paused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PauseEvent {
    /// Plane that was paused.
    pub plane: PlaneId,
    /// Whether queued work was discarded with the pause.
    pub flushed: bool,
}

/// Emitted when presentation resumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResumeEvent {
    /// Plane that resumed.
    pub plane: PlaneId,
}

/// Emitted when a queue is flushed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlushEvent {
    /// Plane whose queue was flushed.
    pub plane: PlaneId,
    /// Number of nodes released without reaching the display.
    pub released: usize,
}

/// Emitted when a metadata item is handed to the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MetadataDeliveryEvent {
    /// Packet family delivered.
    pub kind: MetadataKind,
    /// The item's deadline.
    pub deadline: TickTime,
    /// Tick at which it was delivered.
    pub delivered_at: TickTime,
}

// ---------------------------------------------------------------------------
// TraceSink
// ---------------------------------------------------------------------------

/// Receiver for presentation-schedule events.
pub trait TraceSink {
    /// Called when a node is committed to a ring.
    fn on_enqueue(&mut self, e: &EnqueueEvent) {
        _ = e;
    }

    /// Called after each tick with its outcome.
    fn on_tick(&mut self, e: &TickEvent) {
        _ = e;
    }

    /// Called when a plane is paused.
    fn on_pause(&mut self, e: &PauseEvent) {
        _ = e;
    }

    /// Called when a plane resumes.
    fn on_resume(&mut self, e: &ResumeEvent) {
        _ = e;
    }

    /// Called when a queue is flushed.
    fn on_flush(&mut self, e: &FlushEvent) {
        _ = e;
    }

    /// Called when a metadata item is delivered.
    fn on_metadata_delivery(&mut self, e: &MetadataDeliveryEvent) {
        _ = e;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! emit {
    ($self:ident, $method:ident, $event:ident) => {{
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut $self.sink {
            sink.$method($event);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = $event;
        }
    }};
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits an [`EnqueueEvent`].
    #[inline]
    pub fn enqueue(&mut self, e: &EnqueueEvent) {
        emit!(self, on_enqueue, e);
    }

    /// Emits a [`TickEvent`].
    #[inline]
    pub fn tick(&mut self, e: &TickEvent) {
        emit!(self, on_tick, e);
    }

    /// Emits a [`PauseEvent`].
    #[inline]
    pub fn pause(&mut self, e: &PauseEvent) {
        emit!(self, on_pause, e);
    }

    /// Emits a [`ResumeEvent`].
    #[inline]
    pub fn resume(&mut self, e: &ResumeEvent) {
        emit!(self, on_resume, e);
    }

    /// Emits a [`FlushEvent`].
    #[inline]
    pub fn flush(&mut self, e: &FlushEvent) {
        emit!(self, on_flush, e);
    }

    /// Emits a [`MetadataDeliveryEvent`].
    #[inline]
    pub fn metadata_delivery(&mut self, e: &MetadataDeliveryEvent) {
        emit!(self, on_metadata_delivery, e);
    }
}
