// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vsync-synchronized presentation queues for display pipeline drivers.
//!
//! `scanout_core` schedules renderable buffers and side-channel metadata
//! onto display hardware: producer tasks enqueue work into bounded rings,
//! and the driver's vsync handler releases exactly one item per tick to a
//! hardware presenter at the correct moment, with deterministic
//! pause/resume/flush behavior and exactly-once completion notification.
//!
//! # Architecture
//!
//! ```text
//!   producer task                        vsync tick handler
//!       │                                      │
//!       ▼                                      ▼
//!   FrameProducer::enqueue ──ring──► FrameQueue::advance ──► FramePresenter
//!       │                                      │    (program one tick ahead,
//!       ▼                                      │     enable/disable plane)
//!   MetadataProducer::enqueue ─ring─► MetadataQueue::pop_ready
//!                                              │
//!                                              ▼
//!                             on_displayed / on_completed hooks
//! ```
//!
//! **[`frame_queue`]** — The per-plane schedule: a single-producer ring
//! feeding *pending*/*current*/*previous* slots, advanced once per tick.
//!
//! **[`metadata`]** — Bounded FIFOs of timestamped side-channel payloads
//! with the same deadline-plus-slack delivery rule and an early-delivery
//! bias for lookahead programming.
//!
//! **[`node`]** — Presentation nodes. A node owns its buffer resource from
//! enqueue until the `on_completed` hook hands it back; hooks fire exactly
//! once.
//!
//! **[`presenter`]** — The capability trait a device family implements to
//! turn nodes into register writes.
//!
//! **[`timing`]** — The read-only timing-source and clock contracts; ticks
//! are passed *into* the queues, never read by them.
//!
//! **[`registry`]** — Explicit per-device registry of planes, replacing
//! process-wide device tables.
//!
//! **[`status`]** — The advisory status word shared across producer,
//! consumer, and observer handles.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) and the zero-overhead
//! [`Tracer`](trace::Tracer) wrapper for tick-loop instrumentation.
//!
//! # Contexts
//!
//! Nothing here blocks, suspends, or allocates on the tick path after
//! construction; every operation completes in bounded time and is safe to
//! drive from an interrupt-style periodic callback.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): enables the `Tracer` method bodies
//!   (one branch per call site).

pub mod error;
pub mod frame_queue;
pub mod metadata;
pub mod node;
pub mod presenter;
pub mod registry;
pub mod status;
pub mod time;
pub mod timing;
pub mod trace;
