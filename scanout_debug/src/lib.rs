// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for scanout
//! diagnostics.
//!
//! This crate provides [`TraceSink`](scanout_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`recorder::RecorderSink`] — structured in-memory recording.
//! - [`pretty::PrettySink`] — human-readable one-line-per-event output.
//! - [`chrome::export`] — Chrome Trace Event Format JSON from a recording.

pub mod chrome;
pub mod pretty;
pub mod recorder;
