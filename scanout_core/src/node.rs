// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation nodes.
//!
//! A [`FrameNode`] owns exactly one buffer resource for its whole stay in
//! the queue. Ownership moves from the caller into the queue on enqueue and
//! moves back out through the `on_completed` hook — never duplicated, never
//! lost. A node built without a completion hook releases the buffer through
//! its `Drop` impl instead.
//!
//! Hooks fire from the tick context and must be `Send` because nodes cross
//! from the producer task into that context.

use core::fmt;

use crate::status::QueueStatus;
use crate::time::TickTime;

/// Hook invoked at most once, when the node becomes visible.
pub type DisplayedHook = Box<dyn FnOnce(TickTime) + Send>;

/// Hook invoked exactly once per accepted node, handing the buffer resource
/// back to the caller. The info is `None` when the node never reached the
/// display (flushed while queued or pending).
pub type CompletedHook<B> = Box<dyn FnOnce(B, Option<CompletionInfo>) + Send>;

/// Completion details for a node that reached the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletionInfo {
    /// Tick at which the node left the display.
    pub retired_at: TickTime,
    /// Snapshot of the queue's advisory status at completion.
    pub status: QueueStatus,
}

/// One presentation node: a buffer resource plus its scheduling metadata.
pub struct FrameNode<B> {
    buffer: B,
    deadline: TickTime,
    repeat_count: u32,
    persistent: bool,
    on_displayed: Option<DisplayedHook>,
    on_completed: Option<CompletedHook<B>>,
}

impl<B> FrameNode<B> {
    /// Creates a node presenting `buffer` as soon as possible, for one tick,
    /// with no hooks.
    #[must_use]
    pub fn new(buffer: B) -> Self {
        Self {
            buffer,
            deadline: TickTime::ASAP,
            repeat_count: 0,
            persistent: false,
            on_displayed: None,
            on_completed: None,
        }
    }

    /// Sets the earliest tick time at which the node is valid to present.
    /// [`TickTime::ASAP`] (the default) qualifies immediately.
    #[must_use]
    pub fn deadline(mut self, deadline: TickTime) -> Self {
        self.deadline = deadline;
        self
    }

    /// Sets how many additional ticks the node stays on display after the
    /// tick that made it visible.
    #[must_use]
    pub fn repeat(mut self, count: u32) -> Self {
        self.repeat_count = count;
        self
    }

    /// Keeps the node on display when the queue drains, instead of letting
    /// the plane go dark.
    #[must_use]
    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    /// Installs the visibility hook.
    #[must_use]
    pub fn on_displayed(mut self, hook: DisplayedHook) -> Self {
        self.on_displayed = Some(hook);
        self
    }

    /// Installs the completion hook.
    #[must_use]
    pub fn on_completed(mut self, hook: CompletedHook<B>) -> Self {
        self.on_completed = Some(hook);
        self
    }

    /// Returns the node's presentation deadline.
    #[inline]
    #[must_use]
    pub fn presentation_deadline(&self) -> TickTime {
        self.deadline
    }

    /// Returns the remaining repeat count.
    #[inline]
    #[must_use]
    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    /// Returns `true` when the node persists on display after the queue
    /// drains.
    #[inline]
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Returns the buffer resource for hardware programming.
    #[inline]
    #[must_use]
    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub(crate) fn decrement_repeat(&mut self) {
        self.repeat_count -= 1;
    }

    pub(crate) fn clear_repeat(&mut self) {
        self.repeat_count = 0;
    }

    /// Fires the visibility hook, once.
    pub(crate) fn fire_displayed(&mut self, now: TickTime) {
        if let Some(hook) = self.on_displayed.take() {
            hook(now);
        }
    }

    /// Consumes the node, handing the buffer back through the completion
    /// hook (or dropping it when no hook was installed).
    pub(crate) fn complete(self, info: Option<CompletionInfo>) {
        if let Some(hook) = self.on_completed {
            hook(self.buffer, info);
        }
    }
}

impl<B: fmt::Debug> fmt::Debug for FrameNode<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameNode")
            .field("buffer", &self.buffer)
            .field("deadline", &self.deadline)
            .field("repeat_count", &self.repeat_count)
            .field("persistent", &self.persistent)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn complete_hands_buffer_back_through_hook() {
        let seen = Arc::new(AtomicU32::new(0));
        let seen2 = Arc::clone(&seen);

        let node = FrameNode::new(41_u32).on_completed(Box::new(move |buffer, info| {
            assert!(info.is_none(), "flushed node carries no completion info");
            seen2.store(buffer + 1, Ordering::SeqCst);
        }));
        node.complete(None);

        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn displayed_hook_fires_once() {
        let count = Arc::new(AtomicU32::new(0));
        let count2 = Arc::clone(&count);

        let mut node = FrameNode::new(()).on_displayed(Box::new(move |_| {
            count2.fetch_add(1, Ordering::SeqCst);
        }));
        node.fire_displayed(TickTime(10));
        node.fire_displayed(TickTime(20));

        assert_eq!(count.load(Ordering::SeqCst), 1, "hook must fire at most once");
    }

    #[test]
    fn node_without_hook_drops_buffer() {
        // Dropping the buffer is the release path when no hook is installed.
        let node = FrameNode::new(String::from("surface"));
        node.complete(None);
    }
}
