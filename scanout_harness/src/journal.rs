// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Callback journaling.
//!
//! A [`CallbackJournal`] builds nodes whose hooks append to a shared event
//! list, so tests can assert on the exact order of `on_displayed` and
//! `on_completed` across a whole scenario.

use parking_lot::Mutex;
use std::sync::Arc;

use scanout_core::node::{CompletionInfo, FrameNode};
use scanout_core::time::TickTime;

/// One recorded callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JournalEvent {
    /// `on_displayed` fired.
    Displayed {
        /// Label given to the node at construction.
        label: String,
        /// Tick at which the node became visible.
        at: TickTime,
    },
    /// `on_completed` fired.
    Completed {
        /// Label given to the node at construction.
        label: String,
        /// Completion details; `None` when the node never reached display.
        info: Option<CompletionInfo>,
    },
}

impl JournalEvent {
    /// Returns the node label the event belongs to.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Displayed { label, .. } | Self::Completed { label, .. } => label,
        }
    }
}

/// Shared recorder of node callbacks.
#[derive(Clone, Debug, Default)]
pub struct CallbackJournal {
    events: Arc<Mutex<Vec<JournalEvent>>>,
}

impl CallbackJournal {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a node whose hooks record into this journal under `label`.
    #[must_use]
    pub fn node<B: Send + 'static>(&self, buffer: B, label: &str) -> FrameNode<B> {
        let displayed = Arc::clone(&self.events);
        let completed = Arc::clone(&self.events);
        let displayed_label = label.to_owned();
        let completed_label = label.to_owned();
        FrameNode::new(buffer)
            .on_displayed(Box::new(move |at| {
                displayed.lock().push(JournalEvent::Displayed {
                    label: displayed_label,
                    at,
                });
            }))
            .on_completed(Box::new(move |_buffer, info| {
                completed.lock().push(JournalEvent::Completed {
                    label: completed_label,
                    info,
                });
            }))
    }

    /// Returns a snapshot of all recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<JournalEvent> {
        self.events.lock().clone()
    }

    /// Labels of nodes that fired `on_displayed`, in order.
    #[must_use]
    pub fn displayed(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                JournalEvent::Displayed { label, .. } => Some(label.clone()),
                JournalEvent::Completed { .. } => None,
            })
            .collect()
    }

    /// Labels of nodes that fired `on_completed`, in order, with whether
    /// they reached the display.
    #[must_use]
    pub fn completed(&self) -> Vec<(String, bool)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                JournalEvent::Completed { label, info } => {
                    Some((label.clone(), info.is_some()))
                }
                JournalEvent::Displayed { .. } => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use scanout_core::frame_queue::{FrameQueue, FrameQueueConfig};
    use scanout_core::presenter::NoopPresenter;
    use scanout_core::registry::DeviceRegistry;
    use scanout_core::time::Duration;
    use scanout_core::timing::VsyncTick;

    #[test]
    fn records_hook_firings_in_order() {
        let journal = CallbackJournal::new();
        let mut registry = DeviceRegistry::new(ManualClock::new(TickTime(0)));
        let (mut queue, mut producer) =
            FrameQueue::create(&mut registry, 2, FrameQueueConfig::DEFAULT)
                .expect("queue creation");
        let mut presenter = NoopPresenter;

        producer.enqueue(journal.node(1_u32, "N1")).expect("fits");
        producer.enqueue(journal.node(2_u32, "N2")).expect("fits");
        queue.advance(
            VsyncTick::new(TickTime(10), Duration(10)),
            &mut presenter,
        );
        queue.flush(&mut presenter);

        assert_eq!(journal.displayed(), ["N1"]);
        assert_eq!(
            journal.completed(),
            [("N1".to_owned(), false), ("N2".to_owned(), false)],
            "flushed nodes complete without display info, in order"
        );
    }
}
